use crate::error::{CustmapError, Result};
use crate::models::{GeoCoordinate, MapRegion};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Public Nominatim instance used when nothing else is configured
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Upper bound on candidates a single search may return
pub const MAX_SEARCH_RESULTS: usize = 5;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Which geocoding backend to talk to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeocoderSpec {
    /// Nominatim-compatible HTTP service at the given base URL
    Nominatim { base_url: String },
    /// Built-in fixture gazetteer, no network access
    Offline,
}

impl Default for GeocoderSpec {
    fn default() -> Self {
        GeocoderSpec::Nominatim { base_url: DEFAULT_NOMINATIM_URL.to_string() }
    }
}

impl fmt::Display for GeocoderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeocoderSpec::Nominatim { base_url } => write!(f, "nominatim:{}", base_url),
            GeocoderSpec::Offline => f.write_str("offline"),
        }
    }
}

/// Parses `offline`, `nominatim` or `nominatim:<base-url>`
impl FromStr for GeocoderSpec {
    type Err = CustmapError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("offline") {
            return Ok(GeocoderSpec::Offline);
        }
        if s.eq_ignore_ascii_case("nominatim") {
            return Ok(GeocoderSpec::default());
        }

        match s.split_once(':') {
            Some((scheme, url)) if scheme.eq_ignore_ascii_case("nominatim") => {
                let url = url.trim().trim_end_matches('/');
                if url.starts_with("http://") || url.starts_with("https://") {
                    Ok(GeocoderSpec::Nominatim { base_url: url.to_string() })
                } else {
                    Err(CustmapError::ConfigInvalid {
                        key: "geocoder".to_string(),
                        reason: format!("Nominatim base URL must be http(s), got '{}'", url),
                    })
                }
            }
            _ => Err(CustmapError::ConfigInvalid {
                key: "geocoder".to_string(),
                reason: format!("Invalid geocoder: {}. Use offline or nominatim:<base-url>", s),
            }),
        }
    }
}

/// Layered configuration for Custmap
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub debounce_ms: ConfigValue<u64>,
    pub max_results: ConfigValue<usize>,
    pub gateway_timeout_ms: ConfigValue<u64>,
    pub geocoder: ConfigValue<GeocoderSpec>,
    pub default_region: ConfigValue<MapRegion>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            debounce_ms: ConfigValue::new(500, ConfigSource::Default),
            max_results: ConfigValue::new(MAX_SEARCH_RESULTS, ConfigSource::Default),
            gateway_timeout_ms: ConfigValue::new(5000, ConfigSource::Default),
            geocoder: ConfigValue::new(GeocoderSpec::default(), ConfigSource::Default),
            default_region: ConfigValue::new(MapRegion::default(), ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CustmapError::ConfigFileNotFound { path: path.to_path_buf() });
        }

        let content = fs::read_to_string(path).map_err(|e| CustmapError::ConfigInvalid {
            key: "file".to_string(),
            reason: format!("Failed to read config file: {}", e),
        })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| CustmapError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        // Update values from file
        if let Some(debounce_ms) = file_config.debounce_ms {
            self.debounce_ms.update(debounce_ms, ConfigSource::File);
        }

        if let Some(max_results) = file_config.max_results {
            self.max_results.update(validate_max_results(max_results)?, ConfigSource::File);
        }

        if let Some(timeout_ms) = file_config.gateway_timeout_ms {
            self.gateway_timeout_ms.update(validate_timeout(timeout_ms)?, ConfigSource::File);
        }

        if let Some(geocoder) = file_config.geocoder {
            self.geocoder.update(geocoder.parse()?, ConfigSource::File);
        }

        if let Some(region) = file_config.default_region {
            self.default_region.update(region.into_region()?, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // CUSTMAP_DEBOUNCE_MS
        if let Ok(value) = env::var("CUSTMAP_DEBOUNCE_MS") {
            match value.parse::<u64>() {
                Ok(ms) => self.debounce_ms.update(ms, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid CUSTMAP_DEBOUNCE_MS value '{}': expected milliseconds",
                    value
                ),
            }
        }

        // CUSTMAP_MAX_RESULTS
        if let Ok(value) = env::var("CUSTMAP_MAX_RESULTS") {
            match value.parse::<usize>().ok().and_then(|n| validate_max_results(n).ok()) {
                Some(n) => self.max_results.update(n, ConfigSource::Environment),
                None => tracing::warn!(
                    "Invalid CUSTMAP_MAX_RESULTS value '{}': expected an integer from 1 to {}",
                    value,
                    MAX_SEARCH_RESULTS
                ),
            }
        }

        // CUSTMAP_GATEWAY_TIMEOUT_MS
        if let Ok(value) = env::var("CUSTMAP_GATEWAY_TIMEOUT_MS") {
            match value.parse::<u64>().ok().filter(|ms| *ms > 0) {
                Some(ms) => self.gateway_timeout_ms.update(ms, ConfigSource::Environment),
                None => tracing::warn!(
                    "Invalid CUSTMAP_GATEWAY_TIMEOUT_MS value '{}': expected positive milliseconds",
                    value
                ),
            }
        }

        // CUSTMAP_GEOCODER
        if let Ok(value) = env::var("CUSTMAP_GEOCODER") {
            match value.parse::<GeocoderSpec>() {
                Ok(spec) => self.geocoder.update(spec, ConfigSource::Environment),
                Err(e) => tracing::warn!("Ignoring CUSTMAP_GEOCODER: {}", e),
            }
        }

        // CUSTMAP_DEFAULT_REGION
        if let Ok(value) = env::var("CUSTMAP_DEFAULT_REGION") {
            match parse_region(&value) {
                Ok(region) => self.default_region.update(region, ConfigSource::Environment),
                Err(e) => tracing::warn!("Ignoring CUSTMAP_DEFAULT_REGION: {}", e),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(debounce_ms) = overrides.debounce_ms {
            self.debounce_ms.update(debounce_ms, ConfigSource::Cli);
        }

        if let Some(max_results) = overrides.max_results {
            let capped = max_results.clamp(1, MAX_SEARCH_RESULTS);
            if capped != max_results {
                tracing::warn!(requested = max_results, used = capped, "max_results out of range");
            }
            self.max_results.update(capped, ConfigSource::Cli);
        }

        if let Some(timeout_ms) = overrides.gateway_timeout_ms {
            self.gateway_timeout_ms.update(timeout_ms, ConfigSource::Cli);
        }

        if let Some(geocoder) = overrides.geocoder {
            self.geocoder.update(geocoder, ConfigSource::Cli);
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms.value)
    }

    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_millis(self.gateway_timeout_ms.value)
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "debounce_ms".to_string(),
            (self.debounce_ms.value.to_string(), self.debounce_ms.source),
        );

        map.insert(
            "max_results".to_string(),
            (self.max_results.value.to_string(), self.max_results.source),
        );

        map.insert(
            "gateway_timeout_ms".to_string(),
            (self.gateway_timeout_ms.value.to_string(), self.gateway_timeout_ms.source),
        );

        map.insert("geocoder".to_string(), (self.geocoder.value.to_string(), self.geocoder.source));

        let region = &self.default_region.value;
        map.insert(
            "default_region".to_string(),
            (
                format!(
                    "{},{},{},{}",
                    region.center.latitude,
                    region.center.longitude,
                    region.latitude_delta,
                    region.longitude_delta
                ),
                self.default_region.source,
            ),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    debounce_ms: Option<u64>,
    max_results: Option<usize>,
    gateway_timeout_ms: Option<u64>,
    geocoder: Option<String>,
    default_region: Option<FileRegion>,
}

/// `[default_region]` table
#[derive(Debug, Deserialize, Serialize)]
struct FileRegion {
    latitude: f64,
    longitude: f64,
    latitude_delta: Option<f64>,
    longitude_delta: Option<f64>,
}

impl FileRegion {
    fn into_region(self) -> Result<MapRegion> {
        let center = GeoCoordinate::new(self.latitude, self.longitude)?;
        MapRegion::new(
            center,
            self.latitude_delta.unwrap_or(MapRegion::DEFAULT_LATITUDE_DELTA),
            self.longitude_delta.unwrap_or(MapRegion::DEFAULT_LONGITUDE_DELTA),
        )
    }
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub debounce_ms: Option<u64>,
    pub max_results: Option<usize>,
    pub gateway_timeout_ms: Option<u64>,
    pub geocoder: Option<GeocoderSpec>,
}

/// Parse a region from `lat,lon` or `lat,lon,latDelta,lonDelta`
pub fn parse_region(s: &str) -> Result<MapRegion> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let numbers: Vec<f64> = parts
        .iter()
        .map(|p| p.parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| CustmapError::ConfigInvalid {
            key: "default_region".to_string(),
            reason: format!("Expected comma-separated numbers, got '{}'", s),
        })?;

    match numbers.as_slice() {
        [lat, lon] => Ok(MapRegion::around(GeoCoordinate::new(*lat, *lon)?)),
        [lat, lon, lat_delta, lon_delta] => {
            MapRegion::new(GeoCoordinate::new(*lat, *lon)?, *lat_delta, *lon_delta)
        }
        _ => Err(CustmapError::ConfigInvalid {
            key: "default_region".to_string(),
            reason: format!("Expected 'lat,lon' or 'lat,lon,latDelta,lonDelta', got '{}'", s),
        }),
    }
}

fn validate_max_results(n: usize) -> Result<usize> {
    if !(1..=MAX_SEARCH_RESULTS).contains(&n) {
        return Err(CustmapError::ConfigInvalid {
            key: "max_results".to_string(),
            reason: format!("must be between 1 and {}, got {}", MAX_SEARCH_RESULTS, n),
        });
    }
    Ok(n)
}

fn validate_timeout(ms: u64) -> Result<u64> {
    if ms == 0 {
        return Err(CustmapError::ConfigInvalid {
            key: "gateway_timeout_ms".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.debounce_ms.value, 500);
        assert_eq!(config.debounce_ms.source, ConfigSource::Default);
        assert_eq!(config.max_results.value, 5);
        assert_eq!(config.gateway_timeout(), Duration::from_secs(5));
        assert_eq!(config.geocoder.value, GeocoderSpec::default());
        assert_eq!(config.default_region.value, MapRegion::default());
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        // File should override default
        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        // Environment should override file
        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);
        assert_eq!(value.source, ConfigSource::Environment);

        // CLI should override environment
        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
debounce_ms = 250
max_results = 3
gateway_timeout_ms = 2000
geocoder = "offline"

[default_region]
latitude = 33.4484
longitude = -112.0740
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.debounce_ms.value, 250);
        assert_eq!(config.debounce_ms.source, ConfigSource::File);
        assert_eq!(config.max_results.value, 3);
        assert_eq!(config.gateway_timeout_ms.value, 2000);
        assert_eq!(config.geocoder.value, GeocoderSpec::Offline);
        assert_eq!(config.default_region.value.center.latitude, 33.4484);
        assert_eq!(config.default_region.value.latitude_delta, MapRegion::DEFAULT_LATITUDE_DELTA);
    }

    #[test]
    fn test_file_rejects_zero_max_results() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "max_results = 0").unwrap();

        let err = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, CustmapError::ConfigInvalid { ref key, .. } if key == "max_results"));
    }

    #[test]
    fn test_file_rejects_max_results_above_cap() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "max_results = 8").unwrap();

        let err = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, CustmapError::ConfigInvalid { ref key, .. } if key == "max_results"));
    }

    #[test]
    fn test_cli_max_results_is_clamped() {
        let mut config = LayeredConfig::with_defaults();
        config.update_from_cli(CliConfigOverrides {
            max_results: Some(8),
            ..Default::default()
        });
        assert_eq!(config.max_results.value, MAX_SEARCH_RESULTS);
        assert_eq!(config.max_results.source, ConfigSource::Cli);

        config.update_from_cli(CliConfigOverrides {
            max_results: Some(0),
            ..Default::default()
        });
        assert_eq!(config.max_results.value, 1);
    }

    #[test]
    fn test_missing_file() {
        let err = LayeredConfig::with_defaults()
            .load_from_file("/nonexistent/custmap.toml")
            .unwrap_err();
        assert!(matches!(err, CustmapError::ConfigFileNotFound { .. }));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        let overrides = CliConfigOverrides {
            debounce_ms: Some(100),
            max_results: None,
            gateway_timeout_ms: Some(800),
            geocoder: Some(GeocoderSpec::Offline),
        };

        config.update_from_cli(overrides);

        assert_eq!(config.debounce_ms.value, 100);
        assert_eq!(config.debounce_ms.source, ConfigSource::Cli);
        assert_eq!(config.gateway_timeout(), Duration::from_millis(800));
        assert_eq!(config.geocoder.value, GeocoderSpec::Offline);
        // These should still be defaults
        assert_eq!(config.max_results.source, ConfigSource::Default);
        assert_eq!(config.default_region.source, ConfigSource::Default);
    }

    #[test]
    fn test_parse_geocoder() {
        assert_eq!("offline".parse::<GeocoderSpec>().unwrap(), GeocoderSpec::Offline);
        assert_eq!("NOMINATIM".parse::<GeocoderSpec>().unwrap(), GeocoderSpec::default());
        assert_eq!(
            "nominatim:http://localhost:8080/".parse::<GeocoderSpec>().unwrap(),
            GeocoderSpec::Nominatim { base_url: "http://localhost:8080".to_string() }
        );
        assert!("nominatim:localhost".parse::<GeocoderSpec>().is_err());
        assert!("google".parse::<GeocoderSpec>().is_err());
    }

    #[test]
    fn test_parse_region() {
        let region = parse_region("47.6062, -122.3321").unwrap();
        assert_eq!(region.center.longitude, -122.3321);
        assert_eq!(region.longitude_delta, MapRegion::DEFAULT_LONGITUDE_DELTA);

        let region = parse_region("47.6,-122.3,0.5,0.25").unwrap();
        assert_eq!(region.latitude_delta, 0.5);
        assert_eq!(region.longitude_delta, 0.25);

        assert!(parse_region("47.6").is_err());
        assert!(parse_region("47.6,-122.3,0,0.25").is_err());
        assert!(parse_region("a,b").is_err());
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        assert!(map.contains_key("debounce_ms"));
        assert!(map.contains_key("max_results"));
        assert!(map.contains_key("gateway_timeout_ms"));
        assert!(map.contains_key("default_region"));

        let (geocoder, source) = &map["geocoder"];
        assert_eq!(geocoder, "nominatim:https://nominatim.openstreetmap.org");
        assert_eq!(*source, ConfigSource::Default);
    }
}
