//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use custmap_core::config::{CliConfigOverrides, ConfigSource, GeocoderSpec, LayeredConfig};
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

const ENV_VARS: [&str; 5] = [
    "CUSTMAP_DEBOUNCE_MS",
    "CUSTMAP_MAX_RESULTS",
    "CUSTMAP_GATEWAY_TIMEOUT_MS",
    "CUSTMAP_GEOCODER",
    "CUSTMAP_DEFAULT_REGION",
];

fn clear_env() {
    for var in ENV_VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_partial_file_configuration() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "max_results = 2").unwrap();

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

    assert_eq!(config.max_results.value, 2);
    assert_eq!(config.max_results.source, ConfigSource::File);
    assert_eq!(config.debounce_ms.value, 500);
    assert_eq!(config.debounce_ms.source, ConfigSource::Default);
}

#[test]
fn test_invalid_toml_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "debounce_ms = \"soon\"").unwrap();

    assert!(LayeredConfig::with_defaults().load_from_file(file.path()).is_err());
}

#[test]
fn test_invalid_file_region_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[default_region]
latitude = 120.0
longitude = 0.0
"#
    )
    .unwrap();

    assert!(LayeredConfig::with_defaults().load_from_file(file.path()).is_err());
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    env::set_var("CUSTMAP_DEBOUNCE_MS", "300");
    env::set_var("CUSTMAP_GEOCODER", "nominatim:http://localhost:7070");
    env::set_var("CUSTMAP_DEFAULT_REGION", "33.4484,-112.0740");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
debounce_ms = 250
geocoder = "offline"
max_results = 4
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap().load_from_env();

    assert_eq!(config.debounce_ms.value, 300);
    assert_eq!(config.debounce_ms.source, ConfigSource::Environment);
    assert_eq!(
        config.geocoder.value,
        GeocoderSpec::Nominatim { base_url: "http://localhost:7070".to_string() }
    );
    assert_eq!(config.default_region.value.center.latitude, 33.4484);
    assert_eq!(config.default_region.source, ConfigSource::Environment);
    // Not set in the environment, file value stays
    assert_eq!(config.max_results.value, 4);
    assert_eq!(config.max_results.source, ConfigSource::File);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_env_values_are_ignored() {
    clear_env();
    env::set_var("CUSTMAP_DEBOUNCE_MS", "fast");
    env::set_var("CUSTMAP_MAX_RESULTS", "0");
    env::set_var("CUSTMAP_GATEWAY_TIMEOUT_MS", "-5");
    env::set_var("CUSTMAP_GEOCODER", "carrier-pigeon");
    env::set_var("CUSTMAP_DEFAULT_REGION", "north");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.debounce_ms.source, ConfigSource::Default);
    assert_eq!(config.max_results.value, 5);
    assert_eq!(config.gateway_timeout_ms.value, 5000);
    assert_eq!(config.geocoder.source, ConfigSource::Default);
    assert_eq!(config.default_region.source, ConfigSource::Default);

    clear_env();
}

#[test]
#[serial]
fn test_env_max_results_above_cap_is_ignored() {
    clear_env();
    env::set_var("CUSTMAP_MAX_RESULTS", "8");

    let config = LayeredConfig::with_defaults().load_from_env();
    assert_eq!(config.max_results.value, 5);
    assert_eq!(config.max_results.source, ConfigSource::Default);

    env::set_var("CUSTMAP_MAX_RESULTS", "3");
    let config = LayeredConfig::with_defaults().load_from_env();
    assert_eq!(config.max_results.value, 3);
    assert_eq!(config.max_results.source, ConfigSource::Environment);

    clear_env();
}

#[test]
#[serial]
fn test_configuration_precedence_order() {
    clear_env();
    env::set_var("CUSTMAP_GATEWAY_TIMEOUT_MS", "3000");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "gateway_timeout_ms = 1000").unwrap();

    let mut config =
        LayeredConfig::with_defaults().load_from_file(file.path()).unwrap().load_from_env();

    // At this point, environment should have overridden file
    assert_eq!(config.gateway_timeout_ms.value, 3000);
    assert_eq!(config.gateway_timeout_ms.source, ConfigSource::Environment);

    // Now CLI should override environment
    config.update_from_cli(CliConfigOverrides {
        gateway_timeout_ms: Some(9000),
        ..Default::default()
    });

    assert_eq!(config.gateway_timeout_ms.value, 9000);
    assert_eq!(config.gateway_timeout_ms.source, ConfigSource::Cli);

    assert!(ConfigSource::Cli.precedence() > ConfigSource::Environment.precedence());
    assert!(ConfigSource::Environment.precedence() > ConfigSource::File.precedence());
    assert!(ConfigSource::File.precedence() > ConfigSource::Default.precedence());

    clear_env();
}
