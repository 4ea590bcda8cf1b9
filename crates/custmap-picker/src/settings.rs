use custmap_core::config::LayeredConfig;
use custmap_core::models::MapRegion;
use std::time::Duration;

/// Tuning shared by the search controller and picker sessions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickerSettings {
    /// Quiet period a query must survive before it reaches the gateway
    pub debounce: Duration,

    /// Forward-geocode hits kept (and reverse geocoded) per search
    pub max_results: usize,

    /// Deadline applied to every gateway and position call
    pub gateway_timeout: Duration,

    /// Viewport a fresh picker session opens on
    pub default_region: MapRegion,

    /// Duration of the animated recenter after a programmatic region change
    pub recenter_animation: Duration,
}

impl Default for PickerSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            max_results: 5,
            gateway_timeout: Duration::from_secs(5),
            default_region: MapRegion::default(),
            recenter_animation: Duration::from_millis(1000),
        }
    }
}

impl From<&LayeredConfig> for PickerSettings {
    fn from(config: &LayeredConfig) -> Self {
        Self {
            debounce: config.debounce(),
            max_results: config.max_results.value,
            gateway_timeout: config.gateway_timeout(),
            default_region: config.default_region.value,
            ..Default::default()
        }
    }
}
