//! Wiring from configuration to port implementations

use anyhow::{Context, Result};
use custmap_core::config::{GeocoderSpec, LayeredConfig};
use custmap_core::ports::GeocodingGateway;
use custmap_geocode::{FixtureGateway, NominatimGateway};
use std::sync::Arc;

/// Create the geocoding gateway named by the configuration
pub fn geocoding_gateway(config: &LayeredConfig) -> Result<Arc<dyn GeocodingGateway>> {
    match &config.geocoder.value {
        GeocoderSpec::Offline => {
            tracing::debug!("Using the offline gazetteer");
            Ok(Arc::new(FixtureGateway::seeded()))
        }
        GeocoderSpec::Nominatim { base_url } => {
            tracing::debug!(base_url = %base_url, "Using Nominatim");
            let gateway = NominatimGateway::new(base_url.clone(), config.max_results.value)
                .context("Failed to create Nominatim client")?;
            Ok(Arc::new(gateway))
        }
    }
}
