use crate::adapters::geocoding_gateway;
use crate::cli::ReverseArgs;
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::ReverseOutput;
use anyhow::Result;
use custmap_core::config::LayeredConfig;
use custmap_core::models::address::UNKNOWN_LOCATION;
use custmap_core::models::{GeoCoordinate, MapRegion};
use custmap_picker::{AddressSelectionState, LookupOutcome, MapEvent};

pub async fn execute(
    args: ReverseArgs,
    config: &LayeredConfig,
    output: &OutputWriter,
) -> Result<()> {
    let coordinate = GeoCoordinate::new(args.latitude, args.longitude)?;
    let gateway = geocoding_gateway(config)?;

    let mut session = AddressSelectionState::new("", MapRegion::around(coordinate));
    let outcome = session
        .resolve_map_event(MapEvent::Tap(coordinate), gateway.as_ref(), config.gateway_timeout())
        .await;

    let address = match outcome {
        LookupOutcome::Applied => session.address().to_string(),
        LookupOutcome::Unresolved => UNKNOWN_LOCATION.to_string(),
        LookupOutcome::Failed | LookupOutcome::Stale => return Err(errors::geocoder_failed().into()),
    };

    let result = ReverseOutput {
        latitude: coordinate.latitude,
        longitude: coordinate.longitude,
        address,
        details: session.details().cloned(),
    };

    if output.is_json() {
        return output.result(result);
    }

    output.section(format!("Address at {}", coordinate));
    output.kv("Address", &result.address);
    if let Some(details) = &result.details {
        for (label, value) in [
            ("Street", details.street()),
            ("City", details.city()),
            ("Region", details.region()),
            ("Postal Code", details.postal_code()),
            ("Country", details.country()),
        ] {
            if let Some(value) = value {
                output.kv(label, value);
            }
        }
    }
    Ok(())
}
