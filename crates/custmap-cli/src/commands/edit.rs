use crate::adapters::geocoding_gateway;
use crate::cli::EditArgs;
use crate::errors;
use crate::map::TerminalMap;
use crate::output::OutputWriter;
use crate::output_types::{EditOutput, ValidationOutput};
use anyhow::Result;
use custmap_core::config::LayeredConfig;
use custmap_core::error::CustmapError;
use custmap_core::models::FormField;
use custmap_core::ports::{CustomerDirectory, GeocodingGateway};
use custmap_geocode::{FixedPositionProvider, FixtureCamera};
use custmap_picker::{
    AddressSearchController, AddressSelectionState, CustomerFormModel, LookupOutcome, MapEvent,
    PickerOutcome, PickerSettings,
};
use custmap_store::{LoggingSubmissionSink, MemoryCustomerDirectory};
use std::sync::Arc;

pub async fn execute(args: EditArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let directory = MemoryCustomerDirectory::seeded();
    let customer = directory
        .get_customer(&args.id)
        .await?
        .ok_or_else(|| errors::customer_not_found(&args.id))?;

    let mut form = CustomerFormModel::from_customer(&customer);

    if let Some(name) = &args.name {
        form.update_field(FormField::Name, name.as_str());
    }
    for assignment in &args.fields {
        let (field, value) = parse_assignment(assignment)?;
        form.update_field(field, value);
    }

    let mut map = TerminalMap::new();
    let mut merged_fields = Vec::new();
    let mut picker_result = None;

    if args.opens_picker() {
        let settings = PickerSettings::from(config);
        let gateway = geocoding_gateway(config)?;
        let outcome = run_picker(&args, &form, gateway, settings, &mut map, output).await;

        picker_result = Some(match &outcome {
            PickerOutcome::Confirmed(selection) => selection.address.clone(),
            PickerOutcome::Cancelled => "cancelled".to_string(),
        });
        merged_fields = form.apply_picker_outcome(outcome);
    }

    if let Some(photo) = &args.photo {
        form.capture_photo(&FixtureCamera::photo(photo.as_str())).await;
    }

    let sink = LoggingSubmissionSink::new();
    let record = match form.save(&sink).await {
        Ok(record) => record,
        Err(CustmapError::Validation(form_errors)) => {
            if output.is_json() {
                output.rejected(ValidationOutput { id: form.id(), errors: &form_errors })?;
            }
            return Err(errors::validation_failed(&form_errors).into());
        }
        Err(e) => return Err(e.into()),
    };

    if output.is_json() {
        return output.result(EditOutput {
            record,
            merged_fields,
            picker: picker_result,
            map: map.into_frames(),
        });
    }

    if !map.frames().is_empty() {
        output.section("Map");
        for frame in map.frames() {
            output.kv("frame", frame.describe());
        }
    }

    output.section(format!("Customer {}", record.id));
    for field in FormField::ALL {
        let marker = if merged_fields.contains(&field) { " (from map)" } else { "" };
        output.kv(field.label(), format!("{}{}", record.form.get(field), marker));
    }
    if let Some(image) = &record.image {
        output.kv("Image", image);
    }
    if let (Some(address), Some(coordinate)) = (&record.full_address, &record.coordinates) {
        output.kv("Address", format!("{} ({})", address, coordinate));
    }
    output.success(format!("Saved submission {}", record.submission_id));
    Ok(())
}

/// Open a picker session and play the requested actions in order: current
/// location, search and pick, tap, drag, manual address; then confirm or cancel
async fn run_picker(
    args: &EditArgs,
    form: &CustomerFormModel,
    gateway: Arc<dyn GeocodingGateway>,
    settings: PickerSettings,
    map: &mut TerminalMap,
    output: &OutputWriter,
) -> PickerOutcome {
    let positions = match args.position {
        Some(position) => FixedPositionProvider::at(position),
        None => FixedPositionProvider::unavailable(),
    };

    let mut picker =
        AddressSelectionState::new(form.picker_initial_address(), settings.default_region);
    picker.render_to(map, settings.recenter_animation);

    // Opening the picker asks for the device position straight away
    picker.request_current_location(&positions, gateway.as_ref(), settings.gateway_timeout).await;
    picker.render_to(map, settings.recenter_animation);

    if args.current_location {
        let outcome = picker
            .request_current_location(&positions, gateway.as_ref(), settings.gateway_timeout)
            .await;
        if outcome == LookupOutcome::Failed {
            output.warning("Current location unavailable");
        }
        picker.render_to(map, settings.recenter_animation);
    }

    if let Some(query) = &args.pick {
        let search = AddressSearchController::new(gateway.clone(), settings);
        picker.set_search_query(query.as_str());
        let outcome = search.search(query).await;
        picker.show_search_results(query, outcome);

        match picker.search_results().get(args.pick_index).cloned() {
            Some(candidate) => {
                picker.pick_candidate(&candidate);
                picker.render_to(map, settings.recenter_animation);
            }
            None => output.warning(format!(
                "No candidate #{} for '{}' ({} found)",
                args.pick_index,
                query,
                picker.search_results().len()
            )),
        }
    }

    let gestures = [args.tap.map(MapEvent::Tap), args.drag.map(MapEvent::MarkerDrag)];
    for event in gestures.into_iter().flatten() {
        let outcome =
            picker.resolve_map_event(event, gateway.as_ref(), settings.gateway_timeout).await;
        if outcome != LookupOutcome::Applied {
            output.warning(format!("No address found at {}", event.coordinate()));
        }
        picker.render_to(map, settings.recenter_animation);
    }

    if let Some(address) = &args.address {
        picker.edit_address(address.as_str());
    }

    if args.cancel_picker {
        picker.cancel()
    } else {
        picker.confirm()
    }
}

fn parse_assignment(assignment: &str) -> Result<(FormField, String), errors::CliError> {
    let (name, value) = assignment
        .split_once('=')
        .ok_or_else(|| errors::invalid_field_assignment(assignment, "missing '='"))?;
    let field = name
        .trim()
        .parse::<FormField>()
        .map_err(|e| errors::invalid_field_assignment(assignment, e))?;
    Ok((field, value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        let (field, value) = parse_assignment("address_line2=Suite 4=B").unwrap();
        assert_eq!(field, FormField::AddressLine2);
        assert_eq!(value, "Suite 4=B");

        assert!(parse_assignment("city").is_err());
        assert!(parse_assignment("zip=85003").is_err());
    }
}
