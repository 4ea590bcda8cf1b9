use crate::adapters::geocoding_gateway;
use crate::cli::SearchArgs;
use crate::output::OutputWriter;
use crate::output_types::CandidateRow;
use anyhow::Result;
use custmap_core::config::LayeredConfig;
use custmap_picker::{AddressSearchController, PickerSettings};

pub async fn execute(args: SearchArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let gateway = geocoding_gateway(config)?;
    let search = AddressSearchController::new(gateway, PickerSettings::from(config));

    // A lone query is never superseded
    let candidates = search.search(&args.query).await.into_candidates().unwrap_or_default();
    let rows: Vec<CandidateRow> =
        candidates.iter().enumerate().map(|(i, c)| CandidateRow::new(i, c)).collect();

    if output.is_json() {
        return output.result(rows);
    }

    output.section(format!("Results for '{}'", args.query));
    if rows.is_empty() {
        output.info("No addresses found");
        return Ok(());
    }
    output.table(rows)
}
