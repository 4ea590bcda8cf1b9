use clap::{Parser, Subcommand, ValueEnum};
use custmap_core::models::GeoCoordinate;
use std::path::PathBuf;

/// Custmap - Customer directory with an address picker
#[derive(Parser, Debug)]
#[command(name = "custmap")]
#[command(about = "Customer directory with geocoded address picking", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./custmap.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Use the built-in gazetteer instead of a geocoding service
    #[arg(long, global = true)]
    pub offline: bool,

    /// Quiet period before a search query is sent
    #[arg(long, global = true, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Maximum number of search candidates (1 to 5)
    #[arg(
        long,
        global = true,
        value_name = "N",
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..=5)
    )]
    pub max_results: Option<usize>,

    /// Deadline for each geocoding call
    #[arg(long, global = true, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the customer directory
    Customers(CustomersArgs),

    /// Search for an address
    Search(SearchArgs),

    /// Look up the address at a coordinate
    Reverse(ReverseArgs),

    /// Edit a customer, optionally picking an address on the map
    Edit(EditArgs),

    /// Show the effective configuration and where each value came from
    Config,
}

/// Customer list presentation
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum Layout {
    /// Two cards per row
    #[default]
    Grid,
    /// One customer per row
    List,
}

#[derive(Parser, Debug)]
pub struct CustomersArgs {
    #[arg(long, value_enum, default_value_t = Layout::Grid)]
    pub layout: Layout,
}

#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Free-text address query
    pub query: String,
}

#[derive(Parser, Debug)]
pub struct ReverseArgs {
    #[arg(allow_negative_numbers = true)]
    pub latitude: f64,

    #[arg(allow_negative_numbers = true)]
    pub longitude: f64,
}

#[derive(Parser, Debug)]
pub struct EditArgs {
    /// Customer ID
    pub id: String,

    /// New customer name
    #[arg(long)]
    pub name: Option<String>,

    /// Set a form field, e.g. --set address_line2="Suite 4"
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub fields: Vec<String>,

    /// Search for an address in the picker and pick a candidate
    #[arg(long, value_name = "QUERY")]
    pub pick: Option<String>,

    /// Which candidate to pick (0-based)
    #[arg(long, default_value = "0")]
    pub pick_index: usize,

    /// Tap the map at LAT,LON
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true)]
    pub tap: Option<GeoCoordinate>,

    /// Drag the marker to LAT,LON
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true)]
    pub drag: Option<GeoCoordinate>,

    /// Press "use current location" in the picker
    #[arg(long)]
    pub current_location: bool,

    /// Device position reported to the picker (unavailable when absent)
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true)]
    pub position: Option<GeoCoordinate>,

    /// Replace the picker's address text before confirming
    #[arg(long, value_name = "TEXT")]
    pub address: Option<String>,

    /// Attach a photo reference
    #[arg(long, value_name = "REF")]
    pub photo: Option<String>,

    /// Close the picker without confirming
    #[arg(long)]
    pub cancel_picker: bool,
}

impl EditArgs {
    /// True when any action needs a picker session
    pub fn opens_picker(&self) -> bool {
        self.pick.is_some()
            || self.tap.is_some()
            || self.drag.is_some()
            || self.current_location
            || self.position.is_some()
            || self.address.is_some()
            || self.cancel_picker
    }
}
