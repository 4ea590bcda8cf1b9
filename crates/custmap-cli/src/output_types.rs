use custmap_core::config::ConfigSource;
use custmap_core::models::{
    AddressDetails, Customer, CustomerRecord, FormErrors, FormField, SearchCandidate,
};
use serde::Serialize;
use tabled::Tabled;

use crate::map::MapFrame;

/// Row of the `customers --layout list` table
#[derive(Debug, Serialize, Tabled)]
pub struct CustomerRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Location")]
    pub location: String,
    #[tabled(skip)]
    pub avatar: Option<String>,
}

impl From<&Customer> for CustomerRow {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id.clone(),
            name: customer.name.clone(),
            location: customer.location(),
            avatar: customer.avatar.as_ref().map(|a| a.as_str().to_string()),
        }
    }
}

/// Row of the `search` table
#[derive(Debug, Serialize, Tabled)]
pub struct CandidateRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Address")]
    pub address: String,
    #[tabled(rename = "Latitude")]
    pub latitude: f64,
    #[tabled(rename = "Longitude")]
    pub longitude: f64,
    #[tabled(skip)]
    pub resolved: bool,
}

impl CandidateRow {
    pub fn new(index: usize, candidate: &SearchCandidate) -> Self {
        Self {
            index,
            address: candidate.formatted_address.clone(),
            latitude: candidate.coordinate.latitude,
            longitude: candidate.coordinate.longitude,
            resolved: candidate.is_resolved(),
        }
    }
}

/// Output for the reverse command
#[derive(Debug, Serialize)]
pub struct ReverseOutput {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub details: Option<AddressDetails>,
}

/// Row of the `config` table
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source", display_with = "display_source")]
    pub source: ConfigSource,
}

fn display_source(source: &ConfigSource) -> String {
    format!("{:?}", source)
}

/// Output for the edit command
#[derive(Debug, Serialize)]
pub struct EditOutput {
    pub record: CustomerRecord,
    pub merged_fields: Vec<FormField>,
    pub picker: Option<String>,
    pub map: Vec<MapFrame>,
}

/// Output for a rejected edit
#[derive(Debug, Serialize)]
pub struct ValidationOutput<'a> {
    pub id: &'a str,
    pub errors: &'a FormErrors,
}
