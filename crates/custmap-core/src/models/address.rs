//! Address details returned by geocoding and the selections built from them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::GeoCoordinate;

/// Placeholder shown for a candidate whose reverse geocode failed
pub const UNKNOWN_LOCATION: &str = "Unknown location";

/// Address components from a reverse geocode
///
/// Every field is optional: gateways routinely omit any of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl AddressDetails {
    /// True when no field carries any text
    pub fn is_empty(&self) -> bool {
        [&self.street, &self.name, &self.city, &self.region, &self.postal_code, &self.country]
            .into_iter()
            .all(|field| present(field).is_none())
    }

    pub fn street(&self) -> Option<&str> {
        present(&self.street)
    }

    pub fn city(&self) -> Option<&str> {
        present(&self.city)
    }

    pub fn region(&self) -> Option<&str> {
        present(&self.region)
    }

    pub fn postal_code(&self) -> Option<&str> {
        present(&self.postal_code)
    }

    pub fn country(&self) -> Option<&str> {
        present(&self.country)
    }
}

/// A field counts as present only when it holds non-blank text; returned trimmed
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

/// Format details as `"{street} {name}, {city}, {region} {postalCode}, {country}"`.
///
/// Absent fields become empty strings, whitespace runs collapse to a single
/// space, a space left in front of a comma is dropped, and the result is trimmed.
pub fn format_address(details: &AddressDetails) -> String {
    fn part(field: &Option<String>) -> &str {
        field.as_deref().unwrap_or("")
    }

    let raw = format!(
        "{} {}, {}, {} {}, {}",
        part(&details.street),
        part(&details.name),
        part(&details.city),
        part(&details.region),
        part(&details.postal_code),
        part(&details.country),
    );

    raw.split_whitespace().collect::<Vec<_>>().join(" ").replace(" ,", ",")
}

/// One forward-geocode hit enriched with its reverse-geocoded address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCandidate {
    pub coordinate: GeoCoordinate,
    pub formatted_address: String,
    pub details: AddressDetails,
}

impl SearchCandidate {
    /// Candidate built from a resolved reverse geocode
    pub fn resolved(coordinate: GeoCoordinate, details: AddressDetails) -> Self {
        Self { coordinate, formatted_address: format_address(&details), details }
    }

    /// Candidate whose reverse geocode failed or came back empty
    pub fn unresolved(coordinate: GeoCoordinate) -> Self {
        Self {
            coordinate,
            formatted_address: UNKNOWN_LOCATION.to_string(),
            details: AddressDetails::default(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.formatted_address != UNKNOWN_LOCATION
    }
}

/// The unit handed from the address picker to the customer form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressSelection {
    pub address: String,
    pub coordinate: GeoCoordinate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<AddressDetails>,
}

/// Opaque reference to a captured or stored image (URI, file path, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
