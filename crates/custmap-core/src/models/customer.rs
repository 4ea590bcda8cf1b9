use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{GeoCoordinate, ImageRef};
use crate::error::CustmapError;

/// Customer as listed in the directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub city: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<ImageRef>,
}

impl Customer {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            city: city.into(),
            state: state.into(),
            avatar: None,
        }
    }

    pub fn with_avatar(mut self, avatar: ImageRef) -> Self {
        self.avatar = Some(avatar);
        self
    }

    /// "City, State" line shown on the customer card
    pub fn location(&self) -> String {
        format!("{}, {}", self.city, self.state)
    }
}

/// Editable fields of the customer form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Name,
    AddressLine1,
    AddressLine2,
    City,
    State,
    PostalCode,
    Country,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::Name,
        FormField::AddressLine1,
        FormField::AddressLine2,
        FormField::City,
        FormField::State,
        FormField::PostalCode,
        FormField::Country,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::AddressLine1 => "addressLine1",
            FormField::AddressLine2 => "addressLine2",
            FormField::City => "city",
            FormField::State => "state",
            FormField::PostalCode => "postalCode",
            FormField::Country => "country",
        }
    }

    /// Human label used in form messages
    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::AddressLine1 => "Address Line 1",
            FormField::AddressLine2 => "Address Line 2",
            FormField::City => "City",
            FormField::State => "State",
            FormField::PostalCode => "Postal Code",
            FormField::Country => "Country",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the camelCase form name as well as snake_case and kebab-case spellings
impl FromStr for FormField {
    type Err = CustmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String =
            s.chars().filter(|c| *c != '_' && *c != '-').collect::<String>().to_lowercase();

        FormField::ALL
            .into_iter()
            .find(|field| field.as_str().to_lowercase() == normalized)
            .ok_or_else(|| CustmapError::ConfigInvalid {
                key: "field".to_string(),
                reason: format!(
                    "Unknown form field '{}'. Use one of: name, addressLine1, addressLine2, city, state, postalCode, country",
                    s
                ),
            })
    }
}

/// Values held by the customer edit form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerFormData {
    pub name: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl CustomerFormData {
    /// Seed the form from a directory entry
    pub fn from_customer(customer: &Customer) -> Self {
        Self {
            name: customer.name.clone(),
            city: customer.city.clone(),
            state: customer.state.clone(),
            ..Default::default()
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::AddressLine1 => &self.address_line1,
            FormField::AddressLine2 => &self.address_line2,
            FormField::City => &self.city,
            FormField::State => &self.state,
            FormField::PostalCode => &self.postal_code,
            FormField::Country => &self.country,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Name => &mut self.name,
            FormField::AddressLine1 => &mut self.address_line1,
            FormField::AddressLine2 => &mut self.address_line2,
            FormField::City => &mut self.city,
            FormField::State => &mut self.state,
            FormField::PostalCode => &mut self.postal_code,
            FormField::Country => &mut self.country,
        };
        *slot = value.into();
    }
}

/// Per-field validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<FormField, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: FormField) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> =
            self.iter().map(|(field, message)| format!("{}: {}", field, message)).collect();
        f.write_str(&parts.join("; "))
    }
}

/// Outbound record produced by a successful form submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub submission_id: Uuid,
    pub id: String,
    #[serde(flatten)]
    pub form: CustomerFormData,
    pub image: Option<ImageRef>,
    pub coordinates: Option<GeoCoordinate>,
    pub full_address: Option<String>,
    pub submitted_at: DateTime<Utc>,
}
