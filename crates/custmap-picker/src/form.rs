use chrono::Utc;
use custmap_core::error::{CustmapError, Result};
use custmap_core::models::{
    AddressSelection, Customer, CustomerFormData, CustomerRecord, FormErrors, FormField, ImageRef,
};
use custmap_core::ports::{CameraCapture, SubmissionSink};
use uuid::Uuid;

use crate::selection::PickerOutcome;

const NAME_MIN_CHARS: usize = 2;

/// Validate every field of `data`
///
/// Total: the returned errors depend only on `data`, never on earlier passes.
pub fn validate_form(data: &CustomerFormData) -> FormErrors {
    let mut errors = FormErrors::new();

    let name = data.name.trim();
    if name.is_empty() {
        errors.insert(FormField::Name, "Name is required");
    } else if name.chars().count() < NAME_MIN_CHARS {
        errors.insert(FormField::Name, "Name must be at least 2 characters");
    }

    let required = [
        (FormField::AddressLine1, "Address Line 1 is required"),
        (FormField::City, "City is required"),
        (FormField::State, "State is required"),
    ];
    for (field, message) in required {
        if data.get(field).trim().is_empty() {
            errors.insert(field, message);
        }
    }

    errors
}

/// The customer edit form
#[derive(Debug, Clone)]
pub struct CustomerFormModel {
    id: String,
    data: CustomerFormData,
    errors: FormErrors,
    image: Option<ImageRef>,
    selection: Option<AddressSelection>,
}

impl CustomerFormModel {
    pub fn new(id: impl Into<String>, data: CustomerFormData) -> Self {
        Self {
            id: id.into(),
            data,
            errors: FormErrors::new(),
            image: None,
            selection: None,
        }
    }

    /// Seed the form from a directory entry; the avatar becomes the image
    pub fn from_customer(customer: &Customer) -> Self {
        let mut form = Self::new(customer.id.clone(), CustomerFormData::from_customer(customer));
        form.image = customer.avatar.clone();
        form
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn data(&self) -> &CustomerFormData {
        &self.data
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }

    /// Last confirmed picker selection
    pub fn selection(&self) -> Option<&AddressSelection> {
        self.selection.as_ref()
    }

    /// Address text a new picker session should open with
    pub fn picker_initial_address(&self) -> &str {
        self.selection.as_ref().map(|s| s.address.as_str()).unwrap_or_default()
    }

    pub fn update_field(&mut self, field: FormField, value: impl Into<String>) {
        self.data.set(field, value);
        self.errors.remove(field);
    }

    /// Recompute every field's error and return them
    pub fn validate(&mut self) -> &FormErrors {
        self.errors = validate_form(&self.data);
        &self.errors
    }

    /// Copy the address parts a selection supplies into the form
    ///
    /// Blank or absent details never erase what is already there. Returns the
    /// fields that were overwritten.
    pub fn merge_address_selection(&mut self, selection: AddressSelection) -> Vec<FormField> {
        let mut changed = Vec::new();

        if let Some(details) = &selection.details {
            let supplied = [
                (FormField::AddressLine1, details.street()),
                (FormField::City, details.city()),
                (FormField::State, details.region()),
                (FormField::PostalCode, details.postal_code()),
                (FormField::Country, details.country()),
            ];

            for (field, value) in supplied {
                if let Some(value) = value {
                    self.update_field(field, value);
                    changed.push(field);
                }
            }
        }

        tracing::debug!(address = %selection.address, merged = changed.len(), "Merged address selection");
        self.selection = Some(selection);
        changed
    }

    /// Apply how a picker session ended; cancelled sessions change nothing
    pub fn apply_picker_outcome(&mut self, outcome: PickerOutcome) -> Vec<FormField> {
        match outcome {
            PickerOutcome::Confirmed(selection) => self.merge_address_selection(selection),
            PickerOutcome::Cancelled => Vec::new(),
        }
    }

    pub fn attach_image(&mut self, image: ImageRef) {
        self.image = Some(image);
    }

    /// Take a photo; denial and cancellation leave the image as it was
    pub async fn capture_photo(&mut self, camera: &dyn CameraCapture) -> bool {
        match camera.capture().await {
            Ok(image) => {
                self.attach_image(image);
                true
            }
            Err(CustmapError::UserCancelled) => {
                tracing::debug!("Photo capture cancelled");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "Photo capture failed");
                false
            }
        }
    }

    /// Validate and package the outbound record
    pub fn submit(&mut self) -> Result<CustomerRecord> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(CustmapError::Validation(errors.clone()));
        }

        Ok(CustomerRecord {
            submission_id: Uuid::new_v4(),
            id: self.id.clone(),
            form: self.data.clone(),
            image: self.image.clone(),
            coordinates: self.selection.as_ref().map(|s| s.coordinate),
            full_address: self.selection.as_ref().map(|s| s.address.clone()),
            submitted_at: Utc::now(),
        })
    }

    /// Submit and hand the record to `sink`
    pub async fn save(&mut self, sink: &dyn SubmissionSink) -> Result<CustomerRecord> {
        let record = self.submit()?;
        sink.deliver(&record).await?;
        tracing::info!(id = %record.id, submission = %record.submission_id, "Customer saved");
        Ok(record)
    }
}
