//! Custmap Picker - Address search, picker session state, and the customer form
//!
//! This crate implements the address-selection use cases, orchestrating the
//! geocoding and device ports into a debounced search, a picker session with
//! last-writer-wins reverse geocoding, and the validated customer edit form.

pub mod debounce;
pub mod form;
pub mod search;
pub mod selection;
pub mod settings;

mod bounded;

pub use debounce::Debouncer;
pub use form::{validate_form, CustomerFormModel};
pub use search::{AddressSearchController, SearchOutcome};
pub use selection::{
    AddressSelectionState, LookupOutcome, LookupResolution, MapEvent, PendingLookup,
    PickerOutcome, SelectionStatus,
};
pub use settings::PickerSettings;
