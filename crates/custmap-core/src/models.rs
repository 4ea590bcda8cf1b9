pub mod address;
pub mod customer;
pub mod geo;

pub use address::{format_address, AddressDetails, AddressSelection, ImageRef, SearchCandidate};
pub use customer::{Customer, CustomerFormData, CustomerRecord, FormErrors, FormField};
pub use geo::{GeoCoordinate, MapRegion};
