//! Port trait definitions
//!
//! These traits define the interfaces that adapters must implement.

pub mod customers;
pub mod device;
pub mod location;

pub use customers::{CustomerDirectory, SubmissionSink};
pub use device::CameraCapture;
pub use location::{GeocodingGateway, MapSurface, PermissionStatus, PositionProvider};
