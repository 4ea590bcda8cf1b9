//! Custmap Geocode - Geocoding, positioning, and camera adapters
//!
//! This crate implements the location and device ports from `custmap-core`:
//! an HTTP gateway for Nominatim-compatible services, and in-memory fixtures
//! for offline use and tests.

pub mod memory;
pub mod nominatim;

// Re-export main types
pub use memory::{CameraOutcome, FixedPositionProvider, FixtureCamera, FixtureGateway, Place};
pub use nominatim::NominatimGateway;
