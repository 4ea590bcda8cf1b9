use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;
use crate::models::{AddressDetails, GeoCoordinate, MapRegion};

/// Port for forward and reverse geocoding
#[async_trait]
pub trait GeocodingGateway: Send + Sync {
    /// Resolve free text to candidate coordinates, in the service's relevance order
    async fn forward_geocode(&self, query: &str) -> Result<Vec<GeoCoordinate>>;

    /// Resolve a coordinate to address details
    ///
    /// The first element is authoritative; an empty vector means unresolved.
    async fn reverse_geocode(&self, coordinate: GeoCoordinate) -> Result<Vec<AddressDetails>>;
}

/// Outcome of a location permission prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Port for the device position service
#[async_trait]
pub trait PositionProvider: Send + Sync {
    /// Ask for foreground location permission
    async fn request_permission(&self) -> PermissionStatus;

    /// Current device position
    ///
    /// Fails with `PermissionDenied` or `PositionUnavailable`.
    async fn current_position(&self) -> Result<GeoCoordinate>;
}

/// Port for the map rendering surface
///
/// The surface emits taps and marker drags back into the picker as
/// `MapEvent`s; it never mutates picker state itself.
pub trait MapSurface: Send {
    /// Draw the viewport with the marker at `marker`
    fn render(&mut self, region: &MapRegion, marker: &GeoCoordinate);

    /// Animate the viewport to `region` after a programmatic change
    fn animate_to_region(&mut self, region: &MapRegion, duration: Duration);
}
