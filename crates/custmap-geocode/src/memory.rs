//! In-memory adapters for offline use and testing.
//!
//! These implementations use `Mutex::unwrap()` intentionally. Lock poisoning
//! only occurs when another thread panicked while holding the lock, which is
//! an unrecoverable state.

use async_trait::async_trait;
use custmap_core::error::{CustmapError, Result};
use custmap_core::models::{AddressDetails, GeoCoordinate, ImageRef};
use custmap_core::ports::{CameraCapture, GeocodingGateway, PermissionStatus, PositionProvider};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Reverse geocodes snap to the nearest place within this many degrees
const SNAP_RADIUS_DEGREES: f64 = 0.05;

/// A gazetteer entry
#[derive(Debug, Clone)]
pub struct Place {
    pub coordinate: GeoCoordinate,
    pub details: AddressDetails,
}

impl Place {
    pub fn new(latitude: f64, longitude: f64, details: AddressDetails) -> Self {
        Self { coordinate: GeoCoordinate { latitude, longitude }, details }
    }

    /// Lowercased text matched against forward-geocode queries
    fn haystack(&self) -> String {
        let d = &self.details;
        [&d.street, &d.name, &d.city, &d.region, &d.postal_code, &d.country]
            .into_iter()
            .flatten()
            .map(|s| s.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn distance_to(&self, coordinate: &GeoCoordinate) -> f64 {
        let dlat = self.coordinate.latitude - coordinate.latitude;
        let dlon = self.coordinate.longitude - coordinate.longitude;
        (dlat * dlat + dlon * dlon).sqrt()
    }
}

fn details(street: &str, city: &str, region: &str, postal_code: &str) -> AddressDetails {
    AddressDetails {
        street: Some(street.to_string()),
        name: None,
        city: Some(city.to_string()),
        region: Some(region.to_string()),
        postal_code: Some(postal_code.to_string()),
        country: Some("United States".to_string()),
    }
}

/// Gazetteer-backed geocoding gateway
///
/// Forward geocoding matches every whitespace-separated query token against a
/// place's address text; reverse geocoding snaps to the nearest place.
#[derive(Debug, Default)]
pub struct FixtureGateway {
    places: Vec<Place>,
    forward_calls: AtomicUsize,
    reverse_calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl FixtureGateway {
    pub fn new(places: Vec<Place>) -> Self {
        Self { places, ..Default::default() }
    }

    /// Gazetteer covering the cities of the seeded customer directory
    pub fn seeded() -> Self {
        Self::new(vec![
            Place::new(33.4484, -112.0740, details("200 W Washington St", "Phoenix", "Arizona", "85003")),
            Place::new(33.4936, -112.0737, details("3800 N Central Ave", "Phoenix", "Arizona", "85012")),
            Place::new(33.0370, -117.2920, details("505 S Vulcan Ave", "Encinitas", "California", "92024")),
            Place::new(47.6062, -122.3321, details("600 4th Ave", "Seattle", "Washington", "98104")),
            Place::new(33.3062, -111.8413, details("175 S Arizona Ave", "Chandler", "Arizona", "85225")),
            Place::new(32.7767, -96.7970, details("1500 Marilla St", "Dallas", "Texas", "75201")),
            Place::new(28.5383, -81.3792, details("400 S Orange Ave", "Orlando", "Florida", "32801")),
            Place::new(35.7915, -78.7811, details("316 N Academy St", "Cary", "North Carolina", "27513")),
            Place::new(33.8366, -117.9143, details("200 S Anaheim Blvd", "Anaheim", "California", "92805")),
            Place::new(37.7793, -122.4193, details("1 Dr Carlton B Goodlett Pl", "San Francisco", "California", "94102")),
            Place::new(39.8017, -89.6440, details("1 Main St", "Springfield", "Illinois", "62701")),
        ])
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn forward_calls(&self) -> usize {
        self.forward_calls.load(Ordering::SeqCst)
    }

    pub fn reverse_calls(&self) -> usize {
        self.reverse_calls.load(Ordering::SeqCst)
    }

    /// Queries received by `forward_geocode`, in arrival order
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl GeocodingGateway for FixtureGateway {
    async fn forward_geocode(&self, query: &str) -> Result<Vec<GeoCoordinate>> {
        self.forward_calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());

        let tokens: Vec<String> = query
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .collect();

        Ok(self
            .places
            .iter()
            .filter(|place| {
                let haystack = place.haystack();
                tokens.iter().all(|token| haystack.contains(token.as_str()))
            })
            .map(|place| place.coordinate)
            .collect())
    }

    async fn reverse_geocode(&self, coordinate: GeoCoordinate) -> Result<Vec<AddressDetails>> {
        self.reverse_calls.fetch_add(1, Ordering::SeqCst);

        let nearest = self
            .places
            .iter()
            .map(|place| (place.distance_to(&coordinate), place))
            .filter(|(distance, _)| *distance <= SNAP_RADIUS_DEGREES)
            .min_by(|a, b| a.0.total_cmp(&b.0));

        Ok(nearest.map(|(_, place)| vec![place.details.clone()]).unwrap_or_default())
    }
}

/// Position provider reporting a fixed fix
#[derive(Debug, Clone)]
pub struct FixedPositionProvider {
    permission: PermissionStatus,
    position: Option<GeoCoordinate>,
}

impl FixedPositionProvider {
    /// Permission granted, position available
    pub fn at(position: GeoCoordinate) -> Self {
        Self { permission: PermissionStatus::Granted, position: Some(position) }
    }

    /// Permission granted, but no fix can be obtained
    pub fn unavailable() -> Self {
        Self { permission: PermissionStatus::Granted, position: None }
    }

    /// User declines the permission prompt
    pub fn denied() -> Self {
        Self { permission: PermissionStatus::Denied, position: None }
    }
}

#[async_trait]
impl PositionProvider for FixedPositionProvider {
    async fn request_permission(&self) -> PermissionStatus {
        self.permission
    }

    async fn current_position(&self) -> Result<GeoCoordinate> {
        if self.permission == PermissionStatus::Denied {
            return Err(CustmapError::PermissionDenied { capability: "location".to_string() });
        }
        self.position.ok_or_else(|| CustmapError::PositionUnavailable {
            reason: "no position fix".to_string(),
        })
    }
}

/// What the fixture camera does when triggered
#[derive(Debug, Clone)]
pub enum CameraOutcome {
    Photo(ImageRef),
    Denied,
    Cancelled,
}

/// Camera that replays a scripted outcome
#[derive(Debug, Clone)]
pub struct FixtureCamera {
    outcome: CameraOutcome,
}

impl FixtureCamera {
    pub fn new(outcome: CameraOutcome) -> Self {
        Self { outcome }
    }

    pub fn photo(uri: impl Into<String>) -> Self {
        Self::new(CameraOutcome::Photo(ImageRef::new(uri)))
    }
}

#[async_trait]
impl CameraCapture for FixtureCamera {
    async fn capture(&self) -> Result<ImageRef> {
        match &self.outcome {
            CameraOutcome::Photo(image) => Ok(image.clone()),
            CameraOutcome::Denied => {
                Err(CustmapError::PermissionDenied { capability: "camera".to_string() })
            }
            CameraOutcome::Cancelled => Err(CustmapError::UserCancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_forward_matches_all_tokens() {
        let gateway = FixtureGateway::seeded();

        let hits = gateway.forward_geocode("phoenix").await.unwrap();
        assert_eq!(hits.len(), 2);

        let hits = gateway.forward_geocode("Central Ave, Phoenix").await.unwrap();
        assert_eq!(hits, vec![GeoCoordinate { latitude: 33.4936, longitude: -112.0737 }]);

        assert!(gateway.forward_geocode("atlantis").await.unwrap().is_empty());
        assert_eq!(gateway.forward_calls(), 3);
        assert_eq!(gateway.queries()[1], "Central Ave, Phoenix");
    }

    #[tokio::test]
    async fn test_reverse_snaps_to_nearest_place() {
        let gateway = FixtureGateway::seeded();

        let details = gateway
            .reverse_geocode(GeoCoordinate { latitude: 47.6070, longitude: -122.3330 })
            .await
            .unwrap();
        assert_eq!(details[0].city.as_deref(), Some("Seattle"));

        let nowhere = gateway
            .reverse_geocode(GeoCoordinate { latitude: 0.0, longitude: 0.0 })
            .await
            .unwrap();
        assert!(nowhere.is_empty());
        assert_eq!(gateway.reverse_calls(), 2);
    }

    #[tokio::test]
    async fn test_position_provider() {
        let here = GeoCoordinate { latitude: 33.0, longitude: -117.0 };
        assert_eq!(FixedPositionProvider::at(here).current_position().await.unwrap(), here);

        let denied = FixedPositionProvider::denied();
        assert_eq!(denied.request_permission().await, PermissionStatus::Denied);
        assert!(matches!(
            denied.current_position().await,
            Err(CustmapError::PermissionDenied { .. })
        ));

        assert!(matches!(
            FixedPositionProvider::unavailable().current_position().await,
            Err(CustmapError::PositionUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_camera_outcomes() {
        let image = FixtureCamera::photo("file:///tmp/ted.jpg").capture().await.unwrap();
        assert_eq!(image.as_str(), "file:///tmp/ted.jpg");

        assert!(matches!(
            FixtureCamera::new(CameraOutcome::Cancelled).capture().await,
            Err(CustmapError::UserCancelled)
        ));
        assert!(matches!(
            FixtureCamera::new(CameraOutcome::Denied).capture().await,
            Err(CustmapError::PermissionDenied { .. })
        ));
    }
}
