use async_trait::async_trait;
use custmap_core::error::{CustmapError, Result};
use custmap_core::models::{AddressDetails, GeoCoordinate};
use custmap_core::ports::GeocodingGateway;
use serde::Deserialize;

/// Nominatim usage policy requires an identifying User-Agent
const USER_AGENT: &str = concat!("custmap/", env!("CARGO_PKG_VERSION"));

/// Geocoding gateway backed by a Nominatim-compatible HTTP service
pub struct NominatimGateway {
    /// Base URL (e.g., "https://nominatim.openstreetmap.org")
    base_url: String,

    /// Maximum hits requested per forward geocode
    limit: usize,

    /// HTTP client
    client: reqwest::Client,
}

impl NominatimGateway {
    /// Create a new gateway against `base_url`
    pub fn new(base_url: impl Into<String>, limit: usize) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build().map_err(|e| {
            CustmapError::ServiceUnavailable {
                reason: format!("Failed to build HTTP client: {}", e),
            }
        })?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            limit: limit.max(1),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, path))
            .query(query)
            .send()
            .await
            .map_err(|e| CustmapError::ServiceUnavailable {
                reason: format!("Failed to connect to geocoder at {}: {}", self.base_url, e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(CustmapError::ServiceUnavailable {
                reason: format!("Geocoder error ({}): {}", status, error_text),
            });
        }

        response.json::<T>().await.map_err(|e| CustmapError::ServiceUnavailable {
            reason: format!("Failed to parse geocoder response: {}", e),
        })
    }
}

#[async_trait]
impl GeocodingGateway for NominatimGateway {
    async fn forward_geocode(&self, query: &str) -> Result<Vec<GeoCoordinate>> {
        let hits: Vec<SearchHit> = self
            .get_json(
                "search",
                &[
                    ("q", query.to_string()),
                    ("format", "jsonv2".to_string()),
                    ("limit", self.limit.to_string()),
                ],
            )
            .await?;

        tracing::debug!(query = %query, hits = hits.len(), "Nominatim search");
        Ok(coordinates_from_hits(hits))
    }

    async fn reverse_geocode(&self, coordinate: GeoCoordinate) -> Result<Vec<AddressDetails>> {
        let response: ReverseResponse = self
            .get_json(
                "reverse",
                &[
                    ("lat", coordinate.latitude.to_string()),
                    ("lon", coordinate.longitude.to_string()),
                    ("format", "jsonv2".to_string()),
                    ("addressdetails", "1".to_string()),
                ],
            )
            .await?;

        Ok(details_from_reverse(response))
    }
}

/// One entry of a `/search` response
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

/// Body of a `/reverse` response
///
/// Unresolvable coordinates come back as `{"error": "..."}` with HTTP 200.
#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    address: Option<NominatimAddress>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    house_number: Option<String>,
    road: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    hamlet: Option<String>,
    state: Option<String>,
    postcode: Option<String>,
    country: Option<String>,
}

fn coordinates_from_hits(hits: Vec<SearchHit>) -> Vec<GeoCoordinate> {
    hits.into_iter()
        .filter_map(|hit| {
            let latitude = hit.lat.parse::<f64>().ok()?;
            let longitude = hit.lon.parse::<f64>().ok()?;
            match GeoCoordinate::new(latitude, longitude) {
                Ok(coordinate) => Some(coordinate),
                Err(e) => {
                    tracing::warn!("Skipping Nominatim hit: {}", e);
                    None
                }
            }
        })
        .collect()
}

fn details_from_reverse(response: ReverseResponse) -> Vec<AddressDetails> {
    if let Some(error) = response.error {
        tracing::debug!("Nominatim could not reverse geocode: {}", error);
        return Vec::new();
    }

    let Some(address) = response.address else {
        return Vec::new();
    };

    let street = match (address.house_number, address.road) {
        (Some(number), Some(road)) => Some(format!("{} {}", number, road)),
        (None, road) => road,
        (Some(number), None) => Some(number),
    };

    let details = AddressDetails {
        street,
        name: response.name.filter(|n| !n.trim().is_empty()),
        city: address.city.or(address.town).or(address.village).or(address.hamlet),
        region: address.state,
        postal_code: address.postcode,
        country: address.country,
    };

    if details.is_empty() {
        Vec::new()
    } else {
        vec![details]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_creation() {
        let gateway = NominatimGateway::new("http://localhost:8080/", 5).unwrap();
        assert_eq!(gateway.base_url(), "http://localhost:8080");
        assert_eq!(gateway.limit, 5);
    }

    #[test]
    fn test_gateway_limit_is_at_least_one() {
        let gateway = NominatimGateway::new("http://localhost:8080", 0).unwrap();
        assert_eq!(gateway.limit, 1);
    }

    #[test]
    fn test_parse_search_hits() {
        let hits: Vec<SearchHit> = serde_json::from_str(
            r#"[
                {"place_id": 1, "lat": "33.4483771", "lon": "-112.0740373", "display_name": "Phoenix"},
                {"place_id": 2, "lat": "not-a-number", "lon": "0"},
                {"place_id": 3, "lat": "91.0", "lon": "0"},
                {"place_id": 4, "lat": "33.3061605", "lon": "-111.8412502"}
            ]"#,
        )
        .unwrap();

        let coordinates = coordinates_from_hits(hits);
        assert_eq!(coordinates.len(), 2);
        assert_eq!(coordinates[0].latitude, 33.4483771);
        assert_eq!(coordinates[1].longitude, -111.8412502);
    }

    #[test]
    fn test_parse_reverse_response() {
        let response: ReverseResponse = serde_json::from_str(
            r#"{
                "name": "Phoenix City Hall",
                "address": {
                    "house_number": "200",
                    "road": "West Washington Street",
                    "city": "Phoenix",
                    "state": "Arizona",
                    "postcode": "85003",
                    "country": "United States"
                }
            }"#,
        )
        .unwrap();

        let details = details_from_reverse(response);
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].street.as_deref(), Some("200 West Washington Street"));
        assert_eq!(details[0].name.as_deref(), Some("Phoenix City Hall"));
        assert_eq!(details[0].region.as_deref(), Some("Arizona"));
        assert_eq!(details[0].postal_code.as_deref(), Some("85003"));
    }

    #[test]
    fn test_reverse_falls_back_to_town() {
        let response: ReverseResponse = serde_json::from_str(
            r#"{"name": "", "address": {"road": "Coast Hwy", "town": "Encinitas", "state": "California"}}"#,
        )
        .unwrap();

        let details = details_from_reverse(response);
        assert_eq!(details[0].city.as_deref(), Some("Encinitas"));
        assert_eq!(details[0].street.as_deref(), Some("Coast Hwy"));
        assert_eq!(details[0].name, None);
    }

    #[test]
    fn test_reverse_error_is_unresolved() {
        let response: ReverseResponse =
            serde_json::from_str(r#"{"error": "Unable to geocode"}"#).unwrap();
        assert!(details_from_reverse(response).is_empty());

        let response: ReverseResponse = serde_json::from_str(r#"{"address": {}}"#).unwrap();
        assert!(details_from_reverse(response).is_empty());
    }
}
