//! Coordinate and map viewport types shared by every custmap crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CustmapError, Result};

/// WGS 84 coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    /// Create a coordinate, rejecting values outside [-90,90] x [-180,180]
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let coordinate = Self { latitude, longitude };
        if coordinate.is_valid() {
            Ok(coordinate)
        } else {
            Err(CustmapError::InvalidCoordinate { latitude, longitude })
        }
    }

    /// Check that both components are finite and within range
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Parses `"lat,lon"` (whitespace around either component is ignored)
impl FromStr for GeoCoordinate {
    type Err = CustmapError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CustmapError::ConfigInvalid {
            key: "coordinate".to_string(),
            reason: format!("Expected 'lat,lon', got '{}'", s),
        };

        let (lat, lon) = s.split_once(',').ok_or_else(invalid)?;
        let latitude = lat.trim().parse::<f64>().map_err(|_| invalid())?;
        let longitude = lon.trim().parse::<f64>().map_err(|_| invalid())?;

        Self::new(latitude, longitude)
    }
}

/// Map viewport: a center plus strictly positive spans
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapRegion {
    pub center: GeoCoordinate,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl MapRegion {
    /// Latitude span used when recentering on a device position
    pub const DEFAULT_LATITUDE_DELTA: f64 = 0.0922;

    /// Longitude span used when recentering on a device position
    pub const DEFAULT_LONGITUDE_DELTA: f64 = 0.0421;

    /// Span used when zooming onto a picked search candidate
    pub const CANDIDATE_DELTA: f64 = 0.01;

    pub fn new(center: GeoCoordinate, latitude_delta: f64, longitude_delta: f64) -> Result<Self> {
        let region = Self { center, latitude_delta, longitude_delta };
        region.validate()?;
        Ok(region)
    }

    /// Region around `center` with the default spans
    pub fn around(center: GeoCoordinate) -> Self {
        Self {
            center,
            latitude_delta: Self::DEFAULT_LATITUDE_DELTA,
            longitude_delta: Self::DEFAULT_LONGITUDE_DELTA,
        }
    }

    /// Tight region around `center` used after a candidate pick
    pub fn zoomed(center: GeoCoordinate) -> Self {
        Self {
            center,
            latitude_delta: Self::CANDIDATE_DELTA,
            longitude_delta: Self::CANDIDATE_DELTA,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.center.is_valid() {
            return Err(CustmapError::InvalidCoordinate {
                latitude: self.center.latitude,
                longitude: self.center.longitude,
            });
        }

        for (name, delta) in
            [("latitudeDelta", self.latitude_delta), ("longitudeDelta", self.longitude_delta)]
        {
            if !(delta.is_finite() && delta > 0.0) {
                return Err(CustmapError::InvalidRegion {
                    reason: format!("{} must be strictly positive, got {}", name, delta),
                });
            }
        }

        Ok(())
    }
}

impl Default for MapRegion {
    /// San Francisco, where a fresh picker session opens before any position fix
    fn default() -> Self {
        Self::around(GeoCoordinate { latitude: 37.78825, longitude: -122.4324 })
    }
}
