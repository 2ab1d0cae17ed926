//! Core value types shared by the codec, the index and its callers.

use crate::compute::distance::calculate_distance;
use crate::compute::validation::{validate_coordinate, validate_radius};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
///
/// Construction does not validate; operations that need an in-range point
/// (encoding, nearby queries) reject out-of-range values with
/// [`GeoTrieError::InvalidCoordinate`](crate::GeoTrieError::InvalidCoordinate)
/// rather than clamping them.
///
/// Note the argument order: latitude first. [`geo::Point`] stores longitude
/// as `x`, and the `From` conversions below handle the swap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Checks both coordinates are finite and inside their inclusive ranges.
    pub fn validate(&self) -> Result<()> {
        validate_coordinate(self.latitude, self.longitude)
    }

    /// Great-circle distance to `other` in kilometres.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        calculate_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

impl From<geo::Point> for GeoPoint {
    fn from(point: geo::Point) -> Self {
        Self::new(point.y(), point.x())
    }
}

impl From<GeoPoint> for geo::Point {
    fn from(point: GeoPoint) -> Self {
        geo::Point::new(point.longitude, point.latitude)
    }
}

/// A named place as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// A query result: the stored place at its decoded cell centre, with the
/// exact distance from the query point.
///
/// `distance_km` only exists on results and is never stored in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_km: f64,
}

impl NearbyLocation {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Proximity query parameters as received from an outer layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

impl NearbyQuery {
    pub const fn new(latitude: f64, longitude: f64, radius_km: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius_km,
        }
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Rejects out-of-range centres and radii that are not finite and positive.
    pub fn validate(&self) -> Result<()> {
        validate_coordinate(self.latitude, self.longitude)?;
        validate_radius(self.radius_km)
    }
}
