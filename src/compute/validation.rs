//! Validation for geographic coordinates and query parameters.

use crate::error::{GeoTrieError, Result};
use crate::types::Location;

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// Validates a latitude/longitude pair.
///
/// Latitude: [-90.0, 90.0], Longitude: [-180.0, 180.0], both inclusive.
/// Non-finite values are rejected too.
///
/// # Examples
///
/// ```
/// use geotrie::compute::validation::validate_coordinate;
///
/// assert!(validate_coordinate(19.0760, 72.8777).is_ok());
/// assert!(validate_coordinate(90.0, -180.0).is_ok());
/// assert!(validate_coordinate(95.0, 0.0).is_err());
/// assert!(validate_coordinate(0.0, 200.0).is_err());
/// ```
pub fn validate_coordinate(latitude: f64, longitude: f64) -> Result<()> {
    let in_range = latitude.is_finite()
        && longitude.is_finite()
        && (MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude)
        && (MIN_LONGITUDE..=MAX_LONGITUDE).contains(&longitude);

    if !in_range {
        return Err(GeoTrieError::InvalidCoordinate {
            latitude,
            longitude,
        });
    }

    Ok(())
}

/// Validates a search radius in kilometres: finite and strictly positive.
pub fn validate_radius(radius_km: f64) -> Result<()> {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(GeoTrieError::InvalidInput(format!(
            "Radius must be a finite number greater than zero, got: {}",
            radius_km
        )));
    }
    Ok(())
}

/// Validates a precision for operations that need a concrete cell size.
pub fn validate_precision(precision: usize) -> Result<()> {
    if precision == 0 {
        return Err(GeoTrieError::InvalidPrecision(precision));
    }
    Ok(())
}

/// Validates every location in a batch before anything is indexed.
pub fn validate_locations(locations: &[Location]) -> Result<()> {
    for location in locations {
        validate_coordinate(location.latitude, location.longitude)?;
    }
    Ok(())
}

/// Clamps a latitude/longitude pair into the coordinate domain.
///
/// Used for derived values such as bounding-box corners, never for caller
/// input. NaN is passed through unchanged.
pub fn clamp_coordinate(latitude: f64, longitude: f64) -> (f64, f64) {
    (
        latitude.clamp(MIN_LATITUDE, MAX_LATITUDE),
        longitude.clamp(MIN_LONGITUDE, MAX_LONGITUDE),
    )
}
