//! Great-circle distance.

use geo::{Distance, HaversineMeasure, Point};

/// Mean Earth radius in kilometres used by [`calculate_distance`]
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Half the great circle: the largest distance between two points
pub const MAX_DISTANCE_KM: f64 = std::f64::consts::PI * EARTH_RADIUS_KM;

const EARTH: HaversineMeasure = HaversineMeasure::new(EARTH_RADIUS_KM * 1000.0);

/// Haversine distance in kilometres between two latitude/longitude pairs.
///
/// This is the exact distance used to post-filter the approximate
/// candidates produced by the trie.
///
/// # Examples
///
/// ```rust
/// use geotrie::compute::distance::calculate_distance;
///
/// // Gateway of India to Juhu Beach
/// let km = calculate_distance(18.922002, 72.837783, 19.075985, 72.843816);
/// assert!((km - 17.1).abs() < 0.2);
///
/// assert_eq!(calculate_distance(19.0, 72.0, 19.0, 72.0), 0.0);
/// ```
pub fn calculate_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let meters = EARTH.distance(Point::new(lon1, lat1), Point::new(lon2, lat2));

    // Rounding can push the haversine term just past 1 for antipodal pairs
    if meters.is_nan() && [lat1, lon1, lat2, lon2].iter().all(|v| v.is_finite()) {
        return MAX_DISTANCE_KM;
    }
    meters / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Haversine;

    #[test]
    fn test_zero_distance() {
        assert_eq!(calculate_distance(40.7128, -74.0060, 40.7128, -74.0060), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let ab = calculate_distance(19.0760, 72.8777, 19.2000, 73.0000);
        let ba = calculate_distance(19.2000, 73.0000, 19.0760, 72.8777);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_matches_geo_haversine() {
        // geo uses a 6371.0088 km mean radius; agree to within 0.01%
        let nyc = Point::new(-74.0060, 40.7128);
        let la = Point::new(-118.2437, 34.0522);
        let reference_km = Haversine.distance(nyc, la) / 1000.0;
        let km = calculate_distance(40.7128, -74.0060, 34.0522, -118.2437);
        assert!((km - reference_km).abs() / reference_km < 1e-4);
        assert!(km > 3900.0 && km < 4000.0);
    }

    #[test]
    fn test_antipodal() {
        let km = calculate_distance(0.0, 0.0, 0.0, 180.0);
        assert!((km - MAX_DISTANCE_KM).abs() < 1e-6);
    }

    #[test]
    fn test_antipodal_pairs_are_finite() {
        for i in 0..40 {
            for j in 0..40 {
                let lat = -80.0 + i as f64 * 4.1;
                let lon = -170.0 + j as f64 * 8.5;
                let (anti_lat, anti_lon) = (-lat, if lon < 0.0 { lon + 180.0 } else { lon - 180.0 });

                let km = calculate_distance(lat, lon, anti_lat, anti_lon);
                assert!(km.is_finite(), "NaN distance for ({}, {})", lat, lon);
                assert!((km - MAX_DISTANCE_KM).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_non_finite_input_stays_nan() {
        assert!(calculate_distance(f64::NAN, 0.0, 0.0, 0.0).is_nan());
    }
}
