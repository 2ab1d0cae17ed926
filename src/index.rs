//! Spatial index combining the geohash codec with the prefix trie.
//!
//! Locations are encoded at the configured precision and stored in a
//! [`GeohashTrie`], with a side map from geohash to place name. Queries
//! encode the corners of a bounding box, collect prefix-compatible
//! candidates from the trie, and then filter them exactly.
//!
//! Two places that encode to the same geohash share one trie entry and the
//! later name wins. At the default precision of 15 this only happens for
//! points a few nanodegrees apart.

use crate::compute::geohash::{decode, encode, encode_point, validate_geohash};
use crate::compute::validation::{
    clamp_coordinate, validate_locations, validate_precision, validate_radius,
};
use crate::config::Config;
use crate::error::{GeoTrieError, Result};
use crate::trie::GeohashTrie;
use crate::types::{GeoPoint, Location, NearbyLocation};
use geo::{Intersects, Rect, coord};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;

/// Name reported for a stored geohash with no name mapping
pub const UNKNOWN_LOCATION: &str = "unknown location";

/// Kilometres per degree of latitude in the flat-Earth box approximation
const KM_PER_DEGREE: f64 = 111.0;

/// An owned geohash trie plus the geohash → name mapping.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    trie: GeohashTrie,
    names: FxHashMap<String, String>,
    config: Config,
}

impl SpatialIndex {
    /// Creates an empty index.
    pub fn new(config: Config) -> Result<Self> {
        validate_precision(config.precision)?;
        config.validate().map_err(GeoTrieError::InvalidInput)?;
        Ok(Self {
            trie: GeohashTrie::new(),
            names: FxHashMap::default(),
            config,
        })
    }

    /// Creates an empty index storing geohashes of `precision` characters.
    pub fn with_precision(precision: usize) -> Result<Self> {
        validate_precision(precision)?;
        Self::new(Config::default().with_precision(precision))
    }

    /// Builds an index from a batch of locations.
    pub fn from_locations(locations: &[Location], config: Config) -> Result<Self> {
        let mut index = Self::new(config)?;
        index.load(locations)?;
        Ok(index)
    }

    /// Starts a [`IndexBuilder`](crate::IndexBuilder).
    pub fn builder() -> crate::builder::IndexBuilder {
        crate::builder::IndexBuilder::new()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn precision(&self) -> usize {
        self.config.precision
    }

    /// Replaces the whole contents of the index with `locations`.
    ///
    /// Every location is validated before anything changes; on error the
    /// previous contents are kept. This is a full rebuild, not a merge.
    pub fn load(&mut self, locations: &[Location]) -> Result<()> {
        validate_locations(locations)?;

        let mut trie = GeohashTrie::new();
        let mut names = FxHashMap::default();
        names.reserve(locations.len());

        for location in locations {
            let geohash = encode(location.latitude, location.longitude, self.precision())?;
            trie.insert(&geohash);
            if let Some(previous) = names.insert(geohash.clone(), location.name.clone()) {
                log::debug!(
                    "Geohash {} collision: '{}' replaced by '{}'",
                    geohash,
                    previous,
                    location.name
                );
            }
        }

        log::debug!(
            "Loaded {} locations into {} distinct geohashes at precision {}",
            locations.len(),
            trie.len(),
            self.precision()
        );

        self.trie = trie;
        self.names = names;
        Ok(())
    }

    /// Encodes and stores a single location, returning its geohash.
    pub fn insert_location(&mut self, location: &Location) -> Result<String> {
        let geohash = encode_point(&location.point(), self.precision())?;
        self.trie.insert(&geohash);
        if let Some(previous) = self.names.insert(geohash.clone(), location.name.clone()) {
            log::debug!(
                "Geohash {} collision: '{}' replaced by '{}'",
                geohash,
                previous,
                location.name
            );
        }
        Ok(geohash)
    }

    /// Stores a raw geohash without a name. Returns `false` if it was already
    /// present.
    ///
    /// The geohash must use the alphabet and be exactly as long as the index
    /// precision; anything else is rejected with
    /// [`GeoTrieError::InvalidPrecision`] carrying the offending length.
    pub fn insert_geohash(&mut self, geohash: &str) -> Result<bool> {
        validate_geohash(geohash)?;
        if geohash.len() != self.precision() {
            return Err(GeoTrieError::InvalidPrecision(geohash.len()));
        }
        Ok(self.trie.insert(geohash))
    }

    /// Removes a geohash and its name. Returns `false` if it was not stored.
    pub fn delete(&mut self, geohash: &str) -> bool {
        self.names.remove(geohash);
        self.trie.delete(geohash)
    }

    /// Removes the entry a location encodes to. Returns `false` if no such
    /// entry exists.
    pub fn delete_location(&mut self, location: &Location) -> Result<bool> {
        let geohash = encode_point(&location.point(), self.precision())?;
        Ok(self.delete(&geohash))
    }

    /// Exact membership of a full geohash.
    pub fn search(&self, geohash: &str) -> bool {
        self.trie.search(geohash)
    }

    /// Name mapped to a stored geohash, if any.
    pub fn location_name(&self, geohash: &str) -> Option<&str> {
        self.names.get(geohash).map(String::as_str)
    }

    /// The stored location for `geohash`, at its decoded cell centre.
    pub fn get(&self, geohash: &str) -> Result<Location> {
        if !self.trie.search(geohash) {
            return Err(GeoTrieError::NotFound(geohash.to_string()));
        }
        let point = decode(geohash)?;
        Ok(Location::new(
            self.location_name(geohash).unwrap_or(UNKNOWN_LOCATION),
            point.latitude,
            point.longitude,
        ))
    }

    pub fn len(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    /// Read access to the underlying trie.
    pub fn trie(&self) -> &GeohashTrie {
        &self.trie
    }

    /// Finds stored locations within `radius_km` of `center`.
    ///
    /// The search box is a flat-Earth approximation: `radius / 111` degrees
    /// of latitude and `radius / (111 * cos(latitude))` degrees of longitude.
    /// This is a known precision limit. Near the poles the cosine approaches
    /// zero and the longitude span grows to the whole globe, so the candidate
    /// set grows with it. Box corners are clamped to the coordinate domain
    /// and the box does not wrap across the antimeridian, so places just
    /// over the date line from `center` can be missed.
    ///
    /// Candidates that fail to decode are skipped with a warning. Results are
    /// sorted by ascending distance.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use geotrie::{Config, GeoPoint, Location, SpatialIndex};
    ///
    /// let places = vec![
    ///     Location::new("Center", 19.0760, 72.8777),
    ///     Location::new("Far", 19.2000, 73.0000),
    /// ];
    /// let index = SpatialIndex::from_locations(&places, Config::default())?;
    ///
    /// let near = index.find_nearby(GeoPoint::new(19.0760, 72.8777), 10.0)?;
    /// assert_eq!(near.len(), 1);
    /// assert_eq!(near[0].name, "Center");
    /// # Ok::<(), geotrie::GeoTrieError>(())
    /// ```
    pub fn find_nearby(&self, center: GeoPoint, radius_km: f64) -> Result<Vec<NearbyLocation>> {
        center.validate()?;
        validate_radius(radius_km)?;

        let lat_delta = radius_km / KM_PER_DEGREE;
        let lon_delta = radius_km / (KM_PER_DEGREE * center.latitude.to_radians().cos());

        let (sw_lat, sw_lon) =
            clamp_coordinate(center.latitude - lat_delta, center.longitude - lon_delta);
        let (ne_lat, ne_lon) =
            clamp_coordinate(center.latitude + lat_delta, center.longitude + lon_delta);

        let southwest = encode(sw_lat, sw_lon, self.precision())?;
        let northeast = encode(ne_lat, ne_lon, self.precision())?;
        let candidates = self.trie.collect_by_prefix_range(&southwest, &northeast);

        let mut results: Vec<NearbyLocation> = candidates
            .iter()
            .filter_map(|geohash| {
                let point = self.decode_candidate(geohash)?;
                let distance_km = center.distance_km(&point);
                (distance_km <= radius_km).then(|| NearbyLocation {
                    name: self.display_name(geohash),
                    latitude: point.latitude,
                    longitude: point.longitude,
                    distance_km,
                })
            })
            .collect();

        results.sort_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(Ordering::Equal)
        });
        Ok(results)
    }

    /// Candidate geohashes for the box from `southwest` to `northeast`,
    /// with corners encoded at `precision`.
    ///
    /// No exact containment check is applied: the result is a superset of
    /// the geohashes inside the box. Use [`query_within_bbox`] for exact
    /// results. `precision` should match the index precision, otherwise
    /// recall degrades.
    ///
    /// [`query_within_bbox`]: SpatialIndex::query_within_bbox
    pub fn range_query(
        &self,
        southwest: GeoPoint,
        northeast: GeoPoint,
        precision: usize,
    ) -> Result<Vec<String>> {
        validate_precision(precision)?;
        let sw = encode_point(&southwest, precision)?;
        let ne = encode_point(&northeast, precision)?;
        Ok(self.trie.collect_by_prefix_range(&sw, &ne))
    }

    /// Stored locations whose decoded point lies inside the box, borders
    /// included.
    ///
    /// Corners given in the wrong order are swapped.
    pub fn query_within_bbox(
        &self,
        southwest: GeoPoint,
        northeast: GeoPoint,
    ) -> Result<Vec<Location>> {
        southwest.validate()?;
        northeast.validate()?;

        let (mut sw, mut ne) = (southwest, northeast);
        if sw.latitude > ne.latitude || sw.longitude > ne.longitude {
            log::warn!("Bounding box corners out of order; normalizing");
            if sw.latitude > ne.latitude {
                std::mem::swap(&mut sw.latitude, &mut ne.latitude);
            }
            if sw.longitude > ne.longitude {
                std::mem::swap(&mut sw.longitude, &mut ne.longitude);
            }
        }

        let bbox = Rect::new(
            coord! { x: sw.longitude, y: sw.latitude },
            coord! { x: ne.longitude, y: ne.latitude },
        );

        let candidates = self.range_query(sw, ne, self.precision())?;
        Ok(candidates
            .iter()
            .filter_map(|geohash| {
                let point = self.decode_candidate(geohash)?;
                let position = coord! { x: point.longitude, y: point.latitude };
                bbox.intersects(&position).then(|| {
                    Location::new(self.display_name(geohash), point.latitude, point.longitude)
                })
            })
            .collect())
    }

    /// Every stored location at its decoded cell centre, in unspecified order.
    pub fn locations(&self) -> Vec<Location> {
        self.trie
            .geohashes()
            .iter()
            .filter_map(|geohash| {
                let point = self.decode_candidate(geohash)?;
                Some(Location::new(
                    self.display_name(geohash),
                    point.latitude,
                    point.longitude,
                ))
            })
            .collect()
    }

    fn decode_candidate(&self, geohash: &str) -> Option<GeoPoint> {
        match decode(geohash) {
            Ok(point) => Some(point),
            Err(e) => {
                log::warn!("Skipping undecodable candidate {}: {}", geohash, e);
                None
            }
        }
    }

    fn display_name(&self, geohash: &str) -> String {
        self.location_name(geohash)
            .unwrap_or(UNKNOWN_LOCATION)
            .to_string()
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self {
            trie: GeohashTrie::new(),
            names: FxHashMap::default(),
            config: Config::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mumbai() -> Vec<Location> {
        vec![
            Location::new("Gateway of India", 18.922002, 72.837783),
            Location::new("Juhu Beach", 19.075985, 72.843816),
            Location::new("Marine Drive", 18.920414, 72.835517),
            Location::new("Bandra Fort", 19.041002, 72.839835),
            Location::new("Kanheri Caves", 19.140275, 72.872463),
        ]
    }

    #[test]
    fn test_new_rejects_zero_precision() {
        assert!(matches!(
            SpatialIndex::with_precision(0),
            Err(GeoTrieError::InvalidPrecision(0))
        ));
        assert!(SpatialIndex::new(Config { precision: 0 }).is_err());
    }

    #[test]
    fn test_load_indexes_every_location() {
        let index = SpatialIndex::from_locations(&mumbai(), Config::default()).unwrap();
        assert_eq!(index.len(), 5);

        let hash = encode(19.075985, 72.843816, 15).unwrap();
        assert!(index.search(&hash));
        assert_eq!(index.location_name(&hash), Some("Juhu Beach"));
    }

    #[test]
    fn test_load_replaces_previous_contents() {
        let mut index = SpatialIndex::from_locations(&mumbai(), Config::default()).unwrap();
        let old = encode(18.922002, 72.837783, 15).unwrap();

        index
            .load(&[Location::new("Times Square", 40.7580, -73.9855)])
            .unwrap();
        assert_eq!(index.len(), 1);
        assert!(!index.search(&old));
        assert_eq!(index.location_name(&old), None);
    }

    #[test]
    fn test_load_failure_keeps_previous_contents() {
        let mut index = SpatialIndex::from_locations(&mumbai(), Config::default()).unwrap();
        let bad = vec![
            Location::new("ok", 10.0, 10.0),
            Location::new("bad", 100.0, 10.0),
        ];
        assert!(matches!(
            index.load(&bad),
            Err(GeoTrieError::InvalidCoordinate { .. })
        ));
        assert_eq!(index.len(), 5);
    }

    #[test]
    fn test_collision_last_write_wins() {
        let mut index = SpatialIndex::with_precision(5).unwrap();
        index
            .load(&[
                Location::new("first", 19.07600, 72.87770),
                Location::new("second", 19.07601, 72.87771),
            ])
            .unwrap();
        assert_eq!(index.len(), 1);
        let hash = encode(19.076, 72.8777, 5).unwrap();
        assert_eq!(index.location_name(&hash), Some("second"));
    }

    #[test]
    fn test_insert_geohash_validates_alphabet() {
        let mut index = SpatialIndex::with_precision(5).unwrap();
        assert!(index.insert_geohash("te7ud").unwrap());
        assert!(!index.insert_geohash("te7ud").unwrap());
        assert!(matches!(
            index.insert_geohash("te7al"),
            Err(GeoTrieError::InvalidGeohashCharacter { position: 3, .. })
        ));
    }

    #[test]
    fn test_insert_geohash_requires_index_precision() {
        let mut index = SpatialIndex::default();
        let full = encode(19.0760, 72.8777, 15).unwrap();
        let long = format!("{}0", full);

        for bad in ["", &full[..7], long.as_str()] {
            assert!(matches!(
                index.insert_geohash(bad),
                Err(GeoTrieError::InvalidPrecision(len)) if len == bad.len()
            ));
        }
        assert!(matches!(
            index.insert_geohash(&"0".repeat(2_000_000)),
            Err(GeoTrieError::InvalidPrecision(2_000_000))
        ));
        assert!(index.is_empty());
        assert_eq!(index.trie().node_count(), 1);

        assert!(index.insert_geohash(&full).unwrap());
    }

    #[test]
    fn test_find_nearby_returns_antipodal_point() {
        // Antipodes of these cell centres round the haversine term past 1
        let mut index = SpatialIndex::with_precision(3).unwrap();
        for hash in ["999", "eee", "kkk", "qqq"] {
            index.insert_geohash(hash).unwrap();
        }

        let found = index
            .find_nearby(GeoPoint::new(-20.390625, 162.421875), 20_100.0)
            .unwrap();
        assert_eq!(found.len(), 4);
        assert!(found.iter().all(|l| l.distance_km.is_finite()));
        let farthest = &found[3];
        assert!((farthest.latitude - 20.390625).abs() < 1e-9);
        assert!((farthest.longitude + 17.578125).abs() < 1e-9);
    }

    #[test]
    fn test_delete_removes_name() {
        let mut index = SpatialIndex::from_locations(&mumbai(), Config::default()).unwrap();
        let juhu = Location::new("Juhu Beach", 19.075985, 72.843816);
        assert!(index.delete_location(&juhu).unwrap());
        assert!(!index.delete_location(&juhu).unwrap());
        assert_eq!(index.len(), 4);

        let hash = encode(19.075985, 72.843816, 15).unwrap();
        assert_eq!(index.location_name(&hash), None);
    }

    #[test]
    fn test_get() {
        let index = SpatialIndex::from_locations(&mumbai(), Config::default()).unwrap();
        let hash = encode(19.041002, 72.839835, 15).unwrap();
        let location = index.get(&hash).unwrap();
        assert_eq!(location.name, "Bandra Fort");
        assert!((location.latitude - 19.041002).abs() < 1e-6);

        assert!(matches!(
            index.get("te7u"),
            Err(GeoTrieError::NotFound(_))
        ));
    }

    #[test]
    fn test_unnamed_geohash_reports_unknown() {
        let mut index = SpatialIndex::default();
        let hash = encode(19.0760, 72.8777, 15).unwrap();
        index.insert_geohash(&hash).unwrap();

        let found = index
            .find_nearby(GeoPoint::new(19.0760, 72.8777), 1.0)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, UNKNOWN_LOCATION);
    }

    #[test]
    fn test_find_nearby_sorted_by_distance() {
        let index = SpatialIndex::from_locations(&mumbai(), Config::default()).unwrap();
        let center = GeoPoint::new(18.95, 72.84);
        let found = index.find_nearby(center, 30.0).unwrap();

        assert_eq!(found.len(), 5);
        assert!(found.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
        for result in &found {
            assert!(result.distance_km <= 30.0);
        }
    }

    #[test]
    fn test_find_nearby_rejects_bad_input() {
        let index = SpatialIndex::default();
        assert!(matches!(
            index.find_nearby(GeoPoint::new(19.0, 72.0), 0.0),
            Err(GeoTrieError::InvalidInput(_))
        ));
        assert!(matches!(
            index.find_nearby(GeoPoint::new(190.0, 72.0), 1.0),
            Err(GeoTrieError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_find_nearby_on_empty_index() {
        let index = SpatialIndex::default();
        assert!(
            index
                .find_nearby(GeoPoint::new(19.0, 72.0), 10.0)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_range_query_rejects_zero_precision() {
        let index = SpatialIndex::default();
        assert!(matches!(
            index.range_query(GeoPoint::new(18.0, 72.0), GeoPoint::new(19.0, 73.0), 0),
            Err(GeoTrieError::InvalidPrecision(0))
        ));
    }

    #[test]
    fn test_query_within_bbox_is_exact() {
        let index = SpatialIndex::from_locations(&mumbai(), Config::default()).unwrap();
        // South Mumbai only: Gateway of India and Marine Drive
        let sw = GeoPoint::new(18.90, 72.82);
        let ne = GeoPoint::new(18.93, 72.85);

        let candidates = index.range_query(sw, ne, index.precision()).unwrap();
        let mut names: Vec<String> = index
            .query_within_bbox(sw, ne)
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        names.sort();

        assert_eq!(names, vec!["Gateway of India", "Marine Drive"]);
        assert!(candidates.len() >= names.len());
    }

    #[test]
    fn test_query_within_bbox_swaps_corners() {
        let index = SpatialIndex::from_locations(&mumbai(), Config::default()).unwrap();
        let found = index
            .query_within_bbox(GeoPoint::new(18.93, 72.85), GeoPoint::new(18.90, 72.82))
            .unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_locations_lists_everything() {
        let index = SpatialIndex::from_locations(&mumbai(), Config::default()).unwrap();
        let mut names: Vec<String> = index.locations().into_iter().map(|l| l.name).collect();
        names.sort();
        assert_eq!(names.len(), 5);
        assert_eq!(names[0], "Bandra Fort");
    }
}
