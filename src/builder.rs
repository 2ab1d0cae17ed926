//! Index builder for flexible configuration
//!
//! Collects configuration and an initial location batch, optionally read
//! from a JSON fixture file, and produces a loaded [`SpatialIndex`].

use crate::config::Config;
use crate::error::Result;
use crate::fixture::LocationData;
use crate::index::SpatialIndex;
use crate::types::Location;
use std::path::PathBuf;

/// Builder for a [`SpatialIndex`] with custom precision and initial data.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    config: Config,
    locations: Vec<Location>,
    fixture_path: Option<PathBuf>,
}

impl IndexBuilder {
    /// Create a new builder with the default configuration and no data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the full index configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the geohash precision. Zero is rejected when the index is built.
    pub fn precision(mut self, precision: usize) -> Self {
        self.config.precision = precision;
        self
    }

    /// Add one location to the initial batch.
    pub fn location(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    /// Add several locations to the initial batch.
    pub fn locations<I: IntoIterator<Item = Location>>(mut self, locations: I) -> Self {
        self.locations.extend(locations);
        self
    }

    /// Read places from a fixture file when building. They are indexed after
    /// any locations added directly.
    pub fn fixture_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.fixture_path = Some(path.into());
        self
    }

    /// Build the index and load the collected locations in one batch.
    pub fn build(self) -> Result<SpatialIndex> {
        let mut locations = self.locations;

        if let Some(path) = self.fixture_path {
            let data = LocationData::from_path(&path)?;
            log::debug!(
                "Read {} places from fixture {}",
                data.place_data.len(),
                path.display()
            );
            locations.extend(data.place_data);
        }

        SpatialIndex::from_locations(&locations, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeoTrieError;
    use crate::types::GeoPoint;
    use std::io::Write;

    #[test]
    fn test_builder_default() {
        let index = IndexBuilder::new().build().unwrap();
        assert!(index.is_empty());
        assert_eq!(index.precision(), 15);
    }

    #[test]
    fn test_builder_with_locations() {
        let index = IndexBuilder::new()
            .precision(9)
            .location(Location::new("Gateway of India", 18.922002, 72.837783))
            .locations(vec![
                Location::new("Juhu Beach", 19.075985, 72.843816),
                Location::new("Bandra Fort", 19.041002, 72.839835),
            ])
            .build()
            .unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(index.precision(), 9);
    }

    #[test]
    fn test_builder_zero_precision() {
        let result = IndexBuilder::new().precision(0).build();
        assert!(matches!(result, Err(GeoTrieError::InvalidPrecision(0))));
    }

    #[test]
    fn test_builder_fixture_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"lat": 40.7128, "lon": -74.0060, "placeData": [
                {{"name": "Times Square", "latitude": 40.7580, "longitude": -73.9855}},
                {{"name": "Empire State Building", "latitude": 40.7484, "longitude": -73.9857}}
            ]}}"#
        )
        .unwrap();

        let index = IndexBuilder::new()
            .location(Location::new("Flatiron Building", 40.7411, -73.9897))
            .fixture_path(file.path())
            .build()
            .unwrap();
        assert_eq!(index.len(), 3);

        let found = index
            .find_nearby(GeoPoint::new(40.7580, -73.9855), 0.5)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Times Square");
    }

    #[test]
    fn test_builder_missing_fixture() {
        let result = IndexBuilder::new()
            .fixture_path("/nonexistent/geotrie/fixture.json")
            .build();
        assert!(matches!(result, Err(GeoTrieError::Io(_))));
    }
}
