//! JSON location fixtures.
//!
//! A fixture is a reference centre plus a list of places:
//!
//! ```json
//! {
//!   "lat": 19.076090,
//!   "lon": 72.877426,
//!   "placeData": [
//!     { "name": "Gateway of India", "latitude": 18.922002, "longitude": 72.837783 }
//!   ]
//! }
//! ```
//!
//! Loading a fixture into an index replaces whatever the index held before.

use crate::config::Config;
use crate::error::Result;
use crate::index::SpatialIndex;
use crate::types::{GeoPoint, Location};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A batch of places around a reference point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationData {
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "placeData", default)]
    pub place_data: Vec<Location>,
}

impl LocationData {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reads and parses a fixture file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// The fixture's reference point.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }

    /// Builds a fresh index holding exactly this fixture's places.
    pub fn to_index(&self, config: Config) -> Result<SpatialIndex> {
        SpatialIndex::from_locations(&self.place_data, config)
    }
}
