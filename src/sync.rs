//! Shared handle for concurrent access to a [`SpatialIndex`].
//!
//! `SharedIndex` holds the current index behind an `Arc` that is swapped
//! as a whole on reload. Readers clone the `Arc` under a short read lock and
//! run their query against that snapshot, so a rebuild never blocks them and
//! never changes an index out from under them. Writers are serialized by a
//! separate mutex; a full [`load`](SharedIndex::load) builds the new index
//! without holding the read/write lock at all.
//!
//! # Examples
//!
//! ```rust
//! use geotrie::{Config, GeoPoint, Location, SharedIndex};
//! use std::thread;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let shared = SharedIndex::new(Config::default())?;
//! shared.load(&[Location::new("Juhu Beach", 19.075985, 72.843816)])?;
//!
//! let reader = shared.clone();
//! let handle = thread::spawn(move || {
//!     reader
//!         .find_nearby(GeoPoint::new(19.0760, 72.8777), 5.0)
//!         .map(|found| found.len())
//! });
//!
//! assert_eq!(handle.join().unwrap()?, 1);
//! # Ok(())
//! # }
//! ```

use crate::config::Config;
use crate::error::Result;
use crate::index::SpatialIndex;
use crate::types::{GeoPoint, Location, NearbyLocation};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Thread-safe, cheaply cloneable handle to an atomically replaceable index.
#[derive(Clone)]
pub struct SharedIndex {
    current: Arc<RwLock<Arc<SpatialIndex>>>,
    writer: Arc<Mutex<()>>,
}

impl SharedIndex {
    /// Creates a handle to an empty index.
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self::from_index(SpatialIndex::new(config)?))
    }

    /// Wraps an already built index.
    pub fn from_index(index: SpatialIndex) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(index))),
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// The index as of now. Later reloads do not affect the returned value.
    pub fn snapshot(&self) -> Arc<SpatialIndex> {
        Arc::clone(&self.current.read())
    }

    pub fn config(&self) -> Config {
        self.snapshot().config().clone()
    }

    /// Rebuilds the index from `locations` and publishes it.
    ///
    /// The current configuration is kept. On error nothing is published and
    /// readers keep seeing the previous index.
    pub fn load(&self, locations: &[Location]) -> Result<()> {
        let _writer = self.writer.lock();
        let config = self.snapshot().config().clone();
        let index = SpatialIndex::from_locations(locations, config)?;
        self.publish(index);
        Ok(())
    }

    /// Publishes a prebuilt index, replacing the current one.
    pub fn replace(&self, index: SpatialIndex) {
        let _writer = self.writer.lock();
        self.publish(index);
    }

    /// Stores a single location.
    ///
    /// Copy-on-write: the whole index is cloned, edited and republished, so
    /// this is expensive for large indexes. Readers are not blocked while the
    /// copy is made. Prefer batching through [`load`](SharedIndex::load).
    pub fn insert_location(&self, location: &Location) -> Result<String> {
        location.point().validate()?;
        self.update(|index| index.insert_location(location))
    }

    /// Removes a geohash. Returns `false` if it was not stored.
    pub fn delete(&self, geohash: &str) -> bool {
        if !self.search(geohash) {
            return false;
        }
        self.update(|index| Ok(index.delete(geohash))).unwrap_or(false)
    }

    pub fn search(&self, geohash: &str) -> bool {
        self.snapshot().search(geohash)
    }

    pub fn find_nearby(&self, center: GeoPoint, radius_km: f64) -> Result<Vec<NearbyLocation>> {
        self.snapshot().find_nearby(center, radius_km)
    }

    pub fn range_query(
        &self,
        southwest: GeoPoint,
        northeast: GeoPoint,
        precision: usize,
    ) -> Result<Vec<String>> {
        self.snapshot().range_query(southwest, northeast, precision)
    }

    pub fn query_within_bbox(
        &self,
        southwest: GeoPoint,
        northeast: GeoPoint,
    ) -> Result<Vec<Location>> {
        self.snapshot().query_within_bbox(southwest, northeast)
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Applies `f` to a private copy of the current index and publishes the
    /// copy if `f` succeeds. Neither the copy nor `f` runs under the
    /// read/write lock.
    fn update<T>(&self, f: impl FnOnce(&mut SpatialIndex) -> Result<T>) -> Result<T> {
        let _writer = self.writer.lock();
        let mut index = SpatialIndex::clone(&self.snapshot());
        let value = f(&mut index)?;
        self.publish(index);
        Ok(value)
    }

    fn publish(&self, index: SpatialIndex) {
        let len = index.len();
        let previous = std::mem::replace(&mut *self.current.write(), Arc::new(index));
        // The last reference to a large index is freed outside the lock
        drop(previous);
        log::debug!("Published spatial index with {} geohashes", len);
    }
}

impl Default for SharedIndex {
    fn default() -> Self {
        Self::from_index(SpatialIndex::default())
    }
}

impl std::fmt::Debug for SharedIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedIndex")
            .field("len", &self.len())
            .finish()
    }
}
