//! In-process geohash spatial index backed by a prefix trie.
//!
//! Points are encoded as fixed-length base-32 geohashes and stored in a
//! character trie. Proximity queries turn a radius into a bounding box,
//! collect prefix-compatible candidates from the trie and keep those within
//! the exact Haversine distance.
//!
//! ```rust
//! use geotrie::{GeoPoint, Location, SpatialIndex};
//!
//! let index = SpatialIndex::builder()
//!     .location(Location::new("Center", 19.0760, 72.8777))
//!     .location(Location::new("Far", 19.2000, 73.0000))
//!     .build()?;
//!
//! let nearby = index.find_nearby(GeoPoint::new(19.0760, 72.8777), 30.0)?;
//! assert_eq!(nearby.len(), 2);
//! assert_eq!(nearby[0].name, "Center");
//! # Ok::<(), geotrie::GeoTrieError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod error;
pub mod fixture;
pub mod index;
pub mod sync;
pub mod trie;
pub mod types;

pub use builder::IndexBuilder;
pub use config::{Config, DEFAULT_PRECISION};
pub use error::{GeoTrieError, Result};
pub use fixture::LocationData;
pub use index::{SpatialIndex, UNKNOWN_LOCATION};
pub use sync::SharedIndex;
pub use trie::GeohashTrie;
pub use types::{GeoPoint, Location, NearbyLocation, NearbyQuery};

pub use compute::distance::calculate_distance;
pub use compute::geohash::{decode, decode_bounds, encode};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{
        Config, GeoPoint, GeoTrieError, GeohashTrie, IndexBuilder, Location, NearbyLocation,
        Result, SharedIndex, SpatialIndex,
    };

    pub use crate::compute::distance::calculate_distance;
    pub use crate::compute::geohash::{decode, encode};
}
