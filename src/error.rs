//! Error types for geotrie.
//!
//! Absence is not an error: `search` and `delete` report a geohash that was
//! never inserted as `false`. Only lookups that must produce a record, such
//! as [`SpatialIndex::get`](crate::SpatialIndex::get), surface `NotFound`.

use thiserror::Error;

/// Errors produced by the codec, the index and its configuration.
#[derive(Debug, Error)]
pub enum GeoTrieError {
    /// Latitude outside [-90, 90], longitude outside [-180, 180], or a non-finite value
    #[error("Invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// A geohash contains a character outside the base-32 alphabet
    #[error("Invalid geohash character {character:?} at position {position}")]
    InvalidGeohashCharacter { character: char, position: usize },

    /// Precision of zero where a concrete cell size is required
    #[error("Invalid precision: {0} (must be at least 1)")]
    InvalidPrecision(usize),

    /// Malformed query or configuration input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A stored geohash was required but is not in the index
    #[error("Geohash not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for geotrie operations
pub type Result<T> = std::result::Result<T, GeoTrieError>;
