//! Pure computation for the index.
//!
//! Nothing in here holds state, logs or retries:
//! - `geohash`: base-32 geohash encoding and decoding
//! - `distance`: great-circle distance used to post-filter candidates
//! - `validation`: coordinate, radius and precision checks

pub mod distance;
pub mod geohash;
pub mod validation;
