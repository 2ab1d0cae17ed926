//! Geohash encoding and decoding.
//!
//! A geohash is built by bisecting the world bounding box, alternating
//! between longitude (odd bits, counting from 1) and latitude (even bits).
//! Each bisection emits one bit; every five bits select one symbol of the
//! base-32 alphabet. Any prefix of a geohash names a cell that contains the
//! cell of the full geohash.

use crate::compute::validation::{
    MAX_LATITUDE, MAX_LONGITUDE, MIN_LATITUDE, MIN_LONGITUDE, validate_coordinate,
};
use crate::error::{GeoTrieError, Result};
use crate::types::GeoPoint;
use geo::{Rect, coord};

/// The geohash alphabet. Omits `a`, `i`, `l` and `o`.
pub const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Bits carried by one geohash symbol
pub const BITS_PER_CHAR: usize = 5;

const INVALID: u8 = u8::MAX;

const DECODE_TABLE: [u8; 128] = build_decode_table();

const fn build_decode_table() -> [u8; 128] {
    let mut table = [INVALID; 128];
    let mut i = 0;
    while i < BASE32.len() {
        table[BASE32[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// Returns the 5-bit value of a geohash symbol, or `None` if the character
/// is not in the alphabet.
pub fn symbol_value(c: char) -> Option<u8> {
    if !c.is_ascii() {
        return None;
    }
    match DECODE_TABLE[c as usize] {
        INVALID => None,
        value => Some(value),
    }
}

/// Checks every character of `geohash` against the alphabet.
pub fn validate_geohash(geohash: &str) -> Result<()> {
    for (position, character) in geohash.chars().enumerate() {
        if symbol_value(character).is_none() {
            return Err(GeoTrieError::InvalidGeohashCharacter {
                character,
                position,
            });
        }
    }
    Ok(())
}

/// Running bounds of the cell being bisected.
#[derive(Debug, Clone, Copy)]
struct Cell {
    lat_min: f64,
    lat_max: f64,
    lon_min: f64,
    lon_max: f64,
}

impl Cell {
    const WORLD: Cell = Cell {
        lat_min: MIN_LATITUDE,
        lat_max: MAX_LATITUDE,
        lon_min: MIN_LONGITUDE,
        lon_max: MAX_LONGITUDE,
    };

    /// Halves the active dimension around `value` and returns the emitted bit.
    fn bisect(&mut self, is_lon: bool, value: f64) -> bool {
        let (min, max) = self.bounds_mut(is_lon);
        let mid = (*min + *max) / 2.0;
        if value > mid {
            *min = mid;
            true
        } else {
            *max = mid;
            false
        }
    }

    /// Halves the active dimension, keeping the half selected by `bit`.
    fn narrow(&mut self, is_lon: bool, bit: bool) {
        let (min, max) = self.bounds_mut(is_lon);
        let mid = (*min + *max) / 2.0;
        if bit {
            *min = mid;
        } else {
            *max = mid;
        }
    }

    fn bounds_mut(&mut self, is_lon: bool) -> (&mut f64, &mut f64) {
        if is_lon {
            (&mut self.lon_min, &mut self.lon_max)
        } else {
            (&mut self.lat_min, &mut self.lat_max)
        }
    }

    fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.lat_min + self.lat_max) / 2.0,
            (self.lon_min + self.lon_max) / 2.0,
        )
    }

    fn to_rect(self) -> Rect {
        Rect::new(
            coord! { x: self.lon_min, y: self.lat_min },
            coord! { x: self.lon_max, y: self.lat_max },
        )
    }
}

/// Encodes a latitude/longitude pair as a geohash of `precision` characters.
///
/// A precision of zero yields an empty string. Coordinates outside the valid
/// ranges, or non-finite ones, are rejected rather than clamped.
///
/// Precision beyond about 12 characters exceeds what an `f64` can bisect;
/// the trailing symbols are still deterministic but carry no extra
/// resolution.
///
/// # Examples
///
/// ```
/// use geotrie::compute::geohash::encode;
///
/// let hash = encode(57.64911, 10.40744, 11)?;
/// assert_eq!(hash, "u4pruydqqvj");
///
/// // Prefixes of a longer geohash are the shorter geohashes
/// assert_eq!(encode(57.64911, 10.40744, 5)?, "u4pru");
/// # Ok::<(), geotrie::GeoTrieError>(())
/// ```
pub fn encode(latitude: f64, longitude: f64, precision: usize) -> Result<String> {
    validate_coordinate(latitude, longitude)?;

    let mut cell = Cell::WORLD;
    let mut hash = String::with_capacity(precision);
    let mut is_lon = true;

    for _ in 0..precision {
        let mut index = 0usize;
        for _ in 0..BITS_PER_CHAR {
            let value = if is_lon { longitude } else { latitude };
            let bit = cell.bisect(is_lon, value);
            index = (index << 1) | usize::from(bit);
            is_lon = !is_lon;
        }
        hash.push(char::from(BASE32[index]));
    }

    Ok(hash)
}

/// Encodes a [`GeoPoint`].
pub fn encode_point(point: &GeoPoint, precision: usize) -> Result<String> {
    encode(point.latitude, point.longitude, precision)
}

fn decode_cell(geohash: &str) -> Result<Cell> {
    let mut cell = Cell::WORLD;
    let mut is_lon = true;

    for (position, character) in geohash.chars().enumerate() {
        let value = symbol_value(character).ok_or(GeoTrieError::InvalidGeohashCharacter {
            character,
            position,
        })?;

        for shift in (0..BITS_PER_CHAR).rev() {
            let bit = (value >> shift) & 1 == 1;
            cell.narrow(is_lon, bit);
            is_lon = !is_lon;
        }
    }

    Ok(cell)
}

/// Decodes a geohash to the centre of its cell.
///
/// The result approximates the encoded point: it is the midpoint of the
/// final cell, never the original coordinate. An empty geohash decodes to
/// the centre of the world, (0, 0).
///
/// # Examples
///
/// ```
/// use geotrie::compute::geohash::decode;
///
/// let point = decode("u4pruydqqvj")?;
/// assert!((point.latitude - 57.64911).abs() < 1e-4);
/// assert!((point.longitude - 10.40744).abs() < 1e-4);
///
/// assert!(decode("u4prA").is_err());
/// # Ok::<(), geotrie::GeoTrieError>(())
/// ```
pub fn decode(geohash: &str) -> Result<GeoPoint> {
    decode_cell(geohash).map(|cell| cell.center())
}

/// Decodes a geohash to the bounds of its cell (`x` is longitude, `y` latitude).
pub fn decode_bounds(geohash: &str) -> Result<Rect> {
    decode_cell(geohash).map(Cell::to_rect)
}

/// Height and width in degrees, `(latitude, longitude)`, of a cell at `precision`.
pub fn cell_dimensions(precision: usize) -> (f64, f64) {
    let bits = (precision * BITS_PER_CHAR) as i32;
    let lon_bits = (bits + 1) / 2;
    let lat_bits = bits / 2;
    (
        (MAX_LATITUDE - MIN_LATITUDE) / 2f64.powi(lat_bits),
        (MAX_LONGITUDE - MIN_LONGITUDE) / 2f64.powi(lon_bits),
    )
}

/// Longest common prefix of two geohashes.
pub fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .char_indices()
        .zip(b.chars())
        .take_while(|((_, x), y)| x == y)
        .map(|((i, x), _)| i + x.len_utf8())
        .last()
        .unwrap_or(0);
    &a[..len]
}
