use crate::config::{BitsPerChar, GeohashConfig};
use crate::error::Result;
use crate::index::constants::{LAT_INTERVAL, LNG_INTERVAL};
use crate::index::geohash::{decode_exactly_with, encode_with};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Compass direction of a neighbouring cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::NorthEast => "north-east",
            Direction::East => "east",
            Direction::SouthEast => "south-east",
            Direction::South => "south",
            Direction::SouthWest => "south-west",
            Direction::West => "west",
            Direction::NorthWest => "north-west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Geohashes of the cells around `code`, keyed by direction.
///
/// East and west wrap around the antimeridian and are always present. If the
/// cell touches the north pole, `north`, `north-east` and `north-west` are
/// left out; likewise the three southern keys at the south pole.
///
/// # Example
/// ```
/// use hilbert_geohash::{Direction, encode, neighbours};
///
/// # fn main() -> Result<(), hilbert_geohash::GeohashError> {
/// let code = encode(0.0, 90.0, 6, 4)?;
/// let around = neighbours(&code, 4)?;
/// assert!(around.contains_key(&Direction::East));
/// assert!(!around.contains_key(&Direction::North));
/// # Ok(())
/// # }
/// ```
pub fn neighbours(code: &str, bits_per_char: u8) -> Result<BTreeMap<Direction, String>> {
    neighbours_with(code, BitsPerChar::try_from(bits_per_char)?)
}

pub(crate) fn neighbours_with(
    code: &str,
    bits_per_char: BitsPerChar,
) -> Result<BTreeMap<Direction, String>> {
    let config = GeohashConfig::from_parts(code.len(), bits_per_char)?;
    let cell = decode_exactly_with(code, bits_per_char)?;
    let (lng, lat) = (cell.lng, cell.lat);

    let north = lat + 2.0 * cell.lat_err;
    let south = lat - 2.0 * cell.lat_err;

    let mut east = lng + 2.0 * cell.lng_err;
    if east > LNG_INTERVAL.1 {
        east -= LNG_INTERVAL.1 - LNG_INTERVAL.0;
    }
    let mut west = lng - 2.0 * cell.lng_err;
    if west < LNG_INTERVAL.0 {
        west += LNG_INTERVAL.1 - LNG_INTERVAL.0;
    }

    let mut result = BTreeMap::new();
    result.insert(Direction::East, encode_with(east, lat, &config)?);
    result.insert(Direction::West, encode_with(west, lat, &config)?);

    if north <= LAT_INTERVAL.1 {
        result.insert(Direction::North, encode_with(lng, north, &config)?);
        result.insert(Direction::NorthEast, encode_with(east, north, &config)?);
        result.insert(Direction::NorthWest, encode_with(west, north, &config)?);
    }

    if south >= LAT_INTERVAL.0 {
        result.insert(Direction::South, encode_with(lng, south, &config)?);
        result.insert(Direction::SouthEast, encode_with(east, south, &config)?);
        result.insert(Direction::SouthWest, encode_with(west, south, &config)?);
    }

    Ok(result)
}
