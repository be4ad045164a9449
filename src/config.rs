use crate::error::{GeohashError, Result};
use crate::index::constants::{BASE4, BASE16, BASE64, DEFAULT_PRECISION, MAX_BITS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of bits carried by each character of a geohash.
///
/// Each alphabet is ordered so that comparing two codes of the same length
/// byte by byte gives the same result as comparing the integers they encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BitsPerChar {
    /// Alphabet `0123`
    Two,
    /// Alphabet `0123456789abcdef`
    Four,
    /// Alphabet `0-9 @ A-Z _ a-z`
    Six,
}

impl BitsPerChar {
    pub const fn bits(self) -> u32 {
        match self {
            BitsPerChar::Two => 2,
            BitsPerChar::Four => 4,
            BitsPerChar::Six => 6,
        }
    }

    pub(crate) fn alphabet(self) -> &'static [u8] {
        match self {
            BitsPerChar::Two => BASE4,
            BitsPerChar::Four => BASE16,
            BitsPerChar::Six => BASE64,
        }
    }

    /// The smallest symbol of the alphabet, used for left padding.
    pub fn zero_symbol(self) -> char {
        '0'
    }
}

impl TryFrom<u8> for BitsPerChar {
    type Error = GeohashError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            2 => Ok(BitsPerChar::Two),
            4 => Ok(BitsPerChar::Four),
            6 => Ok(BitsPerChar::Six),
            other => Err(GeohashError::invalid(format!(
                "bits_per_char must be one of 2, 4, 6, got {}",
                other
            ))),
        }
    }
}

impl From<BitsPerChar> for u8 {
    fn from(value: BitsPerChar) -> Self {
        value.bits() as u8
    }
}

impl fmt::Display for BitsPerChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// Checks that `precision` characters of `bits_per_char` bits fit in a `u64`.
pub(crate) fn checked_bits(precision: usize, bits_per_char: BitsPerChar) -> Result<u32> {
    let bits = (precision as u64).saturating_mul(u64::from(bits_per_char.bits()));
    if bits > u64::from(MAX_BITS) {
        return Err(GeohashError::Overflow { bits });
    }
    Ok(bits as u32)
}

/// Precision and alphabet of the codes produced by an encoder.
///
/// The configuration is validated on construction, so every operation taking
/// a `GeohashConfig` can rely on `precision > 0` and `bits() <= 64`.
///
/// # Example
/// ```
/// use hilbert_geohash::GeohashConfig;
///
/// # fn main() -> Result<(), hilbert_geohash::GeohashError> {
/// let config = GeohashConfig::new(18, 2)?;
/// assert_eq!(config.bits(), 36);
/// assert_eq!(config.level(), 18);
/// assert_eq!(config.dim(), 1 << 18);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct GeohashConfig {
    precision: usize,
    bits_per_char: BitsPerChar,
}

#[derive(Deserialize)]
struct RawConfig {
    precision: usize,
    bits_per_char: u8,
}

impl TryFrom<RawConfig> for GeohashConfig {
    type Error = GeohashError;

    fn try_from(raw: RawConfig) -> Result<Self> {
        GeohashConfig::new(raw.precision, raw.bits_per_char)
    }
}

impl GeohashConfig {
    pub fn new(precision: usize, bits_per_char: u8) -> Result<Self> {
        let bits_per_char = BitsPerChar::try_from(bits_per_char)?;
        Self::from_parts(precision, bits_per_char)
    }

    pub fn from_parts(precision: usize, bits_per_char: BitsPerChar) -> Result<Self> {
        if precision == 0 {
            return Err(GeohashError::invalid("precision must be positive"));
        }
        checked_bits(precision, bits_per_char)?;
        Ok(Self {
            precision,
            bits_per_char,
        })
    }

    /// Returns a copy using a different precision.
    pub fn with_precision(self, precision: usize) -> Result<Self> {
        Self::from_parts(precision, self.bits_per_char)
    }

    /// Returns a copy using a different alphabet.
    pub fn with_bits_per_char(self, bits_per_char: u8) -> Result<Self> {
        Self::new(self.precision, bits_per_char)
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn bits_per_char(&self) -> BitsPerChar {
        self.bits_per_char
    }

    /// Total number of bits in a code.
    pub fn bits(&self) -> u32 {
        self.precision as u32 * self.bits_per_char.bits()
    }

    /// Hilbert curve level; each level consumes two bits.
    pub fn level(&self) -> u32 {
        self.bits() / 2
    }

    /// Grid resolution per axis, `2^level`.
    pub fn dim(&self) -> u64 {
        1u64 << self.level()
    }
}

impl Default for GeohashConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            bits_per_char: BitsPerChar::Six,
        }
    }
}
