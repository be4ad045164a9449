/// Longitude interval `[min, max]` in WGS84 degrees
pub const LNG_INTERVAL: (f64, f64) = (-180.0, 180.0);

/// Latitude interval `[min, max]` in WGS84 degrees
pub const LAT_INTERVAL: (f64, f64) = (-90.0, 90.0);

/// Widest code supported, in bits (`precision * bits_per_char`)
pub const MAX_BITS: u32 = 64;

/// Default number of characters in a geohash
pub const DEFAULT_PRECISION: usize = 10;

/// Most grid cells a single line or polygon may cover. Larger geometries are
/// rejected before any cell is encoded.
pub const MAX_COVER_CELLS: u64 = 1 << 20;

/// 2 bits per character
pub(crate) const BASE4: &[u8; 4] = b"0123";

/// 4 bits per character
pub(crate) const BASE16: &[u8; 16] = b"0123456789abcdef";

/// 6 bits per character, in ASCII order so that byte order matches numeric order:
/// digits (0x30-0x39), `@` (0x40), upper case (0x41-0x5A), `_` (0x5F), lower case (0x61-0x7A).
pub(crate) const BASE64: &[u8; 64] =
    b"0123456789@ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

/// Environment variable forcing a Hilbert backend (`reference` or `lookup`)
pub const BACKEND_ENV_VAR: &str = "HILBERT_GEOHASH_BACKEND";
