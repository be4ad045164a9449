use crate::config::{BitsPerChar, GeohashConfig, checked_bits};
use crate::error::Result;
use crate::index::alphabet::{decode_int_with, encode_padded};
use crate::index::backend::backend_for;
use crate::index::grid::{coord_to_grid, grid_to_coord, validate_wgs84};
use crate::index::margin::level_error;
use serde::{Deserialize, Serialize};

/// The cell a geohash stands for: its center and half-widths in degrees.
///
/// Every position within `lng ± lng_err`, `lat ± lat_err` encodes to the
/// same code at the same precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecodedCell {
    pub lng: f64,
    pub lat: f64,
    pub lng_err: f64,
    pub lat_err: f64,
}

impl DecodedCell {
    /// `(lng, lat, lng_err, lat_err)`
    pub fn into_tuple(self) -> (f64, f64, f64, f64) {
        (self.lng, self.lat, self.lng_err, self.lat_err)
    }

    /// `(min_lng, min_lat, max_lng, max_lat)`
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (
            self.lng - self.lng_err,
            self.lat - self.lat_err,
            self.lng + self.lng_err,
            self.lat + self.lat_err,
        )
    }
}

/// Encodes a WGS84 position as a geohash on a Hilbert curve.
///
/// The code is `precision` characters long and carries
/// `precision * bits_per_char` bits, i.e. a curve of level
/// `precision * bits_per_char / 2`.
///
/// # Example
/// ```
/// use hilbert_geohash::encode;
///
/// # fn main() -> Result<(), hilbert_geohash::GeohashError> {
/// let code = encode(-2.248, 53.481, 10, 6)?;
/// assert_eq!(code.len(), 10);
/// assert_eq!(encode(0.0, 0.0, 1, 2)?, "2");
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// - [`GeohashError::InvalidArgument`](crate::GeohashError::InvalidArgument) -
///   position out of range, `precision == 0` or `bits_per_char` not in {2, 4, 6}
/// - [`GeohashError::Overflow`](crate::GeohashError::Overflow) - more than 64 bits requested
pub fn encode(lng: f64, lat: f64, precision: usize, bits_per_char: u8) -> Result<String> {
    let config = GeohashConfig::new(precision, bits_per_char)?;
    encode_with(lng, lat, &config)
}

/// Same as [`encode`] with an already validated configuration.
pub fn encode_with(lng: f64, lat: f64, config: &GeohashConfig) -> Result<String> {
    validate_wgs84(lng, lat)?;
    encode_validated(lng, lat, config)
}

/// Encodes a position that has already been range checked.
pub(crate) fn encode_validated(lng: f64, lat: f64, config: &GeohashConfig) -> Result<String> {
    let (x, y) = coord_to_grid(lng, lat, config.dim())?;
    Ok(code_at_grid(x, y, config))
}

/// Geohash of grid cell `(x, y)`; both must be below `config.dim()`.
fn code_at_grid(x: u64, y: u64, config: &GeohashConfig) -> String {
    let index = backend_for(config.bits()).xy2hash(x, y, config.dim());
    encode_padded(index, config.precision(), config.bits_per_char())
}

/// Geohash and cell of grid cell `(x, y)`, without going through a position.
pub(crate) fn cell_at_grid(x: u64, y: u64, config: &GeohashConfig) -> Result<(String, DecodedCell)> {
    let (lng, lat) = grid_to_coord(x, y, config.dim())?;
    let (lng_err, lat_err) = level_error(config.level());
    let cell = DecodedCell {
        lng: lng + lng_err,
        lat: lat + lat_err,
        lng_err,
        lat_err,
    };
    Ok((code_at_grid(x, y, config), cell))
}

/// Decodes a geohash to the center `(lng, lat)` of its cell.
///
/// The empty code decodes to `(0, 0)`.
pub fn decode(code: &str, bits_per_char: u8) -> Result<(f64, f64)> {
    let cell = decode_exactly(code, bits_per_char)?;
    Ok((cell.lng, cell.lat))
}

/// Decodes a geohash to its cell center together with the half-widths of the cell.
///
/// The precision is taken from the length of `code`; codes of different
/// `bits_per_char` must not be mixed.
///
/// # Example
/// ```
/// use hilbert_geohash::decode_exactly;
///
/// # fn main() -> Result<(), hilbert_geohash::GeohashError> {
/// let cell = decode_exactly("2", 2)?;
/// assert_eq!((cell.lng, cell.lat), (90.0, 45.0));
/// assert_eq!((cell.lng_err, cell.lat_err), (90.0, 45.0));
/// # Ok(())
/// # }
/// ```
pub fn decode_exactly(code: &str, bits_per_char: u8) -> Result<DecodedCell> {
    decode_exactly_with(code, BitsPerChar::try_from(bits_per_char)?)
}

pub(crate) fn decode_exactly_with(code: &str, bits_per_char: BitsPerChar) -> Result<DecodedCell> {
    let bits = checked_bits(code.len(), bits_per_char)?;
    let index = decode_int_with(code, bits_per_char)?;
    cell_at_index(index, bits)
}

/// Cell visited at `index` of the curve carrying `bits` bits (`bits <= 64`, even).
pub(crate) fn cell_at_index(index: u64, bits: u32) -> Result<DecodedCell> {
    let level = bits / 2;
    let dim = 1u64 << level;

    let (x, y) = backend_for(bits).hash2xy(index, dim)?;
    let (lng, lat) = grid_to_coord(x, y, dim)?;
    let (lng_err, lat_err) = level_error(level);

    Ok(DecodedCell {
        lng: lng + lng_err,
        lat: lat + lat_err,
        lng_err,
        lat_err,
    })
}

/// Grid cell `(x, y)` of a position, exposed for callers that index grids directly.
pub fn grid_cell(lng: f64, lat: f64, config: &GeohashConfig) -> Result<(u64, u64)> {
    validate_wgs84(lng, lat)?;
    coord_to_grid(lng, lat, config.dim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeohashError;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_origin_level_one() -> Result<()> {
        // (0, 0) lands on the midpoint of both axes, i.e. cell (1, 1), which is
        // the third cell of the level 1 curve.
        let config = GeohashConfig::new(1, 2)?;
        assert_eq!(grid_cell(0.0, 0.0, &config)?, (1, 1));
        assert_eq!(encode(0.0, 0.0, 1, 2)?, "2");
        Ok(())
    }

    #[test]
    fn test_level_one_quadrants() -> Result<()> {
        assert_eq!(encode(-90.0, -45.0, 1, 2)?, "0");
        assert_eq!(encode(-90.0, 45.0, 1, 2)?, "1");
        assert_eq!(encode(90.0, 45.0, 1, 2)?, "2");
        assert_eq!(encode(90.0, -45.0, 1, 2)?, "3");
        Ok(())
    }

    #[test]
    fn test_codes_are_padded() -> Result<()> {
        let code = encode(-180.0, -90.0, 12, 4)?;
        assert_eq!(code, "000000000000");
        let code = encode(180.0, -90.0, 5, 6)?;
        assert_eq!(code, "zzzzz");
        Ok(())
    }

    #[test]
    fn test_decode_known_cells() -> Result<()> {
        assert_eq!(decode("0", 2)?, (-90.0, -45.0));
        assert_eq!(decode("3", 2)?, (90.0, -45.0));
        let cell = decode_exactly("32", 2)?;
        // level 2, index 14 -> grid (2, 0)
        assert_eq!(cell.into_tuple(), (45.0, -67.5, 45.0, 22.5));
        Ok(())
    }

    #[test]
    fn test_empty_code_is_whole_globe() -> Result<()> {
        assert_eq!(decode_exactly("", 6)?.into_tuple(), (0.0, 0.0, 180.0, 90.0));
        assert_eq!(decode("", 2)?, (0.0, 0.0));
        Ok(())
    }

    #[test]
    fn test_encode_validation() {
        assert!(matches!(
            encode(180.5, 0.0, 5, 6),
            Err(GeohashError::InvalidArgument(_))
        ));
        assert!(matches!(
            encode(0.0, -91.0, 5, 6),
            Err(GeohashError::InvalidArgument(_))
        ));
        assert!(matches!(
            encode(0.0, 0.0, 0, 6),
            Err(GeohashError::InvalidArgument(_))
        ));
        assert!(matches!(
            encode(0.0, 0.0, 5, 3),
            Err(GeohashError::InvalidArgument(_))
        ));
        assert!(matches!(
            encode(0.0, 0.0, 17, 4),
            Err(GeohashError::Overflow { bits: 68 })
        ));
        assert!(encode(f64::NAN, 0.0, 5, 6).is_err());
    }

    #[test]
    fn test_decode_validation() {
        assert!(matches!(
            decode_exactly("0x", 4),
            Err(GeohashError::InvalidArgument(_))
        ));
        assert!(matches!(
            decode_exactly("00000000000", 6),
            Err(GeohashError::Overflow { .. })
        ));
        assert!(decode_exactly("0", 5).is_err());
    }

    #[test]
    fn test_full_width_round_trip() -> Result<()> {
        let (lng, lat) = (-2.2479699500757597, 53.48082746395233);
        for (precision, bpc) in [(32, 2), (16, 4), (10, 6)] {
            let code = encode(lng, lat, precision, bpc)?;
            assert_eq!(code.len(), precision);
            let cell = decode_exactly(&code, bpc)?;
            assert!((cell.lng - lng).abs() <= cell.lng_err);
            assert!((cell.lat - lat).abs() <= cell.lat_err);
        }
        Ok(())
    }

    #[test]
    fn test_error_halves_with_precision() -> Result<()> {
        let coarse = decode_exactly(&encode(10.0, 10.0, 3, 2)?, 2)?;
        let fine = decode_exactly(&encode(10.0, 10.0, 4, 2)?, 2)?;
        assert_eq!(fine.lng_err, coarse.lng_err / 2.0);
        assert_eq!(fine.lat_err, coarse.lat_err / 2.0);
        Ok(())
    }

    #[test]
    fn test_decode_then_encode_is_stable() -> Result<()> {
        let code = encode(151.2093, -33.8688, 8, 6)?;
        let (lng, lat) = decode(&code, 6)?;
        assert_eq!(encode(lng, lat, 8, 6)?, code);
        Ok(())
    }

    #[test]
    fn test_cell_at_grid_matches_decode() -> Result<()> {
        let config = GeohashConfig::new(5, 4)?;
        for &(x, y) in &[(0, 0), (1023, 1023), (512, 7), (3, 900)] {
            let (code, cell) = cell_at_grid(x, y, &config)?;
            assert_eq!(decode_exactly(&code, 4)?, cell);
            assert_eq!(grid_cell(cell.lng, cell.lat, &config)?, (x, y));
        }
        assert!(cell_at_grid(1024, 0, &config).is_err());
        Ok(())
    }

    #[quickcheck]
    fn test_round_trip_containment(lng: f64, lat: f64, precision: u8, bpc_pick: u8) -> TestResult {
        if !lng.is_finite() || !lat.is_finite() {
            return TestResult::discard();
        }
        let lng = lng % 180.0;
        let lat = lat % 90.0;
        let bpc = [2u8, 4, 6][bpc_pick as usize % 3];
        let precision = 1 + precision as usize % (64 / bpc as usize);

        let cell = match encode(lng, lat, precision, bpc).and_then(|c| decode_exactly(&c, bpc)) {
            Ok(cell) => cell,
            Err(_) => return TestResult::failed(),
        };
        let lower_lng = cell.lng - cell.lng_err;
        let lower_lat = cell.lat - cell.lat_err;
        TestResult::from_bool(
            (lng - lower_lng).abs() <= 2.0 * cell.lng_err
                && (lat - lower_lat).abs() <= 2.0 * cell.lat_err,
        )
    }
}
