//! # hilbert-geohash
//!
//! Geohashes laid out along a Hilbert curve: nearby codes are nearby places,
//! and codes of the same length sort in curve order.
//!
//! There are currently four main entry points.
//!
//! ### 1. `encode` / `decode_exactly` - Scalar Codec
//!
//! ```
//! use hilbert_geohash::{decode_exactly, encode};
//!
//! # fn main() -> Result<(), hilbert_geohash::GeohashError> {
//! let code = encode(-2.248, 53.481, 10, 6)?;
//! let cell = decode_exactly(&code, 6)?;
//! assert!((cell.lng - -2.248).abs() <= cell.lng_err);
//! assert!((cell.lat - 53.481).abs() <= cell.lat_err);
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. `GeohashCell` - Single Cell Operations
//!
//! ```
//! use hilbert_geohash::{Direction, GeohashCell, GeohashConfig};
//!
//! # fn main() -> Result<(), hilbert_geohash::GeohashError> {
//! let cell = GeohashCell::from_wgs84(&(13.4, 52.5), &GeohashConfig::new(8, 4)?)?;
//! let around = cell.neighbours()?;
//! println!("{} -> east {}", cell.id, around[&Direction::East].id);
//! let feature = cell.to_feature();
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. `encode_batch` / `encode_arrow` - Many Positions At Once
//!
//! ```
//! use hilbert_geohash::{encode, encode_batch};
//!
//! # fn main() -> Result<(), hilbert_geohash::GeohashError> {
//! let codes = encode_batch(&[0.0, 100.0], &[0.0, -20.0], 18, 2)?;
//! assert_eq!(codes[1], encode(100.0, -20.0, 18, 2)?);
//! # Ok(())
//! # }
//! ```
//!
//! ### 4. `CsvToGeohash` - CSV File Conversion
//!
//! ```no_run
//! use hilbert_geohash::{CsvGeohashConfig, CsvToGeohash, GeometryFormat};
//!
//! # fn main() -> Result<(), hilbert_geohash::GeohashError> {
//! let config = CsvGeohashConfig::new("geometry", 10)
//!     .exclude(vec!["Geo Point".into()])
//!     .with_cell_geometry(GeometryFormat::Wkt);
//!
//! "input.csv".to_geohash_csv("output.csv", &config)?;
//! # Ok(())
//! # }
//! ```
//!
//! The Hilbert transform runs on the fastest backend that passes a self test
//! at first use; set `HILBERT_GEOHASH_BACKEND=reference` to force the plain
//! iterative one.

pub mod batch;
pub mod cell;
pub mod config;
pub mod coord;
pub mod error;
pub mod geom;
pub mod index;
pub mod io;

pub use batch::{encode_batch, encode_batch_with};
pub use cell::GeohashCell;
pub use config::{BitsPerChar, GeohashConfig};
pub use coord::Coordinate;
pub use error::{GeohashError, Result};
pub use geom::{
    CellRectangle, hilbert_curve_feature, parse_geojson, parse_geometry, parse_wkt, rectangle,
    rectangle_feature, rectangles_feature_collection,
};
pub use index::{
    CurvePoints, DecodedCell, Direction, HilbertBackend, HilbertCurve, LookupTableBackend,
    ReferenceBackend, backend, backend_for, coord_to_grid, decode, decode_exactly, decode_int,
    encode, encode_int, encode_with, grid_cell, grid_to_coord, hash2xy, hilbert_curve,
    level_error, neighbours, xy2hash,
};
pub use io::{
    CoordinateSource, CsvGeohashConfig, CsvToGeohash, GeohashCellsToArrow, GeometryFormat,
    csv_to_geohash_csv, encode_arrow,
};

pub use geo_types;
pub use geojson;

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::point;

    #[test]
    fn test_end_to_end_workflow() -> Result<()> {
        let (lng, lat) = (-73.9857, 40.7484);
        let code = encode(lng, lat, 10, 6)?;
        assert_eq!(code.len(), 10);

        let cell = decode_exactly(&code, 6)?;
        assert!((cell.lng - lng).abs() <= cell.lng_err);
        assert!((cell.lat - lat).abs() <= cell.lat_err);

        let rect = rectangle(&code, 6)?;
        assert_eq!(rect.ring().len(), 5);

        let around = neighbours(&code, 6)?;
        assert_eq!(around.len(), 8);
        for neighbour in around.values() {
            assert_eq!(neighbour.len(), code.len());
            assert_ne!(neighbour, &code);
        }
        Ok(())
    }

    #[test]
    fn test_origin_is_third_quadrant() -> Result<()> {
        assert_eq!(encode(0.0, 0.0, 1, 2)?, "2");
        assert_eq!(decode("2", 2)?, (90.0, 45.0));
        Ok(())
    }

    #[test]
    fn test_pole_cells_lose_polar_neighbours() -> Result<()> {
        let north = neighbours(&encode(10.0, 90.0, 8, 4)?, 4)?;
        assert_eq!(north.len(), 5);
        assert!(!north.contains_key(&Direction::North));
        assert!(!north.contains_key(&Direction::NorthEast));
        assert!(!north.contains_key(&Direction::NorthWest));

        let south = neighbours(&encode(10.0, -90.0, 8, 4)?, 4)?;
        assert_eq!(south.len(), 5);
        assert!(!south.contains_key(&Direction::South));
        Ok(())
    }

    #[test]
    fn test_codes_sort_in_curve_order() -> Result<()> {
        let mut codes = Vec::new();
        for index in 0..256u64 {
            codes.push(encode_int(index, 4)?);
        }
        let padded: Vec<String> = codes.iter().map(|c| format!("{:0>2}", c)).collect();
        let mut sorted = padded.clone();
        sorted.sort();
        assert_eq!(padded, sorted);
        Ok(())
    }

    #[test]
    fn test_batch_and_arrow_agree_with_scalar() -> Result<()> {
        use arrow_array::Float64Array;

        let lngs = vec![-180.0, -0.1276, 139.6917, 180.0];
        let lats = vec![-90.0, 51.5072, 35.6895, 90.0];
        let config = GeohashConfig::new(16, 4)?;

        let batch = encode_batch_with(&lngs, &lats, &config)?;
        let arrow = encode_arrow(
            &Float64Array::from(lngs.clone()),
            &Float64Array::from(lats.clone()),
            &config,
        )?;
        for i in 0..lngs.len() {
            let scalar = encode_with(lngs[i], lats[i], &config)?;
            assert_eq!(batch[i], scalar);
            assert_eq!(arrow.value(i), scalar);
        }
        Ok(())
    }

    #[test]
    fn test_cell_from_geometry_matches_encode() -> Result<()> {
        let config = GeohashConfig::default();
        let geom = parse_geometry("POINT(2.3522 48.8566)")?;
        let cells = GeohashCell::from_geometry(geom, &config)?;
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].id, encode(2.3522, 48.8566, 10, 6)?);
        assert!(cells[0].contains(&point! { x: 2.3522, y: 48.8566 }));
        Ok(())
    }

    #[test]
    fn test_overflow_policy() {
        assert!(matches!(
            encode(0.0, 0.0, 11, 6),
            Err(GeohashError::Overflow { bits: 66 })
        ));
        assert!(matches!(
            decode("00000000000", 6),
            Err(GeohashError::Overflow { bits: 66 })
        ));
        assert!(encode(0.0, 0.0, 32, 2).is_ok());
    }
}
