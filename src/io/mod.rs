pub mod arrow;
pub mod csv;

pub use arrow::{GeohashCellsToArrow, encode_arrow};
pub use csv::{
    CoordinateSource, CsvGeohashConfig, CsvToGeohash, GeometryFormat, csv_to_geohash_csv,
};
