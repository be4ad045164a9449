use crate::cell::GeohashCell;
use crate::config::GeohashConfig;
use crate::error::{GeohashError, Result};
use crate::geom::parse_geometry;
use crate::index::DEFAULT_PRECISION;
use log::debug;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

enum SourceIndices {
    Geometry(usize),
    Coordinates { lng_idx: usize, lat_idx: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryFormat {
    /// Well-Known Text format (e.g., "POLYGON((...))")
    Wkt,
    /// GeoJSON format
    GeoJson,
}

#[derive(Debug, Clone)]
pub enum CoordinateSource {
    /// A single column containing WKT or GeoJSON geometry
    GeometryColumn(String),
    /// Separate longitude and latitude columns in WGS84 degrees
    CoordinateColumns {
        lng_column: String,
        lat_column: String,
    },
}

#[derive(Debug, Clone)]
pub struct CsvGeohashConfig {
    pub source: CoordinateSource,
    pub exclude_columns: Vec<String>,
    pub precision: usize,
    pub bits_per_char: u8,
    pub include_cell_geometry: Option<GeometryFormat>,
}

impl CsvGeohashConfig {
    /// Create config for a CSV with a geometry column (WKT or GeoJSON).
    ///
    /// # Example
    /// ```
    /// use hilbert_geohash::CsvGeohashConfig;
    ///
    /// let config = CsvGeohashConfig::new("geometry", 10);
    /// ```
    pub fn new(geometry_column: impl Into<String>, precision: usize) -> Self {
        Self {
            source: CoordinateSource::GeometryColumn(geometry_column.into()),
            exclude_columns: Vec::new(),
            precision,
            bits_per_char: 6,
            include_cell_geometry: None,
        }
    }

    /// Create config for a CSV with separate longitude/latitude columns.
    ///
    /// # Example
    /// ```
    /// use hilbert_geohash::CsvGeohashConfig;
    ///
    /// let config = CsvGeohashConfig::from_coords("Longitude", "Latitude", 16)
    ///     .bits_per_char(4);
    /// ```
    pub fn from_coords(
        lng_column: impl Into<String>,
        lat_column: impl Into<String>,
        precision: usize,
    ) -> Self {
        Self {
            source: CoordinateSource::CoordinateColumns {
                lng_column: lng_column.into(),
                lat_column: lat_column.into(),
            },
            exclude_columns: Vec::new(),
            precision,
            bits_per_char: 6,
            include_cell_geometry: None,
        }
    }

    pub fn exclude(mut self, columns: Vec<String>) -> Self {
        self.exclude_columns = columns;
        self
    }

    pub fn bits_per_char(mut self, bits_per_char: u8) -> Self {
        self.bits_per_char = bits_per_char;
        self
    }

    // Include the cell rectangle in the output.
    pub fn with_cell_geometry(mut self, format: GeometryFormat) -> Self {
        self.include_cell_geometry = Some(format);
        self
    }

    fn geohash_config(&self) -> Result<GeohashConfig> {
        GeohashConfig::new(self.precision, self.bits_per_char)
    }
}

impl Default for CsvGeohashConfig {
    fn default() -> Self {
        Self::new("geometry", DEFAULT_PRECISION)
    }
}

pub trait CsvToGeohash {
    fn to_geohash_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvGeohashConfig,
    ) -> Result<()>;
}

impl<P: AsRef<Path>> CsvToGeohash for P {
    fn to_geohash_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvGeohashConfig,
    ) -> Result<()> {
        csv_to_geohash_csv(self, output_path, config)
    }
}

fn polygon_to_wkt(polygon: &geo_types::Polygon<f64>) -> String {
    use wkt::ToWkt;
    polygon.wkt_string()
}

fn polygon_to_geojson(polygon: &geo_types::Polygon<f64>) -> String {
    let geom = geojson::Geometry::new(geojson::Value::from(polygon));
    geom.to_string()
}

fn column_index(headers: &csv::StringRecord, name: &str, role: &str) -> Result<usize> {
    if name.is_empty() {
        return Err(GeohashError::CsvError(format!(
            "{} column name cannot be empty",
            role
        )));
    }
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| GeohashError::CsvError(format!("{} column '{}' not found", role, name)))
}

fn parse_degrees(record: &csv::StringRecord, idx: usize, role: &str) -> Result<f64> {
    let raw = record
        .get(idx)
        .ok_or_else(|| GeohashError::CsvError(format!("Missing {} column at index {}", role, idx)))?
        .trim();
    raw.parse()
        .map_err(|_| GeohashError::CsvError(format!("Invalid {}: '{}'", role, raw)))
}

/// Converts a CSV file with geometry or coordinate columns to a CSV file with geohashes.
///
/// Each input record is encoded on its own and written straight away, so
/// large files are streamed. A geometry column may hold several cells (lines,
/// collections); one output row is written per cell. The output columns are
/// `geohash`, then `cell_geometry` if requested, then every input column that
/// is neither a source column nor excluded.
///
/// # Example with geometry column (WKT or GeoJSON)
///
/// ```no_run
/// use hilbert_geohash::{CsvGeohashConfig, csv_to_geohash_csv};
///
/// # fn main() -> Result<(), hilbert_geohash::GeohashError> {
/// let config = CsvGeohashConfig::new("Geo Shape", 10)
///     .exclude(vec!["Geo Point".into()]);
///
/// csv_to_geohash_csv("input.csv", "output.csv", &config)?;
/// # Ok(())
/// # }
/// ```
///
/// # Example with coordinate columns
///
/// ```no_run
/// use hilbert_geohash::{CsvGeohashConfig, GeometryFormat, csv_to_geohash_csv};
///
/// # fn main() -> Result<(), hilbert_geohash::GeohashError> {
/// let config = CsvGeohashConfig::from_coords("Longitude", "Latitude", 18)
///     .bits_per_char(2)
///     .with_cell_geometry(GeometryFormat::Wkt);
///
/// csv_to_geohash_csv("bus_stops.csv", "output.csv", &config)?;
/// # Ok(())
/// # }
/// ```
pub fn csv_to_geohash_csv(
    csv_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &CsvGeohashConfig,
) -> Result<()> {
    let geohash_config = config.geohash_config()?;

    let file = File::open(csv_path).map_err(|e| GeohashError::CsvError(e.to_string()))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| GeohashError::CsvError(e.to_string()))?
        .clone();

    // Source columns never reach the output.
    let (source_indices, mut exclude_indices) = match &config.source {
        CoordinateSource::GeometryColumn(col) => {
            let idx = column_index(&headers, col, "Geometry")?;
            (SourceIndices::Geometry(idx), HashSet::from([idx]))
        }
        CoordinateSource::CoordinateColumns {
            lng_column,
            lat_column,
        } => {
            let lng_idx = column_index(&headers, lng_column, "Longitude")?;
            let lat_idx = column_index(&headers, lat_column, "Latitude")?;
            (
                SourceIndices::Coordinates { lng_idx, lat_idx },
                HashSet::from([lng_idx, lat_idx]),
            )
        }
    };

    for col_name in &config.exclude_columns {
        if let Some(idx) = headers.iter().position(|h| h == col_name) {
            exclude_indices.insert(idx);
        }
    }

    let out_file = File::create(output_path).map_err(|e| GeohashError::IoError(e.to_string()))?;
    let mut writer = csv::Writer::from_writer(out_file);

    let mut header_row: Vec<&str> = vec!["geohash"];
    if config.include_cell_geometry.is_some() {
        header_row.push("cell_geometry");
    }
    for (i, h) in headers.iter().enumerate() {
        if !exclude_indices.contains(&i) {
            header_row.push(h);
        }
    }
    writer
        .write_record(&header_row)
        .map_err(|e| GeohashError::CsvError(e.to_string()))?;

    let (mut rows_read, mut rows_written) = (0usize, 0usize);
    for result in reader.records() {
        let record = result.map_err(|e| GeohashError::CsvError(e.to_string()))?;
        rows_read += 1;

        let cells = match &source_indices {
            SourceIndices::Geometry(idx) => {
                let geom_str = record.get(*idx).ok_or_else(|| {
                    GeohashError::CsvError(format!("Missing geometry column at index {}", idx))
                })?;
                let geom = parse_geometry(geom_str)?;
                GeohashCell::from_geometry(geom, &geohash_config)?
            }
            SourceIndices::Coordinates { lng_idx, lat_idx } => {
                let lng = parse_degrees(&record, *lng_idx, "longitude")?;
                let lat = parse_degrees(&record, *lat_idx, "latitude")?;
                vec![GeohashCell::from_wgs84(&(lng, lat), &geohash_config)?]
            }
        };

        for cell in cells {
            let mut row: Vec<String> = vec![cell.id.clone()];

            if let Some(format) = config.include_cell_geometry {
                let polygon = cell.to_polygon();
                let geom_str = match format {
                    GeometryFormat::Wkt => polygon_to_wkt(&polygon),
                    GeometryFormat::GeoJson => polygon_to_geojson(&polygon),
                };
                row.push(geom_str);
            }

            for (i, field) in record.iter().enumerate() {
                if !exclude_indices.contains(&i) {
                    row.push(field.to_string());
                }
            }
            writer
                .write_record(&row)
                .map_err(|e| GeohashError::CsvError(e.to_string()))?;
            rows_written += 1;
        }
    }

    writer
        .flush()
        .map_err(|e| GeohashError::IoError(e.to_string()))?;

    debug!(
        "csv conversion read {} rows, wrote {} rows at precision {} ({} bits/char)",
        rows_read,
        rows_written,
        geohash_config.precision(),
        geohash_config.bits_per_char()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::encode;
    use std::io::Write;
    use tempfile::tempdir;

    fn io_err(e: std::io::Error) -> GeohashError {
        GeohashError::IoError(e.to_string())
    }

    fn read_rows(path: &Path) -> Result<Vec<csv::StringRecord>> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| GeohashError::CsvError(e.to_string()))?;
        let mut rows = vec![reader
            .headers()
            .map_err(|e| GeohashError::CsvError(e.to_string()))?
            .clone()];
        for record in reader.records() {
            rows.push(record.map_err(|e| GeohashError::CsvError(e.to_string()))?);
        }
        Ok(rows)
    }

    #[test]
    fn test_csv_geojson_geometry_column() -> Result<()> {
        let dir = tempdir().map_err(io_err)?;
        let csv_path = dir.path().join("test.csv");
        let output_path = dir.path().join("output.csv");

        let mut file = File::create(&csv_path).map_err(io_err)?;
        writeln!(file, "ASSET_ID,TYPE,geometry").map_err(io_err)?;
        writeln!(
            file,
            "CDT123,Pipe,\"{{\"\"type\"\":\"\"Point\"\",\"\"coordinates\"\":[-0.1,51.5]}}\""
        )
        .map_err(io_err)?;

        let config = CsvGeohashConfig::new("geometry", 10);
        csv_to_geohash_csv(&csv_path, &output_path, &config)?;

        let rows = read_rows(&output_path)?;
        assert_eq!(&rows[0], vec!["geohash", "ASSET_ID", "TYPE"]);
        assert_eq!(rows[1][0], encode(-0.1, 51.5, 10, 6)?);
        assert_eq!(&rows[1][1], "CDT123");
        Ok(())
    }

    #[test]
    fn test_csv_wkt_linestring_writes_one_row_per_cell() -> Result<()> {
        let dir = tempdir().map_err(io_err)?;
        let csv_path = dir.path().join("test.csv");
        let output_path = dir.path().join("output.csv");

        let mut file = File::create(&csv_path).map_err(io_err)?;
        writeln!(file, "ID,geometry").map_err(io_err)?;
        writeln!(file, "road,\"LINESTRING(-179 1, 179 1)\"").map_err(io_err)?;

        let config = CsvGeohashConfig::new("geometry", 4).bits_per_char(2);
        csv_path.to_geohash_csv(&output_path, &config)?;

        let rows = read_rows(&output_path)?;
        assert_eq!(rows.len(), 17);
        assert!(rows[1..].iter().all(|r| &r[1] == "road"));
        Ok(())
    }

    #[test]
    fn test_csv_geojson_feature_collection_cell() -> Result<()> {
        let dir = tempdir().map_err(io_err)?;
        let csv_path = dir.path().join("test.csv");
        let output_path = dir.path().join("output.csv");

        let collection = r#"{""type"":""FeatureCollection"",""features"":[{""type"":""Feature"",""properties"":{},""geometry"":{""type"":""Point"",""coordinates"":[-2.58,51.45]}},{""type"":""Feature"",""properties"":{},""geometry"":{""type"":""Point"",""coordinates"":[-2.59,51.46]}}]}"#;
        let mut file = File::create(&csv_path).map_err(io_err)?;
        writeln!(file, "ID,geometry").map_err(io_err)?;
        writeln!(file, "stops,\"{}\"", collection).map_err(io_err)?;

        let config = CsvGeohashConfig::new("geometry", 10);
        csv_path.to_geohash_csv(&output_path, &config)?;

        let rows = read_rows(&output_path)?;
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[1][0], encode(-2.58, 51.45, 10, 6)?.as_str());
        assert_eq!(&rows[2][0], encode(-2.59, 51.46, 10, 6)?.as_str());
        assert!(rows[1..].iter().all(|r| &r[1] == "stops"));
        Ok(())
    }

    #[test]
    fn test_csv_from_coords() -> Result<()> {
        let dir = tempdir().map_err(io_err)?;
        let csv_path = dir.path().join("test.csv");
        let output_path = dir.path().join("output.csv");

        let mut file = File::create(&csv_path).map_err(io_err)?;
        writeln!(file, "StopCode,Name,Longitude,Latitude").map_err(io_err)?;
        writeln!(file, "ABC123,Temple Meads,-2.58302,51.44827").map_err(io_err)?;
        writeln!(file, "DEF456,Castle Park,-2.5880, 51.4560").map_err(io_err)?;

        let config = CsvGeohashConfig::from_coords("Longitude", "Latitude", 16).bits_per_char(4);
        csv_to_geohash_csv(&csv_path, &output_path, &config)?;

        let output = std::fs::read_to_string(&output_path).map_err(io_err)?;
        assert!(output.starts_with("geohash,StopCode,Name"));
        assert!(!output.contains("Longitude"));
        assert!(!output.contains("Latitude"));
        assert!(output.contains(&encode(-2.58302, 51.44827, 16, 4)?));
        assert!(output.contains(&encode(-2.5880, 51.4560, 16, 4)?));
        Ok(())
    }

    #[test]
    fn test_csv_with_cell_geometry_and_exclude() -> Result<()> {
        let dir = tempdir().map_err(io_err)?;
        let csv_path = dir.path().join("test.csv");
        let output_path = dir.path().join("output.csv");

        let mut file = File::create(&csv_path).map_err(io_err)?;
        writeln!(file, "ID,Note,lng,lat").map_err(io_err)?;
        writeln!(file, "1,drop me,10.0,10.0").map_err(io_err)?;

        let config = CsvGeohashConfig::from_coords("lng", "lat", 1)
            .bits_per_char(2)
            .exclude(vec!["Note".into()])
            .with_cell_geometry(GeometryFormat::Wkt);
        csv_to_geohash_csv(&csv_path, &output_path, &config)?;

        let rows = read_rows(&output_path)?;
        assert_eq!(&rows[0], vec!["geohash", "cell_geometry", "ID"]);
        assert_eq!(&rows[1][0], "2");
        assert!(rows[1][1].starts_with("POLYGON"));
        assert_eq!(&rows[1][2], "1");
        Ok(())
    }

    #[test]
    fn test_csv_geojson_cell_geometry() -> Result<()> {
        let dir = tempdir().map_err(io_err)?;
        let csv_path = dir.path().join("test.csv");
        let output_path = dir.path().join("output.csv");

        let mut file = File::create(&csv_path).map_err(io_err)?;
        writeln!(file, "ID,geometry").map_err(io_err)?;
        writeln!(file, "1,POINT(10 10)").map_err(io_err)?;

        let config = CsvGeohashConfig::new("geometry", 3).with_cell_geometry(GeometryFormat::GeoJson);
        csv_to_geohash_csv(&csv_path, &output_path, &config)?;

        let rows = read_rows(&output_path)?;
        assert!(rows[1][1].contains("\"Polygon\""));
        Ok(())
    }

    #[test]
    fn test_csv_errors() -> Result<()> {
        let dir = tempdir().map_err(io_err)?;
        let csv_path = dir.path().join("test.csv");
        let output_path = dir.path().join("output.csv");

        let mut file = File::create(&csv_path).map_err(io_err)?;
        writeln!(file, "ID,lng,lat").map_err(io_err)?;
        writeln!(file, "1,200.0,10.0").map_err(io_err)?;

        let missing = CsvGeohashConfig::new("geometry", 5);
        assert!(matches!(
            csv_to_geohash_csv(&csv_path, &output_path, &missing),
            Err(GeohashError::CsvError(_))
        ));

        let out_of_range = CsvGeohashConfig::from_coords("lng", "lat", 5);
        assert!(matches!(
            csv_to_geohash_csv(&csv_path, &output_path, &out_of_range),
            Err(GeohashError::InvalidArgument(_))
        ));

        let overflow = CsvGeohashConfig::from_coords("lng", "lat", 11);
        assert!(matches!(
            csv_to_geohash_csv(&csv_path, &output_path, &overflow),
            Err(GeohashError::Overflow { bits: 66 })
        ));
        Ok(())
    }
}
