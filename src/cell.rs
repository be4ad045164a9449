use crate::config::{BitsPerChar, GeohashConfig};
use crate::coord::Coordinate;
use crate::error::{GeohashError, Result};
use crate::geom::{CellRectangle, cell_feature};
use crate::index::{
    DecodedCell, Direction, GridWalk, MAX_COVER_CELLS, cell_at_grid, coord_to_grid,
    decode_exactly_with, encode_with, grid_to_coord, level_error, neighbours_with, validate_wgs84,
};
use crate::io::arrow::GeohashCellsToArrow;
use arrow_array::RecordBatch;
use geo::{BoundingRect, Contains, InteriorPoint};
use geo_types::{Coord, Geometry, LineString, Point, Polygon, Rect, coord};
use std::collections::{BTreeMap, HashSet};

fn check_cover_size(cells: u64) -> Result<()> {
    if cells > MAX_COVER_CELLS {
        return Err(GeohashError::invalid(format!(
            "geometry spans {} cells at this precision, more than the limit of {}",
            cells, MAX_COVER_CELLS
        )));
    }
    Ok(())
}

/// A single cell of the Hilbert geohash grid.
///
/// Each `GeohashCell` is one rectangle of the `2^level x 2^level` grid laid
/// over the globe, identified by its geohash.
///
/// # Example
///
/// ```
/// use hilbert_geohash::{GeohashCell, GeohashConfig};
///
/// # fn main() -> Result<(), hilbert_geohash::GeohashError> {
/// let config = GeohashConfig::new(8, 4)?;
/// let cell = GeohashCell::from_wgs84(&(-2.248, 53.481), &config)?;
/// println!("Cell ID: {}", cell.id);
/// println!("Center: ({}, {})", cell.lng(), cell.lat());
///
/// let polygon = cell.to_polygon();
/// assert_eq!(polygon.exterior().0.len(), 5);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GeohashCell {
    /// Geohash of the cell
    pub id: String,
    /// Center of the cell in WGS84 degrees
    pub center: Point<f64>,
    /// Half the cell width in degrees of longitude
    pub lng_err: f64,
    /// Half the cell height in degrees of latitude
    pub lat_err: f64,
    /// Length of `id` in characters
    pub precision: usize,
    pub bits_per_char: BitsPerChar,
}

impl GeohashCell {
    fn from_decoded(id: String, cell: DecodedCell, bits_per_char: BitsPerChar) -> Self {
        Self {
            precision: id.len(),
            id,
            center: Point::new(cell.lng, cell.lat),
            lng_err: cell.lng_err,
            lat_err: cell.lat_err,
            bits_per_char,
        }
    }

    /// Create a GeohashCell from an existing geohash
    ///
    /// # Example
    /// ```
    /// use hilbert_geohash::{GeohashCell, GeohashConfig};
    ///
    /// # fn main() -> Result<(), hilbert_geohash::GeohashError> {
    /// let cell = GeohashCell::from_wgs84(&(151.2, -33.9), &GeohashConfig::default())?;
    /// let restored = GeohashCell::from_geohash(&cell.id, 6)?;
    /// assert_eq!(cell, restored);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_geohash(code: &str, bits_per_char: u8) -> Result<Self> {
        let bits_per_char = BitsPerChar::try_from(bits_per_char)?;
        let cell = decode_exactly_with(code, bits_per_char)?;
        Ok(Self::from_decoded(code.to_string(), cell, bits_per_char))
    }

    /// Create a GeohashCell from WGS84 (lng/lat) coordinates
    ///
    /// # Example
    /// ```
    /// use hilbert_geohash::{GeohashCell, GeohashConfig};
    /// use geo_types::Point;
    ///
    /// # fn main() -> Result<(), hilbert_geohash::GeohashError> {
    /// let config = GeohashConfig::new(12, 4)?;
    /// // From tuple
    /// let cell = GeohashCell::from_wgs84(&(-0.1276, 51.5072), &config)?;
    /// // From Point
    /// let same = GeohashCell::from_wgs84(&Point::new(-0.1276, 51.5072), &config)?;
    /// assert_eq!(cell.id, same.id);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_wgs84(coord: &impl Coordinate, config: &GeohashConfig) -> Result<Self> {
        let id = encode_with(coord.lng(), coord.lat(), config)?;
        let cell = decode_exactly_with(&id, config.bits_per_char())?;
        Ok(Self::from_decoded(id, cell, config.bits_per_char()))
    }

    fn from_grid(x: u64, y: u64, config: &GeohashConfig) -> Result<Self> {
        let (id, cell) = cell_at_grid(x, y, config)?;
        Ok(Self::from_decoded(id, cell, config.bits_per_char()))
    }

    /// Create GeohashCells along a LineString in WGS84 coordinates.
    ///
    /// Walks the grid one cell boundary at a time and returns each cell the
    /// line crosses once, in the order the line first enters it.
    ///
    /// # Errors
    ///
    /// [`GeohashError::InvalidArgument`] if a vertex is outside WGS84 or the
    /// line crosses more than [`MAX_COVER_CELLS`] cells. Both are checked
    /// before any cell is encoded.
    pub fn from_line_string(line: &LineString<f64>, config: &GeohashConfig) -> Result<Vec<Self>> {
        for vertex in &line.0 {
            validate_wgs84(vertex.x, vertex.y)?;
        }
        if let [only] = line.0.as_slice() {
            return Ok(vec![Self::from_wgs84(only, config)?]);
        }

        let walks = line
            .0
            .windows(2)
            .map(|pair| GridWalk::new((pair[0].x, pair[0].y), (pair[1].x, pair[1].y), config.dim()))
            .collect::<Result<Vec<_>>>()?;
        let crossed = walks
            .iter()
            .fold(0u64, |total, walk| total.saturating_add(walk.cell_count()));
        check_cover_size(crossed)?;

        let mut seen: HashSet<(u64, u64)> = HashSet::with_capacity(crossed as usize);
        let mut cells: Vec<GeohashCell> = Vec::with_capacity(crossed as usize);
        for (x, y) in walks.into_iter().flatten() {
            if seen.insert((x, y)) {
                cells.push(Self::from_grid(x, y, config)?);
            }
        }

        Ok(cells)
    }

    /// Create the GeohashCells covering a Polygon in WGS84 coordinates.
    ///
    /// A cell is part of the cover when its center lies inside the polygon
    /// (holes excluded). A polygon too small to hold any cell center is
    /// covered by the cell of one of its interior points. Cells come back in
    /// curve order.
    ///
    /// # Example
    /// ```
    /// use hilbert_geohash::{GeohashCell, GeohashConfig};
    /// use geo_types::polygon;
    ///
    /// # fn main() -> Result<(), hilbert_geohash::GeohashError> {
    /// let square = polygon![
    ///     (x: -90.0, y: -45.0),
    ///     (x: 90.0, y: -45.0),
    ///     (x: 90.0, y: 45.0),
    ///     (x: -90.0, y: 45.0),
    /// ];
    /// let cells = GeohashCell::from_polygon(&square, &GeohashConfig::new(4, 2)?)?;
    /// assert_eq!(cells.len(), 64);
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// [`GeohashError::InvalidArgument`] if the polygon reaches outside WGS84
    /// or its bounding box spans more than [`MAX_COVER_CELLS`] cells.
    pub fn from_polygon(poly: &Polygon<f64>, config: &GeohashConfig) -> Result<Vec<Self>> {
        let Some(bounds) = poly.bounding_rect() else {
            return Ok(vec![]);
        };
        let (min, max) = (bounds.min(), bounds.max());
        validate_wgs84(min.x, min.y)?;
        validate_wgs84(max.x, max.y)?;

        let dim = config.dim();
        let (x0, y0) = coord_to_grid(min.x, min.y, dim)?;
        let (x1, y1) = coord_to_grid(max.x, max.y, dim)?;
        check_cover_size((x1 - x0 + 1).saturating_mul(y1 - y0 + 1))?;

        let (lng_err, lat_err) = level_error(config.level());
        let mut cells = Vec::new();
        for y in y0..=y1 {
            for x in x0..=x1 {
                let (lng, lat) = grid_to_coord(x, y, dim)?;
                if poly.contains(&Point::new(lng + lng_err, lat + lat_err)) {
                    cells.push(Self::from_grid(x, y, config)?);
                }
            }
        }

        if cells.is_empty() {
            if let Some(inside) = poly.interior_point() {
                cells.push(Self::from_wgs84(&inside, config)?);
            }
        }
        cells.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(cells)
    }

    /// Create GeohashCells from an arbitrary `geo_types::Geometry` in WGS84.
    ///
    /// Points give a single cell, lines the cells they cross and areas the
    /// cells they cover (see [`Self::from_polygon`]). Collections give the
    /// cells of each member in turn.
    pub fn from_geometry(geom: Geometry<f64>, config: &GeohashConfig) -> Result<Vec<Self>> {
        match geom {
            Geometry::Point(pt) => Ok(vec![Self::from_wgs84(&pt, config)?]),
            Geometry::Line(line) => {
                Self::from_line_string(&LineString::from(vec![line.start, line.end]), config)
            }
            Geometry::LineString(line) => Self::from_line_string(&line, config),
            Geometry::MultiLineString(mls) => {
                let mut all_cells = Vec::new();
                for line in mls.0 {
                    all_cells.extend(Self::from_line_string(&line, config)?);
                }
                Ok(all_cells)
            }
            Geometry::Polygon(poly) => Self::from_polygon(&poly, config),
            Geometry::MultiPolygon(mp) => {
                let mut seen: HashSet<String> = HashSet::new();
                let mut cells = Vec::new();
                for poly in &mp.0 {
                    for cell in Self::from_polygon(poly, config)? {
                        if seen.insert(cell.id.clone()) {
                            cells.push(cell);
                        }
                    }
                }
                cells.sort_by(|a, b| a.id.cmp(&b.id));
                Ok(cells)
            }
            Geometry::Rect(rect) => Self::from_polygon(&rect.to_polygon(), config),
            Geometry::Triangle(tri) => Self::from_polygon(&tri.to_polygon(), config),
            Geometry::MultiPoint(mp) => mp
                .0
                .iter()
                .map(|pt| Self::from_wgs84(pt, config))
                .collect(),
            Geometry::GeometryCollection(gc) => {
                let mut all_cells = Vec::new();
                for g in gc.0 {
                    all_cells.extend(Self::from_geometry(g, config)?);
                }
                Ok(all_cells)
            }
        }
    }

    /// Longitude of the cell center.
    pub fn lng(&self) -> f64 {
        self.center.x()
    }

    /// Latitude of the cell center.
    pub fn lat(&self) -> f64 {
        self.center.y()
    }

    fn decoded(&self) -> DecodedCell {
        DecodedCell {
            lng: self.lng(),
            lat: self.lat(),
            lng_err: self.lng_err,
            lat_err: self.lat_err,
        }
    }

    /// The cells around this one, keyed by direction. See [`crate::neighbours`].
    pub fn neighbours(&self) -> Result<BTreeMap<Direction, GeohashCell>> {
        neighbours_with(&self.id, self.bits_per_char)?
            .into_iter()
            .map(|(direction, code)| {
                let cell = decode_exactly_with(&code, self.bits_per_char)?;
                Ok((direction, Self::from_decoded(code, cell, self.bits_per_char)))
            })
            .collect()
    }

    /// Bounding rectangle of the cell.
    pub fn bbox(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.lng() - self.lng_err, y: self.lat() - self.lat_err },
            coord! { x: self.lng() + self.lng_err, y: self.lat() + self.lat_err },
        )
    }

    /// Converts this cell to its closed rectangular ring.
    pub fn to_polygon(&self) -> Polygon<f64> {
        CellRectangle::from_cell(&self.decoded()).polygon
    }

    /// Whether `coord` lies inside the cell or on its boundary.
    pub fn contains(&self, coord: &impl Coordinate) -> bool {
        let rect = self.bbox();
        let (min, max): (Coord<f64>, Coord<f64>) = (rect.min(), rect.max());
        (min.x..=max.x).contains(&coord.lng()) && (min.y..=max.y).contains(&coord.lat())
    }

    /// Converts this cell to a GeoJSON feature. See [`crate::rectangle_feature`].
    pub fn to_feature(&self) -> geojson::Feature {
        cell_feature(&self.id, self.bits_per_char, &self.decoded())
    }

    /// Converts this cell to an Arrow RecordBatch with all attributes.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        std::slice::from_ref(self).to_record_batch()
    }
}
