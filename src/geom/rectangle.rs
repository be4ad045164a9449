use crate::config::BitsPerChar;
use crate::error::Result;
use crate::index::{DecodedCell, decode_exactly_with};
use geo_types::{Coord, LineString, Polygon, Rect, coord};

/// The rectangle covered by a geohash.
#[derive(Debug, Clone, PartialEq)]
pub struct CellRectangle {
    /// Closed ring: lower-left, lower-right, upper-right, upper-left, lower-left
    pub polygon: Polygon<f64>,
    pub rect: Rect<f64>,
}

impl CellRectangle {
    pub fn from_cell(cell: &DecodedCell) -> Self {
        let (min_lng, min_lat, max_lng, max_lat) = cell.bounds();

        let ring: Vec<Coord<f64>> = vec![
            coord! { x: min_lng, y: min_lat },
            coord! { x: max_lng, y: min_lat },
            coord! { x: max_lng, y: max_lat },
            coord! { x: min_lng, y: max_lat },
            coord! { x: min_lng, y: min_lat },
        ];

        Self {
            polygon: Polygon::new(LineString::from(ring), vec![]),
            rect: Rect::new(
                coord! { x: min_lng, y: min_lat },
                coord! { x: max_lng, y: max_lat },
            ),
        }
    }

    /// The five ring positions as `(lng, lat)` pairs.
    pub fn ring(&self) -> Vec<(f64, f64)> {
        self.polygon
            .exterior()
            .coords()
            .map(|c| (c.x, c.y))
            .collect()
    }

    /// `(min_lng, min_lat, max_lng, max_lat)`
    pub fn bbox(&self) -> (f64, f64, f64, f64) {
        (
            self.rect.min().x,
            self.rect.min().y,
            self.rect.max().x,
            self.rect.max().y,
        )
    }
}

/// Builds the rectangle of every position encoding to `code`.
///
/// # Example
/// ```
/// use hilbert_geohash::rectangle;
///
/// # fn main() -> Result<(), hilbert_geohash::GeohashError> {
/// let rect = rectangle("2", 2)?;
/// assert_eq!(rect.bbox(), (0.0, 0.0, 180.0, 90.0));
/// assert_eq!(rect.ring().len(), 5);
/// # Ok(())
/// # }
/// ```
pub fn rectangle(code: &str, bits_per_char: u8) -> Result<CellRectangle> {
    let cell = decode_exactly_with(code, BitsPerChar::try_from(bits_per_char)?)?;
    Ok(CellRectangle::from_cell(&cell))
}
