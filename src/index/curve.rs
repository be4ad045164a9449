use crate::config::GeohashConfig;
use crate::error::Result;
use crate::index::geohash::cell_at_index;
use geo_types::{Coord, LineString};

/// The Hilbert curve used for codes of a given precision and alphabet.
///
/// Iterating yields the center of every cell in curve order, i.e. the
/// decoded position of every code from `00..0` upwards. The curve is a plain
/// value: each call to [`HilbertCurve::iter`] starts again from the first cell.
///
/// # Example
/// ```
/// use hilbert_geohash::hilbert_curve;
///
/// # fn main() -> Result<(), hilbert_geohash::GeohashError> {
/// let curve = hilbert_curve(1, 2)?;
/// let points: Vec<_> = curve.iter().collect();
/// assert_eq!(points, vec![(-90.0, -45.0), (-90.0, 45.0), (90.0, 45.0), (90.0, -45.0)]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HilbertCurve {
    config: GeohashConfig,
}

/// Builds the curve for `precision` characters of `bits_per_char` bits.
pub fn hilbert_curve(precision: usize, bits_per_char: u8) -> Result<HilbertCurve> {
    Ok(HilbertCurve::new(GeohashConfig::new(precision, bits_per_char)?))
}

impl HilbertCurve {
    pub fn new(config: GeohashConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeohashConfig {
        &self.config
    }

    /// Number of cells, `2^(precision * bits_per_char)`.
    pub fn len(&self) -> u128 {
        1u128 << self.config.bits()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> CurvePoints {
        CurvePoints {
            bits: self.config.bits(),
            next: 0,
            end: self.len(),
        }
    }

    /// Collects the curve into a line string. Only sensible for small curves.
    pub fn to_line_string(&self) -> LineString<f64> {
        self.iter().map(|(x, y)| Coord { x, y }).collect()
    }
}

impl IntoIterator for HilbertCurve {
    type Item = (f64, f64);
    type IntoIter = CurvePoints;

    fn into_iter(self) -> CurvePoints {
        self.iter()
    }
}

impl IntoIterator for &HilbertCurve {
    type Item = (f64, f64);
    type IntoIter = CurvePoints;

    fn into_iter(self) -> CurvePoints {
        self.iter()
    }
}

/// Iterator over the cell centers of a [`HilbertCurve`].
#[derive(Debug, Clone)]
pub struct CurvePoints {
    bits: u32,
    next: u128,
    end: u128,
}

impl Iterator for CurvePoints {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<(f64, f64)> {
        if self.next >= self.end {
            return None;
        }
        let index = self.next as u64;
        self.next += 1;
        // `bits` comes from a validated config and `index < 2^bits`, so the
        // lookup only fails on an internal bug.
        match cell_at_index(index, self.bits) {
            Ok(cell) => Some((cell.lng, cell.lat)),
            Err(e) => {
                debug_assert!(false, "curve index {} has no cell: {}", index, e);
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}
