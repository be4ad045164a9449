use geo_types::{Coord, Point};

/// Trait for types that can provide longitude/latitude coordinates.
///
/// Implemented for `(f64, f64)` tuples (`(lng, lat)`), `geo_types::Point<f64>`
/// and `geo_types::Coord<f64>`. This allows functions to accept either type.
pub trait Coordinate {
    /// Returns the longitude (x).
    fn lng(&self) -> f64;
    /// Returns the latitude (y).
    fn lat(&self) -> f64;
}

impl Coordinate for (f64, f64) {
    fn lng(&self) -> f64 {
        self.0
    }
    fn lat(&self) -> f64 {
        self.1
    }
}

impl Coordinate for Point<f64> {
    fn lng(&self) -> f64 {
        self.x()
    }
    fn lat(&self) -> f64 {
        self.y()
    }
}

impl Coordinate for Coord<f64> {
    fn lng(&self) -> f64 {
        self.x
    }
    fn lat(&self) -> f64 {
        self.y
    }
}
