use crate::index::constants::{LAT_INTERVAL, LNG_INTERVAL};

/// Half-widths `(lng, lat)` of a cell on a Hilbert curve of the given level.
///
/// Level 0 is a single cell covering the globe (`±180`, `±90`); every
/// further level halves both margins exactly.
///
/// # Example
/// ```
/// use hilbert_geohash::level_error;
///
/// assert_eq!(level_error(0), (180.0, 90.0));
/// assert_eq!(level_error(1), (90.0, 45.0));
/// ```
pub fn level_error(level: u32) -> (f64, f64) {
    let error = 0.5_f64.powi(level as i32);
    (LNG_INTERVAL.1 * error, LAT_INTERVAL.1 * error)
}
