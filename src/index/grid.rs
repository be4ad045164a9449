use crate::error::{GeohashError, Result};
use crate::index::constants::{LAT_INTERVAL, LNG_INTERVAL};

/// Maps a WGS84 position onto a `dim x dim` grid.
///
/// Longitude runs along `x` and latitude along `y`. Both are rescaled into
/// `[0, dim)` and floored; the closed upper bound (`lng == 180`,
/// `lat == 90`) is clamped into the last cell.
///
/// The coordinates are not range checked here, callers validate them first.
pub fn coord_to_grid(lng: f64, lat: f64, dim: u64) -> Result<(u64, u64)> {
    if dim == 0 {
        return Err(GeohashError::invalid("grid dimension must be at least 1"));
    }

    let lng_x = (lng + LNG_INTERVAL.1) / (LNG_INTERVAL.1 - LNG_INTERVAL.0) * dim as f64;
    let lat_y = (lat + LAT_INTERVAL.1) / (LAT_INTERVAL.1 - LAT_INTERVAL.0) * dim as f64;

    let x = (lng_x.floor() as u64).min(dim - 1);
    let y = (lat_y.floor() as u64).min(dim - 1);

    Ok((x, y))
}

/// Lower-left corner `(lng, lat)` of grid cell `(x, y)`.
pub fn grid_to_coord(x: u64, y: u64, dim: u64) -> Result<(f64, f64)> {
    if dim == 0 {
        return Err(GeohashError::invalid("grid dimension must be at least 1"));
    }
    if x >= dim || y >= dim {
        return Err(GeohashError::invalid(format!(
            "grid cell ({}, {}) outside a {}x{} grid",
            x, y, dim, dim
        )));
    }

    let lng = x as f64 / dim as f64 * (LNG_INTERVAL.1 - LNG_INTERVAL.0) + LNG_INTERVAL.0;
    let lat = y as f64 / dim as f64 * (LAT_INTERVAL.1 - LAT_INTERVAL.0) + LAT_INTERVAL.0;

    Ok((lng, lat))
}

/// Fails unless `lng` is in `[-180, 180]` and `lat` in `[-90, 90]` (NaN fails too).
pub fn validate_wgs84(lng: f64, lat: f64) -> Result<()> {
    if !(LNG_INTERVAL.0..=LNG_INTERVAL.1).contains(&lng) {
        return Err(GeohashError::invalid(format!(
            "longitude {} outside [{}, {}]",
            lng, LNG_INTERVAL.0, LNG_INTERVAL.1
        )));
    }
    if !(LAT_INTERVAL.0..=LAT_INTERVAL.1).contains(&lat) {
        return Err(GeohashError::invalid(format!(
            "latitude {} outside [{}, {}]",
            lat, LAT_INTERVAL.0, LAT_INTERVAL.1
        )));
    }
    Ok(())
}

/// Grid cells crossed by the straight segment `start -> end`, in order.
///
/// Takes one step per cell boundary crossed, so a segment spanning `dx`
/// columns and `dy` rows yields exactly `dx + dy + 1` cells, the first
/// holding `start` and the last holding `end`. Both ends must already be
/// valid WGS84 positions.
#[derive(Debug, Clone)]
pub(crate) struct GridWalk {
    cell: (u64, u64),
    end: (u64, u64),
    // Segment parameter at which the next column / row boundary is crossed,
    // and the parameter span of one whole column / row.
    next_cross: (f64, f64),
    span: (f64, f64),
    finished: bool,
}

impl GridWalk {
    pub(crate) fn new(start: (f64, f64), end: (f64, f64), dim: u64) -> Result<Self> {
        let from = coord_to_grid(start.0, start.1, dim)?;
        let to = coord_to_grid(end.0, end.1, dim)?;

        let scale_x = dim as f64 / (LNG_INTERVAL.1 - LNG_INTERVAL.0);
        let scale_y = dim as f64 / (LAT_INTERVAL.1 - LAT_INTERVAL.0);
        let (x_cross, x_span) = axis_crossing(
            from.0,
            (start.0 - LNG_INTERVAL.0) * scale_x,
            (end.0 - LNG_INTERVAL.0) * scale_x,
        );
        let (y_cross, y_span) = axis_crossing(
            from.1,
            (start.1 - LAT_INTERVAL.0) * scale_y,
            (end.1 - LAT_INTERVAL.0) * scale_y,
        );

        Ok(Self {
            cell: from,
            end: to,
            next_cross: (x_cross, y_cross),
            span: (x_span, y_span),
            finished: false,
        })
    }

    /// Number of cells the walk yields.
    pub(crate) fn cell_count(&self) -> u64 {
        self.cell.0.abs_diff(self.end.0) + self.cell.1.abs_diff(self.end.1) + 1
    }
}

/// First boundary crossing and per-cell span along one axis, in units of the
/// segment parameter `t in [0, 1]`.
fn axis_crossing(cell: u64, from: f64, to: f64) -> (f64, f64) {
    let delta = to - from;
    if delta > 0.0 {
        (((cell + 1) as f64 - from) / delta, 1.0 / delta)
    } else if delta < 0.0 {
        ((cell as f64 - from) / delta, -1.0 / delta)
    } else {
        (f64::INFINITY, f64::INFINITY)
    }
}

impl Iterator for GridWalk {
    type Item = (u64, u64);

    fn next(&mut self) -> Option<(u64, u64)> {
        if self.finished {
            return None;
        }
        let current = self.cell;
        if current == self.end {
            self.finished = true;
            return Some(current);
        }

        // Never step past the end column or row, whatever rounding says.
        let step_x = if self.cell.0 == self.end.0 {
            false
        } else if self.cell.1 == self.end.1 {
            true
        } else {
            self.next_cross.0 < self.next_cross.1
        };

        if step_x {
            self.cell.0 = if self.end.0 > self.cell.0 { self.cell.0 + 1 } else { self.cell.0 - 1 };
            self.next_cross.0 += self.span.0;
        } else {
            self.cell.1 = if self.end.1 > self.cell.1 { self.cell.1 + 1 } else { self.cell.1 - 1 };
            self.next_cross.1 += self.span.1;
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_maps_to_upper_right_quadrant() -> Result<()> {
        assert_eq!(coord_to_grid(0.0, 0.0, 2)?, (1, 1));
        assert_eq!(coord_to_grid(-0.1, -0.1, 2)?, (0, 0));
        Ok(())
    }

    #[test]
    fn test_upper_bound_is_clamped() -> Result<()> {
        assert_eq!(coord_to_grid(180.0, 90.0, 4)?, (3, 3));
        assert_eq!(coord_to_grid(-180.0, -90.0, 4)?, (0, 0));
        assert_eq!(coord_to_grid(180.0, 90.0, 1)?, (0, 0));
        Ok(())
    }

    #[test]
    fn test_grid_to_coord_is_lower_left_corner() -> Result<()> {
        assert_eq!(grid_to_coord(0, 0, 2)?, (-180.0, -90.0));
        assert_eq!(grid_to_coord(1, 1, 2)?, (0.0, 0.0));
        assert_eq!(grid_to_coord(3, 1, 4)?, (90.0, -45.0));
        Ok(())
    }

    #[test]
    fn test_grid_round_trip() -> Result<()> {
        let dim = 1 << 10;
        for &(x, y) in &[(0, 0), (17, 900), (1023, 1023), (512, 3)] {
            let (lng, lat) = grid_to_coord(x, y, dim)?;
            assert_eq!(coord_to_grid(lng, lat, dim)?, (x, y));
        }
        Ok(())
    }

    #[test]
    fn test_out_of_range_cell() {
        assert!(matches!(
            grid_to_coord(4, 0, 4),
            Err(GeohashError::InvalidArgument(_))
        ));
        assert!(grid_to_coord(0, 4, 4).is_err());
        assert!(coord_to_grid(0.0, 0.0, 0).is_err());
    }

    #[test]
    fn test_grid_walk_horizontal() -> Result<()> {
        let cells: Vec<_> = GridWalk::new((-179.0, 1.0), (179.0, 1.0), 16)?.collect();
        assert_eq!(cells.len(), 16);
        assert_eq!(cells[0], (0, 8));
        assert_eq!(cells[15], (15, 8));
        Ok(())
    }

    #[test]
    fn test_grid_walk_steps_one_cell_at_a_time() -> Result<()> {
        let dim = 64;
        let walk = GridWalk::new((-170.3, -80.1), (33.3, 71.7), dim)?;
        let expected = walk.cell_count();
        let cells: Vec<_> = walk.collect();
        assert_eq!(cells.len() as u64, expected);
        assert_eq!(cells[0], coord_to_grid(-170.3, -80.1, dim)?);
        assert_eq!(cells[cells.len() - 1], coord_to_grid(33.3, 71.7, dim)?);
        for pair in cells.windows(2) {
            let dx = pair[0].0.abs_diff(pair[1].0);
            let dy = pair[0].1.abs_diff(pair[1].1);
            assert_eq!(dx + dy, 1);
        }
        Ok(())
    }

    #[test]
    fn test_grid_walk_follows_the_segment() -> Result<()> {
        // Every cell on the walk is touched by the segment, up to the sample step.
        const TOL: f64 = 0.2;
        let (start, end) = ((10.0, -20.0), (-100.0, 60.0));
        let dim = 32;
        let (cell_w, cell_h) = (360.0 / dim as f64, 180.0 / dim as f64);
        for (x, y) in GridWalk::new(start, end, dim)? {
            let (lng, lat) = grid_to_coord(x, y, dim)?;
            let touched = (0..=1000).any(|i| {
                let t = i as f64 / 1000.0;
                let px = start.0 + t * (end.0 - start.0);
                let py = start.1 + t * (end.1 - start.1);
                px >= lng - TOL && px <= lng + cell_w + TOL && py >= lat - TOL && py <= lat + cell_h + TOL
            });
            assert!(touched, "cell ({}, {}) is off the segment", x, y);
        }
        Ok(())
    }

    #[test]
    fn test_grid_walk_single_cell() -> Result<()> {
        let cells: Vec<_> = GridWalk::new((1.0, 1.0), (1.5, 1.2), 4)?.collect();
        assert_eq!(cells, vec![(2, 2)]);
        let cells: Vec<_> = GridWalk::new((180.0, 90.0), (180.0, 90.0), 4)?.collect();
        assert_eq!(cells, vec![(3, 3)]);
        Ok(())
    }

    #[test]
    fn test_validate_wgs84() {
        assert!(validate_wgs84(180.0, -90.0).is_ok());
        assert!(validate_wgs84(180.1, 0.0).is_err());
        assert!(validate_wgs84(0.0, -90.5).is_err());
        assert!(validate_wgs84(f64::NAN, 0.0).is_err());
        assert!(validate_wgs84(0.0, f64::INFINITY).is_err());
    }
}
