mod alphabet;
pub mod backend;
pub mod constants;
mod curve;
mod geohash;
mod grid;
mod hilbert;
mod margin;
mod neighbours;

pub use alphabet::{decode_int, encode_int};
pub use backend::{HilbertBackend, LookupTableBackend, ReferenceBackend, backend, backend_for};
pub use constants::{DEFAULT_PRECISION, LAT_INTERVAL, LNG_INTERVAL, MAX_BITS, MAX_COVER_CELLS};
pub use curve::{CurvePoints, HilbertCurve, hilbert_curve};
pub use geohash::{DecodedCell, decode, decode_exactly, encode, encode_with, grid_cell};
pub(crate) use geohash::{cell_at_grid, decode_exactly_with, encode_validated};
pub use grid::{coord_to_grid, grid_to_coord, validate_wgs84};
pub(crate) use grid::GridWalk;
pub use hilbert::{hash2xy, xy2hash};
pub use margin::level_error;
pub use neighbours::{Direction, neighbours};
pub(crate) use neighbours::neighbours_with;
