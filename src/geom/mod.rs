mod feature;
mod parse;
mod rectangle;

pub(crate) use feature::cell_feature;
pub use feature::{hilbert_curve_feature, rectangle_feature, rectangles_feature_collection};
pub use parse::{parse_geojson, parse_geometry, parse_wkt};
pub use rectangle::{CellRectangle, rectangle};
