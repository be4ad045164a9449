use crate::error::{GeohashError, Result};
use crate::index::validate_wgs84;
use geo::CoordsIter;
use geo_types::{Geometry, GeometryCollection};
use geojson::GeoJson;
use std::str::FromStr;
use wkt::Wkt;

/// Parses a WGS84 geometry, auto-detecting WKT or GeoJSON.
///
/// Text starting with `{` is read as GeoJSON, anything else as WKT. Every
/// vertex must lie within WGS84 bounds, so a parsed geometry can always be
/// geohashed.
///
/// # Example
/// ```
/// use hilbert_geohash::parse_geometry;
/// use geo_types::Geometry;
///
/// # fn main() -> Result<(), hilbert_geohash::GeohashError> {
/// let geom = parse_geometry("LINESTRING(-2.58 51.45, -2.59 51.46)")?;
/// assert!(matches!(geom, Geometry::LineString(_)));
/// assert!(parse_geometry("POINT(200 0)").is_err());
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// - [`GeohashError::GeometryParseError`] if the text is neither valid WKT nor GeoJSON
/// - [`GeohashError::InvalidArgument`] if a vertex is outside WGS84
pub fn parse_geometry(text: &str) -> Result<Geometry<f64>> {
    let text = text.trim();
    if text.starts_with('{') {
        parse_geojson(text)
    } else {
        parse_wkt(text)
    }
}

/// Parses GeoJSON into a WGS84 geometry.
///
/// A bare geometry or a feature gives its geometry. A feature collection
/// gives a `GeometryCollection` of its features' geometries in order,
/// skipping features whose geometry is `null`.
pub fn parse_geojson(text: &str) -> Result<Geometry<f64>> {
    let geojson: GeoJson = text.parse().map_err(|e: geojson::Error| parse_error("GeoJSON", e))?;

    let geom = match geojson {
        GeoJson::Geometry(geom) => from_geojson(geom)?,
        GeoJson::Feature(feature) => match feature.geometry {
            Some(geom) => from_geojson(geom)?,
            None => {
                return Err(GeohashError::GeometryParseError(
                    "GeoJSON feature has a null geometry".to_string(),
                ));
            }
        },
        GeoJson::FeatureCollection(collection) => {
            let members = collection
                .features
                .into_iter()
                .filter_map(|feature| feature.geometry)
                .map(from_geojson)
                .collect::<Result<Vec<_>>>()?;
            Geometry::GeometryCollection(GeometryCollection::new_from(members))
        }
    };

    ensure_wgs84(geom)
}

/// Parses WKT into a WGS84 geometry.
pub fn parse_wkt(text: &str) -> Result<Geometry<f64>> {
    let wkt = Wkt::<f64>::from_str(text).map_err(|e| parse_error("WKT", e))?;
    let geom = Geometry::try_from(wkt).map_err(|e| parse_error("WKT", e))?;
    ensure_wgs84(geom)
}

fn from_geojson(geom: geojson::Geometry) -> Result<Geometry<f64>> {
    Geometry::try_from(geom).map_err(|e| parse_error("GeoJSON", e))
}

fn parse_error(format: &str, e: impl std::fmt::Display) -> GeohashError {
    GeohashError::GeometryParseError(format!("invalid {}: {}", format, e))
}

fn ensure_wgs84(geom: Geometry<f64>) -> Result<Geometry<f64>> {
    for vertex in geom.coords_iter() {
        validate_wgs84(vertex.x, vertex.y)?;
    }
    Ok(geom)
}
