use crate::config::BitsPerChar;
use crate::error::Result;
use crate::geom::rectangle::CellRectangle;
use crate::index::{DecodedCell, decode_exactly_with, hilbert_curve};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

/// Wraps the rectangle of `code` in a GeoJSON `Feature`.
///
/// The feature carries the cell bbox, the rectangle as a `Polygon` and the
/// properties `code`, `lng`, `lat`, `lng_err`, `lat_err` and `bits_per_char`.
pub fn rectangle_feature(code: &str, bits_per_char: u8) -> Result<Feature> {
    let bits_per_char = BitsPerChar::try_from(bits_per_char)?;
    let cell = decode_exactly_with(code, bits_per_char)?;
    Ok(cell_feature(code, bits_per_char, &cell))
}

pub(crate) fn cell_feature(code: &str, bits_per_char: BitsPerChar, cell: &DecodedCell) -> Feature {
    let rect = CellRectangle::from_cell(cell);
    let (min_lng, min_lat, max_lng, max_lat) = rect.bbox();

    let mut properties = JsonObject::new();
    properties.insert("code".to_string(), json!(code));
    properties.insert("lng".to_string(), json!(cell.lng));
    properties.insert("lat".to_string(), json!(cell.lat));
    properties.insert("lng_err".to_string(), json!(cell.lng_err));
    properties.insert("lat_err".to_string(), json!(cell.lat_err));
    properties.insert("bits_per_char".to_string(), json!(u8::from(bits_per_char)));

    Feature {
        bbox: Some(vec![min_lng, min_lat, max_lng, max_lat]),
        geometry: Some(Geometry::new(Value::from(&rect.polygon))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Wraps the Hilbert curve for `precision` and `bits_per_char` in a GeoJSON
/// `Feature` with a `LineString` geometry.
///
/// The curve has `2^(precision * bits_per_char)` points; keep it small.
pub fn hilbert_curve_feature(precision: usize, bits_per_char: u8) -> Result<Feature> {
    let line = hilbert_curve(precision, bits_per_char)?.to_line_string();
    Ok(Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::from(&line))),
        id: None,
        properties: Some(JsonObject::new()),
        foreign_members: None,
    })
}

/// Collects rectangle features for several codes of the same alphabet.
pub fn rectangles_feature_collection<S: AsRef<str>>(
    codes: &[S],
    bits_per_char: u8,
) -> Result<FeatureCollection> {
    let features = codes
        .iter()
        .map(|code| rectangle_feature(code.as_ref(), bits_per_char))
        .collect::<Result<Vec<_>>>()?;

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeohashError;

    #[test]
    fn test_rectangle_feature() -> Result<()> {
        let feature = rectangle_feature("32", 2)?;
        assert_eq!(feature.bbox, Some(vec![0.0, -90.0, 90.0, -45.0]));

        let props = feature.properties.as_ref().expect("properties");
        assert_eq!(props["code"], json!("32"));
        assert_eq!(props["lng"], json!(45.0));
        assert_eq!(props["lat"], json!(-67.5));
        assert_eq!(props["lng_err"], json!(45.0));
        assert_eq!(props["lat_err"], json!(22.5));
        assert_eq!(props["bits_per_char"], json!(2));

        match feature.geometry.map(|g| g.value) {
            Some(Value::Polygon(rings)) => {
                assert_eq!(rings.len(), 1);
                assert_eq!(rings[0].len(), 5);
                assert_eq!(rings[0][0], rings[0][4]);
            }
            other => panic!("Expected Polygon, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_hilbert_curve_feature() -> Result<()> {
        let feature = hilbert_curve_feature(2, 2)?;
        match feature.geometry.map(|g| g.value) {
            Some(Value::LineString(points)) => assert_eq!(points.len(), 16),
            other => panic!("Expected LineString, got {:?}", other),
        }
        assert_eq!(feature.properties, Some(JsonObject::new()));
        Ok(())
    }

    #[test]
    fn test_feature_collection() -> Result<()> {
        let collection = rectangles_feature_collection(&["0", "1", "2", "3"], 2)?;
        assert_eq!(collection.features.len(), 4);
        assert!(matches!(
            rectangles_feature_collection(&["0", "9"], 2),
            Err(GeohashError::InvalidArgument(_))
        ));
        Ok(())
    }

    #[test]
    fn test_feature_serializes() -> Result<()> {
        let text = rectangle_feature("0", 6)?.to_string();
        assert!(text.contains("\"Polygon\""));
        assert!(text.contains("\"bits_per_char\":6"));
        Ok(())
    }
}
