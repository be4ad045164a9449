use crate::batch::encode_batch_with;
use crate::cell::GeohashCell;
use crate::config::GeohashConfig;
use crate::error::{GeohashError, Result};
use arrow_array::{Array, Float64Array, RecordBatch, StringArray, UInt8Array, UInt64Array};
use arrow_schema::{DataType, Field, Schema};
use std::sync::Arc;

/// Encodes two Arrow columns of longitudes and latitudes into a column of geohashes.
///
/// Behaves like [`encode_batch`](crate::encode_batch); null entries are
/// rejected since they have no position to encode.
///
/// # Example
/// ```
/// use arrow_array::{Array, Float64Array};
/// use hilbert_geohash::{GeohashConfig, encode_arrow};
///
/// # fn main() -> Result<(), hilbert_geohash::GeohashError> {
/// let lngs = Float64Array::from(vec![0.0, -2.248]);
/// let lats = Float64Array::from(vec![0.0, 53.481]);
/// let codes = encode_arrow(&lngs, &lats, &GeohashConfig::new(1, 2)?)?;
/// assert_eq!(codes.len(), 2);
/// assert_eq!(codes.value(0), "2");
/// # Ok(())
/// # }
/// ```
pub fn encode_arrow(
    lngs: &Float64Array,
    lats: &Float64Array,
    config: &GeohashConfig,
) -> Result<StringArray> {
    if lngs.null_count() > 0 || lats.null_count() > 0 {
        return Err(GeohashError::invalid(format!(
            "cannot encode null positions ({} null longitudes, {} null latitudes)",
            lngs.null_count(),
            lats.null_count()
        )));
    }

    let codes = encode_batch_with(lngs.values(), lats.values(), config)?;
    Ok(StringArray::from(codes))
}

/// Trait for converting collections of [`GeohashCell`]s to Arrow record batches.
///
/// Implemented for `[GeohashCell]` and `Vec<GeohashCell>`.
pub trait GeohashCellsToArrow {
    /// Converts cells to a RecordBatch with geohash, precision, bits_per_char,
    /// lng, lat, lng_err and lat_err.
    fn to_record_batch(&self) -> Result<RecordBatch>;
}

impl GeohashCellsToArrow for [GeohashCell] {
    fn to_record_batch(&self) -> Result<RecordBatch> {
        let ids: StringArray = self.iter().map(|c| Some(c.id.as_str())).collect();
        let precisions: UInt64Array = self.iter().map(|c| Some(c.precision as u64)).collect();
        let bits_per_char: UInt8Array = self.iter().map(|c| Some(u8::from(c.bits_per_char))).collect();
        let lngs: Float64Array = self.iter().map(|c| Some(c.lng())).collect();
        let lats: Float64Array = self.iter().map(|c| Some(c.lat())).collect();
        let lng_errs: Float64Array = self.iter().map(|c| Some(c.lng_err)).collect();
        let lat_errs: Float64Array = self.iter().map(|c| Some(c.lat_err)).collect();

        let schema = Schema::new(vec![
            Field::new("geohash", DataType::Utf8, false),
            Field::new("precision", DataType::UInt64, false),
            Field::new("bits_per_char", DataType::UInt8, false),
            Field::new("lng", DataType::Float64, false),
            Field::new("lat", DataType::Float64, false),
            Field::new("lng_err", DataType::Float64, false),
            Field::new("lat_err", DataType::Float64, false),
        ]);

        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(ids),
                Arc::new(precisions),
                Arc::new(bits_per_char),
                Arc::new(lngs),
                Arc::new(lats),
                Arc::new(lng_errs),
                Arc::new(lat_errs),
            ],
        )
        .map_err(|e| GeohashError::ArrowError(e.to_string()))
    }
}

impl GeohashCellsToArrow for Vec<GeohashCell> {
    fn to_record_batch(&self) -> Result<RecordBatch> {
        self.as_slice().to_record_batch()
    }
}
