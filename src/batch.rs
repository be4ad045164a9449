use crate::config::GeohashConfig;
use crate::error::{GeohashError, Result};
use crate::index::{backend_for, encode_validated, validate_wgs84};
use log::debug;
use rayon::prelude::*;

/// Encodes `lngs[i], lats[i]` for every `i`, in parallel.
///
/// The whole input is validated before anything is encoded: one position
/// out of range fails the call and no codes are returned. Element `i` of
/// the output equals `encode(lngs[i], lats[i], precision, bits_per_char)`.
///
/// # Example
/// ```
/// use hilbert_geohash::{encode, encode_batch};
///
/// # fn main() -> Result<(), hilbert_geohash::GeohashError> {
/// let lngs = [0.0, -2.248, 151.2];
/// let lats = [0.0, 53.481, -33.9];
/// let codes = encode_batch(&lngs, &lats, 18, 2)?;
/// assert_eq!(codes[1], encode(-2.248, 53.481, 18, 2)?);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// - [`GeohashError::InvalidArgument`] - slices of different length, any
///   position out of range, `precision == 0` or unsupported `bits_per_char`
/// - [`GeohashError::Overflow`] - `precision * bits_per_char > 64`
pub fn encode_batch(
    lngs: &[f64],
    lats: &[f64],
    precision: usize,
    bits_per_char: u8,
) -> Result<Vec<String>> {
    let config = GeohashConfig::new(precision, bits_per_char)?;
    encode_batch_with(lngs, lats, &config)
}

/// Same as [`encode_batch`] with an already validated configuration.
pub fn encode_batch_with(lngs: &[f64], lats: &[f64], config: &GeohashConfig) -> Result<Vec<String>> {
    if lngs.len() != lats.len() {
        return Err(GeohashError::invalid(format!(
            "got {} longitudes but {} latitudes",
            lngs.len(),
            lats.len()
        )));
    }
    validate_all(lngs, lats)?;

    debug!(
        "encoding {} positions at precision {} ({} bits/char) with {} backend",
        lngs.len(),
        config.precision(),
        config.bits_per_char(),
        backend_for(config.bits()).name()
    );

    lngs.par_iter()
        .zip(lats.par_iter())
        .map(|(&lng, &lat)| encode_validated(lng, lat, config))
        .collect()
}

fn validate_all(lngs: &[f64], lats: &[f64]) -> Result<()> {
    let first_bad = lngs
        .par_iter()
        .zip(lats.par_iter())
        .enumerate()
        .find_first(|(_, (lng, lat))| validate_wgs84(**lng, **lat).is_err());

    match first_bad {
        Some((i, (&lng, &lat))) => Err(GeohashError::invalid(format!(
            "position {} ({}, {}) is out of range",
            i, lng, lat
        ))),
        None => Ok(()),
    }
}
