use crate::config::{BitsPerChar, checked_bits};
use crate::error::{GeohashError, Result};

/// Encodes `value` into the order-preserving alphabet for `bits_per_char`.
///
/// The result is as short as possible (a single zero symbol for `0`) and is
/// not padded; two encodings of the same length compare like the integers.
///
/// Some encoders return the empty string for `0` instead. Both forms decode
/// to `0`, and a code padded to its precision is the same either way.
///
/// # Example
/// ```
/// use hilbert_geohash::encode_int;
///
/// # fn main() -> Result<(), hilbert_geohash::GeohashError> {
/// assert_eq!(encode_int(27, 2)?, "123");
/// assert_eq!(encode_int(255, 4)?, "ff");
/// assert_eq!(encode_int(64, 6)?, "10");
/// # Ok(())
/// # }
/// ```
pub fn encode_int(value: u64, bits_per_char: u8) -> Result<String> {
    let bits_per_char = BitsPerChar::try_from(bits_per_char)?;
    Ok(encode_int_with(value, bits_per_char))
}

/// Decodes a string produced by [`encode_int`] (padded or not).
///
/// # Errors
///
/// - [`GeohashError::InvalidArgument`] for an unsupported `bits_per_char` or a
///   character outside the alphabet
/// - [`GeohashError::Overflow`] if the string holds more than 64 bits
pub fn decode_int(text: &str, bits_per_char: u8) -> Result<u64> {
    let bits_per_char = BitsPerChar::try_from(bits_per_char)?;
    decode_int_with(text, bits_per_char)
}

pub(crate) fn encode_int_with(mut value: u64, bits_per_char: BitsPerChar) -> String {
    let alphabet = bits_per_char.alphabet();
    let bits = bits_per_char.bits();
    let mask = (1u64 << bits) - 1;

    let mut symbols = Vec::with_capacity((64 / bits + 1) as usize);
    loop {
        symbols.push(alphabet[(value & mask) as usize]);
        value >>= bits;
        if value == 0 {
            break;
        }
    }
    symbols.reverse();
    symbols.into_iter().map(char::from).collect()
}

pub(crate) fn decode_int_with(text: &str, bits_per_char: BitsPerChar) -> Result<u64> {
    checked_bits(text.len(), bits_per_char)?;

    let alphabet = bits_per_char.alphabet();
    let bits = bits_per_char.bits();

    text.bytes().try_fold(0u64, |acc, byte| {
        let digit = alphabet.binary_search(&byte).map_err(|_| {
            GeohashError::invalid(format!(
                "'{}' is not in the {}-bit alphabet",
                char::from(byte),
                bits
            ))
        })?;
        Ok((acc << bits) | digit as u64)
    })
}

/// Encodes `value` left padded with the zero symbol to exactly `precision` characters.
pub(crate) fn encode_padded(value: u64, precision: usize, bits_per_char: BitsPerChar) -> String {
    let code = encode_int_with(value, bits_per_char);
    if code.len() >= precision {
        return code;
    }
    let mut padded = String::with_capacity(precision);
    padded.extend(std::iter::repeat_n(bits_per_char.zero_symbol(), precision - code.len()));
    padded.push_str(&code);
    padded
}
