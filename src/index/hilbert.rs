//! Reference Hilbert curve transform.
//!
//! Grid cells `(x, y)` of a `dim x dim` grid (`dim` a power of two) are
//! numbered in the order a Hilbert curve visits them. The transform walks
//! one bit-plane per curve level and rotates/reflects the remaining
//! coordinates into the frame of the quadrant it just entered:
//!
//! | ry | rx | action                                   |
//! |----|----|------------------------------------------|
//! | 0  | 0  | swap `(x, y)`                            |
//! | 0  | 1  | `x = n-1-x`, `y = n-1-y`, then swap      |
//! | 1  | *  | none                                     |

use crate::error::{GeohashError, Result};

/// Rotates and flips a quadrant of size `n`.
///
/// Only the bits below `n` are meaningful afterwards; the reflection is done
/// with wrapping arithmetic so higher bits of `x`/`y` may hold garbage.
#[inline]
pub(crate) fn rotate(n: u64, mut x: u64, mut y: u64, rx: u64, ry: u64) -> (u64, u64) {
    if ry == 0 {
        if rx == 1 {
            x = n.wrapping_sub(1).wrapping_sub(x);
            y = n.wrapping_sub(1).wrapping_sub(y);
        }
        return (y, x);
    }
    (x, y)
}

/// Curve index of grid cell `(x, y)`, in `[0, dim²)`.
///
/// `x` and `y` are expected to be below `dim`.
pub fn xy2hash(mut x: u64, mut y: u64, dim: u64) -> u64 {
    let mut d = 0u64;
    let mut lvl = dim >> 1;
    while lvl > 0 {
        let rx = u64::from(x & lvl > 0);
        let ry = u64::from(y & lvl > 0);
        d += lvl * lvl * ((3 * rx) ^ ry);
        (x, y) = rotate(lvl, x, y, rx, ry);
        lvl >>= 1;
    }
    d
}

/// Grid cell `(x, y)` visited at position `index` of the curve.
///
/// # Errors
///
/// [`GeohashError::InvalidIndex`] when `index >= dim²`.
pub fn hash2xy(index: u64, dim: u64) -> Result<(u64, u64)> {
    check_index(index, dim)?;

    let mut code = index;
    let (mut x, mut y) = (0u64, 0u64);
    let mut lvl = 1u64;
    while lvl < dim {
        let rx = 1 & (code >> 1);
        let ry = 1 & (code ^ rx);
        (x, y) = rotate(lvl, x, y, rx, ry);
        x += lvl * rx;
        y += lvl * ry;
        code >>= 2;
        lvl <<= 1;
    }
    Ok((x, y))
}

pub(crate) fn check_index(index: u64, dim: u64) -> Result<()> {
    if u128::from(index) >= u128::from(dim) * u128::from(dim) {
        return Err(GeohashError::InvalidIndex { index, dim });
    }
    Ok(())
}
