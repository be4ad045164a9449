//! Pluggable Hilbert transform strategies.
//!
//! Two implementations exist: the bit-by-bit [`ReferenceBackend`] and the
//! table driven [`LookupTableBackend`]. One of them is selected the first time
//! [`backend`] is called and kept for the lifetime of the process.

use crate::error::Result;
use crate::index::constants::{BACKEND_ENV_VAR, MAX_BITS};
use crate::index::hilbert::{self, check_index};
use log::{info, warn};
use once_cell::sync::Lazy;

/// A Hilbert curve transform over `dim x dim` grids, `dim` a power of two.
///
/// Implementations must agree exactly with [`ReferenceBackend`].
pub trait HilbertBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Widest code (`2 * level`) this backend can transform.
    fn max_bits(&self) -> u32;

    fn xy2hash(&self, x: u64, y: u64, dim: u64) -> u64;

    fn hash2xy(&self, index: u64, dim: u64) -> Result<(u64, u64)>;
}

/// Walks the curve one bit-plane at a time.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceBackend;

impl HilbertBackend for ReferenceBackend {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn max_bits(&self) -> u32 {
        MAX_BITS
    }

    fn xy2hash(&self, x: u64, y: u64, dim: u64) -> u64 {
        hilbert::xy2hash(x, y, dim)
    }

    fn hash2xy(&self, index: u64, dim: u64) -> Result<(u64, u64)> {
        hilbert::hash2xy(index, dim)
    }
}

// Orientation of the current sub-square relative to the full grid, as the
// transform applied to the remaining (x, y) bits:
// 0 = identity, 1 = swap, 2 = complement and swap, 3 = complement both.
//
// Indexed by [state][(bx << 1) | by], yields (quadrant, next state).
const ENCODE_STEP: [[(u8, u8); 4]; 4] = [
    [(0, 1), (1, 0), (3, 2), (2, 0)],
    [(0, 0), (3, 3), (1, 1), (2, 1)],
    [(2, 2), (1, 2), (3, 0), (0, 3)],
    [(2, 3), (3, 1), (1, 3), (0, 2)],
];

/// Levels resolved by one table lookup.
const CHUNK_LEVELS: u32 = 4;

/// Resolves four curve levels per lookup using tables derived from a
/// four-state orientation automaton.
///
/// The tables hold 1024 entries in each direction and are built once.
pub struct LookupTableBackend {
    /// [state][(x_nibble << 4) | y_nibble] -> (8 index bits, next state)
    encode: Box<[[(u8, u8); 256]; 4]>,
    /// [state][8 index bits] -> ((x_nibble << 4) | y_nibble, next state)
    decode: Box<[[(u8, u8); 256]; 4]>,
    /// [state][quadrant] -> ((bx << 1) | by, next state)
    decode_step: [[(u8, u8); 4]; 4],
}

impl std::fmt::Debug for LookupTableBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupTableBackend").finish_non_exhaustive()
    }
}

impl LookupTableBackend {
    pub fn new() -> Self {
        let mut decode_step = [[(0u8, 0u8); 4]; 4];
        for (state, row) in ENCODE_STEP.iter().enumerate() {
            for (bits, &(quadrant, next)) in row.iter().enumerate() {
                decode_step[state][quadrant as usize] = (bits as u8, next);
            }
        }

        let mut encode = Box::new([[(0u8, 0u8); 256]; 4]);
        let mut decode = Box::new([[(0u8, 0u8); 256]; 4]);

        for start in 0..4usize {
            for key in 0..256usize {
                let (xb, yb) = (key >> 4, key & 0xF);
                let mut state = start;
                let mut quadrants = 0usize;
                for i in (0..CHUNK_LEVELS).rev() {
                    let bits = (((xb >> i) & 1) << 1) | ((yb >> i) & 1);
                    let (q, next) = ENCODE_STEP[state][bits];
                    quadrants = (quadrants << 2) | q as usize;
                    state = next as usize;
                }
                encode[start][key] = (quadrants as u8, state as u8);

                let mut state = start;
                let (mut xb, mut yb) = (0usize, 0usize);
                for i in (0..CHUNK_LEVELS).rev() {
                    let q = (key >> (2 * i)) & 3;
                    let (bits, next) = decode_step[state][q];
                    xb = (xb << 1) | (bits as usize >> 1);
                    yb = (yb << 1) | (bits as usize & 1);
                    state = next as usize;
                }
                decode[start][key] = (((xb << 4) | yb) as u8, state as u8);
            }
        }

        Self {
            encode,
            decode,
            decode_step,
        }
    }

    /// Checks the tables against the reference transform on every cell of
    /// a small grid and on a handful of full-width cells.
    fn self_test(&self) -> bool {
        let dim = 1u64 << 5;
        for x in 0..dim {
            for y in 0..dim {
                let d = hilbert::xy2hash(x, y, dim);
                if self.xy2hash(x, y, dim) != d {
                    return false;
                }
                if self.hash2xy(d, dim).ok() != Some((x, y)) {
                    return false;
                }
            }
        }
        let dim = 1u64 << 31;
        [(0, 0), (dim - 1, 0), (12_345_678, 987_654_321), (dim - 1, dim - 1)]
            .iter()
            .all(|&(x, y)| self.xy2hash(x, y, dim) == hilbert::xy2hash(x, y, dim))
    }
}

impl Default for LookupTableBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HilbertBackend for LookupTableBackend {
    fn name(&self) -> &'static str {
        "lookup"
    }

    fn max_bits(&self) -> u32 {
        MAX_BITS
    }

    fn xy2hash(&self, x: u64, y: u64, dim: u64) -> u64 {
        let mut remaining = dim.trailing_zeros();
        let mut state = 0usize;
        let mut d = 0u64;

        while remaining % CHUNK_LEVELS != 0 {
            remaining -= 1;
            let bits = ((((x >> remaining) & 1) << 1) | ((y >> remaining) & 1)) as usize;
            let (q, next) = ENCODE_STEP[state][bits];
            d = (d << 2) | u64::from(q);
            state = next as usize;
        }
        while remaining > 0 {
            remaining -= CHUNK_LEVELS;
            let key = ((((x >> remaining) & 0xF) << 4) | ((y >> remaining) & 0xF)) as usize;
            let (quadrants, next) = self.encode[state][key];
            d = (d << 8) | u64::from(quadrants);
            state = next as usize;
        }
        d
    }

    fn hash2xy(&self, index: u64, dim: u64) -> Result<(u64, u64)> {
        check_index(index, dim)?;

        let mut remaining = dim.trailing_zeros();
        let mut state = 0usize;
        let (mut x, mut y) = (0u64, 0u64);

        while remaining % CHUNK_LEVELS != 0 {
            remaining -= 1;
            let q = ((index >> (2 * remaining)) & 3) as usize;
            let (bits, next) = self.decode_step[state][q];
            x = (x << 1) | u64::from(bits >> 1);
            y = (y << 1) | u64::from(bits & 1);
            state = next as usize;
        }
        while remaining > 0 {
            remaining -= CHUNK_LEVELS;
            let key = ((index >> (2 * remaining)) & 0xFF) as usize;
            let (nibbles, next) = self.decode[state][key];
            x = (x << 4) | u64::from(nibbles >> 4);
            y = (y << 4) | u64::from(nibbles & 0xF);
            state = next as usize;
        }
        Ok((x, y))
    }
}

static REFERENCE: ReferenceBackend = ReferenceBackend;

static SELECTED: Lazy<Box<dyn HilbertBackend>> = Lazy::new(select_backend);

fn checked_lookup() -> Box<dyn HilbertBackend> {
    let lookup = LookupTableBackend::new();
    if lookup.self_test() {
        Box::new(lookup)
    } else {
        warn!("lookup table backend failed its self test, using reference backend");
        Box::new(ReferenceBackend)
    }
}

fn select_backend() -> Box<dyn HilbertBackend> {
    let selected = match std::env::var(BACKEND_ENV_VAR) {
        Ok(name) if name.eq_ignore_ascii_case("reference") => {
            Box::new(ReferenceBackend) as Box<dyn HilbertBackend>
        }
        Ok(name) if name.eq_ignore_ascii_case("lookup") => checked_lookup(),
        Ok(name) => {
            warn!(
                "unknown {} value '{}', selecting backend automatically",
                BACKEND_ENV_VAR, name
            );
            checked_lookup()
        }
        Err(_) => checked_lookup(),
    };
    info!(
        "hilbert backend: {} (up to {} bits)",
        selected.name(),
        selected.max_bits()
    );
    selected
}

/// The backend selected for this process.
pub fn backend() -> &'static dyn HilbertBackend {
    SELECTED.as_ref()
}

/// The backend to use for a code of `bits` bits: the selected one when it
/// supports that width, the reference transform otherwise.
pub fn backend_for(bits: u32) -> &'static dyn HilbertBackend {
    choose(backend(), bits)
}

fn choose<'a>(preferred: &'a dyn HilbertBackend, bits: u32) -> &'a dyn HilbertBackend {
    if bits <= preferred.max_bits() {
        preferred
    } else {
        &REFERENCE
    }
}
