use thiserror::Error;

/// Error type for hilbert-geohash operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeohashError {
    /// An argument is outside its valid domain (coordinate range, precision,
    /// bits per character, alphabet symbol, grid coordinate).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// A curve index does not fit in a `dim x dim` grid.
    #[error("Invalid curve index {index} for a {dim}x{dim} grid")]
    InvalidIndex { index: u64, dim: u64 },
    /// `precision * bits_per_char` exceeds the 64 bits a code can hold.
    #[error("Overflow: {bits} bits requested, at most 64 are supported")]
    Overflow { bits: u64 },
    /// Failed to parse geometry from string (GeoJSON or WKT).
    #[error("Geometry parse error: {0}")]
    GeometryParseError(String),
    /// CSV parsing or reading error.
    #[error("CSV error: {0}")]
    CsvError(String),
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(String),
    /// Arrow array or record batch construction failed.
    #[error("Arrow error: {0}")]
    ArrowError(String),
}

impl GeohashError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        GeohashError::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, GeohashError>;
