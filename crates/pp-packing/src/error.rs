//! Error types for PP field packing and unpacking.

use crate::method::PackingMethod;
use thiserror::Error;

/// Result type alias using PackingError.
pub type Result<T> = std::result::Result<T, PackingError>;

/// Primary error type for packing operations.
///
/// Every failure aborts the whole call: no partial grid or partial packed
/// buffer is ever handed back.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PackingError {
    // === Grid dimension errors ===
    #[error("Invalid grid dimensions: {rows} rows x {cols} points per row")]
    NegativeDimensions { rows: i32, cols: i32 },

    #[error("Resulting unpacked PP field is larger than PP supports: {rows} rows x {cols} points per row")]
    SizeOverflow { rows: i32, cols: i32 },

    #[error("Unable to allocate memory for {points} points")]
    AllocError { points: usize },

    #[error("Field data has {actual} values, expected {expected}")]
    DataLength { expected: usize, actual: usize },

    // === Codec errors ===
    #[error("{method} decode encountered an error: {failure}")]
    Decode {
        method: PackingMethod,
        #[source]
        failure: DecodeFailure,
    },

    #[error("PP packing encountered an error ({method}): {reason}")]
    Encode {
        method: PackingMethod,
        reason: String,
    },

    #[error("Unsupported packing method: {0}")]
    UnsupportedMethod(i32),

    // === Configuration errors ===
    #[error("Invalid packing configuration: {0}")]
    InvalidConfig(String),
}

impl PackingError {
    /// Create a Decode error for the given method.
    pub fn decode(method: PackingMethod, failure: DecodeFailure) -> Self {
        Self::Decode { method, failure }
    }

    /// Create an Encode error for the given method.
    pub fn encode(method: PackingMethod, reason: impl Into<String>) -> Self {
        Self::Encode {
            method,
            reason: reason.into(),
        }
    }

    /// True for failures raised while reading a packed buffer.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// The structural failure behind a decode error, if any.
    pub fn decode_failure(&self) -> Option<&DecodeFailure> {
        match self {
            Self::Decode { failure, .. } => Some(failure),
            _ => None,
        }
    }
}

/// Structural failures found while parsing a packed buffer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeFailure {
    #[error("truncated header: {0}")]
    TruncatedHeader(String),

    #[error("truncated data: {0}")]
    TruncatedData(String),

    #[error("inconsistent bit width: {0}")]
    InconsistentBitWidth(String),

    #[error("run overflow: {0}")]
    RunOverflow(String),

    #[error("truncated run: {0}")]
    TruncatedRun(String),

    #[error("invalid run length: {0}")]
    InvalidRunLength(String),

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
}
