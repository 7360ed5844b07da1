//! Error types for the core library
//!
//! None of these are fatal to a caller of [`crate::store::StyleStore`]: the
//! store converts decode and backend failures into defaults and logs them.

use thiserror::Error;

/// Failures of the digit encoder
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConvertError {
    /// A decimal digit outside 0-9 was passed to the encoder
    #[error("digit {0} is outside 0-9 and cannot be encoded in a 4-bit column")]
    InvalidDigit(u32),
}

/// Failures while encoding or decoding a [`crate::style::StyleConfig`]
#[derive(Debug, Error)]
pub enum StyleError {
    #[error("malformed style record: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode style record: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Failures of a storage backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// Namespace missing or backend unreachable
    #[error("style store unavailable: {0}")]
    Unavailable(String),

    #[error("style store I/O error on {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Encode(#[from] StyleError),
}
