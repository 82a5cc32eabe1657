//! # Error Types
//!
//! Errors shared across subsystems.

use thiserror::Error;

/// Errors from encoding or decoding ledger entities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Value could not be serialized.
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// Bytes did not describe a valid value.
    #[error("Decoding failed: {0}")]
    Decode(String),
}
