//! Binary encoding of ledger entities for transport and persistence.
//!
//! Uses `bincode` with its default (fixed-int, little-endian) configuration.

use crate::errors::CodecError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encode a value to bytes.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    bincode::serialize(value).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Decode a value from bytes produced by [`encode`].
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    bincode::deserialize(bytes).map_err(|e| CodecError::Decode(e.to_string()))
}
