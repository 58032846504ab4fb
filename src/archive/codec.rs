// src/archive/codec.rs
//! Archive codec
//!
//! `encode`: record -> compact JSON -> zlib (best) -> base64 text.
//! `decode`: the inverse. Maps are ordered, so encoding is deterministic and
//! the same record always produces byte-identical archives.

use crate::archive::record::PackageRecord;
use crate::compression::{self, CompressionError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("failed to serialize package record: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to compress package record: {0}")]
    Compress(#[source] CompressionError),

    /// Base64 or zlib layer is damaged
    #[error("corrupted archive: {0}")]
    Corrupted(#[source] CompressionError),

    /// Payload decompressed but is not a package record
    #[error("invalid archive (no manifest): {0}")]
    Invalid(#[source] serde_json::Error),
}

/// Serialize a package record to archive text
pub fn encode(record: &PackageRecord) -> Result<String, CodecError> {
    let json = serde_json::to_vec(record).map_err(CodecError::Serialize)?;
    let compressed = compression::deflate(&json).map_err(CodecError::Compress)?;
    Ok(compression::to_base64(&compressed))
}

/// Parse archive bytes back into a package record
pub fn decode(data: &[u8]) -> Result<PackageRecord, CodecError> {
    let compressed = compression::from_base64(data).map_err(CodecError::Corrupted)?;
    let json = compression::inflate(&compressed).map_err(CodecError::Corrupted)?;
    serde_json::from_slice(&json).map_err(CodecError::Invalid)
}
