// src/compression/mod.rs
//! Compression and transport encoding for archive payloads
//!
//! Archives are zlib (DEFLATE) streams at the best compression level,
//! wrapped in standard base64 so the stored file is plain ASCII text.
//! Both steps are deterministic: the same input always yields the same bytes.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{self, Read, Write};
use thiserror::Error;

/// Compression-related errors
#[derive(Error, Debug)]
pub enum CompressionError {
    #[error("Failed to compress data: {0}")]
    Compression(#[source] io::Error),

    #[error("Failed to decompress data: {0}")]
    Decompression(#[source] io::Error),

    #[error("Invalid base64 payload: {0}")]
    TransportDecode(#[from] base64::DecodeError),
}

/// Compress a byte slice with zlib at maximum ratio
pub fn deflate(data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(data)
        .map_err(CompressionError::Compression)?;
    encoder.finish().map_err(CompressionError::Compression)
}

/// Decompress a zlib stream
pub fn inflate(data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let mut decoder = ZlibDecoder::new(data);
    let mut output = Vec::new();
    decoder
        .read_to_end(&mut output)
        .map_err(CompressionError::Decompression)?;
    Ok(output)
}

/// Encode bytes as standard (padded) base64 text
pub fn to_base64(data: &[u8]) -> String {
    BASE64.encode(data)
}

/// Decode base64 text, ignoring leading and trailing whitespace
///
/// Hand-edited archives commonly gain a trailing newline.
pub fn from_base64(text: &[u8]) -> Result<Vec<u8>, CompressionError> {
    Ok(BASE64.decode(text.trim_ascii())?)
}
