// src/hash.rs

//! Content digests for archive integrity
//!
//! Every digest in the pool is a lowercase hex SHA-256. It is used at two
//! granularities:
//!
//! | Digest | Computed over |
//! |--------|---------------|
//! | File digest (inside an archive) | UTF-8 bytes of the file content |
//! | Archive digest (in the index) | Stored archive bytes (compressed + base64) |

use sha2::{Digest, Sha256};
use std::fmt;

/// Incremental SHA-256 hasher producing hex digests
#[derive(Default)]
pub struct Hasher {
    state: Sha256,
}

impl Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the hasher with more data
    pub fn update(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    /// Finalize and return the hex digest
    pub fn finalize(self) -> String {
        format!("{:x}", self.state.finalize())
    }
}

/// Compute the hex SHA-256 digest of a byte slice
#[inline]
pub fn sha256(data: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Digest mismatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyError {
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sha256 mismatch: expected {}, got {}",
            self.expected, self.actual
        )
    }
}

impl std::error::Error for VerifyError {}

/// Verify bytes match an expected digest (case-insensitive)
///
/// # Example
/// ```
/// use ccpm::hash::verify_sha256;
///
/// let digest = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";
/// assert!(verify_sha256(b"hello", digest).is_ok());
/// ```
pub fn verify_sha256(data: &[u8], expected: &str) -> Result<(), VerifyError> {
    let actual = sha256(data);
    if actual == expected.to_lowercase() {
        Ok(())
    } else {
        Err(VerifyError {
            expected: expected.to_string(),
            actual,
        })
    }
}
