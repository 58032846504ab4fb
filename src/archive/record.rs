// src/archive/record.rs
//! In-memory package record
//!
//! A `PackageRecord` is the manifest plus every source file, keyed by its
//! forward-slash path relative to the package's source directory. This is
//! exactly what an archive serializes.

use crate::archive::manifest::Manifest;
use crate::hash;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One source file inside an archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Full file content
    pub content: String,
    /// SHA-256 of the content's UTF-8 bytes
    pub digest: String,
}

impl FileEntry {
    /// Create an entry, computing the digest from the content
    pub fn new(content: String) -> Self {
        let digest = hash::sha256(content.as_bytes());
        Self { content, digest }
    }

    /// Check the stored digest against the content
    pub fn verify(&self) -> Result<(), hash::VerifyError> {
        hash::verify_sha256(self.content.as_bytes(), &self.digest)
    }
}

/// Manifest fields plus the file map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageRecord {
    #[serde(flatten)]
    pub manifest: Manifest,

    #[serde(default)]
    pub files: BTreeMap<String, FileEntry>,
}

impl PackageRecord {
    pub fn new(manifest: Manifest) -> Self {
        Self {
            manifest,
            files: BTreeMap::new(),
        }
    }

    pub fn version(&self) -> Option<&str> {
        self.manifest.version_str()
    }

    /// Paths whose stored digest does not match their content
    pub fn corrupted_files(&self) -> Vec<(&str, hash::VerifyError)> {
        self.files
            .iter()
            .filter_map(|(path, entry)| entry.verify().err().map(|e| (path.as_str(), e)))
            .collect()
    }
}
