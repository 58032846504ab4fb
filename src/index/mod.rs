// src/index/mod.rs

//! Package index
//!
//! The index (`pool/index.json`) summarizes every archive in the pool:
//!
//! ```json
//! {
//!   "foo": {
//!     "description": "...",
//!     "versions": { "1.0": { "digest": "<sha256 of archive>", "dependencies": [] } },
//!     "latest_version": "1.0"
//!   }
//! }
//! ```
//!
//! It is a materialized view of the pool: it is rewritten in full on every
//! run and can always be rebuilt from the archives (see [`reconcile`]).

pub mod reconcile;

pub use reconcile::{merge_built, rebuild_from_pool, BuiltArchive, RepairOutcome, Skipped};

use crate::archive::Manifest;
use crate::error::{Error, Result};
use crate::pool;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use tracing::debug;

/// Index data for one archived version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionEntry {
    /// SHA-256 of the stored archive bytes
    pub digest: String,
    #[serde(default)]
    pub dependencies: Value,
}

/// Index data for one package name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Copied from the manifest as written
    #[serde(default = "empty_description")]
    pub description: Value,
    #[serde(default)]
    pub versions: BTreeMap<String, VersionEntry>,
    /// Version most recently built or indexed (not a semantic maximum)
    #[serde(default)]
    pub latest_version: String,
}

fn empty_description() -> Value {
    Value::String(String::new())
}

/// Package name -> index entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Index {
    packages: BTreeMap<String, IndexEntry>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the index from disk; a missing file is an empty index
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No index at {}, starting empty", path.display());
                return Ok(Self::new());
            }
            Err(e) => return Err(Error::io("read package index", path)(e)),
        };

        serde_json::from_str(&content).map_err(|source| Error::IndexUnparseable {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the whole index, replacing the previous file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(Error::IndexSerialize)?;
        pool::write_atomic(path, json.as_bytes())
    }

    /// Insert or refresh one version of a package
    ///
    /// The description comes from this manifest and `latest_version` becomes
    /// `version`, whatever was there before.
    pub fn record(&mut self, name: &str, version: &str, manifest: &Manifest, digest: &str) {
        let entry = self.packages.entry(name.to_string()).or_default();

        entry.description = manifest.description_or_default();
        entry.versions.insert(
            version.to_string(),
            VersionEntry {
                digest: digest.to_string(),
                dependencies: manifest.dependencies_or_default(),
            },
        );
        entry.latest_version = version.to_string();
    }

    pub fn get(&self, name: &str) -> Option<&IndexEntry> {
        self.packages.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &IndexEntry)> {
        self.packages.iter()
    }

    /// Number of package names
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Number of (name, version) pairs across all packages
    pub fn version_count(&self) -> usize {
        self.packages.values().map(|e| e.versions.len()).sum()
    }
}
