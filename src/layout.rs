// src/layout.rs

//! Directory layout of a packaging root
//!
//! ```text
//! <root>/packages/<name>/manifest.json
//! <root>/packages/<name>/source/**
//! <root>/pool/<name>.<version>.ccp
//! <root>/pool/index.json
//! ```

use std::path::PathBuf;

pub const PACKAGES_DIR: &str = "packages";
pub const SOURCE_DIR: &str = "source";
pub const MANIFEST_FILE: &str = "manifest.json";
pub const POOL_DIR: &str = "pool";
pub const INDEX_FILE: &str = "index.json";

/// Paths derived from a single invocation root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding one subdirectory per source package
    pub fn packages_dir(&self) -> PathBuf {
        self.root.join(PACKAGES_DIR)
    }

    pub fn package_dir(&self, name: &str) -> PathBuf {
        self.packages_dir().join(name)
    }

    pub fn manifest_path(&self, name: &str) -> PathBuf {
        self.package_dir(name).join(MANIFEST_FILE)
    }

    /// Subtree whose files end up in the archive
    pub fn source_dir(&self, name: &str) -> PathBuf {
        self.package_dir(name).join(SOURCE_DIR)
    }

    pub fn pool_dir(&self) -> PathBuf {
        self.root.join(POOL_DIR)
    }

    pub fn index_path(&self) -> PathBuf {
        self.pool_dir().join(INDEX_FILE)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(".")
    }
}
