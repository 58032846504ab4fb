// src/archive/builder.rs
//! Package record builder
//!
//! Walks a package's source directory and assembles a `PackageRecord`:
//! every regular file is read as UTF-8 text, digested, and keyed by its
//! path relative to the source directory with `/` separators.

use crate::archive::manifest::Manifest;
use crate::archive::record::{FileEntry, PackageRecord};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Key reserved for the file map in a serialized record
const FILES_KEY: &str = "files";

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Failed to walk source directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to read source file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Source file {} is not valid UTF-8 text", path.display())]
    NotText { path: PathBuf },

    #[error("File {} is not under source directory {}", path.display(), source_dir.display())]
    OutsideSource { path: PathBuf, source_dir: PathBuf },
}

/// Package record builder
pub struct ArchiveBuilder {
    manifest: Manifest,
    source_dir: PathBuf,
}

impl ArchiveBuilder {
    /// Create a builder for a manifest and its source directory
    pub fn new(manifest: Manifest, source_dir: &Path) -> Self {
        Self {
            manifest,
            source_dir: source_dir.to_path_buf(),
        }
    }

    /// Build the package record
    pub fn build(&self) -> Result<PackageRecord, BuildError> {
        let mut manifest = self.manifest.clone();
        if manifest.extra.remove(FILES_KEY).is_some() {
            debug!("Ignoring '{}' declared in manifest", FILES_KEY);
        }

        let mut record = PackageRecord::new(manifest);

        for (relative, path) in self.scan_source_files()? {
            info!("[+] {}", relative);
            let bytes = fs::read(&path).map_err(|source| BuildError::Read {
                path: path.clone(),
                source,
            })?;
            let content = String::from_utf8(bytes).map_err(|_| BuildError::NotText { path })?;

            record.files.insert(relative, FileEntry::new(content));
        }

        Ok(record)
    }

    /// List every file under the source directory as (relative, absolute)
    ///
    /// A package without a source directory simply has no files.
    fn scan_source_files(&self) -> Result<Vec<(String, PathBuf)>, BuildError> {
        if !self.source_dir.is_dir() {
            debug!("No source directory at {}", self.source_dir.display());
            return Ok(Vec::new());
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(&self.source_dir).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();

            // Directories are represented by their children; symlinks count
            // when they resolve to a regular file
            if entry.file_type().is_dir() || !path.is_file() {
                continue;
            }

            let relative = relative_path(&self.source_dir, path).ok_or_else(|| {
                BuildError::OutsideSource {
                    path: path.to_path_buf(),
                    source_dir: self.source_dir.clone(),
                }
            })?;
            files.push((relative, path.to_path_buf()));
        }

        Ok(files)
    }
}

/// Path of `path` relative to `base`, joined with `/` at any depth
pub fn relative_path(base: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;

    let parts: Vec<String> = relative
        .components()
        .map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Option<_>>()?;

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
