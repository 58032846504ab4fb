// src/pool/mod.rs

//! Archive pool
//!
//! The pool directory holds one `<name>.<version>.ccp` file per built
//! version, plus the index. The archive files are the source of truth: the
//! index can always be rederived from them.
//!
//! Concurrent invocations against the same pool are not supported; nothing
//! here takes a lock.

mod verify;

pub use verify::{verify_index, VerifyProblem, VerifyReport};

use crate::archive::codec::{self, CodecError};
use crate::archive::PackageRecord;
use crate::error::{Error, Result};
use crate::hash;
use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Extension of archive files in the pool
pub const ARCHIVE_EXTENSION: &str = "ccp";

/// Separator between package name and version in archive file names
pub const VERSION_SEPARATOR: char = '.';

/// Errors reading a single archive back from the pool
///
/// Each one only disqualifies its own version; failing to list the pool
/// directory is reported through the crate error instead.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Version {version} of {name} not found")]
    NotFound { name: String, version: String },

    #[error("Version {version} of {name} is invalid (corrupted): {source}")]
    Corrupted {
        name: String,
        version: String,
        #[source]
        source: CodecError,
    },

    #[error("Version {version} of {name} is invalid (no manifest): {source}")]
    Invalid {
        name: String,
        version: String,
        #[source]
        source: CodecError,
    },

    #[error("Failed to read archive {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// An archive read back from the pool
#[derive(Debug, Clone)]
pub struct PooledArchive {
    pub record: PackageRecord,
    /// SHA-256 of the stored archive bytes
    pub digest: String,
}

/// An archive just written to the pool
#[derive(Debug, Clone)]
pub struct WrittenArchive {
    pub path: PathBuf,
    /// SHA-256 of the bytes written
    pub digest: String,
    pub size: usize,
}

/// Archive pool rooted at a directory
#[derive(Debug, Clone)]
pub struct Pool {
    dir: PathBuf,
}

impl Pool {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Open the pool, creating its directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let pool = Self::new(dir);
        fs::create_dir_all(&pool.dir).map_err(Error::io("create pool directory", &pool.dir))?;
        Ok(pool)
    }

    /// File name of an archive: `<name>.<version>.ccp`
    pub fn archive_file_name(name: &str, version: &str) -> String {
        format!("{name}{VERSION_SEPARATOR}{version}.{ARCHIVE_EXTENSION}")
    }

    pub fn archive_path(&self, name: &str, version: &str) -> PathBuf {
        self.dir.join(Self::archive_file_name(name, version))
    }

    /// Write encoded archive text, replacing any previous file for this version
    pub fn write(&self, name: &str, version: &str, encoded: &str) -> Result<WrittenArchive> {
        let path = self.archive_path(name, version);
        write_atomic(&path, encoded.as_bytes())?;

        Ok(WrittenArchive {
            digest: hash::sha256(encoded.as_bytes()),
            size: encoded.len(),
            path,
        })
    }

    /// Read and decode one archive
    ///
    /// The digest covers the raw stored bytes, so it matches the digest
    /// computed by `write` for an untouched file.
    pub fn read(
        &self,
        name: &str,
        version: &str,
    ) -> std::result::Result<PooledArchive, ArchiveError> {
        let path = self.archive_path(name, version);
        let data = fs::read(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ArchiveError::NotFound {
                    name: name.to_string(),
                    version: version.to_string(),
                }
            } else {
                ArchiveError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        let record = codec::decode(&data).map_err(|source| match source {
            CodecError::Invalid(_) => ArchiveError::Invalid {
                name: name.to_string(),
                version: version.to_string(),
                source,
            },
            _ => ArchiveError::Corrupted {
                name: name.to_string(),
                version: version.to_string(),
                source,
            },
        })?;

        Ok(PooledArchive {
            record,
            digest: hash::sha256(&data),
        })
    }

    /// Every package name present in the pool with its versions on disk
    pub fn list(&self) -> Result<BTreeMap<String, BTreeSet<String>>> {
        let mut packages: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        let entries = fs::read_dir(&self.dir).map_err(Error::io("list pool directory", &self.dir))?;
        for entry in entries {
            let entry = entry.map_err(Error::io("list pool directory", &self.dir))?;
            let file_type = entry
                .file_type()
                .map_err(Error::io("inspect", &entry.path()))?;
            if file_type.is_dir() {
                continue;
            }

            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                debug!("Skipping non UTF-8 pool entry {:?}", entry.path());
                continue;
            };

            match parse_archive_file_name(file_name) {
                Some((name, version)) => {
                    packages
                        .entry(name.to_string())
                        .or_default()
                        .insert(version.to_string());
                }
                None if is_archive_file_name(file_name) => {
                    warn!("Skipping archive with no version in its name: {}", file_name);
                }
                None => debug!("Skipping {} (not an archive)", file_name),
            }
        }

        Ok(packages)
    }
}

fn is_archive_file_name(file_name: &str) -> bool {
    file_name
        .strip_suffix(ARCHIVE_EXTENSION)
        .is_some_and(|stem| stem.ends_with('.'))
}

/// Split `<name>.<version>.ccp` into (name, version)
///
/// Only the first separator splits: versions may contain dots themselves.
pub fn parse_archive_file_name(file_name: &str) -> Option<(&str, &str)> {
    let stem = file_name
        .strip_suffix(ARCHIVE_EXTENSION)?
        .strip_suffix('.')?;
    let (name, version) = stem.split_once(VERSION_SEPARATOR)?;

    if name.is_empty() || version.is_empty() {
        None
    } else {
        Some((name, version))
    }
}

/// Write through a temporary sibling file and rename into place
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let mut temp_name = OsString::from(path.as_os_str());
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    fs::write(&temp_path, contents).map_err(Error::io("write", &temp_path))?;
    fs::rename(&temp_path, path).map_err(Error::io("move into place", path))?;
    Ok(())
}
