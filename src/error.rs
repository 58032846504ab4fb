// src/error.rs

//! Crate-level error type
//!
//! Per-package and per-archive failures have their own error enums in the
//! modules that raise them (`ManifestError`, `ArchiveError`). Anything that
//! reaches this type at the orchestrator boundary aborts the run.

use crate::archive::{BuildError, CodecError, ManifestError};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The index left by a previous run could not be parsed
    #[error("package index {} is unreadable: {source}", path.display())]
    IndexUnparseable {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize package index: {0}")]
    IndexSerialize(#[source] serde_json::Error),

    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl Error {
    /// Adapter for `map_err` on filesystem calls
    pub(crate) fn io(action: &'static str, path: &Path) -> impl FnOnce(io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| Self::Io {
            action,
            path,
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
