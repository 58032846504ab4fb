// src/index/reconcile.rs

//! Index reconciliation strategies
//!
//! - **Incremental**: fold freshly built archives into the previous index.
//!   Packages not rebuilt keep their entries untouched.
//! - **Repair**: discard the previous index and rederive it from every
//!   archive in the pool. Archives that cannot be read or decoded are
//!   skipped, so entries for damaged or vanished archives disappear.
//!
//! Both paths go through [`Index::record`] and produce the same entry shape.

use super::Index;
use crate::archive::Manifest;
use crate::error::Result;
use crate::pool::Pool;
use std::path::PathBuf;
use tracing::{info, warn};

/// An archive produced during this run
#[derive(Debug, Clone)]
pub struct BuiltArchive {
    pub name: String,
    pub version: String,
    pub manifest: Manifest,
    /// SHA-256 of the archive bytes as written
    pub digest: String,
    pub path: PathBuf,
}

/// Something that was passed over during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub name: String,
    pub version: Option<String>,
    pub reason: String,
}

impl Skipped {
    pub fn package(name: &str, reason: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            version: None,
            reason: reason.into(),
        }
    }

    pub fn version(name: &str, version: &str, reason: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            version: Some(version.to_string()),
            reason: reason.into(),
        }
    }
}

/// Incremental step: merge one built archive into the index
pub fn merge_built(mut index: Index, built: &BuiltArchive) -> Index {
    index.record(&built.name, &built.version, &built.manifest, &built.digest);
    index
}

/// Result of a full repair
#[derive(Debug, Default)]
pub struct RepairOutcome {
    pub index: Index,
    /// (name, version) pairs that made it into the index
    pub indexed: Vec<(String, String)>,
    pub skipped: Vec<Skipped>,
}

/// Repair: rebuild the index from scratch out of the pool's archives
///
/// Names and versions are visited in lexical order, so `latest_version`
/// ends up as the lexically last readable version of each package.
pub fn rebuild_from_pool(pool: &Pool) -> Result<RepairOutcome> {
    let mut outcome = RepairOutcome::default();

    for (name, versions) in pool.list()? {
        info!("Indexing {}", name);

        for version in versions {
            match pool.read(&name, &version) {
                Ok(archive) => {
                    info!("[+] Version {}", version);
                    outcome
                        .index
                        .record(&name, &version, &archive.record.manifest, &archive.digest);
                    outcome.indexed.push((name.clone(), version));
                }
                Err(e) => {
                    warn!("{}", e);
                    outcome
                        .skipped
                        .push(Skipped::version(&name, &version, e.to_string()));
                }
            }
        }
    }

    Ok(outcome)
}
