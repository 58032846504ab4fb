// src/orchestrator.rs

//! Run orchestration
//!
//! Sequences the pipeline for each invocation mode:
//!
//! - **Build**: load the previous index, then for every source package
//!   load manifest -> build record -> encode -> write archive, folding each
//!   built archive into the index. The index is written once at the end.
//! - **Repair**: rederive the index from the pool alone and write it.
//! - **Verify**: check the pool against the current index; writes nothing.
//!
//! Missing or malformed manifests and undecodable archives only skip their
//! own package or version. Any other error aborts the run before the index
//! is written.

use crate::archive::{codec, manifest, ArchiveBuilder, Manifest};
use crate::error::{Error, Result};
use crate::index::{self, BuiltArchive, Index, Skipped};
use crate::layout::Layout;
use crate::pool::{self, Pool, VerifyReport, VERSION_SEPARATOR};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// Invocation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Build,
    Repair,
}

/// Summary of a build or repair run
#[derive(Debug)]
pub struct RunReport {
    pub mode: Mode,
    /// (name, version) pairs built (build mode) or indexed (repair mode)
    pub processed: Vec<(String, String)>,
    pub skipped: Vec<Skipped>,
    pub index_path: PathBuf,
    pub index_packages: usize,
    pub index_versions: usize,
}

/// Outcome of building one source package
#[derive(Debug)]
pub enum PackageOutcome {
    Built(BuiltArchive),
    Skipped(Skipped),
}

/// Run the pipeline in the given mode
pub fn run(layout: &Layout, mode: Mode) -> Result<RunReport> {
    match mode {
        Mode::Build => build(layout),
        Mode::Repair => repair(layout),
    }
}

/// Build every source package and merge the results into the index
pub fn build(layout: &Layout) -> Result<RunReport> {
    let pool = Pool::open(layout.pool_dir())?;
    let index_path = layout.index_path();

    // An unreadable previous index stops the run before anything is built
    let mut index = Index::load(&index_path)?;

    let mut processed = Vec::new();
    let mut skipped = Vec::new();

    for name in source_packages(layout)? {
        info!("Packaging {}", name);

        match build_package(layout, &pool, &name)? {
            PackageOutcome::Built(built) => {
                processed.push((built.name.clone(), built.version.clone()));
                index = index::merge_built(index, &built);
            }
            PackageOutcome::Skipped(skip) => skipped.push(skip),
        }
    }

    info!("Writing index");
    index.save(&index_path)?;

    Ok(RunReport {
        mode: Mode::Build,
        processed,
        skipped,
        index_packages: index.len(),
        index_versions: index.version_count(),
        index_path,
    })
}

/// Discard the index and rebuild it from the archives in the pool
pub fn repair(layout: &Layout) -> Result<RunReport> {
    let pool = Pool::open(layout.pool_dir())?;
    let index_path = layout.index_path();

    let outcome = index::rebuild_from_pool(&pool)?;

    info!("Writing index");
    outcome.index.save(&index_path)?;

    Ok(RunReport {
        mode: Mode::Repair,
        index_packages: outcome.index.len(),
        index_versions: outcome.index.version_count(),
        processed: outcome.indexed,
        skipped: outcome.skipped,
        index_path,
    })
}

/// Check every indexed archive against the pool without modifying anything
pub fn verify(layout: &Layout) -> Result<VerifyReport> {
    let pool = Pool::new(layout.pool_dir());
    let index = Index::load(&layout.index_path())?;

    Ok(pool::verify_index(&pool, &index))
}

/// Build and write the archive for one source package
pub fn build_package(layout: &Layout, pool: &Pool, name: &str) -> Result<PackageOutcome> {
    let manifest = match manifest::load(&layout.manifest_path(name)) {
        Ok(manifest) => manifest,
        Err(e) if e.is_recoverable() => {
            warn!("Package {} is invalid ({})", name, e);
            return Ok(PackageOutcome::Skipped(Skipped::package(name, e.to_string())));
        }
        Err(e) => return Err(e.into()),
    };

    let version = match archive_version(&manifest) {
        Ok(version) => version.to_string(),
        Err(reason) => {
            error!("Package {} cannot be archived ({})", name, reason);
            return Ok(PackageOutcome::Skipped(Skipped::package(name, reason)));
        }
    };

    let record = ArchiveBuilder::new(manifest, &layout.source_dir(name)).build()?;
    let encoded = codec::encode(&record)?;
    let written = pool.write(name, &version, &encoded)?;

    debug!(
        "Wrote {} ({} files, {} bytes)",
        written.path.display(),
        record.files.len(),
        written.size
    );

    Ok(PackageOutcome::Built(BuiltArchive {
        name: name.to_string(),
        version,
        manifest: record.manifest,
        digest: written.digest,
        path: written.path,
    }))
}

/// Version usable in an archive file name
fn archive_version(manifest: &Manifest) -> std::result::Result<&str, &'static str> {
    match &manifest.version {
        None => Err("manifest declares no version"),
        Some(Value::String(v)) if v.is_empty() => Err("manifest declares an empty version"),
        Some(Value::String(v)) if v.contains(['/', '\\']) => {
            Err("version contains a path separator")
        }
        Some(Value::String(v)) => Ok(v.as_str()),
        Some(_) => Err("version is not a string"),
    }
}

/// Names of all packages in the source tree, in lexical order
pub fn source_packages(layout: &Layout) -> Result<Vec<String>> {
    let dir = layout.packages_dir();
    let mut names = Vec::new();

    for entry in fs::read_dir(&dir).map_err(Error::io("list packages directory", &dir))? {
        let entry = entry.map_err(Error::io("list packages directory", &dir))?;
        if !entry.path().is_dir() {
            debug!("Skipping {} (not a package directory)", entry.path().display());
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) if name.contains(VERSION_SEPARATOR) => {
                // The first separator in an archive name ends the package name
                warn!("Skipping package {}: name contains '{}'", name, VERSION_SEPARATOR);
            }
            Ok(name) => names.push(name),
            Err(raw) => warn!("Skipping package with non UTF-8 name {:?}", raw),
        }
    }

    names.sort();
    Ok(names)
}
