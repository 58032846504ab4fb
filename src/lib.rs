// src/lib.rs

//! CCPM package builder
//!
//! Packages source trees into versioned `.ccp` archives and maintains the
//! pool index describing every built version.
//!
//! # Architecture
//!
//! - Archives: one file per (name, version), JSON + zlib + base64, with a
//!   SHA-256 digest for every file
//! - Pool: the directory of archives is the source of truth
//! - Index: a materialized view of the pool, updated incrementally on build
//!   and fully rederivable in repair mode
//! - Failure isolation: a broken package or archive is skipped, never fatal

pub mod archive;
pub mod compression;
mod error;
pub mod hash;
pub mod index;
pub mod layout;
pub mod orchestrator;
pub mod pool;

pub use archive::{ArchiveBuilder, FileEntry, Manifest, PackageRecord};
pub use error::{Error, Result};
pub use index::{Index, IndexEntry, VersionEntry};
pub use layout::Layout;
pub use orchestrator::{Mode, RunReport};
pub use pool::{ArchiveError, Pool, PooledArchive};
