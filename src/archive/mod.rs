// src/archive/mod.rs
//! CCP package archives
//!
//! This module implements the single-file `.ccp` archive format:
//! - Manifest loading (manifest.json)
//! - Package record building from a source tree
//! - Archive encoding and decoding (JSON + zlib + base64)

pub mod builder;
pub mod codec;
pub mod manifest;
pub mod record;

pub use builder::{ArchiveBuilder, BuildError};
pub use codec::{decode, encode, CodecError};
pub use manifest::{Manifest, ManifestError, MANIFEST_FIELDS};
pub use record::{FileEntry, PackageRecord};
