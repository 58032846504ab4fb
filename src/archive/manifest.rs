// src/archive/manifest.rs
//! Package manifest (manifest.json) parsing
//!
//! A manifest is a JSON object. The recognized keys are all optional: a
//! missing one is reported as a warning and the build goes ahead with what
//! is there. Values are stored as written, whatever their JSON type, and
//! unrecognized keys are carried through to the archive untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Keys a complete manifest is expected to declare
pub const MANIFEST_FIELDS: [&str; 6] = [
    "description",
    "license",
    "authors",
    "maintainers",
    "version",
    "dependencies",
];

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("no manifest at {}", path.display())]
    Missing { path: PathBuf },

    #[error("unreadable manifest {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read manifest {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ManifestError {
    /// Missing and malformed manifests only disqualify their own package
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Missing { .. } | Self::Unreadable { .. })
    }
}

/// Package metadata declared by the package author
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintainers: Option<Value>,

    /// Opaque version token, compared only for equality
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Value>,

    /// Dependency declarations, stored as written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Value>,

    /// Keys outside the recognized set
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Manifest {
    /// Load a manifest from a file path
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ManifestError::Missing {
                    path: path.to_path_buf(),
                }
            } else {
                ManifestError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        serde_json::from_str(&content).map_err(|source| ManifestError::Unreadable {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Recognized keys this manifest does not declare
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let present = [
            self.description.is_some(),
            self.license.is_some(),
            self.authors.is_some(),
            self.maintainers.is_some(),
            self.version.is_some(),
            self.dependencies.is_some(),
        ];

        MANIFEST_FIELDS
            .iter()
            .zip(present)
            .filter(|(_, present)| !present)
            .map(|(field, _)| *field)
            .collect()
    }

    /// Declared version, if it is a JSON string
    pub fn version_str(&self) -> Option<&str> {
        self.version.as_ref().and_then(Value::as_str)
    }

    /// Description as indexed (empty string when undeclared)
    pub fn description_or_default(&self) -> Value {
        self.description
            .clone()
            .unwrap_or_else(|| Value::String(String::new()))
    }

    /// Dependencies as indexed (empty list when undeclared)
    pub fn dependencies_or_default(&self) -> Value {
        self.dependencies
            .clone()
            .unwrap_or_else(|| Value::Array(Vec::new()))
    }
}

/// Read a package manifest, warning once per missing recognized field
pub fn load(path: &Path) -> Result<Manifest, ManifestError> {
    debug!("Reading manifest {}", path.display());
    let manifest = Manifest::from_file(path)?;

    for field in manifest.missing_fields() {
        warn!("Package manifest is incomplete (missing '{}')", field);
    }

    Ok(manifest)
}
