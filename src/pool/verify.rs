// src/pool/verify.rs

//! Pool verification
//!
//! Checks every version listed in the index against the archive on disk:
//! the archive digest must match the indexed digest, the archive's declared
//! version must match its file name, and every file digest must match its
//! content.

use super::Pool;
use crate::index::Index;
use std::fmt;
use tracing::{debug, warn};

/// A single verification failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyProblem {
    /// The archive could not be read back from the pool
    Unreadable {
        name: String,
        version: String,
        reason: String,
    },
    /// The stored archive no longer matches the indexed digest
    ArchiveDigest {
        name: String,
        version: String,
        expected: String,
        actual: String,
    },
    /// The archive declares a different version than its file name
    VersionMismatch {
        name: String,
        version: String,
        declared: Option<String>,
    },
    /// A file's content no longer matches its digest
    FileDigest {
        name: String,
        version: String,
        path: String,
    },
}

impl fmt::Display for VerifyProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable {
                name,
                version,
                reason,
            } => write!(f, "{name} {version}: unreadable ({reason})"),
            Self::ArchiveDigest {
                name,
                version,
                expected,
                actual,
            } => write!(
                f,
                "{name} {version}: archive digest mismatch (index {expected}, pool {actual})"
            ),
            Self::VersionMismatch {
                name,
                version,
                declared,
            } => write!(
                f,
                "{name} {version}: archive declares version {}",
                declared.as_deref().unwrap_or("<none>")
            ),
            Self::FileDigest {
                name,
                version,
                path,
            } => write!(f, "{name} {version}: digest mismatch for {path}"),
        }
    }
}

/// Outcome of verifying the pool against an index
#[derive(Debug, Default)]
pub struct VerifyReport {
    /// Number of (name, version) pairs checked
    pub checked: usize,
    pub problems: Vec<VerifyProblem>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Verify every indexed version against the pool
pub fn verify_index(pool: &Pool, index: &Index) -> VerifyReport {
    let mut report = VerifyReport::default();

    for (name, entry) in index.iter() {
        for (version, indexed) in &entry.versions {
            report.checked += 1;

            let archive = match pool.read(name, version) {
                Ok(archive) => archive,
                Err(e) => {
                    warn!("{}", e);
                    report.problems.push(VerifyProblem::Unreadable {
                        name: name.clone(),
                        version: version.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if archive.digest != indexed.digest {
                report.problems.push(VerifyProblem::ArchiveDigest {
                    name: name.clone(),
                    version: version.clone(),
                    expected: indexed.digest.clone(),
                    actual: archive.digest.clone(),
                });
            }

            if archive.record.version() != Some(version.as_str()) {
                report.problems.push(VerifyProblem::VersionMismatch {
                    name: name.clone(),
                    version: version.clone(),
                    declared: archive.record.version().map(str::to_string),
                });
            }

            for (path, _) in archive.record.corrupted_files() {
                report.problems.push(VerifyProblem::FileDigest {
                    name: name.clone(),
                    version: version.clone(),
                    path: path.to_string(),
                });
            }

            debug!("Verified {} {}", name, version);
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{codec, FileEntry, Manifest, PackageRecord};
    use crate::hash;
    use tempfile::TempDir;

    fn record(version: &str) -> PackageRecord {
        let mut record = PackageRecord::new(Manifest {
            version: Some(version.into()),
            ..Default::default()
        });
        record
            .files
            .insert("a.txt".to_string(), FileEntry::new("hello".to_string()));
        record
    }

    fn store(pool: &Pool, index: &mut Index, name: &str, record: &PackageRecord, version: &str) {
        let encoded = codec::encode(record).unwrap();
        let written = pool.write(name, version, &encoded).unwrap();
        index.record(name, version, &record.manifest, &written.digest);
    }

    #[test]
    fn test_verify_clean_pool() {
        let temp = TempDir::new().unwrap();
        let pool = Pool::open(temp.path()).unwrap();
        let mut index = Index::new();
        store(&pool, &mut index, "foo", &record("1.0"), "1.0");

        let report = verify_index(&pool, &index);

        assert_eq!(report.checked, 1);
        assert!(report.is_clean());
    }

    #[test]
    fn test_verify_detects_problems() {
        let temp = TempDir::new().unwrap();
        let pool = Pool::open(temp.path()).unwrap();
        let mut index = Index::new();

        // Replaced after indexing
        store(&pool, &mut index, "foo", &record("1.0"), "1.0");
        let mut changed = record("1.0");
        changed
            .files
            .insert("b.txt".to_string(), FileEntry::new("new".to_string()));
        let encoded = codec::encode(&changed).unwrap();
        pool.write("foo", "1.0", &encoded).unwrap();

        // Tampered file content
        let mut tampered = record("2.0");
        tampered.files.get_mut("a.txt").unwrap().content = "evil".to_string();
        store(&pool, &mut index, "bar", &tampered, "2.0");

        // Gone from the pool
        index.record("gone", "1", &Manifest::default(), &hash::sha256(b"x"));

        let report = verify_index(&pool, &index);

        assert_eq!(report.checked, 3);
        assert!(report
            .problems
            .iter()
            .any(|p| matches!(p, VerifyProblem::ArchiveDigest { name, .. } if name == "foo")));
        assert!(report
            .problems
            .iter()
            .any(|p| matches!(p, VerifyProblem::FileDigest { path, .. } if path == "a.txt")));
        assert!(report
            .problems
            .iter()
            .any(|p| matches!(p, VerifyProblem::Unreadable { name, .. } if name == "gone")));
    }

    #[test]
    fn test_verify_reports_archive_that_cannot_be_read() {
        let temp = TempDir::new().unwrap();
        let pool = Pool::open(temp.path()).unwrap();
        let mut index = Index::new();
        store(&pool, &mut index, "foo", &record("1.0"), "1.0");
        index.record("bar", "1.0", &Manifest::default(), &hash::sha256(b"x"));
        std::fs::create_dir(pool.archive_path("bar", "1.0")).unwrap();

        let report = verify_index(&pool, &index);

        assert_eq!(report.checked, 2);
        assert_eq!(report.problems.len(), 1);
        assert!(matches!(
            &report.problems[0],
            VerifyProblem::Unreadable { name, .. } if name == "bar"
        ));
    }

    #[test]
    fn test_verify_version_mismatch() {
        let temp = TempDir::new().unwrap();
        let pool = Pool::open(temp.path()).unwrap();
        let mut index = Index::new();
        store(&pool, &mut index, "foo", &record("1.0"), "1.1");

        let report = verify_index(&pool, &index);

        assert_eq!(
            report.problems,
            vec![VerifyProblem::VersionMismatch {
                name: "foo".to_string(),
                version: "1.1".to_string(),
                declared: Some("1.0".to_string()),
            }]
        );
    }
}
