// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use ccpm::Layout;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A packaging root in a temporary directory.
///
/// Keep the struct alive for the duration of the test to prevent cleanup.
pub struct Workspace {
    temp: TempDir,
    pub layout: Layout,
}

impl Workspace {
    pub fn new() -> Self {
        let temp = tempfile::tempdir().unwrap();
        let layout = Layout::new(temp.path());
        fs::create_dir_all(layout.packages_dir()).unwrap();

        Self {
            temp,
            layout,
        }
    }

    /// Root of the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Create a package with a manifest and source files.
    pub fn add_package(&self, name: &str, manifest: &str, files: &[(&str, &str)]) {
        fs::create_dir_all(self.layout.source_dir(name)).unwrap();
        fs::write(self.layout.manifest_path(name), manifest).unwrap();

        for (path, content) in files {
            let path = self.layout.source_dir(name).join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
    }

    /// Create a package directory with sources but no manifest.
    pub fn add_package_without_manifest(&self, name: &str, files: &[(&str, &str)]) {
        fs::create_dir_all(self.layout.source_dir(name)).unwrap();
        for (path, content) in files {
            fs::write(self.layout.source_dir(name).join(path), content).unwrap();
        }
    }

    pub fn remove_package(&self, name: &str) {
        fs::remove_dir_all(self.layout.package_dir(name)).unwrap();
    }

    pub fn read_index_json(&self) -> serde_json::Value {
        let content = fs::read_to_string(self.layout.index_path()).unwrap();
        serde_json::from_str(&content).unwrap()
    }
}

/// Manifest JSON with every recognized field.
pub fn full_manifest(version: &str, description: &str, deps: &[&str]) -> String {
    serde_json::json!({
        "description": description,
        "license": "MIT",
        "authors": ["Test Author"],
        "maintainers": ["Test Maintainer"],
        "version": version,
        "dependencies": deps,
    })
    .to_string()
}
