// tests/build_index.rs

//! Build mode: archives written to the pool and merged into the index.

mod common;

use ccpm::archive::codec;
use ccpm::{hash, orchestrator, Error, Index, Pool};
use common::{full_manifest, Workspace};
use serde_json::json;
use std::fs;

#[test]
fn test_single_package_scenario() {
    let ws = Workspace::new();
    ws.add_package(
        "foo",
        r#"{"version":"1.0","dependencies":[],"description":"d"}"#,
        &[("a.txt", "hello")],
    );

    let report = orchestrator::build(&ws.layout).unwrap();
    assert_eq!(report.processed, vec![("foo".to_string(), "1.0".to_string())]);

    let archive_path = ws.layout.pool_dir().join("foo.1.0.ccp");
    assert!(archive_path.exists());

    let record = codec::decode(&fs::read(&archive_path).unwrap()).unwrap();
    assert_eq!(record.files["a.txt"].content, "hello");
    assert_eq!(record.files["a.txt"].digest, hash::sha256(b"hello"));

    let index = ws.read_index_json();
    assert_eq!(index["foo"]["versions"]["1.0"]["dependencies"], json!([]));
    assert_eq!(index["foo"]["latest_version"], "1.0");
    assert_eq!(index["foo"]["description"], "d");
}

#[test]
fn test_index_digest_covers_archive_bytes() {
    let ws = Workspace::new();
    ws.add_package("foo", &full_manifest("1.0", "d", &[]), &[("a.txt", "hello")]);

    orchestrator::build(&ws.layout).unwrap();

    let stored = fs::read(ws.layout.pool_dir().join("foo.1.0.ccp")).unwrap();
    let index = Index::load(&ws.layout.index_path()).unwrap();
    assert_eq!(
        index.get("foo").unwrap().versions["1.0"].digest,
        hash::sha256(&stored)
    );
}

#[test]
fn test_nested_source_paths() {
    let ws = Workspace::new();
    ws.add_package(
        "lib",
        &full_manifest("0.3", "library", &["core"]),
        &[("init.lua", "return {}"), ("util/str/split.lua", "-- split")],
    );

    orchestrator::build(&ws.layout).unwrap();

    let pool = Pool::new(ws.layout.pool_dir());
    let archive = pool.read("lib", "0.3").unwrap();
    let paths: Vec<&str> = archive.record.files.keys().map(String::as_str).collect();
    assert_eq!(paths, vec!["init.lua", "util/str/split.lua"]);
    assert_eq!(archive.record.manifest.dependencies, Some(json!(["core"])));
}

#[test]
fn test_missing_manifest_is_isolated() {
    let ws = Workspace::new();
    ws.add_package("alpha", &full_manifest("1.0", "a", &[]), &[("a.txt", "a")]);
    ws.add_package_without_manifest("broken", &[("b.txt", "b")]);
    ws.add_package("gamma", &full_manifest("2.0", "g", &["alpha"]), &[("g.txt", "g")]);

    let report = orchestrator::build(&ws.layout).unwrap();

    assert_eq!(report.processed.len(), 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name, "broken");

    let index = Index::load(&ws.layout.index_path()).unwrap();
    assert_eq!(index.len(), 2);
    assert!(index.get("broken").is_none());
}

#[test]
fn test_malformed_manifest_is_isolated() {
    let ws = Workspace::new();
    ws.add_package("good", &full_manifest("1.0", "ok", &[]), &[("a.txt", "a")]);
    ws.add_package("bad", "{ \"version\": ", &[("a.txt", "a")]);

    let report = orchestrator::build(&ws.layout).unwrap();

    assert_eq!(report.processed.len(), 1);
    assert_eq!(report.skipped[0].name, "bad");
    assert!(!ws.layout.pool_dir().join("bad.1.0.ccp").exists());
}

#[test]
fn test_incomplete_manifest_still_builds() {
    let ws = Workspace::new();
    ws.add_package("min", r#"{"version": "0.1"}"#, &[("a.txt", "a")]);

    orchestrator::build(&ws.layout).unwrap();

    let index = ws.read_index_json();
    assert_eq!(index["min"]["description"], "");
    assert_eq!(index["min"]["versions"]["0.1"]["dependencies"], json!([]));
}

#[test]
fn test_loosely_typed_manifest_values_build() {
    let ws = Workspace::new();
    ws.add_package(
        "foo",
        r#"{"version":"1.0","authors":"Alice","description":"d","dependencies":[]}"#,
        &[("a.txt", "hello")],
    );

    let report = orchestrator::build(&ws.layout).unwrap();

    assert_eq!(report.processed, vec![("foo".to_string(), "1.0".to_string())]);
    assert!(report.skipped.is_empty());

    let stored = fs::read(ws.layout.pool_dir().join("foo.1.0.ccp")).unwrap();
    let record = codec::decode(&stored).unwrap();
    assert_eq!(record.manifest.authors, Some(json!("Alice")));
    assert_eq!(ws.read_index_json()["foo"]["description"], "d");
}

#[test]
fn test_non_string_version_is_skipped() {
    let ws = Workspace::new();
    ws.add_package("num", r#"{"version": 2}"#, &[("a.txt", "a")]);
    ws.add_package("ok", &full_manifest("1.0", "fine", &[]), &[("a.txt", "a")]);

    let report = orchestrator::build(&ws.layout).unwrap();

    assert_eq!(report.processed, vec![("ok".to_string(), "1.0".to_string())]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name, "num");
    assert!(ws.read_index_json().get("num").is_none());
}

#[test]
fn test_index_written_with_zero_packages() {
    let ws = Workspace::new();

    let report = orchestrator::build(&ws.layout).unwrap();

    assert!(report.processed.is_empty());
    assert_eq!(ws.read_index_json(), json!({}));
}

#[test]
fn test_incremental_preserves_other_packages() {
    let ws = Workspace::new();
    ws.add_package("a", &full_manifest("1.0", "package a", &[]), &[("a.txt", "a")]);
    orchestrator::build(&ws.layout).unwrap();
    let before = Index::load(&ws.layout.index_path()).unwrap();

    // Only b exists in the source tree now
    ws.remove_package("a");
    ws.add_package("b", &full_manifest("0.1", "package b", &["a"]), &[("b.txt", "b")]);
    orchestrator::build(&ws.layout).unwrap();

    let after = Index::load(&ws.layout.index_path()).unwrap();
    assert_eq!(after.get("a"), before.get("a"));
    assert_eq!(after.get("b").unwrap().latest_version, "0.1");
}

#[test]
fn test_new_version_keeps_old_versions() {
    let ws = Workspace::new();
    ws.add_package("foo", &full_manifest("2.0", "two", &[]), &[("a.txt", "v2")]);
    orchestrator::build(&ws.layout).unwrap();

    // Version moves "backwards": latest_version follows the last build
    ws.add_package("foo", &full_manifest("1.5", "one five", &[]), &[("a.txt", "v1.5")]);
    orchestrator::build(&ws.layout).unwrap();

    let index = Index::load(&ws.layout.index_path()).unwrap();
    let foo = index.get("foo").unwrap();
    assert_eq!(foo.versions.len(), 2);
    assert_eq!(foo.latest_version, "1.5");
    assert_eq!(foo.description, "one five");
    assert!(ws.layout.pool_dir().join("foo.2.0.ccp").exists());
}

#[test]
fn test_build_is_idempotent() {
    let ws = Workspace::new();
    ws.add_package(
        "foo",
        &full_manifest("1.0", "d", &["bar"]),
        &[("a.txt", "hello"), ("sub/b.txt", "world")],
    );
    let archive_path = ws.layout.pool_dir().join("foo.1.0.ccp");

    orchestrator::build(&ws.layout).unwrap();
    let first = fs::read(&archive_path).unwrap();
    let first_index = fs::read_to_string(ws.layout.index_path()).unwrap();

    orchestrator::build(&ws.layout).unwrap();
    let second = fs::read(&archive_path).unwrap();
    let second_index = fs::read_to_string(ws.layout.index_path()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first_index, second_index);
}

#[test]
fn test_unparseable_index_aborts_build() {
    let ws = Workspace::new();
    ws.add_package("foo", &full_manifest("1.0", "d", &[]), &[("a.txt", "a")]);
    fs::create_dir_all(ws.layout.pool_dir()).unwrap();
    fs::write(ws.layout.index_path(), "not json").unwrap();

    let err = orchestrator::build(&ws.layout).unwrap_err();

    assert!(matches!(err, Error::IndexUnparseable { .. }));
    // Nothing was built and the bad index was left alone
    assert!(!ws.layout.pool_dir().join("foo.1.0.ccp").exists());
    assert_eq!(fs::read_to_string(ws.layout.index_path()).unwrap(), "not json");
}

#[test]
fn test_unexpected_error_leaves_index_untouched() {
    let ws = Workspace::new();
    ws.add_package("aaa", &full_manifest("1.0", "first", &[]), &[("a.txt", "a")]);
    orchestrator::build(&ws.layout).unwrap();
    let before = fs::read_to_string(ws.layout.index_path()).unwrap();

    ws.add_package("bbb", &full_manifest("1.0", "binary", &[]), &[]);
    fs::write(ws.layout.source_dir("bbb").join("blob.bin"), [0xff, 0xfe, 0xfd]).unwrap();

    let err = orchestrator::build(&ws.layout).unwrap_err();

    assert!(matches!(err, Error::Build(_)));
    assert_eq!(fs::read_to_string(ws.layout.index_path()).unwrap(), before);
}

#[test]
fn test_missing_packages_dir_is_fatal() {
    let ws = Workspace::new();
    fs::remove_dir_all(ws.layout.packages_dir()).unwrap();

    assert!(matches!(
        orchestrator::build(&ws.layout),
        Err(Error::Io { .. })
    ));
    assert!(!ws.layout.index_path().exists());
}
