//! Engines built with substitute digesters and comparers.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use treemirror::tree::{ByteComparer, ContentComparer, TreeDigester};
use treemirror::types::Hash;
use treemirror::SyncEngine;

use crate::integration::support::Fixture;

/// Claims every tree with files looks the same
struct ConstantDigester;

impl TreeDigester for ConstantDigester {
    fn digest(&self, _root: &Path) -> treemirror::Result<Hash> {
        Ok([7; 32])
    }
}

/// Byte comparison that counts how often it is consulted
#[derive(Default)]
struct CountingComparer {
    calls: Arc<AtomicUsize>,
}

impl ContentComparer for CountingComparer {
    fn same_content(&self, left: &Path, right: &Path) -> treemirror::Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ByteComparer::new().same_content(left, right)
    }
}

/// Treats all files as identical
struct AlwaysSame;

impl ContentComparer for AlwaysSame {
    fn same_content(&self, _left: &Path, _right: &Path) -> treemirror::Result<bool> {
        Ok(true)
    }
}

#[test]
fn digester_decides_whether_a_pass_runs() {
    let fx = Fixture::new();
    fx.write_source("a.txt", "A");
    fx.write_replica("b.txt", "B");

    let engine = SyncEngine::with_capabilities(
        fx.config(),
        Box::new(ConstantDigester),
        Box::new(ByteComparer::new()),
        fx.log.clone(),
    );
    let report = engine.run_pass().unwrap();

    assert!(report.skipped);
    assert!(!fx.replica.join("a.txt").exists());
    assert!(fx.log.events().is_empty());
}

#[test]
fn empty_sentinel_bypasses_the_digester() {
    // Replica has files and source has none: Empty never equals a digest.
    let fx = Fixture::new();
    fx.write_replica("stale.txt", "S");

    let engine = SyncEngine::with_capabilities(
        fx.config(),
        Box::new(ConstantDigester),
        Box::new(ByteComparer::new()),
        fx.log.clone(),
    );
    let report = engine.run_pass().unwrap();

    assert!(!report.skipped);
    assert_eq!(report.files_removed, 1);
    fx.assert_mirrored();
}

#[test]
fn comparer_decides_overwrites() {
    let fx = Fixture::new();
    fx.write_source("a.txt", "new");
    fx.write_replica("a.txt", "old");

    let engine = SyncEngine::with_capabilities(
        fx.config(),
        Box::new(treemirror::tree::Blake3TreeDigester::new()),
        Box::new(AlwaysSame),
        fx.log.clone(),
    );
    let report = engine.run_pass().unwrap();

    assert_eq!(report.files_updated, 0);
    assert_eq!(fx.replica_content("a.txt").as_deref(), Some("old"));
}

#[test]
fn comparer_is_consulted_for_existing_replicas() {
    let fx = Fixture::new();
    fx.write_source("a.txt", "A");
    fx.write_replica("a.txt", "B");

    let comparer = CountingComparer::default();
    let calls = Arc::clone(&comparer.calls);
    let engine = SyncEngine::with_capabilities(
        fx.config(),
        Box::new(treemirror::tree::Blake3TreeDigester::new()),
        Box::new(comparer),
        fx.log.clone(),
    );
    let report = engine.run_pass().unwrap();

    assert_eq!(report.files_updated, 1);
    assert!(calls.load(Ordering::SeqCst) >= 1);
    fx.assert_mirrored();
}
