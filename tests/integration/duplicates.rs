//! Move detection when several files share a name and content.

use treemirror::sync::SyncOp;

use crate::integration::support::Fixture;

fn fixture(source: &[&str], replica: &[&str]) -> Fixture {
    let fx = Fixture::new();
    for path in source {
        fx.write_source(path, "shared");
    }
    for path in replica {
        fx.write_replica(path, "shared");
    }
    fx
}

#[test]
fn more_sources_than_replicas_copies_every_file() {
    let fx = fixture(&["d1/x", "d2/x"], &["old/x"]);

    let report = fx.pass();

    assert_eq!(report.files_moved, 0);
    assert_eq!(report.files_copied, 2);
    assert_eq!(report.files_removed, 1);
    fx.assert_mirrored();
}

#[test]
fn equal_counts_relocate_every_file() {
    let fx = fixture(&["n1/x", "n2/x", "n3/x"], &["o1/x", "o2/x", "o3/x"]);

    let report = fx.pass();

    assert_eq!(report.files_moved, 3);
    assert_eq!(report.files_copied, 0);
    assert_eq!(report.files_removed, 0);
    assert_eq!(report.directories_removed, 3);
    fx.assert_mirrored();
}

#[test]
fn three_sources_two_replicas_copies_all_three() {
    let fx = fixture(&["a/x", "b/x", "c/x"], &["p/x", "q/x"]);

    let report = fx.pass();

    assert_eq!(report.files_moved, 0);
    assert_eq!(report.files_copied, 3);
    assert_eq!(report.files_removed, 2);
    fx.assert_mirrored();
}

#[test]
fn surplus_replica_copy_is_removed_after_moves() {
    let fx = fixture(&["a/x", "b/x"], &["p/x", "q/x", "r/x"]);

    let report = fx.pass();

    assert_eq!(report.files_moved, 2);
    assert_eq!(report.files_copied, 0);
    assert_eq!(report.files_removed, 1);
    fx.assert_mirrored();
}

#[test]
fn settled_replica_still_counts_towards_occurrences() {
    // a/x already matches in place; two more sources compete for one stray replica.
    let fx = fixture(&["a/x", "b/x", "c/x"], &["a/x", "old/x"]);

    let report = fx.pass();

    assert_eq!(report.files_moved, 0);
    assert_eq!(report.files_copied, 2);
    assert_eq!(report.files_removed, 1);
    fx.assert_mirrored();
}

#[test]
fn different_content_does_not_count_as_occurrence() {
    let fx = Fixture::new();
    fx.write_source("new/x", "shared");
    fx.write_source("other/x", "different");
    fx.write_replica("old/x", "shared");

    let report = fx.pass();

    assert_eq!(report.files_moved, 1);
    assert_eq!(report.files_copied, 1);
    fx.assert_mirrored();
}

#[test]
fn in_place_replica_is_consumed_by_earlier_source() {
    // b/x already sits where the source wants it, but a/x comes first in scan
    // order and takes it; c/x then refills b/x.
    let fx = fixture(&["a/x", "b/x"], &["b/x", "c/x"]);
    let replica = |p: &str| fx.replica.join(p);

    let plan = fx.engine().plan().unwrap();

    assert_eq!(
        plan.ops,
        vec![
            SyncOp::CreateDir { path: replica("a") },
            SyncOp::MoveFile {
                from: replica("b/x"),
                to: replica("a/x"),
            },
            SyncOp::MoveFile {
                from: replica("c/x"),
                to: replica("b/x"),
            },
            SyncOp::RemoveDir { path: replica("c") },
        ]
    );

    let report = fx.pass();
    assert_eq!(report.files_moved, 2);
    assert_eq!(report.files_copied, 0);
    assert_eq!(report.files_removed, 0);
    fx.assert_mirrored();
}
