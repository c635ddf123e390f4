use std::fs;

use treemirror::SyncEvent;

use crate::integration::support::Fixture;

#[test]
fn copies_new_file_into_empty_replica() {
    let fx = Fixture::new();
    fx.write_source("a.txt", "A");

    let report = fx.pass();

    assert_eq!(fx.replica_content("a.txt").as_deref(), Some("A"));
    assert_eq!(report.files_copied, 1);
    assert_eq!(fx.log.count("copied"), 1);
    assert_eq!(fx.log.events().len(), 1);
    fx.assert_mirrored();
}

#[test]
fn relocates_renamed_file_instead_of_copying() {
    let fx = Fixture::new();
    fx.write_source("sub/data.txt", "X");
    fx.write_replica("data.txt", "X");

    #[cfg(unix)]
    let inode_before = {
        use std::os::unix::fs::MetadataExt;
        fs::metadata(fx.replica.join("data.txt")).unwrap().ino()
    };

    let report = fx.pass();

    assert_eq!(report.files_moved, 1);
    assert_eq!(report.files_copied, 0);
    assert_eq!(fx.log.count("moved"), 1);
    assert_eq!(fx.log.count("copied"), 0);
    assert!(!fx.replica.join("data.txt").exists());
    assert_eq!(fx.replica_content("sub/data.txt").as_deref(), Some("X"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        let inode_after = fs::metadata(fx.replica.join("sub/data.txt")).unwrap().ino();
        assert_eq!(inode_before, inode_after);
    }
    fx.assert_mirrored();
}

#[test]
fn overwrites_modified_file() {
    let fx = Fixture::new();
    fx.write_source("a.txt", "B");
    fx.write_replica("a.txt", "A");

    let report = fx.pass();

    assert_eq!(fx.replica_content("a.txt").as_deref(), Some("B"));
    assert_eq!(report.files_updated, 1);
    assert_eq!(fx.log.count("copied"), 1);
    assert!(matches!(
        fx.log.events().as_slice(),
        [SyncEvent::FileUpdated { .. }]
    ));
}

#[test]
fn identical_file_is_left_alone() {
    let fx = Fixture::new();
    fx.write_source("same.txt", "S");
    fx.write_source("other.txt", "new");
    fx.write_replica("same.txt", "S");

    let report = fx.pass();

    assert_eq!(report.files_copied, 1);
    assert_eq!(report.files_updated, 0);
    assert_eq!(fx.log.events().len(), 1);
}

#[test]
fn removes_replica_only_entries_children_first() {
    let fx = Fixture::new();
    fx.write_source("keep.txt", "K");
    fx.write_replica("keep.txt", "K");
    fx.write_replica("extra.txt", "E");
    fs::create_dir_all(fx.replica.join("stale/inner/deeper")).unwrap();
    fs::create_dir_all(fx.replica.join("empty")).unwrap();

    let report = fx.pass();

    assert_eq!(report.files_removed, 1);
    assert!(!fx.replica.join("extra.txt").exists());
    assert!(!fx.replica.join("stale").exists());
    assert!(!fx.replica.join("empty").exists());
    fx.assert_mirrored();

    let removed_dirs: Vec<_> = fx
        .log
        .events()
        .into_iter()
        .filter_map(|e| match e {
            SyncEvent::DirectoryRemoved { path } => Some(path),
            _ => None,
        })
        .collect();
    let position = |suffix: &str| {
        removed_dirs
            .iter()
            .position(|p| p.ends_with(suffix))
            .unwrap_or_else(|| panic!("{} not removed", suffix))
    };
    assert!(position("stale/inner/deeper") < position("stale/inner"));
    assert!(position("stale/inner") < position("stale"));
}

#[test]
fn file_pruning_precedes_directory_pruning() {
    let fx = Fixture::new();
    fx.write_source("keep.txt", "K");
    fx.write_replica("gone/file.txt", "G");

    fx.pass();

    let events = fx.log.events();
    let file_index = events
        .iter()
        .position(|e| matches!(e, SyncEvent::FileRemoved { .. }))
        .unwrap();
    let dir_index = events
        .iter()
        .position(|e| matches!(e, SyncEvent::DirectoryRemoved { .. }))
        .unwrap();
    assert!(file_index < dir_index);
    fx.assert_mirrored();
}

#[test]
fn creates_nested_directories_parents_first() {
    let fx = Fixture::new();
    fx.write_source("a/b/c/file.txt", "F");
    fs::create_dir_all(fx.source.join("a/empty")).unwrap();

    let report = fx.pass();

    assert_eq!(report.directories_created, 4);
    assert_eq!(fx.log.count("created"), 4);
    let created: Vec<_> = fx
        .log
        .events()
        .into_iter()
        .filter_map(|e| match e {
            SyncEvent::DirectoryCreated { path } => Some(path),
            _ => None,
        })
        .collect();
    for (i, dir) in created.iter().enumerate() {
        if let Some(parent) = created.iter().position(|p| Some(p.as_path()) == dir.parent()) {
            assert!(parent < i);
        }
    }
    fx.assert_mirrored();
}

#[test]
fn second_pass_is_a_no_op() {
    let fx = Fixture::new();
    fx.write_source("a.txt", "A");
    fx.write_source("dir/b.txt", "B");
    fx.write_replica("old.txt", "O");

    let first = fx.pass();
    assert!(first.operations() > 0);
    let events_after_first = fx.log.events().len();

    let second = fx.pass();
    assert!(second.skipped);
    assert_eq!(second.operations(), 0);
    assert_eq!(fx.log.events().len(), events_after_first);

    // Bypassing the gate, a fresh plan is empty as well.
    assert!(fx.engine().plan().unwrap().is_empty());
}

#[test]
fn same_name_different_content_is_copied_not_moved() {
    let fx = Fixture::new();
    fx.write_source("new/x.txt", "2");
    fx.write_replica("old/x.txt", "1");

    let report = fx.pass();

    assert_eq!(report.files_moved, 0);
    assert_eq!(report.files_copied, 1);
    assert_eq!(report.files_removed, 1);
    fx.assert_mirrored();
}

#[test]
fn same_content_different_name_is_copied_not_moved() {
    let fx = Fixture::new();
    fx.write_source("renamed.txt", "C");
    fx.write_replica("original.txt", "C");

    let report = fx.pass();

    assert_eq!(report.files_moved, 0);
    assert_eq!(report.files_copied, 1);
    assert_eq!(report.files_removed, 1);
    fx.assert_mirrored();
}

#[test]
fn move_then_copy_back_into_vacated_path() {
    // a/f moved from b/f, while b/f itself gets new content from the source.
    let fx = Fixture::new();
    fx.write_source("a/f", "A");
    fx.write_source("b/f", "B");
    fx.write_replica("b/f", "A");

    let report = fx.pass();

    assert_eq!(report.files_moved, 1);
    assert_eq!(report.files_copied, 1);
    fx.assert_mirrored();
}

#[test]
fn replaces_directory_with_file() {
    let fx = Fixture::new();
    fx.write_source("thing", "now a file");
    fx.write_replica("thing/nested.txt", "N");

    fx.pass();

    assert_eq!(fx.replica_content("thing").as_deref(), Some("now a file"));
    fx.assert_mirrored();
}

#[test]
fn replaces_file_with_directory() {
    let fx = Fixture::new();
    fx.write_source("thing/nested.txt", "N");
    fx.write_replica("thing", "was a file");

    fx.pass();

    assert_eq!(fx.replica_content("thing/nested.txt").as_deref(), Some("N"));
    fx.assert_mirrored();
}

#[test]
fn copy_carries_modification_time() {
    let fx = Fixture::new();
    fx.write_source("a.txt", "A");
    let past = std::time::SystemTime::now() - std::time::Duration::from_secs(86_400);
    fs::File::options()
        .write(true)
        .open(fx.source.join("a.txt"))
        .unwrap()
        .set_modified(past)
        .unwrap();

    fx.pass();

    let source_mtime = fs::metadata(fx.source.join("a.txt")).unwrap().modified().unwrap();
    let replica_mtime = fs::metadata(fx.replica.join("a.txt")).unwrap().modified().unwrap();
    assert_eq!(source_mtime, replica_mtime);
}

#[test]
fn directory_only_trees_are_gated_as_empty() {
    let fx = Fixture::new();
    fs::create_dir_all(fx.source.join("only/dirs")).unwrap();

    let report = fx.pass();

    assert!(report.skipped);
    assert!(!fx.replica.join("only").exists());
}

#[test]
fn source_without_files_clears_replica() {
    let fx = Fixture::new();
    fs::create_dir_all(fx.source.join("kept")).unwrap();
    fx.write_replica("kept/old.txt", "O");
    fx.write_replica("elsewhere/x.txt", "X");

    fx.pass();

    fx.assert_mirrored();
    assert!(fx.replica.join("kept").is_dir());
}

#[test]
fn missing_source_root_fails_the_pass() {
    let fx = Fixture::new();
    fs::remove_dir_all(&fx.source).unwrap();
    assert!(fx.engine().run_pass().is_err());
}

#[cfg(unix)]
#[test]
fn non_unicode_names_are_told_apart() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let fx = Fixture::new();
    fs::write(fx.source.join(OsStr::from_bytes(b"\xff.txt")), "same").unwrap();
    fs::write(fx.replica.join(OsStr::from_bytes(b"\xfe.txt")), "same").unwrap();

    let status = fx.engine().status().unwrap();
    assert!(!status.unchanged());

    let report = fx.pass();

    assert!(!report.skipped);
    assert_eq!(report.files_copied, 1);
    assert_eq!(report.files_removed, 1);
    fx.assert_mirrored();
    assert!(fx.pass().skipped);
}
