//! Recursive directory enumeration.

use crate::error::{Result, SyncError};
use crate::tree::node::{DirectoryEntry, FileEntry, TreeInventory};
use std::path::Path;
use walkdir::WalkDir;

/// Walks a root top-down and inventories every directory and file beneath it.
///
/// Parents are always yielded before their children, which directory creation
/// relies on. Siblings come out sorted by file name. Symbolic links are not
/// followed and are reported as files.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeScanner;

impl TreeScanner {
    pub fn new() -> Self {
        Self
    }

    /// Scan `root`. Any unreadable entry fails the whole scan.
    pub fn scan(&self, root: &Path) -> Result<TreeInventory> {
        let mut inventory = TreeInventory::new(root);

        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|source| SyncError::Scan {
                root: root.to_path_buf(),
                source,
            })?;
            let absolute_path = entry.path().to_path_buf();
            let relative_path = absolute_path
                .strip_prefix(root)
                .map_err(|_| SyncError::OutsideRoot {
                    path: absolute_path.clone(),
                    root: root.to_path_buf(),
                })?
                .to_path_buf();

            if entry.file_type().is_dir() {
                inventory.directories.push(DirectoryEntry {
                    relative_path,
                    absolute_path,
                });
            } else {
                inventory.files.push(FileEntry {
                    relative_path,
                    absolute_path,
                });
            }
        }

        Ok(inventory)
    }
}
