//! Filesystem entry types produced by a tree scan

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// File entry: absolute location plus its path relative to the scanned root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub relative_path: PathBuf,
    pub absolute_path: PathBuf,
}

impl FileEntry {
    /// Base file name, used for name matching during move detection
    pub fn name(&self) -> Option<&OsStr> {
        self.absolute_path.file_name()
    }
}

/// Directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub relative_path: PathBuf,
    pub absolute_path: PathBuf,
}

/// Everything found under a root, in top-down walk order
#[derive(Debug, Clone, Default)]
pub struct TreeInventory {
    pub root: PathBuf,
    pub directories: Vec<DirectoryEntry>,
    pub files: Vec<FileEntry>,
}

impl TreeInventory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            directories: Vec::new(),
            files: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.files.is_empty()
    }

    /// Absolute directory paths
    pub fn directory_paths(&self) -> impl Iterator<Item = &Path> {
        self.directories.iter().map(|d| d.absolute_path.as_path())
    }

    /// Absolute file paths
    pub fn file_paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|f| f.absolute_path.as_path())
    }
}
