//! Correspondence mapping between the source and replica roots.

use crate::error::{Result, SyncError};
use std::path::{Path, PathBuf};

/// Maps a path under one root to the same relative path under another root.
#[derive(Debug, Clone)]
pub struct PathMapper {
    from_root: PathBuf,
    to_root: PathBuf,
}

impl PathMapper {
    pub fn new(from_root: impl Into<PathBuf>, to_root: impl Into<PathBuf>) -> Self {
        Self {
            from_root: from_root.into(),
            to_root: to_root.into(),
        }
    }

    /// Mapper for the opposite direction
    pub fn reversed(&self) -> Self {
        Self {
            from_root: self.to_root.clone(),
            to_root: self.from_root.clone(),
        }
    }

    pub fn from_root(&self) -> &Path {
        &self.from_root
    }

    pub fn to_root(&self) -> &Path {
        &self.to_root
    }

    /// Path relative to the origin root
    pub fn relative<'a>(&self, path: &'a Path) -> Result<&'a Path> {
        path.strip_prefix(&self.from_root)
            .map_err(|_| SyncError::OutsideRoot {
                path: path.to_path_buf(),
                root: self.from_root.clone(),
            })
    }

    /// Counterpart of `path` under the target root
    pub fn map(&self, path: &Path) -> Result<PathBuf> {
        let relative = self.relative(path)?;
        if relative.as_os_str().is_empty() {
            return Ok(self.to_root.clone());
        }
        Ok(self.to_root.join(relative))
    }
}
