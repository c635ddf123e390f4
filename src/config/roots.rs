//! Source and replica root resolution.

use crate::error::{Result, SyncError};
use std::path::{Path, PathBuf};
use tracing::info;

/// Create the directory if missing and return its canonical absolute path.
pub fn ensure_dir(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| {
            SyncError::ConfigError(format!(
                "Failed to create directory {}: {}",
                path.display(),
                e
            ))
        })?;
        info!(path = %path.display(), "Created directory");
    }
    if !path.is_dir() {
        return Err(SyncError::ConfigError(format!(
            "{} exists but is not a directory",
            path.display()
        )));
    }
    dunce::canonicalize(path).map_err(|e| {
        SyncError::ConfigError(format!("Failed to canonicalize {}: {}", path.display(), e))
    })
}

/// Resolve both roots, refusing identical or nested roots.
pub fn resolve_roots(source: &Path, replica: &Path) -> Result<(PathBuf, PathBuf)> {
    let source_root = ensure_dir(source)?;
    let replica_root = ensure_dir(replica)?;

    if source_root.starts_with(&replica_root) || replica_root.starts_with(&source_root) {
        return Err(SyncError::ConfigError(format!(
            "Source {} and replica {} must not be the same or nested in each other",
            source_root.display(),
            replica_root.display()
        )));
    }

    std::fs::read_dir(&source_root).map_err(|e| {
        SyncError::ConfigError(format!(
            "Source {} is not readable: {}",
            source_root.display(),
            e
        ))
    })?;

    Ok((source_root, replica_root))
}
