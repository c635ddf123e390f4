//! Error types for mirror operations

use std::path::PathBuf;

/// Result type for mirror operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors raised while configuring or running synchronization passes
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to scan {root}: {source}")]
    Scan {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Path {path} is not under root {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Event log error: {0}")]
    EventLog(String),
}

impl SyncError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<config::ConfigError> for SyncError {
    fn from(err: config::ConfigError) -> Self {
        SyncError::ConfigError(err.to_string())
    }
}
