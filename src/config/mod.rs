//! Configuration
//!
//! Layered configuration: built-in defaults, an optional TOML file, then
//! `TREEMIRROR__*` environment variables. Command-line flags are applied on top
//! by the CLI. The result is resolved once into an immutable [`SyncConfig`].

pub mod facade;
pub mod merge;
pub mod paths;
pub mod roots;
pub mod sources;

pub use facade::ConfigLoader;
pub use roots::resolve_roots;

use crate::error::{Result, SyncError};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SOURCE_DIR: &str = "Source";
pub const DEFAULT_REPLICA_DIR: &str = "Replica";
pub const DEFAULT_LOG_FILE: &str = "treemirror.log";
pub const DEFAULT_INTERVAL_SECS: u64 = 1;

fn default_source() -> PathBuf {
    PathBuf::from(DEFAULT_SOURCE_DIR)
}

fn default_replica() -> PathBuf {
    PathBuf::from(DEFAULT_REPLICA_DIR)
}

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

/// Top-level configuration document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MirrorConfig {
    #[serde(default)]
    pub sync: SyncSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[sync]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Authoritative tree (created if absent)
    #[serde(default = "default_source")]
    pub source: PathBuf,

    /// Mirrored tree (created if absent)
    #[serde(default = "default_replica")]
    pub replica: PathBuf,

    /// Seconds between passes
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Append-only event log (created if absent)
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            source: default_source(),
            replica: default_replica(),
            interval_secs: default_interval_secs(),
            log_file: default_log_file(),
        }
    }
}

impl SyncSettings {
    pub fn interval(&self) -> Result<Duration> {
        if self.interval_secs == 0 {
            return Err(SyncError::ConfigError(
                "sync.interval_secs must be greater than zero".to_string(),
            ));
        }
        Ok(Duration::from_secs(self.interval_secs))
    }

    /// Create missing roots, canonicalize them and freeze the result.
    pub fn resolve(&self) -> Result<SyncConfig> {
        let interval = self.interval()?;
        let (source_root, replica_root) = resolve_roots(&self.source, &self.replica)?;
        Ok(SyncConfig {
            source_root,
            replica_root,
            interval,
        })
    }
}

/// Immutable runtime configuration of one mirror
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub source_root: PathBuf,
    pub replica_root: PathBuf,
    pub interval: Duration,
}

impl SyncConfig {
    /// Build from roots that are already absolute and existing
    pub fn new(
        source_root: impl Into<PathBuf>,
        replica_root: impl Into<PathBuf>,
        interval: Duration,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            replica_root: replica_root.into(),
            interval,
        }
    }
}
