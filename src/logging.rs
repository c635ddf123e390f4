//! Diagnostic logging
//!
//! Operator-facing `tracing` output. Replica mutations are journaled separately
//! by [`crate::events`]; each journal entry is also emitted here under the
//! `treemirror::events` target.
//!
//! Every setting can be overridden from the environment:
//! `TREEMIRROR_LOG` (filter directives, e.g. `treemirror::sync=debug`),
//! `TREEMIRROR_LOG_FORMAT`, `TREEMIRROR_LOG_OUTPUT` and `TREEMIRROR_LOG_FILE`.

use crate::error::SyncError;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const DIAGNOSTICS_FILE: &str = "treemirror-diagnostics.log";

/// `[logging]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// trace, debug, info, warn, error or off
    #[serde(default = "default_level")]
    pub level: String,

    /// text or json
    #[serde(default = "default_format")]
    pub format: String,

    /// stdout, stderr, file, file+stderr or both
    #[serde(default = "default_output")]
    pub output: String,

    /// Diagnostics file when output includes `file`; defaults to the platform state dir
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// ANSI colors for terminal text output
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_true() -> bool {
    true
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(SyncError::ConfigError(format!(
                "Invalid log format: {} (must be 'text' or 'json')",
                other
            ))),
        }
    }
}

/// Where diagnostics go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
    Both,
    File,
    FileAndStderr,
}

impl LogOutput {
    fn uses_file(self) -> bool {
        matches!(self, LogOutput::File | LogOutput::FileAndStderr)
    }
}

impl FromStr for LogOutput {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stdout" => Ok(LogOutput::Stdout),
            "stderr" => Ok(LogOutput::Stderr),
            "both" => Ok(LogOutput::Both),
            "file" => Ok(LogOutput::File),
            "file+stderr" => Ok(LogOutput::FileAndStderr),
            other => Err(SyncError::ConfigError(format!(
                "Invalid log output: {} (must be 'stdout', 'stderr', 'both', 'file' or 'file+stderr')",
                other
            ))),
        }
    }
}

/// Value of `var` when set and non-empty, else the configured one
fn env_or(var: &str, configured: &str) -> String {
    match std::env::var(var) {
        Ok(value) if !value.is_empty() => value,
        _ => configured.to_string(),
    }
}

/// Install the global subscriber. A second call fails.
pub fn init_logging(config: &LoggingConfig) -> Result<(), SyncError> {
    if !config.enabled {
        return Ok(());
    }

    let filter = match EnvFilter::try_from_env("TREEMIRROR_LOG") {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            SyncError::ConfigError(format!("Invalid log level {}: {}", config.level, e))
        })?,
    };
    let format: LogFormat = env_or("TREEMIRROR_LOG_FORMAT", &config.format).parse()?;
    let output: LogOutput = env_or("TREEMIRROR_LOG_OUTPUT", &config.output).parse()?;
    let writer = make_writer(output, config.file.as_deref())?;
    let ansi = config.color && !output.uses_file();

    let registry = Registry::default().with(filter);
    let installed = match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .try_init(),
    };
    installed.map_err(|e| SyncError::ConfigError(format!("Failed to install logger: {}", e)))
}

fn make_writer(output: LogOutput, configured_file: Option<&Path>) -> Result<BoxMakeWriter, SyncError> {
    let writer = match output {
        LogOutput::Stdout => BoxMakeWriter::new(io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(io::stderr),
        LogOutput::Both => BoxMakeWriter::new(io::stdout.and(io::stderr)),
        LogOutput::File => {
            let file = open_append(&diagnostics_path(configured_file)?)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        LogOutput::FileAndStderr => {
            let file = open_append(&diagnostics_path(configured_file)?)?;
            BoxMakeWriter::new(Mutex::new(file).and(io::stderr))
        }
    };
    Ok(writer)
}

/// Diagnostics file: `TREEMIRROR_LOG_FILE`, then the configured path, then
/// the platform state directory (cache directory where there is none).
pub fn diagnostics_path(configured: Option<&Path>) -> Result<PathBuf, SyncError> {
    if let Ok(path) = std::env::var("TREEMIRROR_LOG_FILE") {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    if let Some(path) = configured.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path.to_path_buf());
    }
    let dirs = directories::ProjectDirs::from("", "", "treemirror").ok_or_else(|| {
        SyncError::ConfigError("Could not determine a state directory for diagnostics".to_string())
    })?;
    let dir = dirs.state_dir().unwrap_or_else(|| dirs.cache_dir());
    Ok(dir.join(DIAGNOSTICS_FILE))
}

fn open_append(path: &Path) -> Result<File, SyncError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| SyncError::io(parent, e))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| SyncError::io(path, e))
}
