//! CLI Tooling
//!
//! Command-line interface: run the polling mirror, run a single pass, inspect
//! the change gate, or print the effective configuration.

use crate::config::{ConfigLoader, MirrorConfig, SyncConfig};
use crate::daemon::SyncDaemon;
use crate::error::SyncError;
use crate::events::{EventLog, FileEventLog, SyncEvent};
use crate::logging::LoggingConfig;
use crate::sync::{ChangeGate, PassReport, SyncEngine};
use crate::tree::Blake3TreeDigester;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

/// treemirror - one-way polling mirror of a directory tree
#[derive(Parser)]
#[command(name = "treemirror")]
#[command(about = "Keep a replica directory identical to a source directory")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Source directory (default: ./Source)
    #[arg(long, global = true)]
    pub source: Option<PathBuf>,

    /// Replica directory (default: ./Replica)
    #[arg(long, global = true)]
    pub replica: Option<PathBuf>,

    /// Seconds between synchronization passes (default: 1)
    #[arg(long, global = true)]
    pub interval: Option<u64>,

    /// Event log file (default: ./treemirror.log)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Mirror continuously until terminated
    Run {
        /// Stop after this many passes
        #[arg(long)]
        iterations: Option<u64>,
    },
    /// Run a single synchronization pass
    Once {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show whether source and replica are in sync, without changing anything
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the effective configuration as TOML
    Config,
}

/// Resolved configuration plus command execution
pub struct CliContext {
    config: MirrorConfig,
}

impl CliContext {
    /// Load configuration layers and apply command-line overrides.
    pub fn from_cli(cli: &Cli) -> Result<Self, SyncError> {
        let mut config = match &cli.config {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };

        if let Some(source) = &cli.source {
            config.sync.source = source.clone();
        }
        if let Some(replica) = &cli.replica {
            config.sync.replica = replica.clone();
        }
        if let Some(interval) = cli.interval {
            config.sync.interval_secs = interval;
        }
        if let Some(log_file) = &cli.log_file {
            config.sync.log_file = log_file.clone();
        }

        if let Some(level) = &cli.log_level {
            config.logging.level = level.clone();
        } else if cli.verbose {
            config.logging.level = "debug".to_string();
        }
        if let Some(format) = &cli.log_format {
            config.logging.format = format.clone();
        }
        if let Some(output) = &cli.log_output {
            config.logging.output = output.clone();
        }

        Ok(Self::new(config))
    }

    pub fn new(config: MirrorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    pub fn logging_config(&self) -> &LoggingConfig {
        &self.config.logging
    }

    /// Execute a command and return its printable output
    pub fn execute(&self, command: &Commands) -> Result<String, SyncError> {
        match command {
            Commands::Run { iterations } => self.run(*iterations),
            Commands::Once { format } => self.once(format),
            Commands::Status { format } => self.status(format),
            Commands::Config => Ok(ConfigLoader::render(&self.config)?),
        }
    }

    fn sync_config(&self) -> Result<SyncConfig, SyncError> {
        self.config.sync.resolve()
    }

    /// Open the event journal and append the start banner.
    fn open_event_log(&self) -> Result<Arc<dyn EventLog>, SyncError> {
        let log = FileEventLog::open(&self.config.sync.log_file)?;
        log.record(&SyncEvent::Started)?;
        Ok(Arc::new(log))
    }

    fn run(&self, iterations: Option<u64>) -> Result<String, SyncError> {
        let sync_config = self.sync_config()?;
        let engine = SyncEngine::new(sync_config, self.open_event_log()?);
        let mut daemon = SyncDaemon::new(engine);
        if let Some(n) = iterations {
            daemon = daemon.with_max_passes(n);
        }
        let summary = daemon.run();
        Ok(format!(
            "Stopped after {} passes ({} skipped, {} failed)",
            summary.passes, summary.skipped_passes, summary.failed_passes
        ))
    }

    fn once(&self, format: &str) -> Result<String, SyncError> {
        validate_format(format)?;
        let sync_config = self.sync_config()?;
        let engine = SyncEngine::new(sync_config, self.open_event_log()?);
        let report = engine.run_pass().map_err(|e| {
            engine.record_failure(&e);
            e
        })?;
        if format == "json" {
            return serde_json::to_string_pretty(&report)
                .map_err(|e| SyncError::ConfigError(format!("Failed to render report: {}", e)));
        }
        Ok(format_report_text(&report))
    }

    fn status(&self, format: &str) -> Result<String, SyncError> {
        validate_format(format)?;
        let sync_config = self.sync_config()?;
        let digester = Blake3TreeDigester::new();
        let status = ChangeGate::new(&digester)
            .check(&sync_config.source_root, &sync_config.replica_root)?;

        if format == "json" {
            let value = json!({
                "source_root": sync_config.source_root,
                "replica_root": sync_config.replica_root,
                "source_fingerprint": status.source,
                "replica_fingerprint": status.replica,
                "in_sync": status.unchanged(),
            });
            return serde_json::to_string_pretty(&value)
                .map_err(|e| SyncError::ConfigError(format!("Failed to render status: {}", e)));
        }

        Ok(format!(
            "Source:  {} ({})\nReplica: {} ({})\nStatus:  {}",
            sync_config.source_root.display(),
            status.source,
            sync_config.replica_root.display(),
            status.replica,
            if status.unchanged() {
                "in sync"
            } else {
                "out of sync"
            }
        ))
    }
}

fn validate_format(format: &str) -> Result<(), SyncError> {
    match format {
        "text" | "json" => Ok(()),
        other => Err(SyncError::ConfigError(format!(
            "Invalid output format: {} (must be 'text' or 'json')",
            other
        ))),
    }
}

/// Human-readable pass summary
pub fn format_report_text(report: &PassReport) -> String {
    if report.skipped {
        return "Already in sync, nothing to do".to_string();
    }
    format!(
        "Pass complete: {} operations (created {} dirs, copied {}, updated {}, moved {}, removed {} files and {} dirs)",
        report.operations(),
        report.directories_created,
        report.files_copied,
        report.files_updated,
        report.files_moved,
        report.files_removed,
        report.directories_removed
    )
}
