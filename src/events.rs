//! Event journal
//!
//! Every mutation performed on the replica is recorded as one timestamped line
//! in an append-only log file. Events are mirrored to `tracing` so they also
//! show up in diagnostic output.

use crate::error::{Result, SyncError};
use chrono::Local;
use parking_lot::Mutex;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Something that happened to the replica, or to the process driving it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    Started,
    DirectoryCreated { path: PathBuf },
    FileCopied { from: PathBuf, to: PathBuf },
    FileUpdated { from: PathBuf, to: PathBuf },
    FileMoved { from: PathBuf, to: PathBuf },
    FileRemoved { path: PathBuf },
    DirectoryRemoved { path: PathBuf },
    PassFailed { error: String },
}

impl SyncEvent {
    /// Short verb describing the event
    pub fn kind(&self) -> &'static str {
        match self {
            SyncEvent::Started => "started",
            SyncEvent::DirectoryCreated { .. } => "created",
            SyncEvent::FileCopied { .. } | SyncEvent::FileUpdated { .. } => "copied",
            SyncEvent::FileMoved { .. } => "moved",
            SyncEvent::FileRemoved { .. } | SyncEvent::DirectoryRemoved { .. } => "removed",
            SyncEvent::PassFailed { .. } => "failed",
        }
    }
}

impl fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncEvent::Started => write!(f, "### TREEMIRROR STARTED ###"),
            SyncEvent::DirectoryCreated { path } => {
                write!(f, "Created directory {}", path.display())
            }
            SyncEvent::FileCopied { from, to } => {
                write!(f, "Copied {} to {}", from.display(), to.display())
            }
            SyncEvent::FileUpdated { from, to } => write!(
                f,
                "Copied {} to {} (overwrote outdated replica)",
                from.display(),
                to.display()
            ),
            SyncEvent::FileMoved { from, to } => {
                write!(f, "Moved {} to {}", from.display(), to.display())
            }
            SyncEvent::FileRemoved { path } => write!(f, "Removed file {}", path.display()),
            SyncEvent::DirectoryRemoved { path } => {
                write!(f, "Removed directory {}", path.display())
            }
            SyncEvent::PassFailed { error } => write!(f, "Synchronization pass failed: {}", error),
        }
    }
}

/// Records timestamped events
pub trait EventLog: Send + Sync {
    fn record(&self, event: &SyncEvent) -> Result<()>;
}

/// Append-only event log file.
///
/// Lines look like `[2024-05-01 12:00:00] Copied /src/a.txt to /replica/a.txt`.
pub struct FileEventLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileEventLog {
    /// Open (creating if needed) the log file in append mode. Never truncates.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    SyncError::ConfigError(format!(
                        "Failed to create log directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                SyncError::ConfigError(format!(
                    "Failed to open event log {}: {}",
                    path.display(),
                    e
                ))
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventLog for FileEventLog {
    fn record(&self, event: &SyncEvent) -> Result<()> {
        mirror_to_tracing(event);
        let line = format!("[{}] {}\n", Local::now().format(TIMESTAMP_FORMAT), event);
        let mut file = self.file.lock();
        file.write_all(line.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| {
                SyncError::EventLog(format!("Failed to write {}: {}", self.path.display(), e))
            })
    }
}

/// In-memory event log, useful for tests and dry inspection
#[derive(Default)]
pub struct MemoryEventLog {
    events: Mutex<Vec<SyncEvent>>,
}

impl MemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SyncEvent> {
        self.events.lock().clone()
    }

    /// Number of recorded events whose `kind()` equals `kind`
    pub fn count(&self, kind: &str) -> usize {
        self.events.lock().iter().filter(|e| e.kind() == kind).count()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventLog for MemoryEventLog {
    fn record(&self, event: &SyncEvent) -> Result<()> {
        mirror_to_tracing(event);
        self.events.lock().push(event.clone());
        Ok(())
    }
}

fn mirror_to_tracing(event: &SyncEvent) {
    match event {
        SyncEvent::PassFailed { .. } => {
            tracing::error!(target: "treemirror::events", kind = event.kind(), "{}", event)
        }
        _ => tracing::info!(target: "treemirror::events", kind = event.kind(), "{}", event),
    }
}
