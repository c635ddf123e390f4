//! Applies a planned pass to the replica and journals every mutation.

use crate::error::{Result, SyncError};
use crate::events::{EventLog, SyncEvent};
use crate::sync::plan::{SyncOp, SyncPlan};
use crate::sync::PassReport;
use std::fs::{self, File, FileTimes};
use std::path::Path;

pub struct Executor<'a> {
    event_log: &'a dyn EventLog,
}

impl<'a> Executor<'a> {
    pub fn new(event_log: &'a dyn EventLog) -> Self {
        Self { event_log }
    }

    /// Run every op in order. The first failure aborts the remainder of the pass.
    pub fn apply(&self, plan: &SyncPlan) -> Result<PassReport> {
        let mut report = PassReport::default();
        for op in plan.iter() {
            let event = apply_op(op)?;
            report.tally(op);
            self.event_log.record(&event)?;
        }
        Ok(report)
    }
}

fn apply_op(op: &SyncOp) -> Result<SyncEvent> {
    match op {
        SyncOp::CreateDir { path } => {
            fs::create_dir_all(path).map_err(|e| SyncError::io(path, e))?;
            Ok(SyncEvent::DirectoryCreated { path: path.clone() })
        }
        SyncOp::CopyFile { from, to } => {
            copy_with_metadata(from, to)?;
            Ok(SyncEvent::FileCopied {
                from: from.clone(),
                to: to.clone(),
            })
        }
        SyncOp::UpdateFile { from, to } => {
            make_writable(to)?;
            copy_with_metadata(from, to)?;
            Ok(SyncEvent::FileUpdated {
                from: from.clone(),
                to: to.clone(),
            })
        }
        SyncOp::MoveFile { from, to } => {
            fs::rename(from, to).map_err(|e| SyncError::io(from, e))?;
            Ok(SyncEvent::FileMoved {
                from: from.clone(),
                to: to.clone(),
            })
        }
        SyncOp::RemoveFile { path } => {
            fs::remove_file(path).map_err(|e| SyncError::io(path, e))?;
            Ok(SyncEvent::FileRemoved { path: path.clone() })
        }
        SyncOp::RemoveDir { path } => {
            fs::remove_dir_all(path).map_err(|e| SyncError::io(path, e))?;
            Ok(SyncEvent::DirectoryRemoved { path: path.clone() })
        }
    }
}

/// Copy content and permissions, then carry over access and modification times.
pub(crate) fn copy_with_metadata(from: &Path, to: &Path) -> Result<()> {
    fs::copy(from, to).map_err(|e| SyncError::io(to, e))?;

    let metadata = fs::metadata(from).map_err(|e| SyncError::io(from, e))?;
    let mut times = FileTimes::new();
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    open_for_times(to)
        .and_then(|file| file.set_times(times))
        .map_err(|e| SyncError::io(to, e))
}

// The copy may carry a read-only mode; owners can still set times through a
// read-only handle on unix.
#[cfg(unix)]
fn open_for_times(path: &Path) -> std::io::Result<File> {
    File::open(path)
}

#[cfg(not(unix))]
fn open_for_times(path: &Path) -> std::io::Result<File> {
    fs::OpenOptions::new().write(true).open(path)
}

fn make_writable(path: &Path) -> Result<()> {
    let mut permissions = fs::metadata(path)
        .map_err(|e| SyncError::io(path, e))?
        .permissions();
    if permissions.readonly() {
        permissions.set_readonly(false);
        fs::set_permissions(path, permissions).map_err(|e| SyncError::io(path, e))?;
    }
    Ok(())
}
