//! Synchronization pass
//!
//! One pass: the change gate compares fingerprints of both trees; when they
//! differ both trees are rescanned, a plan is built (directory creation, file
//! resolution with move detection, pruning) and applied to the replica.

pub mod execute;
pub mod file_sync;
pub mod gate;
pub mod moves;
pub mod plan;
pub mod prune;
pub mod reconcile;

pub use execute::Executor;
pub use gate::{ChangeGate, GateStatus};
pub use plan::{SyncOp, SyncPlan};

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::events::{EventLog, SyncEvent};
use crate::tree::{Blake3TreeDigester, ByteComparer, ContentComparer, TreeDigester, TreeScanner};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Summary of one pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    /// The change gate found both trees identical and nothing was scanned
    pub skipped: bool,
    pub directories_created: usize,
    pub files_copied: usize,
    pub files_updated: usize,
    pub files_moved: usize,
    pub files_removed: usize,
    pub directories_removed: usize,
}

impl PassReport {
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }

    /// Total number of mutations performed
    pub fn operations(&self) -> usize {
        self.directories_created
            + self.files_copied
            + self.files_updated
            + self.files_moved
            + self.files_removed
            + self.directories_removed
    }

    pub(crate) fn tally(&mut self, op: &SyncOp) {
        match op {
            SyncOp::CreateDir { .. } => self.directories_created += 1,
            SyncOp::CopyFile { .. } => self.files_copied += 1,
            SyncOp::UpdateFile { .. } => self.files_updated += 1,
            SyncOp::MoveFile { .. } => self.files_moved += 1,
            SyncOp::RemoveFile { .. } => self.files_removed += 1,
            SyncOp::RemoveDir { .. } => self.directories_removed += 1,
        }
    }
}

/// Runs synchronization passes for one source/replica pair
pub struct SyncEngine {
    config: SyncConfig,
    scanner: TreeScanner,
    digester: Box<dyn TreeDigester>,
    comparer: Box<dyn ContentComparer>,
    event_log: Arc<dyn EventLog>,
}

impl SyncEngine {
    /// Engine with the BLAKE3 digester and byte comparer
    pub fn new(config: SyncConfig, event_log: Arc<dyn EventLog>) -> Self {
        Self::with_capabilities(
            config,
            Box::new(Blake3TreeDigester::new()),
            Box::new(ByteComparer::new()),
            event_log,
        )
    }

    pub fn with_capabilities(
        config: SyncConfig,
        digester: Box<dyn TreeDigester>,
        comparer: Box<dyn ContentComparer>,
        event_log: Arc<dyn EventLog>,
    ) -> Self {
        Self {
            config,
            scanner: TreeScanner::new(),
            digester,
            comparer,
            event_log,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn event_log(&self) -> &Arc<dyn EventLog> {
        &self.event_log
    }

    /// Fingerprints of both trees; never mutates either side
    pub fn status(&self) -> Result<GateStatus> {
        ChangeGate::new(self.digester.as_ref())
            .check(&self.config.source_root, &self.config.replica_root)
    }

    /// Scan both trees and plan a pass without touching the replica
    pub fn plan(&self) -> Result<SyncPlan> {
        let source = self.scanner.scan(&self.config.source_root)?;
        let replica = self.scanner.scan(&self.config.replica_root)?;
        SyncPlan::build(&source, &replica, self.comparer.as_ref())
    }

    /// One gated pass. Errors abort the pass; the next pass starts from a fresh scan.
    pub fn run_pass(&self) -> Result<PassReport> {
        let started = Instant::now();
        let status = self.status()?;
        if status.unchanged() {
            debug!(fingerprint = %status.source, "Trees in sync, skipping pass");
            return Ok(PassReport::skipped());
        }

        let plan = self.plan()?;
        let report = Executor::new(self.event_log.as_ref()).apply(&plan)?;
        info!(
            operations = report.operations(),
            created = report.directories_created,
            copied = report.files_copied,
            updated = report.files_updated,
            moved = report.files_moved,
            removed_files = report.files_removed,
            removed_dirs = report.directories_removed,
            duration_ms = elapsed_millis(started),
            "Synchronization pass complete"
        );
        Ok(report)
    }

    /// Make a failed pass visible in both the diagnostics and the event journal.
    pub fn record_failure(&self, err: &SyncError) {
        error!(error = %err, "Synchronization pass failed");
        let event = SyncEvent::PassFailed {
            error: err.to_string(),
        };
        if let Err(log_err) = self.event_log.record(&event) {
            warn!(error = %log_err, "Failed to journal pass failure");
        }
    }
}

fn elapsed_millis(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
