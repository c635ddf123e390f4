//! Polling daemon: drives synchronization passes on a fixed interval.

use crate::sync::SyncEngine;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Default)]
struct StopSignal {
    stopped: Mutex<bool>,
    condvar: Condvar,
}

impl StopSignal {
    /// Sleep for `timeout` unless stopped first. Returns true once stopped.
    fn wait(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut stopped = self.stopped.lock();
        while !*stopped {
            if self.condvar.wait_until(&mut stopped, deadline).timed_out() {
                break;
            }
        }
        *stopped
    }

    fn is_stopped(&self) -> bool {
        *self.stopped.lock()
    }

    fn stop(&self) {
        *self.stopped.lock() = true;
        self.condvar.notify_all();
    }
}

/// Cloneable handle that stops a running daemon, waking it from its sleep.
#[derive(Clone)]
pub struct StopHandle {
    signal: Arc<StopSignal>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.signal.stop();
    }
}

/// Totals for a daemon run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DaemonSummary {
    pub passes: u64,
    pub failed_passes: u64,
    pub skipped_passes: u64,
}

/// Sync daemon
pub struct SyncDaemon {
    engine: SyncEngine,
    max_passes: Option<u64>,
    signal: Arc<StopSignal>,
}

impl SyncDaemon {
    pub fn new(engine: SyncEngine) -> Self {
        Self {
            engine,
            max_passes: None,
            signal: Arc::new(StopSignal::default()),
        }
    }

    /// Stop on its own after `passes` passes
    pub fn with_max_passes(mut self, passes: u64) -> Self {
        self.max_passes = Some(passes);
        self
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            signal: Arc::clone(&self.signal),
        }
    }

    pub fn engine(&self) -> &SyncEngine {
        &self.engine
    }

    /// Run passes until stopped. A failed pass is journaled and retried on the
    /// next tick; it never ends the loop.
    pub fn run(&self) -> DaemonSummary {
        let config = self.engine.config();
        info!(
            source = %config.source_root.display(),
            replica = %config.replica_root.display(),
            interval_secs = config.interval.as_secs_f64(),
            "Mirror daemon started"
        );

        let mut summary = DaemonSummary::default();
        loop {
            if self.signal.is_stopped() {
                break;
            }

            summary.passes += 1;
            match self.engine.run_pass() {
                Ok(report) if report.skipped => summary.skipped_passes += 1,
                Ok(report) => {
                    debug!(pass = summary.passes, operations = report.operations(), "Pass applied")
                }
                Err(e) => {
                    summary.failed_passes += 1;
                    debug!(pass = summary.passes, "Pass failed, retrying next tick");
                    self.engine.record_failure(&e);
                }
            }

            if self.max_passes.is_some_and(|max| summary.passes >= max) {
                break;
            }
            if self.signal.wait(config.interval) {
                break;
            }
        }

        info!(
            passes = summary.passes,
            failed = summary.failed_passes,
            skipped = summary.skipped_passes,
            "Mirror daemon stopped"
        );
        summary
    }
}
