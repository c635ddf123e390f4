//! treemirror: one-way polling directory mirror
//!
//! Keeps a replica directory tree byte-identical to a source tree. Each pass is
//! gated by whole-tree fingerprints; when they differ, missing directories are
//! created, files are copied, updated or relocated, and replica-only entries are
//! pruned.

pub mod config;
pub mod daemon;
pub mod error;
pub mod events;
pub mod logging;
pub mod sync;
pub mod tooling;
pub mod tree;
pub mod types;

pub use config::SyncConfig;
pub use daemon::{StopHandle, SyncDaemon};
pub use error::{Result, SyncError};
pub use events::{EventLog, FileEventLog, MemoryEventLog, SyncEvent};
pub use sync::{PassReport, SyncEngine};
