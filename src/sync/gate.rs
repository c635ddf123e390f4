//! Change gate: skips a pass when both trees fingerprint identically.

use crate::error::Result;
use crate::tree::{fingerprint, TreeDigester};
use crate::types::Fingerprint;
use serde::Serialize;
use std::path::Path;

/// Fingerprints of both trees at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GateStatus {
    pub source: Fingerprint,
    pub replica: Fingerprint,
}

impl GateStatus {
    pub fn unchanged(&self) -> bool {
        self.source == self.replica
    }
}

pub struct ChangeGate<'a> {
    digester: &'a dyn TreeDigester,
}

impl<'a> ChangeGate<'a> {
    pub fn new(digester: &'a dyn TreeDigester) -> Self {
        Self { digester }
    }

    pub fn fingerprint(&self, root: &Path) -> Result<Fingerprint> {
        fingerprint(self.digester, root)
    }

    pub fn check(&self, source_root: &Path, replica_root: &Path) -> Result<GateStatus> {
        Ok(GateStatus {
            source: self.fingerprint(source_root)?,
            replica: self.fingerprint(replica_root)?,
        })
    }

    /// True when no reconciliation pass is needed
    pub fn unchanged(&self, source_root: &Path, replica_root: &Path) -> Result<bool> {
        Ok(self.check(source_root, replica_root)?.unchanged())
    }
}
