//! Decides whether an existing replica file must be rewritten.

use crate::error::Result;
use crate::tree::ContentComparer;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Unchanged,
    Update,
}

pub struct FileSync<'a> {
    comparer: &'a dyn ContentComparer,
}

impl<'a> FileSync<'a> {
    pub fn new(comparer: &'a dyn ContentComparer) -> Self {
        Self { comparer }
    }

    /// Whole-file comparison of the source against the current replica bytes
    pub fn decide(&self, source: &Path, replica: &Path) -> Result<FileAction> {
        if self.comparer.same_content(source, replica)? {
            Ok(FileAction::Unchanged)
        } else {
            Ok(FileAction::Update)
        }
    }
}
