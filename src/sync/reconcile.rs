//! Reconciler: directory creation and per-file resolution.

use crate::error::Result;
use crate::sync::file_sync::{FileAction, FileSync};
use crate::sync::moves::MoveDetector;
use crate::sync::plan::{PassState, SyncOp};
use crate::tree::ContentComparer;

pub struct Reconciler<'a> {
    file_sync: FileSync<'a>,
    moves: MoveDetector<'a>,
}

impl<'a> Reconciler<'a> {
    pub fn new(comparer: &'a dyn ContentComparer) -> Self {
        Self {
            file_sync: FileSync::new(comparer),
            moves: MoveDetector::new(comparer),
        }
    }

    /// Create every missing replica directory, parents first.
    ///
    /// A replica file squatting on a directory path is removed beforehand.
    pub(crate) fn create_directories(&self, state: &mut PassState<'_>) -> Result<()> {
        let source = state.source;
        for dir in &source.directories {
            let target = state.mapper.map(&dir.absolute_path)?;
            if state.is_replica_dir(&target) {
                continue;
            }
            if let Some(index) = state.replica_file_index(&target) {
                state.remove_file_at(index);
            }
            state.add_replica_dir(target.clone());
            state.plan.push(SyncOp::CreateDir { path: target });
        }
        Ok(())
    }

    /// Resolve every source file to a no-op, an overwrite, a move or a copy.
    pub(crate) fn resolve_files(&self, state: &mut PassState<'_>) -> Result<()> {
        let source = state.source;
        for file in &source.files {
            let target = state.mapper.map(&file.absolute_path)?;

            if state.is_replica_dir(&target) {
                state.remove_dir_tree(&target);
            }

            if let Some(index) = state.replica_file_index(&target) {
                let content_at = state.replica_files[index].content_at.clone();
                if self.file_sync.decide(&file.absolute_path, &content_at)? == FileAction::Update {
                    state.plan.push(SyncOp::UpdateFile {
                        from: file.absolute_path.clone(),
                        to: target,
                    });
                    state.replica_files[index].content_at = file.absolute_path.clone();
                }
                state.replica_files[index].settled = true;
                continue;
            }

            match self.moves.find_candidate(file, state)? {
                Some(index) => {
                    let from = state.relocate(index, target.clone());
                    state.plan.push(SyncOp::MoveFile { from, to: target });
                }
                None => {
                    state.plan.push(SyncOp::CopyFile {
                        from: file.absolute_path.clone(),
                        to: target,
                    });
                }
            }
        }
        Ok(())
    }
}
