//! Pruner: removes replica entries that have no source counterpart.

use crate::error::Result;
use crate::sync::plan::PassState;

#[derive(Debug, Default)]
pub struct Pruner;

impl Pruner {
    pub fn new() -> Self {
        Self
    }

    /// Remove replica files whose mapped source path is not a source file.
    pub(crate) fn prune_files(&self, state: &mut PassState<'_>) -> Result<()> {
        let reverse = state.mapper.reversed();
        let mut orphans = Vec::new();
        for (index, file) in state.live_replica_files() {
            if !state.source_files.contains(&reverse.map(&file.path)?) {
                orphans.push(index);
            }
        }
        for index in orphans {
            state.remove_file_at(index);
        }
        Ok(())
    }

    /// Remove replica directories without a source directory, deepest first,
    /// taking each whole subtree with it.
    pub(crate) fn prune_directories(&self, state: &mut PassState<'_>) -> Result<()> {
        let reverse = state.mapper.reversed();
        for dir in state.replica_dirs_deepest_first() {
            if state.is_replica_dir(&dir) && !state.source_dirs.contains(&reverse.map(&dir)?) {
                state.remove_dir_tree(&dir);
            }
        }
        Ok(())
    }
}
