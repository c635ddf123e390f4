//! Move detection
//!
//! When a source file has no replica counterpart yet, an existing replica file
//! with the same base name and identical bytes can be relocated instead of
//! copying the source again. Relocation across directories is intended.
//!
//! A candidate is withheld when more source files share its name and content
//! than there are replica files sharing them, so that one replica copy is not
//! consumed while other equally-shaped source files still need it. This is a
//! heuristic, not an optimal matching.

use crate::error::Result;
use crate::sync::plan::PassState;
use crate::tree::{ContentComparer, FileEntry};
use tracing::debug;

pub struct MoveDetector<'a> {
    comparer: &'a dyn ContentComparer,
}

impl<'a> MoveDetector<'a> {
    pub fn new(comparer: &'a dyn ContentComparer) -> Self {
        Self { comparer }
    }

    /// Index into `state.replica_files` of the first candidate that may be
    /// relocated to satisfy `source`, if any.
    pub(crate) fn find_candidate(
        &self,
        source: &FileEntry,
        state: &PassState<'_>,
    ) -> Result<Option<usize>> {
        let Some(name) = source.name() else {
            return Ok(None);
        };
        let mut source_occurrences: Option<usize> = None;

        for index in state.replica_named(name) {
            let candidate = &state.replica_files[index];
            if candidate.settled {
                continue;
            }
            if !self
                .comparer
                .same_content(&source.absolute_path, &candidate.content_at)?
            {
                continue;
            }

            let n_src = match source_occurrences {
                Some(n) => n,
                None => {
                    let n = self.count_source_occurrences(source, state)?;
                    source_occurrences = Some(n);
                    n
                }
            };
            let n_rep = self.count_replica_occurrences(index, state)?;

            if n_src > n_rep {
                debug!(
                    source = %source.absolute_path.display(),
                    candidate = %candidate.path.display(),
                    n_src,
                    n_rep,
                    "Move candidate withheld"
                );
                continue;
            }
            return Ok(Some(index));
        }

        Ok(None)
    }

    /// Source files sharing name and content with `source`, itself included
    fn count_source_occurrences(&self, source: &FileEntry, state: &PassState<'_>) -> Result<usize> {
        let Some(name) = source.name() else {
            return Ok(1);
        };
        let mut count = 0;
        for other in state.source_named(name) {
            if other.absolute_path == source.absolute_path
                || self
                    .comparer
                    .same_content(&source.absolute_path, &other.absolute_path)?
            {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Live replica files sharing name and content with the candidate, itself included
    fn count_replica_occurrences(&self, index: usize, state: &PassState<'_>) -> Result<usize> {
        let candidate = &state.replica_files[index];
        let Some(name) = candidate.path.file_name() else {
            return Ok(1);
        };
        let mut count = 0;
        for other_index in state.replica_named(name) {
            let other = &state.replica_files[other_index];
            if other_index == index
                || self
                    .comparer
                    .same_content(&candidate.content_at, &other.content_at)?
            {
                count += 1;
            }
        }
        Ok(count)
    }
}
