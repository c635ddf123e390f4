//! Pass planning
//!
//! A pass is planned against the two inventories before anything is written.
//! Planning reads file contents for comparisons but never mutates either tree;
//! the resulting [`SyncPlan`] is applied afterwards by the executor.

use crate::error::Result;
use crate::sync::prune::Pruner;
use crate::sync::reconcile::Reconciler;
use crate::tree::{ContentComparer, FileEntry, PathMapper, TreeInventory};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// A single filesystem mutation on the replica
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SyncOp {
    CreateDir { path: PathBuf },
    CopyFile { from: PathBuf, to: PathBuf },
    UpdateFile { from: PathBuf, to: PathBuf },
    MoveFile { from: PathBuf, to: PathBuf },
    RemoveFile { path: PathBuf },
    RemoveDir { path: PathBuf },
}

/// Ordered list of operations for one pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncPlan {
    pub ops: Vec<SyncOp>,
}

impl SyncPlan {
    /// Plan a full pass: directory creation, file resolution, then pruning.
    pub fn build(
        source: &TreeInventory,
        replica: &TreeInventory,
        comparer: &dyn ContentComparer,
    ) -> Result<Self> {
        let mapper = PathMapper::new(&source.root, &replica.root);
        let mut state = PassState::new(source, replica, &mapper);

        let reconciler = Reconciler::new(comparer);
        reconciler.create_directories(&mut state)?;
        reconciler.resolve_files(&mut state)?;

        let pruner = Pruner::new();
        pruner.prune_files(&mut state)?;
        pruner.prune_directories(&mut state)?;

        Ok(state.plan)
    }

    pub fn push(&mut self, op: SyncOp) {
        self.ops.push(op);
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SyncOp> {
        self.ops.iter()
    }
}

/// Replica file as it will look once the ops planned so far have run
#[derive(Debug, Clone)]
pub(crate) struct ReplicaFile {
    /// Where the file will live
    pub path: PathBuf,
    /// Where its bytes can be read during planning
    pub content_at: PathBuf,
    /// Already resolved against a source file this pass
    pub settled: bool,
    /// Planned for removal
    pub removed: bool,
}

/// Working state threaded through the planning stages.
///
/// Replica files stay in scan order in `replica_files`; removal only marks an
/// entry, so indices held by the name index remain valid for the whole pass.
pub(crate) struct PassState<'a> {
    pub source: &'a TreeInventory,
    pub mapper: &'a PathMapper,
    pub source_files: HashSet<PathBuf>,
    pub source_dirs: HashSet<PathBuf>,
    source_by_name: HashMap<OsString, Vec<usize>>,
    pub replica_files: Vec<ReplicaFile>,
    replica_by_path: BTreeMap<PathBuf, usize>,
    replica_by_name: HashMap<OsString, Vec<usize>>,
    replica_dirs: BTreeSet<PathBuf>,
    pub plan: SyncPlan,
}

impl<'a> PassState<'a> {
    pub fn new(source: &'a TreeInventory, replica: &TreeInventory, mapper: &'a PathMapper) -> Self {
        let mut source_by_name: HashMap<OsString, Vec<usize>> = HashMap::new();
        for (index, file) in source.files.iter().enumerate() {
            if let Some(name) = file.name() {
                source_by_name.entry(name.to_os_string()).or_default().push(index);
            }
        }

        let mut replica_files = Vec::with_capacity(replica.files.len());
        let mut replica_by_path = BTreeMap::new();
        let mut replica_by_name: HashMap<OsString, Vec<usize>> = HashMap::new();
        for (index, file) in replica.files.iter().enumerate() {
            replica_by_path.insert(file.absolute_path.clone(), index);
            if let Some(name) = file.name() {
                replica_by_name.entry(name.to_os_string()).or_default().push(index);
            }
            replica_files.push(ReplicaFile {
                path: file.absolute_path.clone(),
                content_at: file.absolute_path.clone(),
                settled: false,
                removed: false,
            });
        }

        Self {
            source,
            mapper,
            source_files: source.file_paths().map(Path::to_path_buf).collect(),
            source_dirs: source.directory_paths().map(Path::to_path_buf).collect(),
            source_by_name,
            replica_files,
            replica_by_path,
            replica_by_name,
            replica_dirs: replica.directory_paths().map(Path::to_path_buf).collect(),
            plan: SyncPlan::default(),
        }
    }

    /// Live replica file currently planned to sit at `path`
    pub fn replica_file_index(&self, path: &Path) -> Option<usize> {
        self.replica_by_path.get(path).copied()
    }

    /// Source files named `name`, in scan order
    pub fn source_named(&self, name: &OsStr) -> impl Iterator<Item = &FileEntry> {
        self.source_by_name
            .get(name)
            .into_iter()
            .flatten()
            .map(move |&index| &self.source.files[index])
    }

    /// Indices of live replica files named `name`, in scan order
    pub fn replica_named(&self, name: &OsStr) -> impl Iterator<Item = usize> + '_ {
        self.replica_by_name
            .get(name)
            .into_iter()
            .flatten()
            .copied()
            .filter(move |&index| !self.replica_files[index].removed)
    }

    /// Live replica files in scan order
    pub fn live_replica_files(&self) -> impl Iterator<Item = (usize, &ReplicaFile)> {
        self.replica_files
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.removed)
    }

    pub fn is_replica_dir(&self, path: &Path) -> bool {
        self.replica_dirs.contains(path)
    }

    pub fn add_replica_dir(&mut self, path: PathBuf) {
        self.replica_dirs.insert(path);
    }

    /// Replica directories, deepest first
    pub fn replica_dirs_deepest_first(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = self.replica_dirs.iter().cloned().collect();
        dirs.sort_by(|a, b| {
            b.as_os_str()
                .len()
                .cmp(&a.as_os_str().len())
                .then_with(|| a.cmp(b))
        });
        dirs
    }

    /// Record that the replica file at `index` ends up at `target`.
    /// Returns where it lived before.
    pub fn relocate(&mut self, index: usize, target: PathBuf) -> PathBuf {
        let entry = &mut self.replica_files[index];
        let from = std::mem::replace(&mut entry.path, target.clone());
        entry.settled = true;
        self.replica_by_path.remove(&from);
        self.replica_by_path.insert(target, index);
        from
    }

    /// Plan removal of the replica file at `index`
    pub fn remove_file_at(&mut self, index: usize) {
        let entry = &mut self.replica_files[index];
        entry.removed = true;
        let path = entry.path.clone();
        self.replica_by_path.remove(&path);
        self.plan.push(SyncOp::RemoveFile { path });
    }

    /// Plan removal of a replica directory and everything beneath it
    pub fn remove_dir_tree(&mut self, dir: &Path) {
        // Descendants of `dir` sort contiguously right after it.
        let files: Vec<(PathBuf, usize)> = self
            .replica_by_path
            .range(dir.to_path_buf()..)
            .take_while(|(path, _)| path.starts_with(dir))
            .map(|(path, &index)| (path.clone(), index))
            .collect();
        for (path, index) in files {
            self.replica_by_path.remove(&path);
            self.replica_files[index].removed = true;
        }

        let dirs: Vec<PathBuf> = self
            .replica_dirs
            .range(dir.to_path_buf()..)
            .take_while(|path| path.starts_with(dir))
            .cloned()
            .collect();
        for path in dirs {
            self.replica_dirs.remove(&path);
        }

        self.plan.push(SyncOp::RemoveDir {
            path: dir.to_path_buf(),
        });
    }
}
