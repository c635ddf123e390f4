//! Whole-tree fingerprints

use crate::error::{Result, SyncError};
use crate::tree::walker::TreeScanner;
use crate::types::{Fingerprint, Hash};
use std::fs::File;
use std::io;
use std::path::Path;

/// Produces a content-derived fingerprint of an entire directory tree
pub trait TreeDigester: Send + Sync {
    /// Digest of the tree at `root`. Only called for trees holding at least one file.
    fn digest(&self, root: &Path) -> Result<Hash>;
}

/// BLAKE3 digest over the sorted relative paths of every directory and every
/// file, each file contributing its content hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3TreeDigester {
    scanner: TreeScanner,
}

impl Blake3TreeDigester {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TreeDigester for Blake3TreeDigester {
    fn digest(&self, root: &Path) -> Result<Hash> {
        let inventory = self.scanner.scan(root)?;

        let mut records: Vec<(Vec<u8>, Option<Hash>)> = Vec::new();
        for dir in &inventory.directories {
            records.push((path_bytes(&dir.relative_path), None));
        }
        for file in &inventory.files {
            records.push((
                path_bytes(&file.relative_path),
                Some(hash_file(&file.absolute_path)?),
            ));
        }
        records.sort();

        let mut hasher = blake3::Hasher::new();
        for (path, content) in &records {
            hasher.update(if content.is_some() { b"F" } else { b"D" });
            hasher.update(&(path.len() as u64).to_le_bytes());
            hasher.update(path);
            if let Some(hash) = content {
                hasher.update(hash);
            }
        }
        Ok(*hasher.finalize().as_bytes())
    }
}

/// Fingerprint of `root`, or the `Empty` sentinel when it holds no files at all.
pub fn fingerprint(digester: &dyn TreeDigester, root: &Path) -> Result<Fingerprint> {
    if !contains_files(root)? {
        return Ok(Fingerprint::Empty);
    }
    digester.digest(root).map(Fingerprint::Digest)
}

/// BLAKE3 hash of a single file's content
pub fn hash_file(path: &Path) -> Result<Hash> {
    let mut file = File::open(path).map_err(|e| SyncError::io(path, e))?;
    let mut hasher = blake3::Hasher::new();
    io::copy(&mut file, &mut hasher).map_err(|e| SyncError::io(path, e))?;
    Ok(*hasher.finalize().as_bytes())
}

fn contains_files(root: &Path) -> Result<bool> {
    for entry in walkdir::WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = entry.map_err(|source| SyncError::Scan {
            root: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_dir() {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Raw bytes of a relative path. Names that are not valid Unicode must still
/// hash distinctly, so no lossy conversion happens here.
#[cfg(not(windows))]
fn path_bytes(path: &Path) -> Vec<u8> {
    path.as_os_str().as_encoded_bytes().to_vec()
}

// Separators are unified so the same tree hashes identically on every platform.
#[cfg(windows)]
fn path_bytes(path: &Path) -> Vec<u8> {
    path.as_os_str()
        .as_encoded_bytes()
        .iter()
        .map(|&b| if b == b'\\' { b'/' } else { b })
        .collect()
}
