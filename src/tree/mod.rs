//! Filesystem tree inventory, fingerprinting and comparison

pub mod compare;
pub mod hasher;
pub mod node;
pub mod path;
pub mod walker;

pub use compare::{ByteComparer, ContentComparer};
pub use hasher::{fingerprint, Blake3TreeDigester, TreeDigester};
pub use node::{DirectoryEntry, FileEntry, TreeInventory};
pub use path::PathMapper;
pub use walker::TreeScanner;
