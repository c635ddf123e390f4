//! Core types shared across the mirror.

use serde::{Serialize, Serializer};
use std::fmt;

/// Hash: 256-bit BLAKE3 digest
pub type Hash = [u8; 32];

/// Fingerprint of a whole directory tree.
///
/// `Empty` is reserved for trees without a single file, since the digest is not
/// defined over an empty file set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fingerprint {
    Empty,
    Digest(Hash),
}

impl Fingerprint {
    pub fn is_empty(&self) -> bool {
        matches!(self, Fingerprint::Empty)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fingerprint::Empty => f.write_str("empty"),
            Fingerprint::Digest(hash) => f.write_str(&hex::encode(hash)),
        }
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
