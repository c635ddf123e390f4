//! Byte-exact file comparison

use crate::error::{Result, SyncError};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const CHUNK_SIZE: usize = 64 * 1024;

/// Decides whether two files hold identical bytes
pub trait ContentComparer: Send + Sync {
    fn same_content(&self, left: &Path, right: &Path) -> Result<bool>;
}

/// Compares lengths first, then streams both files chunk by chunk.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteComparer;

impl ByteComparer {
    pub fn new() -> Self {
        Self
    }
}

impl ContentComparer for ByteComparer {
    fn same_content(&self, left: &Path, right: &Path) -> Result<bool> {
        let left_len = std::fs::metadata(left)
            .map_err(|e| SyncError::io(left, e))?
            .len();
        let right_len = std::fs::metadata(right)
            .map_err(|e| SyncError::io(right, e))?
            .len();
        if left_len != right_len {
            return Ok(false);
        }

        let mut left_reader =
            BufReader::new(File::open(left).map_err(|e| SyncError::io(left, e))?);
        let mut right_reader =
            BufReader::new(File::open(right).map_err(|e| SyncError::io(right, e))?);
        let mut left_buf = vec![0u8; CHUNK_SIZE];
        let mut right_buf = vec![0u8; CHUNK_SIZE];

        loop {
            let n = read_full(&mut left_reader, &mut left_buf).map_err(|e| SyncError::io(left, e))?;
            let m =
                read_full(&mut right_reader, &mut right_buf).map_err(|e| SyncError::io(right, e))?;
            if n != m || left_buf[..n] != right_buf[..m] {
                return Ok(false);
            }
            if n == 0 {
                return Ok(true);
            }
        }
    }
}

// Fill as much of `buf` as the reader allows; short only at end of file.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}
