use pardiff_common::{DiffError, Vfs, DEFAULT_CHUNK_SIZE};
use std::io::{self, Read};
use std::path::Path;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Byte-exact file comparison
///
/// Streams are read in lock-step one chunk at a time and the comparison stops
/// at the first chunk that differs. Lengths are checked before any read.
#[derive(Debug, Clone, Copy)]
pub struct ByteComparator {
    chunk_size: usize,
}

impl Default for ByteComparator {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl ByteComparator {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Compare two files through `vfs`.
    pub fn equal(&self, vfs: &dyn Vfs, left: &Path, right: &Path) -> Result<bool, DiffError> {
        let left_reader = vfs
            .open_file(left)
            .map_err(|e| DiffError::from_vfs(left, e))?;
        let right_reader = vfs
            .open_file(right)
            .map_err(|e| DiffError::from_vfs(right, e))?;

        let left_len = vfs
            .metadata(left)
            .map_err(|e| DiffError::from_vfs(left, e))?
            .size;
        let right_len = vfs
            .metadata(right)
            .map_err(|e| DiffError::from_vfs(right, e))?
            .size;

        self.compare(left_reader, left_len, right_reader, right_len)
            .map_err(|(side, source)| match side {
                Side::Left => DiffError::path_io(left, source),
                Side::Right => DiffError::path_io(right, source),
            })
    }

    /// Compare two arbitrary streams whose total lengths are already known.
    pub fn equal_streams<L: Read, R: Read>(
        &self,
        left: L,
        left_len: u64,
        right: R,
        right_len: u64,
    ) -> io::Result<bool> {
        self.compare(left, left_len, right, right_len)
            .map_err(|(_, source)| source)
    }

    fn compare<L: Read, R: Read>(
        &self,
        mut left: L,
        left_len: u64,
        mut right: R,
        right_len: u64,
    ) -> Result<bool, (Side, io::Error)> {
        if left_len != right_len {
            trace!("Size mismatch: {} vs {}", left_len, right_len);
            return Ok(false);
        }

        let mut left_buf = vec![0u8; self.chunk_size];
        let mut right_buf = vec![0u8; self.chunk_size];
        let mut offset = 0u64;

        loop {
            let left_read = fill_chunk(&mut left, &mut left_buf).map_err(|e| (Side::Left, e))?;
            let right_read =
                fill_chunk(&mut right, &mut right_buf).map_err(|e| (Side::Right, e))?;

            match (left_read, right_read) {
                (0, 0) => return Ok(true),
                // One stream ended early; the file changed after it was sized.
                (0, _) | (_, 0) => return Ok(false),
                _ => {}
            }

            if left_read != right_read {
                return Ok(false);
            }

            if left_buf[..left_read] != right_buf[..right_read] {
                trace!("Chunk mismatch at offset {}", offset);
                return Ok(false);
            }

            offset += left_read as u64;
        }
    }
}

/// Read until `buf` is full or the stream is exhausted.
///
/// A short read is not end-of-input, so a chunk is only short at the tail.
fn fill_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
