//! Read handle for a stored blob

use crate::model::Id;
use crate::store::copy::copy_chunked;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};

/// Open, read-only handle on one blob
///
/// Owns the underlying file; it is closed when the reader is dropped.
#[derive(Debug)]
pub struct BlobReader {
    id: Id,
    file: File,
    len: u64,
}

impl BlobReader {
    pub(crate) fn new(id: Id, file: File, len: u64) -> Self {
        BlobReader { id, file, len }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    /// Size of the blob in bytes, taken when the handle was opened
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stream the remaining bytes into `sink`
    pub fn copy_to<W: Write + ?Sized>(&mut self, sink: &mut W) -> io::Result<u64> {
        copy_chunked(&mut self.file, sink)
    }

    pub fn into_file(self) -> File {
        self.file
    }
}

impl Read for BlobReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Seek for BlobReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}
