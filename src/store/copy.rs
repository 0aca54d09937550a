//! Chunked copy loops
//!
//! All copies go through one fixed-size buffer, so memory use stays at
//! [`CHUNK_SIZE`] no matter how large the blob is. A chunk that comes back
//! short is end-of-data only because [`fill_chunk`] keeps reading until the
//! buffer is full or the source returns `Ok(0)`.

use std::fs::File;
use std::io::{self, Read, Seek, Write};

/// Bytes moved per transfer
pub const CHUNK_SIZE: usize = 16 * 1024;

/// Read from `src` until `buf` is full or the source is exhausted
fn fill_chunk<R: Read + ?Sized>(src: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match src.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Copy everything from `src` into `dest`, starting at the file's current
/// position. Returns the number of bytes written.
pub fn copy_into_file<R: Read + ?Sized>(src: &mut R, dest: &mut File) -> io::Result<u64> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    let start = dest.stream_position()?;
    let mut position = start;

    loop {
        let transferred = fill_chunk(src, &mut buf)?;
        dest.write_all(&buf[..transferred])?;
        position += transferred as u64;
        if transferred < CHUNK_SIZE {
            break;
        }
    }

    Ok(position - start)
}

/// Copy the rest of `src`, from its current position, into `dest`.
/// Returns the number of bytes written.
pub fn copy_from_file<W: Write + ?Sized>(src: &mut File, dest: &mut W) -> io::Result<u64> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    let start = src.stream_position()?;
    let mut position = start;

    loop {
        let transferred = fill_chunk(src, &mut buf)?;
        dest.write_all(&buf[..transferred])?;
        position += transferred as u64;
        if transferred < CHUNK_SIZE {
            break;
        }
    }

    dest.flush()?;
    Ok(position - start)
}

/// Copy between two arbitrary endpoints until `src` reports exhaustion
pub fn copy_chunked<R, W>(src: &mut R, dest: &mut W) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total = 0u64;

    loop {
        let n = match src.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        dest.write_all(&buf[..n])?;
        total += n as u64;
    }

    dest.flush()?;
    Ok(total)
}
