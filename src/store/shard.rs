//! Shard path computation
//!
//! A name hashing to `a1b2c3...` with two levels lives under `a/a1/`.
//! Segment `i` is the first `i` hex chars of the digest, which bounds the
//! fan-out of level `i` to 16 entries per parent directory.

use crate::model::DigestAlgorithm;
use std::path::PathBuf;

/// Directory prefix for `name`, relative to the store root
///
/// `levels` must not exceed `digest.hex_len()`; the store checks this when
/// it is constructed.
pub fn shard_path(name: &str, levels: usize, digest: DigestAlgorithm) -> PathBuf {
    let mut path = PathBuf::new();
    if levels == 0 {
        return path;
    }

    let hash = digest.hex_digest(name);
    for i in 1..=levels {
        path.push(&hash[..i]);
    }
    path
}
