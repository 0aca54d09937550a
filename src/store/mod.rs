//! Sharded file store
//!
//! Blobs are stored one file each, under nested directories named after
//! prefixes of a digest of the blob's id. Bytes always move through a
//! fixed-size chunk buffer.

mod copy;
mod file_store;
mod reader;
mod shard;

pub use copy::{copy_chunked, copy_from_file, copy_into_file, CHUNK_SIZE};
pub use file_store::FileStore;
pub use reader::BlobReader;
pub use shard::shard_path;
