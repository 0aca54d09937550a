//! # shard_store
//!
//! An identifier-addressed blob store on the local filesystem.
//!
//! Each blob is written once under an id minted by an [`IdGenerator`] and
//! read back by that id. Files are spread over nested directories derived
//! from a digest of the id, so no single directory grows unbounded.
//!
//! ## Example
//!
//! ```ignore
//! use shard_store::FileStore;
//!
//! let store = FileStore::new("/var/lib/blobs")?;
//! let id = store.write_bytes(b"hello")?;
//! assert_eq!(store.read_to_vec(&id)?, b"hello");
//! store.remove(&id)?;
//! ```

pub mod config;
pub mod model;
pub mod store;

mod error;

pub use config::{ShardLayout, StoreConfig};
pub use error::{Error, Result};
pub use model::{DigestAlgorithm, Id, IdGenerator, UlidGenerator};
pub use store::{BlobReader, FileStore, CHUNK_SIZE};
