//! Core data model types for shard_store

mod digest;
mod id;

pub use digest::DigestAlgorithm;
pub use id::{Id, IdGenerator, UlidGenerator};
