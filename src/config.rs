//! Store configuration
//!
//! Stored as JSON, by default in ~/.config/shardstore/config.json:
//! ```json
//! { "root": "/var/lib/blobs", "shard_levels": 2, "digest": "md5" }
//! ```

use crate::model::DigestAlgorithm;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default number of nested shard directories
pub const DEFAULT_SHARD_LEVELS: usize = 2;

/// Configuration for a [`FileStore`](crate::FileStore)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Root directory all blobs live under
    pub root: PathBuf,
    /// Number of nested shard directories
    #[serde(default = "default_shard_levels")]
    pub shard_levels: usize,
    /// Digest used for shard names ("md5" or "blake3")
    #[serde(default = "default_digest")]
    pub digest: String,
}

fn default_shard_levels() -> usize {
    DEFAULT_SHARD_LEVELS
}

fn default_digest() -> String {
    DigestAlgorithm::default().as_str().to_string()
}

/// Shard settings after validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardLayout {
    pub levels: usize,
    pub digest: DigestAlgorithm,
}

impl StoreConfig {
    /// Config with default shard layout for the given root
    pub fn new(root: impl Into<PathBuf>) -> Self {
        StoreConfig {
            root: root.into(),
            shard_levels: DEFAULT_SHARD_LEVELS,
            digest: default_digest(),
        }
    }

    pub fn with_shard_levels(mut self, levels: usize) -> Self {
        self.shard_levels = levels;
        self
    }

    pub fn with_digest(mut self, digest: DigestAlgorithm) -> Self {
        self.digest = digest.as_str().to_string();
        self
    }

    /// Load a config from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: StoreConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Default config file location (~/.config/shardstore/config.json)
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not find config directory".into()))?;
        Ok(config_dir.join("shardstore").join("config.json"))
    }

    /// Resolve the digest and check the level count against it
    pub fn validate(&self) -> Result<ShardLayout> {
        let digest: DigestAlgorithm = self.digest.parse()?;
        if self.shard_levels > digest.hex_len() {
            return Err(Error::Config(format!(
                "shard_levels {} exceeds {} digest length {}",
                self.shard_levels,
                digest,
                digest.hex_len()
            )));
        }
        Ok(ShardLayout {
            levels: self.shard_levels,
            digest,
        })
    }
}
