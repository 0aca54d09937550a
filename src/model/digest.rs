//! Digest algorithms used to derive shard directories

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hash function applied to a blob name to pick its shard directories
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// MD5, 32 hex chars. Matches existing on-disk layouts.
    #[default]
    Md5,
    /// BLAKE3, 64 hex chars
    Blake3,
}

impl DigestAlgorithm {
    /// Length of the hex rendering of a digest
    pub fn hex_len(&self) -> usize {
        match self {
            DigestAlgorithm::Md5 => 32,
            DigestAlgorithm::Blake3 => 64,
        }
    }

    /// Hash a string and render it as lowercase hex
    pub fn hex_digest(&self, input: &str) -> String {
        match self {
            DigestAlgorithm::Md5 => hex::encode(Md5::digest(input.as_bytes())),
            DigestAlgorithm::Blake3 => blake3::hash(input.as_bytes()).to_hex().to_string(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DigestAlgorithm::Md5 => "md5",
            DigestAlgorithm::Blake3 => "blake3",
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(DigestAlgorithm::Md5),
            "blake3" => Ok(DigestAlgorithm::Blake3),
            other => Err(crate::Error::Config(format!(
                "Unsupported digest algorithm: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
