//! Blob identifiers and the generators that mint them

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque name of one stored blob
///
/// The name is used verbatim as the leaf of the blob's file path, so
/// generators must only produce path-safe names.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Id(String);

impl Id {
    /// Wrap a generator-minted name without validation
    pub fn new(name: impl Into<String>) -> Self {
        Id(name.into())
    }

    /// Build an id from untrusted input, rejecting names that are not a
    /// single path component
    pub fn parse(name: &str) -> crate::Result<Self> {
        if name.is_empty() || name == "." || name == ".." {
            return Err(crate::Error::InvalidId(format!("'{}'", name)));
        }
        if name.contains(['/', '\\', '\0']) {
            return Err(crate::Error::InvalidId(format!(
                "'{}' contains a path separator",
                name
            )));
        }
        Ok(Id(name.to_string()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id(s.to_string())
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id(s)
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Source of fresh blob identifiers
///
/// Implementations must never hand out the same name twice and must only
/// produce names that are valid as a single file name.
pub trait IdGenerator: Send + Sync {
    fn new_id(&self) -> Id;
}

/// Generates ULIDs, monotonic within one generator instance
pub struct UlidGenerator {
    inner: Mutex<ulid::Generator>,
}

impl UlidGenerator {
    pub fn new() -> Self {
        UlidGenerator {
            inner: Mutex::new(ulid::Generator::new()),
        }
    }
}

impl Default for UlidGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for UlidGenerator {
    fn new_id(&self) -> Id {
        let ulid = match self.inner.lock().generate() {
            Ok(ulid) => ulid,
            // Random part overflowed within one millisecond
            Err(_) => ulid::Ulid::new(),
        };
        Id(ulid.to_string())
    }
}
