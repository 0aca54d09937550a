//! Identifier-addressed blob store on the local filesystem
//!
//! Layout on disk:
//! ```text
//! <root>/
//!   9/
//!     90/
//!       <name>        blob bytes, nothing else
//! ```
//!
//! The directories are prefixes of the hex digest of `<name>` (one prefix
//! per shard level). There is no manifest or index; the tree is the index.

use crate::config::{ShardLayout, StoreConfig};
use crate::model::{Id, IdGenerator, UlidGenerator};
use crate::store::copy::{copy_from_file, copy_into_file};
use crate::store::reader::BlobReader;
use crate::store::shard::shard_path;
use crate::{Error, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A blob store rooted at one directory
///
/// Every call opens its own file handle, so a single store can be shared
/// between threads.
pub struct FileStore {
    /// Root of the shard tree
    root: PathBuf,
    /// Validated shard settings
    layout: ShardLayout,
    /// Mints ids for new blobs
    ids: Arc<dyn IdGenerator>,
}

impl FileStore {
    /// Open a store with the default layout and ULID ids, creating `root`
    /// if needed
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        Self::open(&StoreConfig::new(root), Arc::new(UlidGenerator::new()))
    }

    /// Open a store from a config
    ///
    /// Fails with [`Error::Config`] if the digest or level count is invalid.
    pub fn open(config: &StoreConfig, ids: Arc<dyn IdGenerator>) -> Result<Self> {
        let layout = config.validate()?;
        let root = config.root.clone();

        if !root.exists() {
            fs::create_dir_all(&root).map_err(|e| Error::io_at(&root, e))?;
            info!(root = %root.display(), "created store root");
        } else if !root.is_dir() {
            return Err(Error::Config(format!(
                "Store root is not a directory: {}",
                root.display()
            )));
        }

        Ok(FileStore { root, layout, ids })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn layout(&self) -> ShardLayout {
        self.layout
    }

    /// Where the blob for `id` lives (or would live)
    pub fn path_of(&self, id: &Id) -> PathBuf {
        self.shard_dir(id.name()).join(id.name())
    }

    /// Store everything `source` yields under a fresh id
    pub fn write<R: Read>(&self, source: R) -> Result<Id> {
        let id = self.ids.new_id();
        self.write_with_id(&id, source)?;
        Ok(id)
    }

    pub fn write_bytes(&self, data: &[u8]) -> Result<Id> {
        self.write(data)
    }

    /// Store `source` under a caller-chosen id
    ///
    /// Fails with [`Error::AlreadyExists`] if the id was written before. A
    /// failed copy leaves the partial file in place, so the id must not be
    /// reused.
    pub fn write_with_id<R: Read>(&self, id: &Id, mut source: R) -> Result<()> {
        let (path, mut file) = self.create_file(id.name())?;

        let written = copy_into_file(&mut source, &mut file).map_err(|e| Error::io_at(&path, e))?;
        file.sync_all().map_err(|e| Error::io_at(&path, e))?;

        debug!(id = %id, path = %path.display(), bytes = written, "wrote blob");
        Ok(())
    }

    /// Open the blob as a seekable handle
    pub fn read_channel(&self, id: &Id) -> Result<BlobReader> {
        let path = self.locate(id.name())?;
        let file = File::open(&path).map_err(|e| not_found_or_io(&path, e))?;
        let len = file
            .metadata()
            .map_err(|e| Error::io_at(&path, e))?
            .len();

        debug!(id = %id, bytes = len, "opened blob");
        Ok(BlobReader::new(id.clone(), file, len))
    }

    /// Open the blob as a buffered byte stream
    pub fn read_stream(&self, id: &Id) -> Result<BufReader<BlobReader>> {
        Ok(BufReader::new(self.read_channel(id)?))
    }

    /// Read the whole blob into memory
    pub fn read_to_vec(&self, id: &Id) -> Result<Vec<u8>> {
        let mut reader = self.read_channel(id)?;
        let mut data = Vec::with_capacity(reader.len() as usize);
        reader
            .read_to_end(&mut data)
            .map_err(|e| Error::io_at(self.path_of(id), e))?;
        Ok(data)
    }

    /// Copy the blob into `sink`, returning the number of bytes copied
    pub fn transfer_to<W: Write>(&self, id: &Id, mut sink: W) -> Result<u64> {
        let path = self.locate(id.name())?;
        let mut file = File::open(&path).map_err(|e| not_found_or_io(&path, e))?;

        let copied = copy_from_file(&mut file, &mut sink).map_err(|e| Error::io_at(&path, e))?;
        debug!(id = %id, bytes = copied, "transferred blob");
        Ok(copied)
    }

    /// Check if a blob exists for `id`
    pub fn contains(&self, id: &Id) -> bool {
        self.locate(id.name()).is_ok()
    }

    /// Size of the stored blob in bytes
    pub fn size_of(&self, id: &Id) -> Result<u64> {
        let path = self.locate(id.name())?;
        let meta = fs::metadata(&path).map_err(|e| not_found_or_io(&path, e))?;
        Ok(meta.len())
    }

    /// Delete the blob for `id`
    ///
    /// A missing blob is [`Error::NotFound`]. If the delete itself fails the
    /// error is logged and swallowed, so the blob may still be present.
    pub fn remove(&self, id: &Id) -> Result<()> {
        let path = self.locate(id.name())?;
        match fs::remove_file(&path) {
            Ok(()) => debug!(id = %id, path = %path.display(), "removed blob"),
            Err(e) => warn!(id = %id, path = %path.display(), error = %e, "failed to remove blob"),
        }
        Ok(())
    }

    // === Paths ===

    fn shard_dir(&self, name: &str) -> PathBuf {
        self.root
            .join(shard_path(name, self.layout.levels, self.layout.digest))
    }

    /// Create the shard directories and the blob file, failing if the file
    /// is already there
    fn create_file(&self, name: &str) -> Result<(PathBuf, File)> {
        let dir = self.shard_dir(name);
        fs::create_dir_all(&dir).map_err(|e| Error::io_at(&dir, e))?;

        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                Err(Error::AlreadyExists(path.display().to_string()))
            }
            Err(e) => Err(Error::io_at(path, e)),
        }
    }

    /// Resolve an existing blob file
    fn locate(&self, name: &str) -> Result<PathBuf> {
        let dir = self.shard_dir(name);
        if !dir.is_dir() {
            return Err(Error::NotFound(format!(
                "Could not find directory at {}",
                dir.display()
            )));
        }

        let path = dir.join(name);
        if !path.is_file() {
            return Err(Error::NotFound(format!(
                "Could not find file at {}",
                path.display()
            )));
        }
        Ok(path)
    }
}

/// A file that vanished between lookup and open is reported as not found
fn not_found_or_io(path: &Path, e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::NotFound {
        Error::NotFound(format!("Could not find file at {}", path.display()))
    } else {
        Error::io_at(path, e)
    }
}
