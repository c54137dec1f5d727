//! Atomic writer for the canonical config file.
//!
//! ## Write protocol
//!
//! 1. Normalize line endings to LF.
//! 2. Ensure the parent directory exists.
//! 3. Write to `<path>.regatta.tmp`.
//! 4. Rename to the final path (atomic on POSIX); remove the tmp on failure.
//!
//! Concurrent readers never observe a partially written file.

use std::path::{Path, PathBuf};

use crate::error::{persist_io, PersistError};

/// Durable destination for the canonical serialized config.
pub trait ConfigFileStore {
    fn write(&self, content: &str) -> Result<(), PersistError>;
}

/// Writes the canonical config file at a fixed, well-known path.
#[derive(Debug, Clone)]
pub struct AtomicFileStore {
    path: PathBuf,
}

impl AtomicFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The served file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the currently served content, if any.
    pub fn read(&self) -> Result<Option<String>, PersistError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(persist_io(&self.path, err)),
        }
    }
}

impl ConfigFileStore for AtomicFileStore {
    fn write(&self, content: &str) -> Result<(), PersistError> {
        let normalized = content.replace("\r\n", "\n");

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| persist_io(parent, e))?;
        }

        let tmp = PathBuf::from(format!("{}.regatta.tmp", self.path.display()));
        std::fs::write(&tmp, &normalized).map_err(|e| persist_io(&tmp, e))?;

        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(persist_io(&self.path, e));
        }

        tracing::info!("wrote config file: {}", self.path.display());
        Ok(())
    }
}
