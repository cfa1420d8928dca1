//! Persistence port.
//!
//! A store holds at most one serialized snapshot. The engine never touches
//! ambient storage; the host injects a store into `Game`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::core::StoreError;

/// Single-slot snapshot storage.
pub trait SnapshotStore {
    /// Replace the stored snapshot.
    fn write(&mut self, json: &str) -> Result<(), StoreError>;

    /// Stored snapshot, if any.
    fn read(&self) -> Result<Option<String>, StoreError>;

    /// Remove the stored snapshot. Clearing an empty store is not an error.
    fn clear(&mut self) -> Result<(), StoreError>;

    fn exists(&self) -> bool {
        matches!(self.read(), Ok(Some(_)))
    }
}

/// In-memory store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slot: Option<String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a document (e.g. an imported save).
    #[must_use]
    pub fn with_contents(json: impl Into<String>) -> Self {
        Self {
            slot: Some(json.into()),
        }
    }
}

impl SnapshotStore for MemoryStore {
    fn write(&mut self, json: &str) -> Result<(), StoreError> {
        self.slot = Some(json.to_string());
        Ok(())
    }

    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.slot.clone())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.slot = None;
        Ok(())
    }

    fn exists(&self) -> bool {
        self.slot.is_some()
    }
}

/// JSON file on disk.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn write(&mut self, json: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        // Atomic replace.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn read(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(Some(json)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }
}
