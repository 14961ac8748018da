//! Durable local storage for the cart.
//!
//! The cart is persisted as a single record under a fixed key
//! ([`CART_STORAGE_KEY`]) holding the JSON array of cart lines. There is no
//! versioning: a record that does not parse is discarded.
//!
//! # Backends
//!
//! - [`FileStorage`] - one `<key>.json` file in the configured data directory
//! - [`MemoryStorage`] - process-local, for tests and throwaway sessions

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Storage key of the cart record.
pub const CART_STORAGE_KEY: &str = "app_cart_v1";

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the record failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// The cart could not be encoded.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The backend's lock was poisoned by a panicking writer.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A key-value record store for the persisted cart.
pub trait CartStorage: Send + Sync {
    /// Read the raw record, or `None` if nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Replace the stored record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn save(&self, record: &str) -> Result<(), StorageError>;
}

// =============================================================================
// FileStorage
// =============================================================================

/// Stores the cart record as `<dir>/app_cart_v1.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{CART_STORAGE_KEY}.json")),
        }
    }

    /// Path of the cart record.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStorage for FileStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, record: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write then rename so a crash never leaves a half-written record
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, record)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-memory storage. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    record: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    /// Empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with `record`.
    #[must_use]
    pub fn with_record(record: impl Into<String>) -> Self {
        Self {
            record: Arc::new(Mutex::new(Some(record.into()))),
        }
    }

    /// The current record, if any.
    #[must_use]
    pub fn record(&self) -> Option<String> {
        self.record.lock().ok().and_then(|guard| guard.clone())
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        self.record
            .lock()
            .map(|guard| guard.clone())
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }

    fn save(&self, record: &str) -> Result<(), StorageError> {
        let mut guard = self
            .record
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        *guard = Some(record.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_missing_record_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_file_storage_round_trip_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested").join("data"));

        storage.save("[]").unwrap();
        storage.save(r#"[{"id":1}]"#).unwrap();

        assert_eq!(storage.load().unwrap().as_deref(), Some(r#"[{"id":1}]"#));
        assert!(storage.path().ends_with("app_cart_v1.json"));
        assert!(!storage.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_storage_unwritable_location_errors() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let storage = FileStorage::new(&blocker);
        assert!(matches!(storage.save("[]"), Err(StorageError::Io(_))));
    }

    #[test]
    fn test_memory_storage_clones_share_record() {
        let storage = MemoryStorage::new();
        let clone = storage.clone();

        clone.save("[]").unwrap();
        assert_eq!(storage.load().unwrap().as_deref(), Some("[]"));
        assert_eq!(MemoryStorage::with_record("x").record().as_deref(), Some("x"));
    }
}
