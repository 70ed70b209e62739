//! In-memory fallback store for testing.

use crate::backend::FallbackStore;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// An in-memory fallback store.
///
/// Suitable for unit and integration tests that should not touch the file
/// system. Writes can be made to fail to exercise the swallowed-persist paths.
///
/// # Example
///
/// ```rust
/// use confsync_storage::{FallbackStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// assert!(store.load().unwrap_err().is_not_found());
/// store.store("key: value").unwrap();
/// assert_eq!(store.load().unwrap(), "key: value");
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<Option<String>>,
    fail_writes: AtomicBool,
    writes: AtomicU64,
}

impl MemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds a record.
    ///
    /// Useful for testing restore scenarios.
    #[must_use]
    pub fn with_data(raw: impl Into<String>) -> Self {
        Self {
            data: RwLock::new(Some(raw.into())),
            ..Self::default()
        }
    }

    /// Returns the current record, if any.
    #[must_use]
    pub fn data(&self) -> Option<String> {
        self.data.read().clone()
    }

    /// Makes subsequent writes fail with an I/O error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }
}

impl FallbackStore for MemoryStore {
    fn load(&self) -> StorageResult<String> {
        self.data
            .read()
            .clone()
            .ok_or_else(|| StorageError::NotFound(PathBuf::from(self.location())))
    }

    fn store(&self, raw: &str) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "memory store is read-only",
            )));
        }
        *self.data.write() = Some(raw.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
