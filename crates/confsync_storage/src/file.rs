//! File-based fallback store.

use crate::backend::FallbackStore;
use crate::error::{StorageError, StorageResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extension of fallback files.
pub const FALLBACK_EXTENSION: &str = "txt";

/// Derives the fallback file path for a `(namespace, key)` pair.
///
/// The name is `{namespace}_{key}.txt` inside `dir`. Neither part is escaped,
/// so callers must not use path separators or other path-hostile characters
/// in namespace or key.
pub fn fallback_path(dir: &Path, namespace: &str, key: &str) -> PathBuf {
    dir.join(format!("{namespace}_{key}.{FALLBACK_EXTENSION}"))
}

/// A fallback store backed by a single text file.
///
/// The file holds the raw value verbatim, so it stays human-readable and can
/// be edited by hand in an emergency. Data survives process restarts.
///
/// # Limitations
///
/// - `store` overwrites the file in place. A concurrent reader may observe a
///   partially written file.
/// - There is no cross-process locking. Two processes pointed at the same
///   namespace and key race on the same file.
///
/// # Example
///
/// ```no_run
/// use confsync_storage::{FallbackStore, FileStore};
/// use std::path::Path;
///
/// let store = FileStore::for_session(Path::new("."), "application", "db");
/// store.store("{\"port\": 8080}").unwrap();
/// assert_eq!(store.load().unwrap(), "{\"port\": 8080}");
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the store for a session, using [`fallback_path`].
    pub fn for_session(dir: &Path, namespace: &str, key: &str) -> Self {
        Self::new(fallback_path(dir, namespace, key))
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FallbackStore for FileStore {
    fn load(&self) -> StorageResult<String> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(raw),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(self.path.clone()))
            }
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn store(&self, raw: &str) -> StorageResult<()> {
        tracing::debug!(path = %self.path.display(), "writing fallback file");
        fs::write(&self.path, raw.as_bytes())?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
