//! # confsync Storage
//!
//! Local fallback store for confsync.
//!
//! Every time a configuration value is parsed successfully, its raw text is
//! written here. When the remote config center is unreachable at startup,
//! the last good value is read back from this store instead.
//!
//! ## Design Principles
//!
//! - One record per `(namespace, key)` session
//! - The record is the raw text, not a binary format
//! - Writes overwrite; there is no history
//! - Stores must be `Send + Sync`, since the change-listener thread writes
//!   while the caller's thread may still be reading
//!
//! ## Available Stores
//!
//! - [`FileStore`] - persistent, one text file per session
//! - [`MemoryStore`] - for testing
//!
//! ## Example
//!
//! ```rust
//! use confsync_storage::{FallbackStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.store("{\"port\": 8080}").unwrap();
//! assert_eq!(store.load().unwrap(), "{\"port\": 8080}");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::FallbackStore;
pub use error::{StorageError, StorageResult};
pub use file::{fallback_path, FileStore, FALLBACK_EXTENSION};
pub use memory::MemoryStore;
