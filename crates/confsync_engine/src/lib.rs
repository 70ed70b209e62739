//! # confsync Engine
//!
//! Keeps a process's typed configuration in sync with a config-center key,
//! surviving config-center outages.
//!
//! This crate provides:
//! - Bounded-retry acquisition of the initial value
//! - A local fallback file, rewritten on every successful parse and read
//!   back when the config center stays unreachable at startup
//! - Live updates: full-namespace change events are re-parsed and
//!   re-persisted under a per-session lock
//! - An in-process config center ([`MemoryRemote`]) for tests and embedding
//!
//! ## Architecture
//!
//! ```text
//! apply ─► connect ─► fetch ─► decode ─► replace destination ─► persist ─► subscribe
//!   │  (retried up to max_retries)
//!   └─► restore from fallback file (no subscription)
//!
//! change event ─► lookup key ─► decode ─► replace destination ─► persist
//! ```
//!
//! ## Key Invariants
//!
//! - At most one decode/persist cycle runs at a time per session
//! - The destination only ever holds a fully decoded value; a failed decode
//!   leaves the previous value in place
//! - Only [`apply`] reports errors; listener-path failures are logged and
//!   counted in [`SyncStats`]
//! - A fallback write failure never fails an otherwise successful update

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod apply;
mod config;
mod error;
mod memory;
mod remote;
mod session;
mod state;

pub use apply::{apply, apply_with_store};
pub use config::{RemoteSettings, RetryBudget, SessionConfig};
pub use error::{SyncError, SyncResult};
pub use memory::MemoryRemote;
pub use remote::{
    diff, ChangeEvent, ChangeListener, ChangeType, ConfigChange, FullChangeEvent,
    RemoteConnector, RemoteSource,
};
pub use session::{SharedConfig, SyncSession};
pub use state::{SyncState, SyncStats};

pub use confsync_codec::{decode, decode_str, CodecError, Format};
pub use confsync_storage::{fallback_path, FallbackStore, FileStore, MemoryStore, StorageError};
