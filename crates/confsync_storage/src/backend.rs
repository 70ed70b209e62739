//! Fallback store trait definition.

use crate::error::StorageResult;

/// Durable cache of the last successfully parsed raw configuration value.
///
/// A store holds exactly one record. It does not interpret the text it keeps;
/// decoding is the caller's job.
///
/// # Invariants
///
/// - `store` overwrites; it never appends
/// - `load` returns exactly the text last passed to `store`
/// - `load` on a store that was never written fails with
///   [`StorageError::NotFound`](crate::StorageError::NotFound)
///
/// # Implementors
///
/// - [`super::FileStore`] - one text file per session
/// - [`super::MemoryStore`] - for testing
pub trait FallbackStore: Send + Sync {
    /// Reads the stored raw value.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing was stored, `Io` on any other failure.
    fn load(&self) -> StorageResult<String>;

    /// Replaces the stored raw value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn store(&self, raw: &str) -> StorageResult<()>;

    /// Human-readable location of the record, used in log fields.
    fn location(&self) -> String;
}
