//! Session state and statistics.

use std::time::Instant;

/// Where a session is in its acquisition lifecycle.
///
/// ```text
/// Idle -> Retrying -> Listening
///                  \-> FallbackRestored
///                  \-> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Session created, no attempt made yet.
    Idle,
    /// Attempting to fetch from the config center.
    Retrying,
    /// Acquired from the config center and subscribed to changes.
    Listening,
    /// Remote attempts exhausted; loaded from the fallback file.
    /// No live updates are received in this state.
    FallbackRestored,
    /// Remote attempts and fallback both failed.
    Failed,
}

impl SyncState {
    /// Returns true if the destination holds a usable value.
    pub fn is_acquired(&self) -> bool {
        matches!(self, SyncState::Listening | SyncState::FallbackRestored)
    }

    /// Returns true if the session receives live updates.
    pub fn is_live(&self) -> bool {
        matches!(self, SyncState::Listening)
    }
}

/// Statistics about a session.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Remote attempts made during acquisition.
    pub attempts: u64,
    /// Pauses taken between attempts.
    pub retries: u64,
    /// Live updates decoded and applied.
    pub updates_applied: u64,
    /// Live updates that failed to decode.
    pub updates_rejected: u64,
    /// Live updates that did not mention this session's key.
    pub updates_ignored: u64,
    /// Fallback writes that failed.
    pub persist_failures: u64,
    /// Last swallowed error message.
    pub last_error: Option<String>,
    /// Time the destination was last replaced.
    pub last_update: Option<Instant>,
}
