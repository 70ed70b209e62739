//! Remote connectors for failure-path tests.

use confsync_engine::{
    MemoryRemote, RemoteConnector, RemoteSettings, RemoteSource, SyncError, SyncResult,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// A connector that refuses the first `failures` connects, then hands out
/// the wrapped [`MemoryRemote`].
///
/// Each refusal carries the attempt number in its message, so tests can
/// tell which attempt an error came from.
#[derive(Debug)]
pub struct FlakyConnector {
    remote: MemoryRemote,
    failures: u32,
    connects: AtomicU32,
}

impl FlakyConnector {
    /// Wraps `remote`, failing the first `failures` connects.
    pub fn new(remote: MemoryRemote, failures: u32) -> Self {
        Self {
            remote,
            failures,
            connects: AtomicU32::new(0),
        }
    }

    /// A connector that never succeeds.
    pub fn dead() -> Self {
        Self::new(MemoryRemote::new(), u32::MAX)
    }

    /// The wrapped remote.
    pub fn remote(&self) -> &MemoryRemote {
        &self.remote
    }

    /// Number of connect calls so far.
    pub fn connect_count(&self) -> u32 {
        self.connects.load(Ordering::SeqCst)
    }
}

impl RemoteConnector for FlakyConnector {
    fn connect(&self, settings: &RemoteSettings) -> SyncResult<Arc<dyn RemoteSource>> {
        let attempt = self.connects.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.failures {
            return Err(SyncError::remote_retryable(format!(
                "connect attempt {attempt} refused"
            )));
        }
        self.remote.connect(settings)
    }
}
