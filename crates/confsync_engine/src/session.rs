//! A managed configuration binding.

use crate::config::SessionConfig;
use crate::error::{SyncError, SyncResult};
use crate::remote::{ChangeEvent, ChangeListener, FullChangeEvent, RemoteSource};
use crate::state::{SyncState, SyncStats};
use confsync_storage::FallbackStore;
use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;

/// Caller-owned configuration value kept up to date by a session.
pub type SharedConfig<T> = Arc<RwLock<T>>;

/// One `(namespace, key, destination)` binding.
///
/// The session lock guards the cached raw value and the whole
/// decode → replace → persist sequence, so the acquisition path and any
/// number of listener threads are serialized per session. The destination
/// is only ever replaced with a fully decoded value.
pub struct SyncSession<T> {
    namespace: String,
    key: String,
    destination: SharedConfig<T>,
    store: Arc<dyn FallbackStore>,
    cached: Mutex<Option<String>>,
    state: RwLock<SyncState>,
    stats: RwLock<SyncStats>,
}

impl<T> std::fmt::Debug for SyncSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncSession")
            .field("namespace", &self.namespace)
            .field("key", &self.key)
            .field("fallback", &self.store.location())
            .field("state", &*self.state.read())
            .finish()
    }
}

impl<T> SyncSession<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    /// Creates an idle session.
    pub fn new(
        config: &SessionConfig,
        destination: SharedConfig<T>,
        store: Arc<dyn FallbackStore>,
    ) -> Self {
        Self {
            namespace: config.namespace.clone(),
            key: config.key.clone(),
            destination,
            store,
            cached: Mutex::new(None),
            state: RwLock::new(SyncState::Idle),
            stats: RwLock::new(SyncStats::default()),
        }
    }

    /// Namespace this session is bound to.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Key this session is bound to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The destination being kept up to date.
    pub fn destination(&self) -> &SharedConfig<T> {
        &self.destination
    }

    /// Location of the fallback record.
    pub fn fallback_location(&self) -> String {
        self.store.location()
    }

    /// Last raw value fetched or received.
    pub fn cached_raw(&self) -> Option<String> {
        self.cached.lock().clone()
    }

    /// Gets the current state.
    pub fn state(&self) -> SyncState {
        *self.state.read()
    }

    /// Gets the current stats.
    pub fn stats(&self) -> SyncStats {
        self.stats.read().clone()
    }

    pub(crate) fn set_state(&self, state: SyncState) {
        *self.state.write() = state;
    }

    pub(crate) fn record_attempt(&self) {
        self.stats.write().attempts += 1;
    }

    pub(crate) fn record_retry(&self) {
        self.stats.write().retries += 1;
    }

    /// Fetches, decodes and persists the current remote value.
    ///
    /// The fallback write is best effort: a failure is logged and counted,
    /// but the acquisition still succeeds.
    ///
    /// # Errors
    ///
    /// Returns the fetch or decode error. The destination is untouched.
    pub fn acquire(&self, source: &dyn RemoteSource) -> SyncResult<()> {
        let mut cached = self.cached.lock();

        let raw = source.fetch(&self.namespace, &self.key)?;
        *cached = Some(raw.clone());

        self.replace_destination(&raw)?;
        self.persist(&raw);
        Ok(())
    }

    /// Loads the destination from the fallback record.
    ///
    /// The record is not written back.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::FallbackUnavailable`] if the record is missing or
    /// unreadable, [`SyncError::Decode`] if it does not decode.
    pub fn restore_from_fallback(&self) -> SyncResult<()> {
        let mut cached = self.cached.lock();

        tracing::info!(
            namespace = %self.namespace,
            key = %self.key,
            path = %self.store.location(),
            "restoring config from fallback file"
        );

        let raw = self.store.load().map_err(SyncError::FallbackUnavailable)?;
        self.replace_destination(&raw)?;
        *cached = Some(raw);
        Ok(())
    }

    /// Decodes `raw` into a fresh value and swaps it in. Caller holds the session lock.
    fn replace_destination(&self, raw: &str) -> SyncResult<()> {
        let value: T = confsync_codec::decode_str(raw)?;
        *self.destination.write() = value;
        self.stats.write().last_update = Some(Instant::now());
        Ok(())
    }

    /// Writes the fallback record. Caller holds the session lock.
    fn persist(&self, raw: &str) {
        if let Err(e) = self.store.store(raw) {
            tracing::error!(
                namespace = %self.namespace,
                key = %self.key,
                path = %self.store.location(),
                error = %e,
                "failed to save config to fallback file"
            );
            let mut stats = self.stats.write();
            stats.persist_failures += 1;
            stats.last_error = Some(e.to_string());
        }
    }
}

impl<T> ChangeListener for SyncSession<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    fn on_change(&self, event: &ChangeEvent) {
        tracing::debug!(
            namespace = %event.namespace,
            changed = event.changes.len(),
            "config change notification"
        );
    }

    fn on_full_change(&self, event: &FullChangeEvent) {
        if event.namespace != self.namespace {
            self.stats.write().updates_ignored += 1;
            return;
        }

        let mut cached = self.cached.lock();

        let Some(raw) = event.changes.get(&self.key) else {
            self.stats.write().updates_ignored += 1;
            return;
        };
        *cached = Some(raw.clone());

        if let Err(e) = self.replace_destination(raw) {
            tracing::warn!(
                namespace = %self.namespace,
                key = %self.key,
                error = %e,
                "config update failed to parse, keeping previous value"
            );
            let mut stats = self.stats.write();
            stats.updates_rejected += 1;
            stats.last_error = Some(e.to_string());
            return;
        }

        self.persist(raw);
        self.stats.write().updates_applied += 1;
        tracing::info!(namespace = %self.namespace, key = %self.key, "config update applied");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RemoteSettings;
    use crate::memory::MemoryRemote;
    use confsync_storage::MemoryStore;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Default, Clone, PartialEq, Deserialize)]
    struct Pool {
        size: u32,
    }

    fn session(store: Arc<MemoryStore>) -> SyncSession<Pool> {
        let config = SessionConfig::new(RemoteSettings::default(), "application", "pool");
        SyncSession::new(&config, Arc::new(RwLock::new(Pool::default())), store)
    }

    fn full(pairs: &[(&str, &str)]) -> FullChangeEvent {
        FullChangeEvent {
            namespace: "application".into(),
            changes: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn acquire_decodes_and_persists() {
        let store = Arc::new(MemoryStore::new());
        let session = session(store.clone());
        let remote = MemoryRemote::new();
        remote.set_value("application", "pool", "size: 8");

        session.acquire(&remote).unwrap();

        assert_eq!(session.destination().read().size, 8);
        assert_eq!(session.cached_raw().as_deref(), Some("size: 8"));
        assert_eq!(store.data().as_deref(), Some("size: 8"));
    }

    #[test]
    fn acquire_decode_failure_leaves_destination() {
        let store = Arc::new(MemoryStore::new());
        let session = session(store.clone());
        let remote = MemoryRemote::new();
        remote.set_value("application", "pool", r#"{"size": "big"}"#);

        assert!(matches!(
            session.acquire(&remote),
            Err(SyncError::Decode(_))
        ));
        assert_eq!(*session.destination().read(), Pool::default());
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn acquire_swallows_persist_failure() {
        let store = Arc::new(MemoryStore::new());
        store.set_fail_writes(true);
        let session = session(store);
        let remote = MemoryRemote::new();
        remote.set_value("application", "pool", "size: 3");

        session.acquire(&remote).unwrap();

        assert_eq!(session.destination().read().size, 3);
        let stats = session.stats();
        assert_eq!(stats.persist_failures, 1);
        assert!(stats.last_error.is_some());
    }

    #[test]
    fn restore_missing_record() {
        let session = session(Arc::new(MemoryStore::new()));
        assert!(matches!(
            session.restore_from_fallback(),
            Err(SyncError::FallbackUnavailable(_))
        ));
    }

    #[test]
    fn restore_does_not_rewrite() {
        let store = Arc::new(MemoryStore::with_data(r#"{"size": 4}"#));
        let session = session(store.clone());

        session.restore_from_fallback().unwrap();

        assert_eq!(session.destination().read().size, 4);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn restore_corrupt_record_is_decode_error() {
        let session = session(Arc::new(MemoryStore::with_data("size: [")));
        assert!(matches!(
            session.restore_from_fallback(),
            Err(SyncError::Decode(_))
        ));
        assert_eq!(*session.destination().read(), Pool::default());
    }

    #[test]
    fn full_change_without_key_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        let session = session(store.clone());

        session.on_full_change(&full(&[("other", "size: 99")]));

        assert_eq!(*session.destination().read(), Pool::default());
        assert_eq!(session.cached_raw(), None);
        assert_eq!(session.stats().updates_ignored, 1);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn full_change_from_other_namespace_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        let session = session(store.clone());
        let mut event = full(&[("pool", "size: 77")]);
        event.namespace = "billing".into();

        session.on_full_change(&event);

        assert_eq!(*session.destination().read(), Pool::default());
        assert_eq!(session.cached_raw(), None);
        assert_eq!(session.stats().updates_ignored, 1);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn full_change_applies_and_persists() {
        let store = Arc::new(MemoryStore::new());
        let session = session(store.clone());

        session.on_full_change(&full(&[("pool", "size: 12"), ("other", "x")]));

        assert_eq!(session.destination().read().size, 12);
        assert_eq!(store.data().as_deref(), Some("size: 12"));
        assert_eq!(session.stats().updates_applied, 1);
    }

    #[test]
    fn full_change_bad_value_keeps_previous() {
        let store = Arc::new(MemoryStore::new());
        let session = session(store.clone());
        session.on_full_change(&full(&[("pool", "size: 5")]));

        session.on_full_change(&full(&[("pool", "size: lots")]));

        assert_eq!(session.destination().read().size, 5);
        assert_eq!(session.cached_raw().as_deref(), Some("size: lots"));
        assert_eq!(store.data().as_deref(), Some("size: 5"));
        assert_eq!(session.stats().updates_rejected, 1);
    }
}
