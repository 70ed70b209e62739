//! In-process config center.

use crate::config::RemoteSettings;
use crate::error::{SyncError, SyncResult};
use crate::remote::{
    diff, ChangeEvent, ChangeListener, FullChangeEvent, RemoteConnector, RemoteSource,
};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

type Namespace = HashMap<String, String>;

struct Inner {
    namespaces: RwLock<HashMap<String, Namespace>>,
    listeners: RwLock<Vec<(String, Arc<dyn ChangeListener>)>>,
    connected: AtomicBool,
    failures_remaining: Mutex<u32>,
    fetches: AtomicU64,
    connects: AtomicU64,
    last_settings: Mutex<Option<RemoteSettings>>,
}

/// A config center that lives in the current process.
///
/// Used by tests, and by embedders that receive configuration through some
/// other channel and want the engine's fallback and listener handling.
/// Clones share the same state.
///
/// `publish` delivers notifications synchronously on the calling thread.
#[derive(Clone)]
pub struct MemoryRemote {
    inner: Arc<Inner>,
}

impl MemoryRemote {
    /// Creates an empty, connected config center.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                namespaces: RwLock::new(HashMap::new()),
                listeners: RwLock::new(Vec::new()),
                connected: AtomicBool::new(true),
                failures_remaining: Mutex::new(0),
                fetches: AtomicU64::new(0),
                connects: AtomicU64::new(0),
                last_settings: Mutex::new(None),
            }),
        }
    }

    /// Sets a value without notifying listeners.
    pub fn set_value(&self, namespace: &str, key: &str, value: impl Into<String>) {
        self.inner
            .namespaces
            .write()
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
    }

    /// Sets a value and notifies listeners.
    pub fn update_value(&self, namespace: &str, key: &str, value: impl Into<String>) {
        let mut snapshot = self.snapshot(namespace);
        snapshot.insert(key.to_string(), value.into());
        self.publish(namespace, snapshot);
    }

    /// Removes a key and notifies listeners.
    pub fn remove_value(&self, namespace: &str, key: &str) {
        let mut snapshot = self.snapshot(namespace);
        snapshot.remove(key);
        self.publish(namespace, snapshot);
    }

    /// Returns the current contents of a namespace.
    pub fn snapshot(&self, namespace: &str) -> HashMap<String, String> {
        self.inner
            .namespaces
            .read()
            .get(namespace)
            .cloned()
            .unwrap_or_default()
    }

    /// Replaces the contents of a namespace and notifies its listeners.
    ///
    /// Every listener receives the per-key diff first, then the full snapshot.
    pub fn publish(&self, namespace: &str, snapshot: HashMap<String, String>) {
        let before = self
            .inner
            .namespaces
            .write()
            .insert(namespace.to_string(), snapshot.clone())
            .unwrap_or_default();

        let change = ChangeEvent {
            namespace: namespace.to_string(),
            changes: diff(&before, &snapshot),
        };
        let full = FullChangeEvent {
            namespace: namespace.to_string(),
            changes: snapshot,
        };

        // Listeners may call back into us; don't hold the lock.
        let listeners: Vec<_> = self
            .inner
            .listeners
            .read()
            .iter()
            .filter(|(ns, _)| ns == namespace)
            .map(|(_, l)| Arc::clone(l))
            .collect();

        for listener in listeners {
            listener.on_change(&change);
            listener.on_full_change(&full);
        }
    }

    /// Sets the connected state.
    pub fn set_connected(&self, connected: bool) {
        self.inner.connected.store(connected, Ordering::SeqCst);
    }

    /// Makes the next `n` fetches fail with a retryable error.
    pub fn fail_next_fetches(&self, n: u32) {
        *self.inner.failures_remaining.lock() = n;
    }

    /// Number of fetch calls so far.
    pub fn fetch_count(&self) -> u64 {
        self.inner.fetches.load(Ordering::SeqCst)
    }

    /// Number of connect calls so far.
    pub fn connect_count(&self) -> u64 {
        self.inner.connects.load(Ordering::SeqCst)
    }

    /// Number of registered listeners across all namespaces.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.read().len()
    }

    /// Settings passed to the most recent connect.
    pub fn last_settings(&self) -> Option<RemoteSettings> {
        self.inner.last_settings.lock().clone()
    }

    fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::SeqCst)
    }
}

impl Default for MemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryRemote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryRemote")
            .field("namespaces", &self.inner.namespaces.read().len())
            .field("listeners", &self.listener_count())
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl RemoteSource for MemoryRemote {
    fn fetch(&self, namespace: &str, key: &str) -> SyncResult<String> {
        self.inner.fetches.fetch_add(1, Ordering::SeqCst);

        if !self.is_connected() {
            return Err(SyncError::NotConnected);
        }

        {
            let mut remaining = self.inner.failures_remaining.lock();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(SyncError::remote_retryable("config center unavailable"));
            }
        }

        let namespaces = self.inner.namespaces.read();
        let values = namespaces.get(namespace).ok_or_else(|| {
            SyncError::remote_fatal(format!("namespace [{namespace}] does not exist"))
        })?;
        values.get(key).cloned().ok_or_else(|| {
            SyncError::remote_fatal(format!("key [{key}] not found in namespace [{namespace}]"))
        })
    }

    fn subscribe(&self, namespace: &str, listener: Arc<dyn ChangeListener>) {
        self.inner
            .listeners
            .write()
            .push((namespace.to_string(), listener));
    }
}

impl RemoteConnector for MemoryRemote {
    fn connect(&self, settings: &RemoteSettings) -> SyncResult<Arc<dyn RemoteSource>> {
        self.inner.connects.fetch_add(1, Ordering::SeqCst);
        *self.inner.last_settings.lock() = Some(settings.clone());

        if !self.is_connected() {
            return Err(SyncError::NotConnected);
        }
        Ok(Arc::new(self.clone()))
    }
}
