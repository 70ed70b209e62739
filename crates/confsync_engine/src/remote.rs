//! Remote config-center seam.
//!
//! The engine does not speak any config-center protocol itself. It consumes
//! two capabilities, fetching the current value of a key and subscribing to
//! namespace changes, through the traits in this module.

use crate::config::RemoteSettings;
use crate::error::SyncResult;
use std::collections::HashMap;
use std::sync::Arc;

/// Kind of change to a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    /// Key did not exist before.
    Added,
    /// Key existed with a different value.
    Modified,
    /// Key was removed.
    Deleted,
}

/// Change to a single key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigChange {
    /// Value before the change. None for `Added`.
    pub old_value: Option<String>,
    /// Value after the change. None for `Deleted`.
    pub new_value: Option<String>,
    /// Kind of change.
    pub change_type: ChangeType,
}

impl ConfigChange {
    /// Creates an added change.
    pub fn added(new_value: impl Into<String>) -> Self {
        Self {
            old_value: None,
            new_value: Some(new_value.into()),
            change_type: ChangeType::Added,
        }
    }

    /// Creates a modified change.
    pub fn modified(old_value: impl Into<String>, new_value: impl Into<String>) -> Self {
        Self {
            old_value: Some(old_value.into()),
            new_value: Some(new_value.into()),
            change_type: ChangeType::Modified,
        }
    }

    /// Creates a deleted change.
    pub fn deleted(old_value: impl Into<String>) -> Self {
        Self {
            old_value: Some(old_value.into()),
            new_value: None,
            change_type: ChangeType::Deleted,
        }
    }
}

/// Per-key diff of a namespace change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Namespace that changed.
    pub namespace: String,
    /// Changed keys only.
    pub changes: HashMap<String, ConfigChange>,
}

/// Full snapshot of a namespace after a change.
///
/// Carries every key in the namespace, not just the ones that changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullChangeEvent {
    /// Namespace that changed.
    pub namespace: String,
    /// Current raw value of every key.
    pub changes: HashMap<String, String>,
}

/// Receives namespace change notifications from a [`RemoteSource`].
///
/// Implementations must tolerate being called from any thread, and
/// concurrently with themselves.
pub trait ChangeListener: Send + Sync {
    /// Called on every change with the per-key diff.
    fn on_change(&self, event: &ChangeEvent);

    /// Called on every change with the full namespace snapshot.
    ///
    /// Clients may deliver events for other namespaces too; listeners check
    /// `event.namespace` themselves.
    fn on_full_change(&self, event: &FullChangeEvent);
}

/// A connected config-center client.
pub trait RemoteSource: Send + Sync {
    /// Fetches the current raw value of `key` in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns a remote error if the namespace or key is unknown or the
    /// config center cannot be reached.
    fn fetch(&self, namespace: &str, key: &str) -> SyncResult<String>;

    /// Registers a listener for future changes to `namespace`.
    ///
    /// The listener stays registered for the lifetime of the client.
    fn subscribe(&self, namespace: &str, listener: Arc<dyn ChangeListener>);
}

/// Starts config-center clients.
///
/// A fresh client is started for every acquisition attempt.
pub trait RemoteConnector: Send + Sync {
    /// Starts a client for the given settings.
    ///
    /// # Errors
    ///
    /// Returns a remote error if the client cannot be started.
    fn connect(&self, settings: &RemoteSettings) -> SyncResult<Arc<dyn RemoteSource>>;
}

impl<C: RemoteConnector + ?Sized> RemoteConnector for Arc<C> {
    fn connect(&self, settings: &RemoteSettings) -> SyncResult<Arc<dyn RemoteSource>> {
        (**self).connect(settings)
    }
}

/// Computes the per-key diff between two namespace snapshots.
pub fn diff(
    before: &HashMap<String, String>,
    after: &HashMap<String, String>,
) -> HashMap<String, ConfigChange> {
    let mut changes = HashMap::new();

    for (key, new_value) in after {
        match before.get(key) {
            None => {
                changes.insert(key.clone(), ConfigChange::added(new_value.clone()));
            }
            Some(old_value) if old_value != new_value => {
                changes.insert(
                    key.clone(),
                    ConfigChange::modified(old_value.clone(), new_value.clone()),
                );
            }
            Some(_) => {}
        }
    }

    for (key, old_value) in before {
        if !after.contains_key(key) {
            changes.insert(key.clone(), ConfigChange::deleted(old_value.clone()));
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn diff_classifies_changes() {
        let before = snapshot(&[("db", "a"), ("cache", "b"), ("mq", "c")]);
        let after = snapshot(&[("db", "a"), ("cache", "B"), ("log", "d")]);

        let changes = diff(&before, &after);
        assert_eq!(changes.len(), 3);
        assert_eq!(changes["cache"], ConfigChange::modified("b", "B"));
        assert_eq!(changes["log"], ConfigChange::added("d"));
        assert_eq!(changes["mq"], ConfigChange::deleted("c"));
        assert!(!changes.contains_key("db"));
    }

    #[test]
    fn diff_of_identical_snapshots_is_empty() {
        let snap = snapshot(&[("db", "a")]);
        assert!(diff(&snap, &snap).is_empty());
    }
}
