//! Acquisition with bounded retry and local fallback.

use crate::config::SessionConfig;
use crate::error::SyncResult;
use crate::remote::{ChangeListener, RemoteConnector};
use crate::session::{SharedConfig, SyncSession};
use crate::state::SyncState;
use confsync_storage::{FallbackStore, FileStore};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Binds `destination` to a config-center key and keeps it up to date.
///
/// Makes up to `max_retries` attempts to fetch and decode the value,
/// pausing `retry_interval_secs` between attempts. On success the raw value
/// is saved to the fallback file and the session subscribes to live updates.
/// If every attempt fails, the destination is loaded from the fallback file
/// instead, without live updates.
///
/// This blocks the calling thread for the whole retry window and cannot be
/// cancelled.
///
/// The subscription is registered after the session lock is released. A
/// change pushed between the successful fetch and the subscription is not
/// delivered; the destination keeps the fetched value until the next push.
///
/// # Errors
///
/// Returns the error from the last remote attempt if the fallback file is
/// also unusable (the fallback error itself is only logged). With
/// `max_retries == 0` there is no remote error, so the fallback error is
/// returned. On error the destination keeps its initial value.
///
/// # Example
///
/// ```
/// use confsync_engine::{apply, MemoryRemote, RemoteSettings, SessionConfig};
/// use parking_lot::RwLock;
/// use serde::Deserialize;
/// use std::sync::Arc;
///
/// #[derive(Debug, Default, Deserialize)]
/// struct Server {
///     port: u16,
/// }
///
/// let remote = MemoryRemote::new();
/// remote.set_value("application", "server", "port: 8080");
///
/// let dir = tempfile::tempdir().unwrap();
/// let config = SessionConfig::new(RemoteSettings::new("demo", "memory://"), "application", "server")
///     .with_fallback_dir(dir.path());
///
/// let server = Arc::new(RwLock::new(Server::default()));
/// apply(&server, &config, &remote).unwrap();
/// assert_eq!(server.read().port, 8080);
///
/// remote.update_value("application", "server", r#"{"port": 9090}"#);
/// assert_eq!(server.read().port, 9090);
/// ```
pub fn apply<T, C>(
    destination: &SharedConfig<T>,
    config: &SessionConfig,
    connector: &C,
) -> SyncResult<Arc<SyncSession<T>>>
where
    T: DeserializeOwned + Send + Sync + 'static,
    C: RemoteConnector + ?Sized,
{
    let store = Arc::new(FileStore::new(config.fallback_path()));
    apply_with_store(destination, config, connector, store)
}

/// Like [`apply`], with an explicit fallback store.
///
/// # Errors
///
/// See [`apply`].
pub fn apply_with_store<T, C>(
    destination: &SharedConfig<T>,
    config: &SessionConfig,
    connector: &C,
    store: Arc<dyn FallbackStore>,
) -> SyncResult<Arc<SyncSession<T>>>
where
    T: DeserializeOwned + Send + Sync + 'static,
    C: RemoteConnector + ?Sized,
{
    config.validate()?;

    let session = Arc::new(SyncSession::new(config, Arc::clone(destination), store));
    let budget = config.retry_budget();
    let mut last_error = None;

    tracing::debug!(
        namespace = %config.namespace,
        key = %config.key,
        max_retries = budget.max_retries,
        max_wait = ?budget.max_total_wait(),
        "acquiring config"
    );

    for attempt in 0..budget.max_retries {
        session.set_state(SyncState::Retrying);
        if attempt > 0 {
            std::thread::sleep(budget.delay_for_attempt(attempt));
            session.record_retry();
        }
        session.record_attempt();

        match try_acquire(&session, config, connector) {
            Ok(()) => {
                session.set_state(SyncState::Listening);
                tracing::info!(
                    namespace = %config.namespace,
                    key = %config.key,
                    attempt = attempt + 1,
                    "config acquired from config center"
                );
                return Ok(session);
            }
            Err(e) => {
                tracing::error!(
                    namespace = %config.namespace,
                    key = %config.key,
                    attempt = attempt + 1,
                    error = %e,
                    "failed to fetch config from config center"
                );
                last_error = Some(e);
            }
        }
    }

    match session.restore_from_fallback() {
        Ok(()) => {
            session.set_state(SyncState::FallbackRestored);
            tracing::warn!(
                namespace = %config.namespace,
                key = %config.key,
                path = %session.fallback_location(),
                "config restored from fallback file; live updates disabled"
            );
            Ok(session)
        }
        Err(fallback_error) => {
            session.set_state(SyncState::Failed);
            tracing::error!(
                namespace = %config.namespace,
                key = %config.key,
                error = %fallback_error,
                "failed to restore config from fallback file"
            );
            Err(last_error.unwrap_or(fallback_error))
        }
    }
}

/// One attempt: start a client, acquire, then subscribe.
fn try_acquire<T, C>(
    session: &Arc<SyncSession<T>>,
    config: &SessionConfig,
    connector: &C,
) -> SyncResult<()>
where
    T: DeserializeOwned + Send + Sync + 'static,
    C: RemoteConnector + ?Sized,
{
    let source = connector.connect(&config.remote)?;
    session.acquire(source.as_ref())?;

    let listener: Arc<dyn ChangeListener> = session.clone();
    source.subscribe(&config.namespace, listener);
    Ok(())
}

