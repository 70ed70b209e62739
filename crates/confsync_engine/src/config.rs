//! Configuration for sync sessions.

use crate::error::{SyncError, SyncResult};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Connection parameters for the remote config center.
///
/// The engine never interprets these; they are handed to the
/// [`RemoteConnector`](crate::RemoteConnector) as-is.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    /// Application identity registered with the config center.
    pub app_id: String,
    /// Network address of the config center.
    pub address: String,
    /// Shared secret for request signing.
    pub secret: String,
    /// Cluster name.
    pub cluster: String,
}

impl RemoteSettings {
    /// Creates settings for an application at an address.
    pub fn new(app_id: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            address: address.into(),
            secret: String::new(),
            cluster: "default".into(),
        }
    }

    /// Sets the shared secret.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }

    /// Sets the cluster name.
    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = cluster.into();
        self
    }
}

impl fmt::Debug for RemoteSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteSettings")
            .field("app_id", &self.app_id)
            .field("address", &self.address)
            .field("secret", &if self.secret.is_empty() { "" } else { "***" })
            .field("cluster", &self.cluster)
            .finish()
    }
}

/// Bounded retry budget for the initial acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    /// Number of remote attempts. Zero means go straight to the fallback.
    pub max_retries: u32,
    /// Fixed pause between attempts.
    pub interval: Duration,
}

impl RetryBudget {
    /// Creates a budget.
    pub fn new(max_retries: u32, interval: Duration) -> Self {
        Self {
            max_retries,
            interval,
        }
    }

    /// Pause taken before an attempt (0-indexed). The first attempt runs
    /// immediately; every later one waits the full interval.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            Duration::ZERO
        } else {
            self.interval
        }
    }

    /// Upper bound on the time spent sleeping between attempts.
    ///
    /// Saturates at `Duration::MAX` instead of overflowing.
    pub fn max_total_wait(&self) -> Duration {
        self.interval
            .checked_mul(self.max_retries.saturating_sub(1))
            .unwrap_or(Duration::MAX)
    }
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

/// Configuration for one managed `(namespace, key)` binding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    /// Connection parameters, forwarded to the connector.
    #[serde(default)]
    pub remote: RemoteSettings,
    /// Config-center namespace.
    pub namespace: String,
    /// Key inside the namespace.
    pub key: String,
    /// Number of remote attempts before falling back.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Seconds to sleep between failed attempts.
    #[serde(default = "default_retry_interval_secs")]
    pub retry_interval_secs: u64,
    /// Directory holding the fallback file.
    #[serde(default = "default_fallback_dir")]
    pub fallback_dir: PathBuf,
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_interval_secs() -> u64 {
    1
}

fn default_fallback_dir() -> PathBuf {
    PathBuf::from(".")
}

impl SessionConfig {
    /// Creates a session configuration with the default retry budget.
    pub fn new(
        remote: RemoteSettings,
        namespace: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            remote,
            namespace: namespace.into(),
            key: key.into(),
            max_retries: default_max_retries(),
            retry_interval_secs: default_retry_interval_secs(),
            fallback_dir: default_fallback_dir(),
        }
    }

    /// Sets the retry budget.
    pub fn with_retry(mut self, max_retries: u32, retry_interval_secs: u64) -> Self {
        self.max_retries = max_retries;
        self.retry_interval_secs = retry_interval_secs;
        self
    }

    /// Sets the directory holding the fallback file.
    pub fn with_fallback_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fallback_dir = dir.into();
        self
    }

    /// Returns the retry budget.
    pub fn retry_budget(&self) -> RetryBudget {
        RetryBudget::new(
            self.max_retries,
            Duration::from_secs(self.retry_interval_secs),
        )
    }

    /// Returns the fallback file path for this session.
    pub fn fallback_path(&self) -> PathBuf {
        confsync_storage::fallback_path(&self.fallback_dir, &self.namespace, &self.key)
    }

    /// Checks that namespace and key are usable.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidConfig`] if either is empty.
    pub fn validate(&self) -> SyncResult<()> {
        if self.namespace.is_empty() {
            return Err(SyncError::InvalidConfig("namespace must not be empty".into()));
        }
        if self.key.is_empty() {
            return Err(SyncError::InvalidConfig("key must not be empty".into()));
        }
        Ok(())
    }

    /// Loads a session configuration from JSON or YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Decode`] if the text does not describe a session.
    pub fn from_text(raw: &str) -> SyncResult<Self> {
        Ok(confsync_codec::decode_str(raw)?)
    }
}
