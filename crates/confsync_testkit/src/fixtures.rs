//! Test fixtures.
//!
//! Sample configuration types and a temporary working area for fallback
//! files.

use confsync_engine::{MemoryRemote, RemoteSettings, SessionConfig, SharedConfig};
use confsync_storage::{FallbackStore, FileStore};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};
use tempfile::TempDir;

/// Namespace used by fixtures.
pub const NAMESPACE: &str = "application";

/// Key used by fixtures.
pub const KEY: &str = "service";

/// A representative service configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name.
    pub name: String,
    /// Listen port.
    pub port: u16,
    /// Worker pool size.
    pub workers: u32,
    /// Optional feature switches.
    #[serde(default)]
    pub features: Vec<String>,
    /// Database section.
    pub database: DatabaseConfig,
}

/// Database section of [`ServiceConfig`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL.
    pub url: String,
    /// Maximum open connections.
    pub max_connections: u32,
}

impl ServiceConfig {
    /// Renders as JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("Failed to render JSON")
    }

    /// Renders as YAML.
    pub fn to_yaml(&self) -> String {
        serde_yaml::to_string(self).expect("Failed to render YAML")
    }
}

/// A sample configuration.
pub fn sample_service() -> ServiceConfig {
    ServiceConfig {
        name: "billing".into(),
        port: 8080,
        workers: 4,
        features: vec!["audit".into()],
        database: DatabaseConfig {
            url: "postgres://db.local/billing".into(),
            max_connections: 16,
        },
    }
}

/// A second sample, distinct from [`sample_service`].
pub fn updated_service() -> ServiceConfig {
    ServiceConfig {
        port: 9090,
        workers: 8,
        features: vec!["audit".into(), "tracing".into()],
        ..sample_service()
    }
}

/// A fresh, empty destination.
pub fn empty_destination() -> SharedConfig<ServiceConfig> {
    SharedConfig::default()
}

/// Temporary directory for fallback files, with helpers to build sessions
/// that use it.
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    /// Creates a new environment.
    pub fn new() -> Self {
        init_tracing();
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Fallback directory.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Session config for the fixture namespace and key, with no pause
    /// between retries.
    pub fn session_config(&self, max_retries: u32) -> SessionConfig {
        SessionConfig::new(RemoteSettings::new("confsync-test", "memory://"), NAMESPACE, KEY)
            .with_retry(max_retries, 0)
            .with_fallback_dir(self.dir())
    }

    /// Path of the fixture session's fallback file.
    pub fn fallback_path(&self) -> PathBuf {
        confsync_storage::fallback_path(self.dir(), NAMESPACE, KEY)
    }

    /// Writes the fixture session's fallback file.
    pub fn write_fallback(&self, raw: &str) {
        FileStore::new(self.fallback_path())
            .store(raw)
            .expect("Failed to write fallback file");
    }

    /// Reads the fixture session's fallback file, if present.
    pub fn read_fallback(&self) -> Option<String> {
        FileStore::new(self.fallback_path()).load().ok()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// A remote seeded with [`sample_service`] as JSON.
pub fn seeded_remote() -> MemoryRemote {
    let remote = MemoryRemote::new();
    remote.set_value(NAMESPACE, KEY, sample_service().to_json());
    remote
}

/// Installs a test-writer tracing subscriber once per process.
///
/// Honors `RUST_LOG`; silent by default.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Wraps a value as a shared destination.
pub fn shared<T>(value: T) -> SharedConfig<T> {
    Arc::new(RwLock::new(value))
}
