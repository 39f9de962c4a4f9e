//! Application configuration management.
//!
//! Handles loading and saving the reader configuration: where the message
//! store lives, the default result cap, the consent state recorded by the
//! terminal permission prompt, and logging preferences. Configuration is
//! persisted as TOML on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{SmsError, SmsResult};
use crate::platform::Platform;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Message store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Query defaults.
    #[serde(default)]
    pub reader: ReaderConfig,

    /// Permission settings.
    #[serde(default)]
    pub permission: PermissionConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Message store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the telephony database. If empty, uses the default location.
    #[serde(default)]
    pub path: String,

    /// Maximum number of pooled read-only connections.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// Busy timeout applied to each connection, in milliseconds.
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,
}

/// Defaults applied to `readSms` calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Records returned when a call does not pass `maxCount`.
    #[serde(default = "default_max_count")]
    pub default_max_count: i64,
}

/// Permission configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionConfig {
    /// Alias the permission is requested under.
    #[serde(default = "default_alias")]
    pub alias: String,

    /// Whether the user has granted read access.
    #[serde(default)]
    pub granted: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for log files. If empty, uses default location.
    #[serde(default)]
    pub directory: String,

    /// Enable JSON structured logging output.
    #[serde(default)]
    pub json_output: bool,
}

// Default value functions for serde

fn default_pool_size() -> u32 {
    2
}

fn default_busy_timeout() -> u64 {
    5_000
}

fn default_max_count() -> i64 {
    constants::DEFAULT_MAX_COUNT
}

fn default_alias() -> String {
    constants::PERMISSION_ALIAS.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            pool_size: default_pool_size(),
            busy_timeout_ms: default_busy_timeout(),
        }
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            default_max_count: default_max_count(),
        }
    }
}

impl Default for PermissionConfig {
    fn default() -> Self {
        Self {
            alias: default_alias(),
            granted: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
            json_output: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default config file path.
    pub fn load_default() -> SmsResult<Self> {
        let path = Self::default_config_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> SmsResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific file path.
    pub fn save_to_file(&self, path: &Path) -> SmsResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| SmsError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> SmsResult<PathBuf> {
        Ok(Platform::config_dir()?.join("config.toml"))
    }

    /// Get the effective message store path, using the configured path or the default.
    pub fn effective_store_path(&self) -> SmsResult<PathBuf> {
        if self.store.path.is_empty() {
            Ok(Platform::data_dir()?.join(constants::DEFAULT_STORE_FILE))
        } else {
            Ok(PathBuf::from(&self.store.path))
        }
    }

    /// Get the effective log directory, using the configured path or the default.
    pub fn effective_log_dir(&self) -> SmsResult<PathBuf> {
        if self.logging.directory.is_empty() {
            Ok(Platform::data_dir()?.join("logs"))
        } else {
            Ok(PathBuf::from(&self.logging.directory))
        }
    }
}

/// Thread-safe configuration holder that remembers where it was loaded from.
#[derive(Clone)]
pub struct ConfigHandle {
    inner: Arc<RwLock<AppConfig>>,
    path: Option<PathBuf>,
}

impl ConfigHandle {
    /// Create a handle that is never written back to disk.
    pub fn new(config: AppConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
            path: None,
        }
    }

    /// Create a handle persisted to `path` on `save`.
    pub fn with_path(config: AppConfig, path: PathBuf) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
            path: Some(path),
        }
    }

    /// Read the configuration.
    pub async fn read(&self) -> tokio::sync::RwLockReadGuard<'_, AppConfig> {
        self.inner.read().await
    }

    /// Write/update the configuration.
    pub async fn write(&self) -> tokio::sync::RwLockWriteGuard<'_, AppConfig> {
        self.inner.write().await
    }

    /// Save the current configuration to its backing file, if any.
    pub async fn save(&self) -> SmsResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let config = self.inner.read().await;
        config.save_to_file(path)
    }
}
