//! Configuration loading and management
//!
//! Handles parsing of `tasklist.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::storage;
use crate::task::STORAGE_KEY;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Terminal UI configuration
    #[serde(default)]
    pub ui: UiConfig,
}

/// Where and under which key the task list is kept
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Key the task list is stored under
    #[serde(default = "default_storage_key")]
    pub key: String,

    /// Directory for stored values (defaults to the data directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

fn default_storage_key() -> String {
    STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_storage_key(),
            dir: None,
        }
    }
}

impl StorageConfig {
    /// Directory the store lives in, given the resolved data directory
    pub fn store_dir(&self, data_dir: &Path) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| data_dir.to_path_buf())
    }

    fn validate(&self) -> crate::error::Result<()> {
        storage::validate_key(&self.key).map_err(|err| {
            crate::error::Error::InvalidConfig(format!("storage.key: {err}"))
        })
    }
}

/// Terminal UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Event poll interval in milliseconds
    #[serde(default = "default_event_poll_ms")]
    pub event_poll_ms: u64,

    /// Glyph drawn for the delete trigger
    #[serde(default = "default_delete_glyph")]
    pub delete_glyph: String,
}

fn default_event_poll_ms() -> u64 {
    120
}

fn default_delete_glyph() -> String {
    "x".to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            event_poll_ms: default_event_poll_ms(),
            delete_glyph: default_delete_glyph(),
        }
    }
}

impl UiConfig {
    fn validate(&self) -> crate::error::Result<()> {
        if self.event_poll_ms == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "ui.event_poll_ms must be greater than 0".to_string(),
            ));
        }
        if self.delete_glyph.trim().is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "ui.delete_glyph cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from a `tasklist.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory, or return defaults
    pub fn load_from_dir(data_dir: &Path) -> Self {
        let config_path = storage::config_file(data_dir);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    path = %config_path.display(),
                    error = %err,
                    "ignoring invalid config, using defaults"
                );
                Self::default()
            }
        }
    }

    /// Render configuration as TOML
    pub fn to_toml(&self) -> crate::error::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    fn validate(&self) -> crate::error::Result<()> {
        self.storage.validate()?;
        self.ui.validate()?;
        Ok(())
    }
}
