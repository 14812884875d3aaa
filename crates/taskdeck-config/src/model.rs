//! Configuration schema for taskdeck.

use crate::ConfigError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default port the server listens on.
pub const DEFAULT_PORT: u16 = 5000;
/// Default bind address for the server.
pub const DEFAULT_BIND: &str = "0.0.0.0";
/// Default server URL used by clients.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";
/// Database filename under the data directory.
const DATABASE_FILE: &str = "tasks.db";

/// Root config shared by the server and terminal client.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TaskdeckConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Task database settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Client-side settings for the TUI.
    #[serde(default)]
    pub client: ClientConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Task database settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct StorageConfig {
    /// SQLite database path. Defaults to the platform data directory.
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the effective database path.
    pub fn database_path(&self) -> PathBuf {
        if let Some(path) = self.path.as_ref() {
            return path.clone();
        }
        default_data_dir().join(DATABASE_FILE)
    }
}

/// Client-side settings for the TUI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ClientConfig {
    /// Base URL of the task server.
    pub server_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
        }
    }
}

impl TaskdeckConfig {
    /// Load a config from a JSON5 file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        info!("loading config from path: {}", path.as_ref().display());
        let contents = fs::read_to_string(path)?;
        Self::load_from_str(&contents)
    }

    /// Load a config from JSON5 contents.
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading config from raw contents (len={})", contents.len());
        let config: TaskdeckConfig = json5::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid(
                "server.port must be non-zero".to_string(),
            ));
        }
        if self.server.bind.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "server.bind must not be empty".to_string(),
            ));
        }
        if self.client.server_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "client.server_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Platform data directory for taskdeck state (database, user id).
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "taskdeck")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".taskdeck"))
}
