//! Settings structures for QuerySwitch configuration

use crate::storage::Store;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub storage: StorageSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (QUERYSWITCH_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("QUERYSWITCH_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("QUERYSWITCH_LANGUAGE") {
            self.general.default_language = Some(val);
        }
        if let Ok(val) = std::env::var("QUERYSWITCH_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("QUERYSWITCH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("QUERYSWITCH_STATE_PATH") {
            self.storage.state_path = Some(PathBuf::from(val));
        }
    }

    /// Effective state file path
    pub fn state_path(&self) -> PathBuf {
        self.storage
            .state_path
            .clone()
            .unwrap_or_else(Store::default_path)
    }
}

/// General settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Language used when neither the command line nor the stored
    /// preferences name one
    pub default_language: Option<String>,
}

/// Local HTTP service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
    /// Allow cross-origin requests (needed when called from an extension page)
    pub cors: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8765,
            bind_address: "127.0.0.1".to_string(),
            cors: true,
        }
    }
}

/// State file settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// State file location (defaults to the user data directory)
    pub state_path: Option<PathBuf>,
}
