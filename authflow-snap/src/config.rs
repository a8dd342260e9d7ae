//! Development host configuration
//!
//! Read from `$AUTHFLOW_CONFIG`, or `<config_dir>/authflow/config.json` when
//! the variable is unset. A missing file means defaults.

use std::path::{Path, PathBuf};

use authflow_core::types::GatewayConfig;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "AUTHFLOW_CONFIG";

const APP_DIR: &str = "authflow";
const CONFIG_FILE: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Settings of the stdio development host
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapConfig {
    /// Credential blob location; the platform data dir when unset
    pub state_file: Option<PathBuf>,
    /// Account reported to the identify plugin
    pub account: Option<String>,
    /// Answer every confirmation with "yes"
    pub auto_approve: bool,
    pub gateway: GatewayConfig,
}

impl SnapConfig {
    /// Load from the environment-selected or default location
    pub fn load() -> Result<Self, ConfigError> {
        match Self::location() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!("No config directory, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Config {} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn location() -> Option<PathBuf> {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE)))
    }
}
