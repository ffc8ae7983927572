//! User configuration and preferences

use crate::blob::DEFAULT_ORIGIN;
use crate::error::{PreviewError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Origin embedded in minted object URLs
    pub blob_origin: String,
    /// Log filter used when RUST_LOG is not set (e.g. "dropview=debug")
    pub log_filter: Option<String>,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            blob_origin: DEFAULT_ORIGIN.to_string(),
            log_filter: None,
        }
    }
}

impl UserConfig {
    /// Get the config file path (~/.config/dropview/config.json)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dropview").join("config.json"))
    }

    /// Load config from the default location, or defaults if it doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path().ok_or_else(|| {
            PreviewError::ConfigError("Could not determine config directory".to_string())
        })?;
        Self::load_from(&path)
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            PreviewError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            PreviewError::ConfigError(format!("Failed to parse config file: {}", e))
        })
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().ok_or_else(|| {
            PreviewError::ConfigError("Could not determine config directory".to_string())
        })?;
        self.save_to(&path)
    }

    /// Save config to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                PreviewError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            PreviewError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, contents).map_err(|e| {
            PreviewError::ConfigError(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }
}
