//! Configuration loading and management
//!
//! Handles parsing of `taskdeck.toml` configuration files. Everything has a
//! working default, so a missing config file is not an error.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Name of the config file looked up next to the data
pub const CONFIG_FILE: &str = "taskdeck.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the file backend keeps its data. Defaults to the platform
    /// data directory for taskdeck.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Timeout for the data-file lock, in milliseconds
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_lock_timeout_ms() -> u64 {
    crate::lock::DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `taskdeck.toml` from a directory, falling back to defaults if
    /// the file does not exist or cannot be parsed.
    pub fn load_from_dir(dir: &Path) -> Self {
        let path = dir.join(CONFIG_FILE);
        if path.exists() {
            Self::load(&path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Resolve the effective data directory: the configured one, or the
    /// platform default.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let dirs = ProjectDirs::from("", "", "taskdeck").ok_or_else(|| {
            Error::InvalidConfig("cannot determine a platform data directory".to_string())
        })?;
        Ok(dirs.data_dir().to_path_buf())
    }
}
