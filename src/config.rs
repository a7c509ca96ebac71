//! Runtime configuration
//!
//! Resolution order: built-in defaults, then `<data_dir>/config.yaml`,
//! then the `PHONE_STORE_API_URL` / `PHONE_STORE_DATA_DIR` environment
//! variables.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_FILE_NAME, DATA_DIR_NAME, DEFAULT_API_BASE_URL};

pub const API_URL_ENV: &str = "PHONE_STORE_API_URL";
pub const DATA_DIR_ENV: &str = "PHONE_STORE_DATA_DIR";

#[derive(Clone, Debug, PartialEq)]
pub struct StoreConfig {
    /// Base URL of the product API, without trailing slash
    pub api_base_url: String,
    /// Directory for the persisted cart and the log file
    pub data_dir: PathBuf,
}

/// On-disk shape of `config.yaml`; every field optional
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    api_base_url: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            api_base_url: String::from(DEFAULT_API_BASE_URL),
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

impl StoreConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load configuration with a custom environment lookup
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = StoreConfig::default();

        if let Some(dir) = env(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }

        let file = read_config_file(&config.data_dir.join(CONFIG_FILE_NAME))?;
        if let Some(url) = file.api_base_url {
            config.api_base_url = url;
        }

        if let Some(url) = env(API_URL_ENV).filter(|v| !v.is_empty()) {
            config.api_base_url = url;
        }

        config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();
        Ok(config)
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    // An empty YAML document deserializes to unit, not a map
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}
