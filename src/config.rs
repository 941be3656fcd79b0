//! Configuration module for gitapro

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::paths;
use crate::reveal::Sampling;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the verse content API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Host name sent in the `x-rapidapi-host` header
    #[serde(default = "default_api_host")]
    pub api_host: String,

    /// Lookups allowed per reveal before giving up
    #[serde(default = "default_retry_budget")]
    pub retry_budget: u32,

    /// How chapter/verse pairs are drawn
    #[serde(default)]
    pub sampling: Sampling,
}

fn default_api_base_url() -> String {
    "https://bhagavad-gita-api.p.rapidapi.com".to_string()
}

fn default_api_host() -> String {
    "bhagavad-gita-api.p.rapidapi.com".to_string()
}

const fn default_retry_budget() -> u32 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_host: default_api_host(),
            retry_budget: default_retry_budget(),
            sampling: Sampling::default(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        paths::config_path()
    }

    /// Load config from the default path or create default
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        self.save_to(&path)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }
}
