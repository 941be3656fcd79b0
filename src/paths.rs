//! Common paths for gitapro data storage
//!
//! All data lives under ~/.config/gitapro/ on every platform:
//! - config.toml - User configuration
//! - credentials.enc - Encrypted content API key
//! - gitapro.sqlite - Revealed verses and saved lessons

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the gitapro data directory (~/.config/gitapro/)
pub fn gitapro_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let dir = home.join(".config").join("gitapro");
    fs::create_dir_all(&dir).context("Failed to create gitapro directory")?;
    Ok(dir)
}

/// Get the config file path (~/.config/gitapro/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(gitapro_dir()?.join("config.toml"))
}

/// Get the database file path (~/.config/gitapro/gitapro.sqlite)
pub fn database_path() -> Result<PathBuf> {
    Ok(gitapro_dir()?.join("gitapro.sqlite"))
}

/// Get the credentials file path (~/.config/gitapro/credentials.enc)
pub fn credentials_path() -> Result<PathBuf> {
    Ok(gitapro_dir()?.join("credentials.enc"))
}
