//! Configuration and data directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/gitpane/`, `~/.cache/gitpane/`
//! - macOS: `~/Library/Application Support/gitpane/`, `~/Library/Caches/gitpane/`
//! - Windows: `%APPDATA%\gitpane\`, `%LOCALAPPDATA%\gitpane\`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "gitpane";

/// Config file looked up in the working directory before the global one.
pub const LOCAL_CONFIG_FILE: &str = ".gitpane.toml";

/// Get the application config directory, creating it when missing
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config directory {:?}", dir))?;
    Ok(dir)
}

/// Get the application cache directory, creating it when missing
pub fn cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine cache directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create cache directory {:?}", dir))?;
    Ok(dir)
}

/// Get path to the global app config file
pub fn app_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Get path to the persisted view preferences
pub fn preferences_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("preferences.toml"))
}
