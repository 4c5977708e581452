//! Configuration and file management for gitpane
//!
//! This crate provides:
//! - Config and cache directory paths
//! - Configuration file loading (TOML)
//! - Application configuration (AppConfig)
//! - Persisted view preferences

pub mod app_config;
pub mod config_file;
pub mod paths;
pub mod preferences;

pub use app_config::AppConfig;
pub use config_file::load_config_file;
pub use paths::{app_config_path, cache_dir, config_dir, preferences_path};
pub use preferences::{
    FilePreferenceStore, MemoryPreferenceStore, PreferenceError, PreferenceStore, Preferences,
    DIFF_MODE_KEY, GRAPH_ENABLED_KEY, SIDEBAR_WIDTH_KEY,
};
