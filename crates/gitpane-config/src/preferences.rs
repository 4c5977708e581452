//! View preferences persisted between runs
//!
//! A small key/value store with three keys:
//!
//! | Key | Value |
//! |---|---|
//! | `gitStatusSidebarWidth` | integer columns |
//! | `gitDiffMode` | `unified` or `side-by-side` |
//! | `gitGraphEnabled` | `true` or `false` |
//!
//! Stored as `preferences.toml` in the config directory.

use anyhow::{Context, Result};
use gitpane_diff::DiffViewMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;
use thiserror::Error;

pub const SIDEBAR_WIDTH_KEY: &str = "gitStatusSidebarWidth";
pub const DIFF_MODE_KEY: &str = "gitDiffMode";
pub const GRAPH_ENABLED_KEY: &str = "gitGraphEnabled";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreferenceError {
    #[error("unknown preference key {0:?}")]
    UnknownKey(String),
    #[error("invalid value {value:?} for preference {key}")]
    InvalidValue { key: String, value: String },
}

/// Persisted view preferences; unset keys fall back to the view's defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(
        rename = "gitStatusSidebarWidth",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sidebar_width: Option<u16>,

    #[serde(rename = "gitDiffMode", default, skip_serializing_if = "Option::is_none")]
    pub diff_mode: Option<DiffViewMode>,

    #[serde(rename = "gitGraphEnabled", default, skip_serializing_if = "Option::is_none")]
    pub graph_enabled: Option<bool>,
}

impl Preferences {
    /// Read a key as its string form
    pub fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        match key {
            SIDEBAR_WIDTH_KEY => Ok(self.sidebar_width.map(|w| w.to_string())),
            DIFF_MODE_KEY => Ok(self.diff_mode.map(|m| m.to_string())),
            GRAPH_ENABLED_KEY => Ok(self.graph_enabled.map(|g| g.to_string())),
            other => Err(PreferenceError::UnknownKey(other.to_string())),
        }
    }

    /// Set a key from its string form
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let invalid = || PreferenceError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            SIDEBAR_WIDTH_KEY => {
                self.sidebar_width = Some(value.trim().parse().map_err(|_| invalid())?);
            }
            DIFF_MODE_KEY => {
                self.diff_mode = Some(DiffViewMode::from_str(value.trim()).map_err(|_| invalid())?);
            }
            GRAPH_ENABLED_KEY => {
                self.graph_enabled = Some(value.trim().parse().map_err(|_| invalid())?);
            }
            other => return Err(PreferenceError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Overlay the keys set in `other`
    pub fn merge(&mut self, other: &Preferences) {
        if other.sidebar_width.is_some() {
            self.sidebar_width = other.sidebar_width;
        }
        if other.diff_mode.is_some() {
            self.diff_mode = other.diff_mode;
        }
        if other.graph_enabled.is_some() {
            self.graph_enabled = other.graph_enabled;
        }
    }
}

/// Where preferences are loaded from and saved to
pub trait PreferenceStore: Send + Sync {
    fn load(&self) -> Result<Preferences>;

    fn save(&self, preferences: &Preferences) -> Result<()>;
}

/// TOML file store
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location in the config directory
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(crate::paths::preferences_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Result<Preferences> {
        if !self.path.exists() {
            log::debug!("No preferences at {:?}, using defaults", self.path);
            return Ok(Preferences::default());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read preferences: {:?}", self.path))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse preferences: {:?}", self.path))
    }

    fn save(&self, preferences: &Preferences) -> Result<()> {
        let content =
            toml::to_string_pretty(preferences).context("Failed to serialize preferences")?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write preferences: {:?}", self.path))?;

        log::debug!("Saved preferences to {:?}", self.path);
        Ok(())
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    inner: Mutex<Preferences>,
}

impl MemoryPreferenceStore {
    pub fn new(preferences: Preferences) -> Self {
        Self {
            inner: Mutex::new(preferences),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<Preferences> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("preference store lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, preferences: &Preferences) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("preference store lock poisoned"))?;
        *guard = preferences.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_set() {
        let mut prefs = Preferences::default();
        assert_eq!(prefs.get(SIDEBAR_WIDTH_KEY), Ok(None));

        prefs.set(SIDEBAR_WIDTH_KEY, "42").unwrap();
        prefs.set(DIFF_MODE_KEY, "side-by-side").unwrap();
        prefs.set(GRAPH_ENABLED_KEY, "true").unwrap();

        assert_eq!(prefs.get(SIDEBAR_WIDTH_KEY), Ok(Some("42".into())));
        assert_eq!(prefs.get(DIFF_MODE_KEY), Ok(Some("side-by-side".into())));
        assert_eq!(prefs.diff_mode, Some(DiffViewMode::SideBySide));
        assert_eq!(prefs.graph_enabled, Some(true));
    }

    #[test]
    fn test_invalid_values() {
        let mut prefs = Preferences::default();
        assert_eq!(
            prefs.set(DIFF_MODE_KEY, "split"),
            Err(PreferenceError::InvalidValue {
                key: DIFF_MODE_KEY.into(),
                value: "split".into()
            })
        );
        assert!(prefs.set(SIDEBAR_WIDTH_KEY, "-3").is_err());
        assert_eq!(
            prefs.get("theme"),
            Err(PreferenceError::UnknownKey("theme".into()))
        );
    }

    #[test]
    fn test_serialized_key_names() {
        let prefs = Preferences {
            sidebar_width: Some(30),
            diff_mode: Some(DiffViewMode::Unified),
            graph_enabled: Some(false),
        };
        let text = toml::to_string_pretty(&prefs).unwrap();
        assert!(text.contains("gitStatusSidebarWidth = 30"));
        assert!(text.contains("gitDiffMode = \"unified\""));
        assert!(text.contains("gitGraphEnabled = false"));

        let parsed: Preferences = toml::from_str(&text).unwrap();
        assert_eq!(parsed, prefs);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("gitpane-prefs-{}", std::process::id()));
        let store = FilePreferenceStore::new(dir.join("preferences.toml"));

        assert_eq!(store.load().unwrap(), Preferences::default());

        let mut prefs = Preferences::default();
        prefs.set(GRAPH_ENABLED_KEY, "true").unwrap();
        store.save(&prefs).unwrap();
        assert_eq!(store.load().unwrap(), prefs);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_memory_store_and_merge() {
        let store = MemoryPreferenceStore::default();
        let mut prefs = store.load().unwrap();
        prefs.merge(&Preferences {
            sidebar_width: Some(50),
            ..Preferences::default()
        });
        store.save(&prefs).unwrap();
        assert_eq!(store.load().unwrap().sidebar_width, Some(50));
    }
}
