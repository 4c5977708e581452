//! Application configuration
//!
//! Loaded from `.gitpane.toml` in the working directory or `config.toml` in
//! the config directory. Every field has a default, so partial files work.

use anyhow::{Context, Result};
use gitpane_diff::ToolMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Diff renderer: `auto`, `delta` or `builtin`
    #[serde(default)]
    pub diff_tool: ToolMode,

    /// Commits loaded per page
    #[serde(default = "default_commit_page_size")]
    pub commit_page_size: usize,

    /// Max interval between the clicks of a double-click
    #[serde(default = "default_double_click_ms")]
    pub double_click_ms: u64,

    /// Rows scrolled per wheel tick
    #[serde(default = "default_scroll_delta")]
    pub scroll_delta: usize,

    /// Refresh when files in the repository change
    #[serde(default = "default_watch")]
    pub watch: bool,

    /// syntect theme for diff highlighting
    #[serde(default = "default_syntax_theme")]
    pub syntax_theme: String,

    /// Command used to open files (falls back to `$VISUAL`, then `$EDITOR`)
    #[serde(default)]
    pub editor: Option<String>,

    /// Soft-wrap long diff lines
    #[serde(default)]
    pub wrap_lines: bool,
}

fn default_commit_page_size() -> usize {
    50
}

fn default_double_click_ms() -> u64 {
    400
}

fn default_scroll_delta() -> usize {
    3
}

fn default_watch() -> bool {
    true
}

fn default_syntax_theme() -> String {
    "base16-ocean.dark".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            diff_tool: ToolMode::default(),
            commit_page_size: default_commit_page_size(),
            double_click_ms: default_double_click_ms(),
            scroll_delta: default_scroll_delta(),
            watch: default_watch(),
            syntax_theme: default_syntax_theme(),
            editor: None,
            wrap_lines: false,
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then the config directory, or use defaults
    pub fn load() -> Self {
        if let Some((path, content)) = crate::load_config_file() {
            match Self::parse(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from {}", path.display());
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file {}: {:#}", path.display(), e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }

    /// Load an explicitly named config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    fn parse(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.commit_page_size = config.commit_page_size.max(1);
        config.scroll_delta = config.scroll_delta.max(1);
        Ok(config)
    }

    /// Editor command from config or environment
    pub fn resolved_editor(&self) -> Option<String> {
        self.editor
            .clone()
            .filter(|e| !e.trim().is_empty())
            .or_else(|| std::env::var("VISUAL").ok().filter(|e| !e.trim().is_empty()))
            .or_else(|| std::env::var("EDITOR").ok().filter(|e| !e.trim().is_empty()))
    }
}
