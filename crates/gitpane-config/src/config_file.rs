use crate::paths::{self, LOCAL_CONFIG_FILE};
use std::path::PathBuf;

/// Load config file content from CWD first, then the config directory
///
/// Searches for:
/// 1. `./.gitpane.toml`
/// 2. `<config_dir>/gitpane/config.toml`
///
/// Returns the path and content of the first file found.
pub fn load_config_file() -> Option<(PathBuf, String)> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if let Ok(content) = std::fs::read_to_string(&local) {
        log::debug!("Loaded config from {}", local.display());
        return Some((local, content));
    }

    match paths::app_config_path() {
        Ok(global) => match std::fs::read_to_string(&global) {
            Ok(content) => {
                log::debug!("Loaded config from {}", global.display());
                Some((global, content))
            }
            Err(_) => None,
        },
        Err(e) => {
            log::warn!("No config directory: {:#}", e);
            None
        }
    }
}
