//! Where the CLI looks for configuration when `--config` is not given.
//!
//! # Resolution order
//! 1. `--config <file>` (or `UMBRELLA_CONFIG`)
//! 2. `<platform config dir>/umbrella-connector/config.json`, if it exists
//! 3. `UMBRELLA_*` environment variables
//!
//! # Platform Behavior
//! - **Linux**: `$XDG_CONFIG_HOME/umbrella-connector` or `~/.config/umbrella-connector`
//! - **macOS**: `~/Library/Application Support/umbrella-connector`
//! - **Windows**: `%APPDATA%/umbrella-connector`

use crate::handlers::ConfigSource;

use std::path::{Path, PathBuf};

use log::debug;

pub const APP_DIR_NAME: &str = "umbrella-connector";
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Platform default config file location, whether or not it exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Pick the configuration source for this run.
pub fn resolve_config_source(explicit: Option<&Path>) -> ConfigSource {
    resolve_with_default(explicit, default_config_path())
}

pub(crate) fn resolve_with_default(
    explicit: Option<&Path>,
    default_path: Option<PathBuf>,
) -> ConfigSource {
    if let Some(path) = explicit {
        debug!("Using config file from command line: {}", path.display());
        return ConfigSource::File(path.to_path_buf());
    }

    match default_path {
        Some(path) if path.is_file() => {
            debug!("Using platform config file: {}", path.display());
            ConfigSource::File(path)
        }
        _ => {
            debug!("No config file found - reading UMBRELLA_* environment variables");
            ConfigSource::Environment
        }
    }
}
