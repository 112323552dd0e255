//! Where lens keeps its config file, and seeding it on first run.

use lens_common::ConfigError;
use std::path::{Path, PathBuf};
use tracing::info;

use super::template::default_config_toml;

const APP_DIR: &str = "lens";
const CONFIG_FILE: &str = "config.toml";

/// `<platform config dir>/lens/config.toml`, e.g. `~/.config/lens/config.toml`
/// on Linux.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
        .ok_or_else(|| ConfigError::ParseError("no platform config directory for lens".into()))
}

/// Seed `path` with the commented preview/logging template, creating parent
/// directories as needed. An existing file is overwritten.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let io_error = |action: &str, target: &Path, e: std::io::Error| {
        ConfigError::ParseError(format!("failed to {action} {}: {e}", target.display()))
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| io_error("create config directory", parent, e))?;
    }
    std::fs::write(path, default_config_toml())
        .map_err(|e| io_error("write default config to", path, e))?;

    info!(path = %path.display(), "wrote default lens config");
    Ok(())
}
