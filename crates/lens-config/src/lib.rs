//! Lens configuration.
//!
//! TOML-based configuration with validation. All sections use sensible
//! defaults so partial configs work out of the box.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{LensConfig, LogLevel, LoggingConfig, PreviewConfig, CONFIG_SCHEMA_VERSION};

use lens_common::ConfigError;
use std::path::Path;

/// Load config from the platform default path and validate it.
pub fn load_config() -> Result<LensConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path and validate it.
pub fn load_config_from(path: &Path) -> Result<LensConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &LensConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
