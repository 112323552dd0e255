//! Configuration validation.
//!
//! Each section has its own check; errors are collected into a single
//! `ConfigError`.

mod helpers;
mod preview;


use crate::schema::LensConfig;
use lens_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &LensConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    preview::validate_preview(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
