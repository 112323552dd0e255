//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use std::path::Path;

use crate::schema::LogLevel;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_lens_config.toml"));
    let err = result.unwrap_err();
    assert!(matches!(err, lens_common::ConfigError::FileNotFound(_)));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r##"
[preview]
settle_interval_ms = 300
"##,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.preview.settle_interval_ms, 300);
    // Defaults preserved
    assert_eq!(config.preview.background_color, "#1f2937");
    assert_eq!(config.preview.owner_window, "main");
    assert_eq!(config.logging.level, LogLevel::Info);
}

#[test]
fn load_logging_level() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[logging]\nlevel = \"DEBUG\"\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.logging.level, LogLevel::Debug);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, lens_common::ConfigError::ParseError(_)));
}

#[test]
fn out_of_range_values_still_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[preview]\nsettle_interval_ms = 999999\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.preview.settle_interval_ms, 999999);
}

#[test]
fn create_default_config_writes_parseable_template() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.preview.settle_interval_ms, 150);
}

#[test]
fn template_header_names_the_schema_version() {
    let template = super::template::default_config_toml();
    let header = format!("# Schema version {}", crate::CONFIG_SCHEMA_VERSION);
    assert!(template.lines().any(|line| line == header));
}

#[test]
fn default_config_path_ends_with_lens_config() {
    if let Ok(path) = default_config_path() {
        assert!(path.ends_with("lens/config.toml"));
    }
}
