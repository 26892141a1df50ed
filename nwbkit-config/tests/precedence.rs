//! Tests for configuration precedence order

use nwbkit_config::{ConfigError, ConfigProvider, ConstructionConfig, TimingConflict};
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

#[test]
#[serial]
fn test_defaults_without_sources() {
    let dir = TempDir::new().unwrap();
    let config = ConfigProvider::new().load_in(dir.path()).unwrap();
    assert_eq!(config, ConstructionConfig::default());
}

#[test]
#[serial]
fn test_toml_file_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("nwbkit.toml"),
        "timing_conflict = \"reject\"\nverify_link_paths = false\n",
    )
    .unwrap();

    let config = ConfigProvider::new().load_in(dir.path()).unwrap();
    assert_eq!(config.timing_conflict, TimingConflict::Reject);
    assert!(!config.verify_link_paths);
}

#[test]
#[serial]
fn test_json_overrides_yaml() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("nwbkit.yaml"), "timing_conflict: reject\n").unwrap();
    fs::write(
        dir.path().join("nwbkit.json"),
        r#"{"timing_conflict": "prefer-timestamps"}"#,
    )
    .unwrap();

    let config = ConfigProvider::new().load_in(dir.path()).unwrap();
    assert_eq!(config.timing_conflict, TimingConflict::PreferTimestamps);
}

#[test]
#[serial]
fn test_environment_overrides_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("nwbkit.toml"), "verify_link_paths = true\n").unwrap();

    std::env::set_var("NWBKIT_VERIFY_LINK_PATHS", "false");
    let result = ConfigProvider::new().load_in(dir.path());
    std::env::remove_var("NWBKIT_VERIFY_LINK_PATHS");

    assert!(!result.unwrap().verify_link_paths);
}

#[test]
#[serial]
fn test_invalid_value_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("nwbkit.toml"), "timing_conflict = \"sometimes\"\n").unwrap();

    let err = ConfigProvider::new().load_in(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
#[serial]
fn test_load_from_explicit_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("policy.yml");
    fs::write(&path, "timing_conflict: reject\n").unwrap();

    let config = ConstructionConfig::load_from(&path).unwrap();
    assert_eq!(config.timing_conflict, TimingConflict::Reject);
    assert!(config.verify_link_paths);
}

#[test]
#[serial]
fn test_load_from_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = ConstructionConfig::load_from(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}

#[test]
#[serial]
fn test_load_from_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("policy.ini");
    fs::write(&path, "").unwrap();
    let err = ConstructionConfig::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
}
