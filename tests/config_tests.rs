//! Integration tests for configuration management

use grade_index::config::{Config, ConfigOverrides};
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a temporary config directory
fn setup_temp_config() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_file = temp_dir.path().join("nested").join("config.toml");
    (temp_dir, config_file)
}

#[test]
fn test_config_from_defaults() {
    let config = Config::from_defaults();

    // Should have non-empty defaults for critical fields
    assert!(
        !config.logging.level.is_empty(),
        "Default log level should not be empty"
    );
    assert!(
        !config.storage.archive.is_empty(),
        "Default archive should not be empty"
    );
    assert!(
        !config.paths.reports_dir.is_empty(),
        "Default reports_dir should not be empty"
    );
    assert!(!config.validation.strict);
    assert!(!config.validation.reconcile_on_save);
}

#[test]
fn test_config_from_toml_basic() {
    let toml_str = r#"
[logging]
level = "info"
file = "/tmp/test.log"
verbose = true

[storage]
archive = "/tmp/archive.toml"

[validation]
strict = true
reconcile_on_save = true

[paths]
reports_dir = "./reports"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file, "/tmp/test.log");
    assert!(config.logging.verbose);
    assert_eq!(config.storage.archive, "/tmp/archive.toml");
    assert_eq!(config.archive_path(), PathBuf::from("/tmp/archive.toml"));
    assert!(config.validation.strict);
    assert!(config.validation.reconcile_on_save);
    assert_eq!(config.paths.reports_dir, "./reports");
}

#[test]
fn test_config_from_toml_partial() {
    // Missing sections and fields use their defaults
    let toml_str = r#"
[logging]
level = "error"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse partial TOML");

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "");
    assert!(!config.logging.verbose);
    assert_eq!(config.storage.archive, "");
    assert!(!config.validation.strict);
}

#[test]
fn test_config_variable_expansion() {
    let toml_str = r#"
[logging]
file = "$GRADE_INDEX/test.log"

[storage]
archive = "$GRADE_INDEX/archive.toml"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML with variables");

    assert!(config.logging.file.contains("gradeindex"));
    assert!(!config.logging.file.contains("$GRADE_INDEX"));
    assert!(config.storage.archive.ends_with("archive.toml"));
    assert!(!config.storage.archive.contains("$GRADE_INDEX"));
}

#[test]
fn test_config_get_set() {
    let mut config = Config::from_defaults();

    assert!(config.get("level").is_some());

    config.set("level", "debug").expect("Failed to set level");
    assert_eq!(config.get("level").unwrap(), "debug");

    config.set("strict", "true").expect("Failed to set strict");
    assert_eq!(config.get("strict").unwrap(), "true");
    assert!(config.validation.strict);

    config
        .set("archive", "$GRADE_INDEX/other.toml")
        .expect("Failed to set archive");
    assert!(!config.get("archive").unwrap().contains("$GRADE_INDEX"));

    assert!(config.set("verbose", "maybe").is_err());
    assert!(config.get("unknown_key").is_none());
    assert!(config.set("unknown_key", "value").is_err());
}

#[test]
fn test_config_unset() {
    let mut config = Config::from_defaults();
    let defaults = Config::from_defaults();

    config.set("level", "debug").expect("Failed to set level");
    config.set("reconcile_on_save", "true").expect("Failed to set flag");

    config
        .unset("level", &defaults)
        .expect("Failed to unset level");
    config
        .unset("reconcile_on_save", &defaults)
        .expect("Failed to unset flag");
    assert_eq!(config.logging.level, defaults.logging.level);
    assert_eq!(
        config.validation.reconcile_on_save,
        defaults.validation.reconcile_on_save
    );
    assert!(config.unset("nope", &defaults).is_err());
}

#[test]
fn test_config_save_and_load() {
    let (_temp_dir, config_file) = setup_temp_config();

    let mut config = Config::from_defaults();
    config.set("level", "info").expect("Failed to set level");
    config.set("strict", "true").expect("Failed to set strict");

    config.save_to(&config_file).expect("Failed to save config");
    let loaded = Config::load_from(&config_file).expect("Failed to load config");

    assert_eq!(loaded.logging.level, "info");
    assert!(loaded.validation.strict);
    assert_eq!(loaded.storage.archive, config.storage.archive);
}

#[test]
fn test_load_from_missing_file_fails() {
    let (_temp_dir, config_file) = setup_temp_config();
    assert!(Config::load_from(&config_file).is_err());
}

#[test]
fn test_config_overrides_apply() {
    let mut config = Config::from_defaults();

    let overrides = ConfigOverrides {
        level: Some("error".to_string()),
        file: Some("/custom/path.log".to_string()),
        verbose: Some(true),
        archive: Some("/custom/archive.toml".to_string()),
        strict: Some(true),
        reconcile_on_save: Some(true),
        reports_dir: Some("./custom_reports".to_string()),
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/custom/path.log");
    assert!(config.logging.verbose);
    assert_eq!(config.storage.archive, "/custom/archive.toml");
    assert!(config.validation.strict);
    assert!(config.validation.reconcile_on_save);
    assert_eq!(config.paths.reports_dir, "./custom_reports");
}

#[test]
fn test_config_overrides_partial() {
    let mut config = Config::from_defaults();
    let archive = config.storage.archive.clone();

    let overrides = ConfigOverrides {
        level: Some("debug".to_string()),
        ..ConfigOverrides::default()
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.storage.archive, archive);
    assert!(!config.validation.strict);
}

#[test]
fn test_config_display_format() {
    let config = Config::from_defaults();
    let display_str = format!("{config}");

    assert!(display_str.contains("[logging]"));
    assert!(display_str.contains("[storage]"));
    assert!(display_str.contains("[validation]"));
    assert!(display_str.contains("[paths]"));

    assert!(display_str.contains("archive"));
    assert!(display_str.contains("reconcile_on_save"));
}

#[test]
fn test_merge_defaults_adds_missing_fields() {
    let toml_str = r#"
[logging]
level = "error"
file = ""
verbose = false

[paths]
reports_dir = ""
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse minimal config");
    let defaults = Config::from_defaults();

    let changed = config.merge_defaults(&defaults);

    assert!(
        changed,
        "merge_defaults should return true when fields are added"
    );
    assert_eq!(config.storage.archive, defaults.storage.archive);
    assert_eq!(config.logging.level, "error");
}

#[test]
fn test_merge_defaults_preserves_existing() {
    let toml_str = r#"
[logging]
level = "error"
file = "/my/custom/path.log"
verbose = false

[storage]
archive = "/my/archive.toml"
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse config");
    let defaults = Config::from_defaults();

    config.merge_defaults(&defaults);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/my/custom/path.log");
    assert_eq!(config.storage.archive, "/my/archive.toml");
}

#[test]
fn test_get_gradeindex_dir() {
    let dir = Config::get_gradeindex_dir();

    assert!(dir.to_string_lossy().contains("gradeindex"));
    assert_ne!(dir, PathBuf::from("."));
}

#[test]
fn test_get_config_file_path() {
    let path = Config::get_config_file_path();

    // Should end with config.toml or dconfig.toml
    let path_str = path.to_string_lossy();
    assert!(path_str.ends_with("config.toml") || path_str.ends_with("dconfig.toml"));
}
