use super::data::Config;
use super::io::ConfigError;
use crate::core::constants::{DEFAULT_GREETING, DEFAULT_MODEL};
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
    assert_eq!(config.model_or_default(), DEFAULT_MODEL);
    assert!(config.search_enabled());
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.set_value("model", "gemini-2.5-flash").expect("set model");
    config.set_value("temperature", "0.2").expect("set temperature");
    config.set_value("search", "off").expect("set search");
    config
        .set_value("system-prompt", "Answer in one sentence.")
        .expect("set prompt");
    config.save_to_path(&config_path).expect("Failed to save config");

    let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded, config);
    assert_eq!(loaded.model_or_default(), "gemini-2.5-flash");
    assert!(!loaded.search_enabled());

    let mut modified = loaded;
    modified.unset_value("model").expect("unset model");
    modified.save_to_path(&config_path).expect("Failed to save config");

    let reloaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(reloaded.model, None);
    assert_eq!(reloaded.temperature, Some(0.2));
}

#[test]
fn test_invalid_toml_reports_parse_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "model = [unterminated").expect("write");

    let err = Config::load_from_path(&config_path).expect_err("parse should fail");
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().starts_with("Invalid TOML in"));
}

#[test]
fn test_set_value_validation() {
    let mut config = Config::default();

    let unknown = config.set_value("colour", "blue").expect_err("unknown key");
    assert!(matches!(unknown, ConfigError::UnknownKey(_)));
    assert!(unknown.to_string().contains("system-prompt"));
    assert!(matches!(
        config.set_value("temperature", "hot"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        config.set_value("temperature", "3.5"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        config.set_value("search", "maybe"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        config.set_value("base-url", "ftp://example.com"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        config.set_value("model", "   "),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert_eq!(config, Config::default());
}

#[test]
fn test_empty_greeting_disables_it() {
    let mut config = Config::default();
    assert_eq!(config.greeting_or_default(), Some(DEFAULT_GREETING));

    config.set_value("greeting", "").expect("set greeting");
    assert_eq!(config.greeting_or_default(), None);

    config.unset_value("greeting").expect("unset greeting");
    assert_eq!(config.greeting_or_default(), Some(DEFAULT_GREETING));
}
