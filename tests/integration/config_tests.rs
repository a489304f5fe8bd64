use dupfinder::config::{Config, ConfigError, ConfigOverrides};
use dupfinder::duplicates::ScanStrategy;
use dupfinder::scanner::HashAlgorithm;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .extract()
        .unwrap();

    assert_eq!(config, Config::default());
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
exclude = ["node_modules", ".cache"]
exclude_empty = true
algorithm = "blake3"
mode = "fast"
trash = true
color = false
"#,
    )
    .unwrap();

    let config = Config::load_with_env(
        Some(&config_path),
        Env::prefixed("DUPFINDER_INTEGRATION_UNSET_"),
        &ConfigOverrides::default(),
    )
    .unwrap();

    assert!(config.recursive);
    assert_eq!(config.exclude, vec!["node_modules", ".cache"]);
    assert!(config.exclude_empty);
    assert_eq!(config.algorithm, HashAlgorithm::Blake3);
    assert_eq!(config.mode, ScanStrategy::Fast);
    assert!(config.trash);
    assert!(!config.color);
}

#[test]
fn test_config_unknown_mode_rejected() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "mode = \"quick\"\n").unwrap();

    let result: Result<Config, _> = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&config_path))
        .extract();

    assert!(result.is_err());
}

#[test]
fn test_config_invalid_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "recursive = ").unwrap();

    let err = Config::load_with_env(
        Some(&config_path),
        Env::prefixed("DUPFINDER_INTEGRATION_UNSET_"),
        &ConfigOverrides::default(),
    )
    .unwrap_err();

    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_cli_overrides_beat_env() {
    std::env::set_var("DUPFINDER_INTEGRATION_ENV_MODE", "verified");
    std::env::set_var("DUPFINDER_INTEGRATION_ENV_RECURSIVE", "false");

    let overrides = ConfigOverrides {
        mode: Some(ScanStrategy::Fast),
        ..Default::default()
    };
    let config = Config::load_with_env(
        None,
        Env::prefixed("DUPFINDER_INTEGRATION_ENV_"),
        &overrides,
    )
    .unwrap();

    std::env::remove_var("DUPFINDER_INTEGRATION_ENV_MODE");
    std::env::remove_var("DUPFINDER_INTEGRATION_ENV_RECURSIVE");

    assert_eq!(config.mode, ScanStrategy::Fast);
    assert!(!config.recursive);
}
