//! Unit tests for configuration resolution and graceful degradation
//!
//! Tests that manipulate TRIHASH_CONFIG are marked with #[serial] so they do
//! not race each other on the process environment.

use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;
use trihash_common::config::{
    load_config, load_config_with_source, load_toml_config, resolve_config_path,
    write_toml_config, ConfigSource, TomlConfig, CONFIG_ENV_VAR,
};
use trihash_common::{Error, HashAlgorithm, SymbolSet};

#[test]
#[serial]
fn test_cli_arg_takes_precedence_over_env() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/trihash-env.toml");

    let resolved = resolve_config_path(Some(PathBuf::from("/tmp/trihash-cli.toml").as_path()));
    assert_eq!(resolved, Some(PathBuf::from("/tmp/trihash-cli.toml")));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_env_var_used_without_cli_arg() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/trihash-env.toml");

    let resolved = resolve_config_path(None);
    assert_eq!(resolved, Some(PathBuf::from("/tmp/trihash-env.toml")));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_missing_file_degrades_to_defaults() {
    env::remove_var(CONFIG_ENV_VAR);
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.toml");

    let config = load_config(Some(missing.as_path())).unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
#[serial]
fn test_load_reports_source_for_deferred_logging() {
    env::remove_var(CONFIG_ENV_VAR);
    let temp_dir = TempDir::new().unwrap();

    let missing = temp_dir.path().join("nope.toml");
    let (config, source) = load_config_with_source(Some(missing.as_path())).unwrap();
    assert_eq!(config, TomlConfig::default());
    assert_eq!(source, ConfigSource::Missing(missing));

    let present = temp_dir.path().join("present.toml");
    std::fs::write(&present, "[logging]\nlevel = \"debug\"\n").unwrap();
    let (config, source) = load_config_with_source(Some(present.as_path())).unwrap();
    assert_eq!(config.logging.level, "debug");
    assert_eq!(source, ConfigSource::File(present));
}

#[test]
#[serial]
fn test_malformed_file_is_an_error() {
    env::remove_var(CONFIG_ENV_VAR);
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.toml");
    std::fs::write(&path, "symbols = [unterminated").unwrap();

    let result = load_config(Some(path.as_path()));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_env_var_file_is_loaded() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("env.toml");
    std::fs::write(&path, "[fingerprint]\nalgorithm = \"sha256\"\n").unwrap();
    env::set_var(CONFIG_ENV_VAR, &path);

    let config = load_config(None).unwrap();
    assert_eq!(config.fingerprint.algorithm, HashAlgorithm::Sha256);

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
fn test_write_then_load_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("nested").join("config.toml");

    let mut config = TomlConfig::default();
    config.symbols = SymbolSet::default().extended(["Σ"]).unwrap();
    config.fingerprint.algorithm = HashAlgorithm::Xxh32;
    config.fingerprint.seed = 7;
    config.novelty.max_entries = Some(10_000);
    config.logging.level = "debug".to_string();

    write_toml_config(&config, &target).unwrap();

    assert!(target.exists());
    assert!(!temp_dir.path().join("nested").join("config.toml.tmp").exists());
    assert_eq!(load_toml_config(&target).unwrap(), config);
}

#[cfg(unix)]
#[test]
fn test_written_config_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("config.toml");
    write_toml_config(&TomlConfig::default(), &target).unwrap();

    let mode = std::fs::metadata(&target).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
