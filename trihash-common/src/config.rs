//! Configuration loading and resolution
//!
//! Config file resolution order:
//! 1. Command-line argument (highest priority)
//! 2. `TRIHASH_CONFIG` environment variable
//! 3. `<config dir>/trihash/config.toml` (e.g. `~/.config/trihash/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A missing file never stops startup: it is logged and defaults are used.
//! A file that exists but does not parse is an error.

use crate::hasher::{Fingerprinter, HashAlgorithm, SuffixPolicy, DEFAULT_SUFFIX};
use crate::novelty::{NoveltyConfig, NoveltyTracker};
use crate::symbols::SymbolSet;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "TRIHASH_CONFIG";

/// Top-level TOML configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Recognized symbolic classes, in order
    pub symbols: SymbolSet,
    pub fingerprint: FingerprintConfig,
    pub novelty: NoveltyConfig,
    pub logging: LoggingConfig,
}

/// `[fingerprint]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintConfig {
    pub algorithm: HashAlgorithm,
    pub seed: u32,
    /// Suffix used when the caller passes none
    pub suffix: String,
    /// Use `(<shc>)` instead of `suffix`
    pub per_symbol_suffix: bool,
    /// Validate components before hashing
    pub validate: bool,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::Murmur3,
            seed: 0,
            suffix: DEFAULT_SUFFIX.to_string(),
            per_symbol_suffix: false,
            validate: true,
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl TomlConfig {
    /// Build a fingerprinter from `symbols` and `[fingerprint]`
    pub fn fingerprinter(&self) -> Fingerprinter {
        let fp = &self.fingerprint;
        let suffix = if fp.per_symbol_suffix {
            SuffixPolicy::PerSymbol
        } else {
            SuffixPolicy::Fixed(fp.suffix.clone())
        };

        Fingerprinter::new()
            .with_symbols(self.symbols.clone())
            .with_strategy(fp.algorithm.build(fp.seed))
            .with_suffix_policy(suffix)
            .with_validation(fp.validate)
    }

    /// Build an empty tracker from `[novelty]`
    pub fn tracker(&self) -> NoveltyTracker {
        NoveltyTracker::with_config(self.novelty.clone())
    }
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Locate the config file following the resolution order
///
/// Returns the first candidate that is named explicitly (argument or env var),
/// whether or not it exists, otherwise the platform file if present.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    default_config_path().filter(|p| p.exists())
}

/// Platform config file location, e.g. `~/.config/trihash/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("trihash").join("config.toml"))
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// No file named and no platform file present
    Defaults,
    /// Parsed from this file
    File(PathBuf),
    /// Named explicitly but absent; defaults were used
    Missing(PathBuf),
}

impl ConfigSource {
    /// Emit the startup log line for this outcome
    ///
    /// Kept separate from loading so binaries can call it once their
    /// subscriber is installed.
    pub fn log(&self) {
        match self {
            ConfigSource::Defaults => info!("No config file found, using compiled defaults"),
            ConfigSource::File(path) => info!("Loaded config from {}", path.display()),
            ConfigSource::Missing(path) => warn!(
                "Config file {} not found, using compiled defaults",
                path.display()
            ),
        }
    }
}

/// Resolve and load configuration without logging, reporting where it came from
pub fn load_config_with_source(cli_arg: Option<&Path>) -> Result<(TomlConfig, ConfigSource)> {
    let Some(path) = resolve_config_path(cli_arg) else {
        return Ok((TomlConfig::default(), ConfigSource::Defaults));
    };

    if !path.exists() {
        return Ok((TomlConfig::default(), ConfigSource::Missing(path)));
    }

    let config = load_toml_config(&path).map_err(|e| match e {
        Error::TomlParse(err) => Error::Config(format!("{}: {}", path.display(), err)),
        other => other,
    })?;
    Ok((config, ConfigSource::File(path)))
}

/// Resolve and load configuration, degrading to defaults when no file exists
pub fn load_config(cli_arg: Option<&Path>) -> Result<TomlConfig> {
    let (config, source) = load_config_with_source(cli_arg)?;
    source.log();
    Ok(config)
}

/// Write `config` atomically (temp file + rename)
///
/// On Unix the file is created with 0600 permissions.
pub fn write_toml_config(config: &TomlConfig, target: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut temp_name = target.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    fs::write(&temp_path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&temp_path, fs::Permissions::from_mode(0o600))?;
    }

    if let Err(e) = fs::rename(&temp_path, target) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    Ok(())
}
