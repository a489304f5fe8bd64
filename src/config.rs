//! Layered configuration.
//!
//! Settings are merged with `figment`, later layers winning:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. TOML file: `--config <FILE>`, or `<config_dir>/dupfinder/config.toml`
//! 3. Environment variables prefixed with `DUPFINDER_` (e.g. `DUPFINDER_JOBS=4`)
//! 4. Command-line flags ([`ConfigOverrides`])
//!
//! A missing default file is fine. A missing explicit file, or any file that
//! does not parse, is a [`ConfigError`].
//!
//! # Example file
//!
//! ```toml
//! recursive = true
//! exclude = [".bak", "node_modules"]
//! exclude_empty = true
//! algorithm = "blake3"
//! mode = "verified"
//! jobs = 4
//! trash = true
//! color = false
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::duplicates::ScanStrategy;
use crate::scanner::{HashAlgorithm, WalkerConfig};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "DUPFINDER_";

/// Name of the config file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file passed with `--config` does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// A layer could not be parsed or had the wrong types.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        Self::Invalid(Box::new(e))
    }
}

/// Effective settings for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Substring tokens; matching paths are skipped.
    pub exclude: Vec<String>,
    /// Skip zero-byte files.
    pub exclude_empty: bool,
    /// Digest algorithm.
    pub algorithm: HashAlgorithm,
    /// Fingerprint strategy.
    pub mode: ScanStrategy,
    /// Fingerprinting threads.
    pub jobs: usize,
    /// Move deleted files to the trash.
    pub trash: bool,
    /// Colored text output.
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recursive: true,
            exclude: Vec::new(),
            exclude_empty: false,
            algorithm: HashAlgorithm::default(),
            mode: ScanStrategy::default(),
            jobs: 1,
            trash: false,
            color: true,
        }
    }
}

/// Values set on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recursive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_empty: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<HashAlgorithm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ScanStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trash: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

impl Config {
    /// Default config file location, if the platform has a config directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dupfinder").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load every layer.
    ///
    /// # Errors
    ///
    /// See [`ConfigError`].
    pub fn load(
        explicit: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        Self::load_with_env(explicit, Env::prefixed(ENV_PREFIX), overrides)
    }

    /// Like [`Config::load`], with a caller-supplied environment provider.
    ///
    /// # Errors
    ///
    /// See [`ConfigError`].
    pub fn load_with_env(
        explicit: Option<&Path>,
        env: Env,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                log::debug!("Loading config from {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
            None => {
                if let Some(path) = Self::default_path().filter(|p| p.is_file()) {
                    log::debug!("Loading config from {}", path.display());
                    figment = figment.merge(Toml::file(path));
                }
            }
        }

        let config: Config = figment
            .merge(env)
            .merge(Serialized::defaults(overrides))
            .extract()?;

        log::trace!("Effective config: {:?}", config);
        Ok(config)
    }

    /// Walker settings derived from this config.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::new(self.recursive, self.exclude.clone(), self.exclude_empty)
    }
}
