//! Handles the 1.0 configuration file format.

mod curve;
mod style;
mod top_config;

pub use curve::CurveTuning;
pub use style::StyleTuning;
pub use top_config::Config;

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

/// Location of the configuration file if nothing else is specified.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/tradeflow.conf";

/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_ENV_VAR: &str = "TRADEFLOW_CONFIG";

/// Loads the configuration from `$TRADEFLOW_CONFIG`, falling back
/// to `/etc/tradeflow.conf`.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = std::env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
    Config::load(&path)
}

impl Config {
    /// Loads and validates a configuration file from `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            error!("{} does not exist!", path.display());
            return Err(ConfigError::ConfigDoesNotExist(path.display().to_string()));
        }
        let raw = std::fs::read_to_string(path).map_err(|e| {
            error!("Unable to read contents of {}", path.display());
            error!("{e:?}");
            ConfigError::CannotReadFile(path.display().to_string())
        })?;
        info!("Loading configuration from {}", path.display());
        Self::load_from_string(&raw)
    }

    /// Parses and validates a configuration held in memory.
    pub fn load_from_string(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(raw).map_err(|e| {
            error!("Unable to parse TOML configuration");
            error!("Full error: {:?}", e);
            ConfigError::CannotParseToml(e.to_string())
        })?;
        config.validate().map_err(|reason| {
            error!("Configuration is invalid: {reason}");
            ConfigError::Invalid(reason)
        })?;
        Ok(config)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} not found. You must setup this file or pass --config.")]
    ConfigDoesNotExist(String),
    #[error("Unable to read contents of {0}.")]
    CannotReadFile(String),
    #[error("Unable to parse TOML configuration: {0}")]
    CannotParseToml(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
