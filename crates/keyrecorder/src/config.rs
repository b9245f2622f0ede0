//! Configuration management for keyrecorder.
//!
//! Configuration is resolved with figment from built-in defaults and
//! `KEYRECORDER_`-prefixed environment variables. There is no configuration
//! file; with an empty environment the recorder writes `keystroke.log` in the
//! working directory.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default log file path, relative to the working directory.
pub const DEFAULT_LOG_PATH: &str = "keystroke.log";

/// Environment variable prefix.
const ENV_PREFIX: &str = "KEYRECORDER_";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log file configuration.
    pub log: LogConfig,
}

/// Log file configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Path of the append-only keystroke log.
    pub path: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_LOG_PATH),
        }
    }
}

impl Config {
    /// Load configuration from defaults and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment value cannot be parsed or the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self> {
        Self::from_figment(&Self::figment())
    }

    /// The figment used by [`Config::load`].
    #[must_use]
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("_"))
    }

    /// Extract and validate a configuration from `figment`.
    ///
    /// # Errors
    ///
    /// Returns an error if extraction or validation fails.
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the log path is empty.
    pub fn validate(&self) -> Result<()> {
        if self.log.path.as_os_str().is_empty() {
            return Err(Error::ConfigValidation {
                message: "log.path must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Path of the keystroke log.
    #[must_use]
    pub fn log_path(&self) -> &Path {
        &self.log.path
    }
}
