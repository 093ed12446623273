#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Typed configuration for the extup bootstrap orchestrator
//!
//! Configuration is loaded from a TOML file (default under the per-user
//! config directory), merged with `EXTUP_*` environment variables, and
//! validated at load time. All fields have defaults so a missing file is
//! not an error.

pub mod constants;

use extup_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// State directory and settings document configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Directory holding the settings documents; defaults to
    /// `<config dir>/extup/state`
    pub state_dir: Option<PathBuf>,
    #[serde(default = "default_progress_document")]
    pub progress_document: String,
    #[serde(default = "default_preferences_document")]
    pub preferences_document: String,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            state_dir: None,
            progress_document: default_progress_document(),
            preferences_document: default_preferences_document(),
        }
    }
}

/// Bootstrap sequencing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Settle delay imposed around disable/install/remove, in milliseconds
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Line-delimited list of extra packages to force-include; defaults to
    /// `<config dir>/extup/extra-packages.txt`
    pub override_file: Option<PathBuf>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            override_file: None,
        }
    }
}

/// Package host directory configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HostConfig {
    /// Directory the host installs packages into
    pub packages_dir: Option<PathBuf>,
    /// Directory package payloads are installed from
    pub channel_dir: Option<PathBuf>,
}

/// Top-level extup configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub state: StateConfig,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
    #[serde(default)]
    pub host: HostConfig,
}

impl Config {
    /// Load configuration from an explicit path
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file does not exist and
    /// `ConfigError::ParseError` if it is not valid TOML.
    pub async fn load(path: &Path) -> Result<Self, Error> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.display().to_string(),
                }
            } else {
                ConfigError::Invalid {
                    message: e.to_string(),
                }
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;

        debug!(path = %path.display(), "loaded configuration");
        config.validate()?;
        Ok(config)
    }

    /// Load from the given path, or from the default location, or fall
    /// back to built-in defaults when no file exists
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given path is missing or any
    /// found file fails to parse or validate.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        if let Some(path) = path {
            return Self::load(path).await;
        }

        let default_path = app_dir().join(constants::CONFIG_FILE_NAME);
        if default_path.exists() {
            Self::load(&default_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Merge `EXTUP_*` environment variables over the loaded values
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for unparseable numeric values.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        if let Ok(dir) = std::env::var("EXTUP_STATE_DIR") {
            self.state.state_dir = Some(PathBuf::from(dir));
        }
        if let Ok(dir) = std::env::var("EXTUP_PACKAGES_DIR") {
            self.host.packages_dir = Some(PathBuf::from(dir));
        }
        if let Ok(dir) = std::env::var("EXTUP_CHANNEL_DIR") {
            self.host.channel_dir = Some(PathBuf::from(dir));
        }
        if let Ok(file) = std::env::var("EXTUP_OVERRIDE_FILE") {
            self.bootstrap.override_file = Some(PathBuf::from(file));
        }
        if let Ok(delay) = std::env::var("EXTUP_SETTLE_DELAY_MS") {
            self.bootstrap.settle_delay_ms =
                delay.parse().map_err(|_| ConfigError::InvalidValue {
                    field: "settle_delay_ms".to_string(),
                    value: delay,
                })?;
        }
        self.validate()?;
        Ok(())
    }

    /// Validate configured values
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for out-of-range or empty values.
    pub fn validate(&self) -> Result<(), Error> {
        if self.bootstrap.settle_delay_ms > constants::MAX_SETTLE_DELAY_MS {
            return Err(ConfigError::InvalidValue {
                field: "settle_delay_ms".to_string(),
                value: self.bootstrap.settle_delay_ms.to_string(),
            }
            .into());
        }
        for (field, value) in [
            ("progress_document", &self.state.progress_document),
            ("preferences_document", &self.state.preferences_document),
        ] {
            if value.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: String::new(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Resolved settings directory
    #[must_use]
    pub fn state_dir(&self) -> PathBuf {
        self.state
            .state_dir
            .clone()
            .unwrap_or_else(|| app_dir().join("state"))
    }

    /// Resolved override list path
    #[must_use]
    pub fn override_file(&self) -> PathBuf {
        self.bootstrap
            .override_file
            .clone()
            .unwrap_or_else(|| app_dir().join(constants::OVERRIDE_FILE_NAME))
    }

    /// Resolved packages directory
    #[must_use]
    pub fn packages_dir(&self) -> PathBuf {
        self.host
            .packages_dir
            .clone()
            .unwrap_or_else(|| app_dir().join("packages"))
    }

    /// Resolved channel directory
    #[must_use]
    pub fn channel_dir(&self) -> PathBuf {
        self.host
            .channel_dir
            .clone()
            .unwrap_or_else(|| app_dir().join("channel"))
    }

    /// Settle delay as a `Duration`
    #[must_use]
    pub fn settle_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.bootstrap.settle_delay_ms)
    }
}

/// Per-user application directory
fn app_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(constants::APP_DIR_NAME)
}

// Default value functions for serde
fn default_progress_document() -> String {
    constants::PROGRESS_DOCUMENT.to_string()
}

fn default_preferences_document() -> String {
    constants::PREFERENCES_DOCUMENT.to_string()
}

fn default_settle_delay_ms() -> u64 {
    constants::DEFAULT_SETTLE_DELAY_MS
}
