//! Configuration loading and typed config structures for Eventboard.
//!
//! The configuration lives in `eventboard-config.yaml` next to the binary's
//! working directory, or wherever `EVENTBOARD_CONFIG` points. Every field
//! has a default, so a missing file yields a working configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::notifier::{DEFAULT_CHANNEL_CAPACITY, MAX_CHANNEL_CAPACITY};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "eventboard-config.yaml";

/// Environment variable naming an alternative configuration file.
pub const CONFIG_PATH_ENV: &str = "EVENTBOARD_CONFIG";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is outside its accepted range.
    #[error("invalid config: {message}")]
    Invalid {
        /// Which setting was rejected and why.
        message: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration, mirroring `eventboard-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BoardConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerSettings,

    /// Startup seed data.
    #[serde(default)]
    pub seed: SeedConfig,

    /// Change notifier settings.
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BoardConfig {
    /// Resolve the configuration file path: `EVENTBOARD_CONFIG` if set,
    /// otherwise [`DEFAULT_CONFIG_FILE`] in the working directory.
    pub fn default_path() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from)
    }

    /// Load configuration from a YAML file, then apply environment
    /// overrides.
    ///
    /// A missing file is not an error; defaults are used instead.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file exists but cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse_yaml(&contents)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(err) => return Err(err.into()),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a YAML file that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse_yaml(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string. Environment overrides are
    /// not applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Self::parse_yaml(yaml)
    }

    fn parse_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges that the YAML types alone cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `notifier.channel_capacity` is
    /// zero or above [`MAX_CHANNEL_CAPACITY`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let capacity = self.notifier.channel_capacity;
        if capacity == 0 || capacity > MAX_CHANNEL_CAPACITY {
            return Err(ConfigError::Invalid {
                message: format!(
                    "notifier.channel_capacity must be between 1 and {MAX_CHANNEL_CAPACITY}, got {capacity}"
                ),
            });
        }
        Ok(())
    }

    /// Override settings with environment variables when set:
    ///
    /// - `EVENTBOARD_HOST` overrides `server.host`
    /// - `EVENTBOARD_PORT` overrides `server.port` (ignored if not a port)
    /// - `EVENTBOARD_SEED` overrides `seed.path`
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides using `lookup` in place of the process environment.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("EVENTBOARD_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("EVENTBOARD_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(seed) = lookup("EVENTBOARD_SEED") {
            self.seed.path = Some(PathBuf::from(seed));
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allow cross-origin requests from any origin.
    #[serde(default = "default_true")]
    pub cors_allow_any: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_allow_any: default_true(),
        }
    }
}

/// Startup seed data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SeedConfig {
    /// JSON seed document to load at startup. No seeding when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Change notifier settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NotifierConfig {
    /// Undelivered changes buffered per topic before the oldest are
    /// dropped for a slow subscriber. Must be between 1 and
    /// [`MAX_CHANNEL_CAPACITY`].
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when
    /// set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    3000
}

const fn default_true() -> bool {
    true
}

const fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

fn default_log_level() -> String {
    String::from("info")
}
