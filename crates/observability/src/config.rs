//! Logging configuration read from the environment.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Variable holding the filter directives (tracing-subscriber's own default).
pub const FILTER_VAR: &str = "RUST_LOG";

/// Variable selecting the output format.
pub const FORMAT_VAR: &str = "DEFERID_LOG_FORMAT";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown log format '{0}' (expected json, pretty or compact)")]
    UnknownFormat(String),
}

/// Line format of emitted events.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
    Compact,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// `EnvFilter` directives, e.g. `info` or `deferid_guards=debug`.
    pub filter: String,
    pub format: LogFormat,
    pub with_target: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::default(),
            with_target: false,
        }
    }
}

impl ObservabilityConfig {
    /// Read `RUST_LOG` and `DEFERID_LOG_FORMAT` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Unset or blank variables keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(filter) = value(FILTER_VAR) {
            config.filter = filter;
        }
        if let Some(format) = value(FORMAT_VAR) {
            config.format = format.parse()?;
        }
        Ok(config)
    }
}
