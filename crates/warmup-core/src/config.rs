//! Logging configuration.
//!
//! Read from JSON (`{"format": "json", "filter": "warmup_core=debug"}`) or
//! from `WARMUP_LOG_FORMAT` / `RUST_LOG`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const LOG_FORMAT_ENV: &str = "WARMUP_LOG_FORMAT";
pub const LOG_FILTER_ENV: &str = "RUST_LOG";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON structured logs (for production).
    Json,
    /// Pretty-printed logs (for development).
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(ConfigError::InvalidLogFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid log format '{0}', expected 'pretty' or 'json'")]
    InvalidLogFormat(String),

    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub format: LogFormat,

    /// `EnvFilter` directives; `info` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl LogConfig {
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            std::env::var(LOG_FORMAT_ENV).ok(),
            std::env::var(LOG_FILTER_ENV).ok(),
        )
    }

    fn from_vars(format: Option<String>, filter: Option<String>) -> Result<Self, ConfigError> {
        let format = match format {
            Some(s) if !s.trim().is_empty() => s.parse()?,
            _ => LogFormat::default(),
        };
        Ok(Self {
            format,
            filter: filter.filter(|f| !f.trim().is_empty()),
        })
    }

    pub fn filter_or_default(&self) -> &str {
        self.filter.as_deref().unwrap_or("info")
    }
}
