//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ECOFINDS_DATA_DIR` - Directory holding the persisted JSON slots (default: `.ecofinds`)
//! - `ECOFINDS_LOG_FORMAT` - `pretty` or `json` (default: `pretty`)
//! - `RUST_LOG` - Tracing filter directives, read by the CLI's subscriber

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

const DATA_DIR_VAR: &str = "ECOFINDS_DATA_DIR";
const LOG_FORMAT_VAR: &str = "ECOFINDS_LOG_FORMAT";
const DEFAULT_DATA_DIR: &str = ".ecofinds";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Output format for log events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, multi-field lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `pretty` or `json`, got `{other}`")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
        })
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Directory the file store writes `<key>.json` slots into
    pub data_dir: PathBuf,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_format: LogFormat::default(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = get_non_blank(&lookup, DATA_DIR_VAR)?
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        let log_format = get_env_or_default(&lookup, LOG_FORMAT_VAR, "pretty")
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::InvalidEnvVar(LOG_FORMAT_VAR.to_string(), e))?;

        Ok(Self {
            data_dir,
            log_format,
        })
    }

    /// Override the data directory, e.g. from a command-line flag.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an environment variable with a default value.
fn get_env_or_default(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Get an optional variable, rejecting values that are set but blank.
fn get_non_blank(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<String>, ConfigError> {
    match lookup(key) {
        Some(value) if value.trim().is_empty() => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must not be blank".to_string(),
        )),
        other => Ok(other),
    }
}
