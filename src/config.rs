//! Runtime configuration loaded from environment variables (and `.env`).

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Settings for the text-generation service and local storage.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the OpenAI-compatible completion endpoint.
    pub api_key: String,
    /// Base URL of the completion service (no trailing `/v1`).
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Upper bound for a single completion call.
    pub request_timeout: Duration,
    /// Directory for the file-backed artifact repository.
    pub data_dir: PathBuf,
}

impl Config {
    /// Load `.env` (if present) and then read the environment.
    pub fn load() -> Result<Self, ConfigError> {
        // During development the .env usually sits in the crate root
        if dotenvy::dotenv().is_err() {
            let _ = dotenvy::from_path("../.env");
        }
        let config = Self::from_env()?;
        tracing::debug!(
            base_url = %config.base_url,
            model = %config.model,
            timeout_secs = config.request_timeout.as_secs(),
            data_dir = %config.data_dir.display(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Read configuration from the process environment only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let request_timeout = get("NOTESMITH_REQUEST_TIMEOUT_SECS")
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| ConfigError::InvalidValue("NOTESMITH_REQUEST_TIMEOUT_SECS".into()))
            })
            .transpose()?
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Ok(Self {
            api_key: get("OPENAI_API_KEY")
                .ok_or_else(|| ConfigError::MissingVariable("OPENAI_API_KEY".to_string()))?,
            base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            request_timeout: Duration::from_secs(request_timeout),
            data_dir: get("NOTESMITH_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_data_dir),
        })
    }
}

/// `<platform data dir>/notesmith`, or `./notesmith-data` when the platform has none
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("notesmith"))
        .unwrap_or_else(|| PathBuf::from("notesmith-data"))
}
