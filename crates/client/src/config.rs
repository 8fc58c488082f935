//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ECHOPPE_API_URL` - Base URL of the shop API (e.g., `https://fakestoreapi.com`)
//!
//! ## Optional
//! - `ECHOPPE_API_TIMEOUT_SECS` - HTTP request timeout in seconds (default: 10)
//! - `ECHOPPE_DATA_DIR` - Directory for persisted local state (default: `.echoppe`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client application configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the shop API.
    pub api_url: String,
    /// Timeout applied to every HTTP request.
    pub api_timeout: Duration,
    /// Directory holding the persisted local state snapshots.
    pub data_dir: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = get_required_env("ECHOPPE_API_URL")?;
        let timeout_secs = get_env_or_default("ECHOPPE_API_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ECHOPPE_API_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        let data_dir = PathBuf::from(get_env_or_default("ECHOPPE_DATA_DIR", ".echoppe"));

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_timeout: Duration::from_secs(timeout_secs),
            data_dir,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
