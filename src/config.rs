// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.
//!
//! One base URL and one pair of storage keys are used by every component, so
//! there is a single place to point the app at a different backend.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration, loaded once at application start.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL without trailing slash (e.g. `https://api.example.com/api`)
    pub api_base_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Directory holding the durable key/value file
    pub storage_dir: PathBuf,
    /// Storage key for the bearer token
    pub token_key: String,
    /// Storage key for the cached serialized user
    pub user_key: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_base_url = env::var("AGROVET_API_BASE_URL")
            .map_err(|_| ConfigError::Missing("AGROVET_API_BASE_URL"))?;

        let timeout_secs = match env::var("AGROVET_REQUEST_TIMEOUT_SECS") {
            Ok(v) => v.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                name: "AGROVET_REQUEST_TIMEOUT_SECS",
                value: v,
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_base_url: normalize_base_url(&api_base_url),
            request_timeout: Duration::from_secs(timeout_secs),
            storage_dir: env::var("AGROVET_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".agrovet")),
            token_key: env::var("AGROVET_TOKEN_KEY").unwrap_or_else(|_| "auth_token".to_string()),
            user_key: env::var("AGROVET_USER_KEY").unwrap_or_else(|_| "auth_user".to_string()),
        })
    }

    /// Configuration for tests, pointing at a local backend.
    pub fn test_default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            request_timeout: Duration::from_secs(5),
            storage_dir: PathBuf::from(".agrovet-test"),
            token_key: "auth_token".to_string(),
            user_key: "auth_user".to_string(),
        }
    }

    /// Same configuration with a different base URL (used to target stub servers).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.api_base_url = normalize_base_url(base_url);
        self
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
