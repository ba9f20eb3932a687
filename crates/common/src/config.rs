//! Configuration management following 12-factor app principles
//!
//! The backend location is read from environment variables (optionally seeded
//! from a `.env` file) so the same clients can target local and deployed
//! instances without code changes.

use std::env;
use std::time::Duration;

use crate::error::{Error, Result};

/// Path prefix under which the backend mounts its REST API
pub const API_PREFIX: &str = "/api";

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Backend origin, e.g. `http://localhost:3333`
    pub backend_url: String,

    /// REST API root, `backend_url` + `/api`
    pub api_url: String,

    /// Per-request timeout applied by the HTTP clients
    pub request_timeout: Duration,
}

impl ApiConfig {
    /// Build a configuration for an explicit backend origin
    pub fn new(backend_url: impl Into<String>) -> Self {
        let backend_url = backend_url.into().trim_end_matches('/').to_string();
        let api_url = format!("{}{}", backend_url, API_PREFIX);

        Self {
            backend_url,
            api_url,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let backend_url = lookup("BACKEND_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| Error::Configuration("BACKEND_URL is required".to_string()))?;

        let mut config = Self::new(backend_url.trim());

        if let Some(raw) = lookup("API_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                Error::Configuration(format!(
                    "API_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    raw
                ))
            })?;
            if secs == 0 {
                return Err(Error::Configuration(
                    "API_TIMEOUT_SECS must be greater than zero".to_string(),
                ));
            }
            config.request_timeout = Duration::from_secs(secs);
        }

        tracing::debug!(api_url = %config.api_url, "API configuration loaded");

        Ok(config)
    }

    /// Join a path below the API root
    pub fn api_path(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}
