//! Environment-sourced configuration.
//!
//! The OnDemand API key is a secret and MUST be provided explicitly —
//! startup fails without it. There is deliberately no baked-in default
//! credential anywhere in this crate.

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Jan Sahayak";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_BASE_URL: &str = "https://api.on-demand.io";

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// OnDemand API key (secret, required).
    pub api_key: String,
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Base URL of the OnDemand media API.
    pub base_url: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ONDEMAND_API_KEY is not set; refusing to start without a remote API key")]
    MissingApiKey,
    #[error("Invalid PORT value '{0}'")]
    InvalidPort(String),
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup. Seam for tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("ONDEMAND_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let base_url = lookup("ONDEMAND_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            api_key,
            port,
            base_url,
        })
    }
}

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> &'static str {
    "info"
}
