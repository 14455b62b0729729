//! Application configuration
//!
//! All environment lookups happen here, once, at startup. The resulting
//! struct is injected into the components that need it; pipeline stages
//! never read ambient global state.

use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Default ceiling on the decoded upload, in bytes (5 MiB)
pub const DEFAULT_MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

const DEFAULT_RATE_LIMIT_WINDOW_MS: u64 = 15 * 60 * 1000;
const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 30;

/// Typed application configuration, built once from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Base URL of the front-end, used for checkout redirects
    pub client_url: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub stripe_secret_key: String,
    pub stripe_base_url: String,
    /// Ceiling on the decoded upload size in bytes
    pub max_file_size: usize,
    pub rate_limit_window: Duration,
    pub rate_limit_max_requests: u32,
}

/// Errors produced while reading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variables: {0}")]
    MissingKeys(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

impl AppConfig {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary lookup function.
    ///
    /// Keeps the parsing rules testable without mutating process state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let openai_api_key = require(&lookup, "OPENAI_API_KEY", &mut missing);
        let stripe_secret_key = require(&lookup, "STRIPE_SECRET_KEY", &mut missing);
        if !missing.is_empty() {
            return Err(ConfigError::MissingKeys(missing.join(", ")));
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 3001)?,
            client_url: lookup("CLIENT_URL").unwrap_or_else(|| "http://localhost:3000".to_string()),
            openai_api_key,
            openai_base_url: lookup("OPENAI_BASE_URL")
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            stripe_secret_key,
            stripe_base_url: lookup("STRIPE_BASE_URL")
                .unwrap_or_else(|| "https://api.stripe.com".to_string()),
            max_file_size: parse_or(&lookup, "MAX_FILE_SIZE", DEFAULT_MAX_FILE_SIZE)?,
            rate_limit_window: Duration::from_millis(parse_or(
                &lookup,
                "RATE_LIMIT_WINDOW_MS",
                DEFAULT_RATE_LIMIT_WINDOW_MS,
            )?),
            rate_limit_max_requests: parse_or(
                &lookup,
                "RATE_LIMIT_MAX_REQUESTS",
                DEFAULT_RATE_LIMIT_MAX_REQUESTS,
            )?,
        })
    }

    /// Log the effective configuration at startup, without echoing secrets.
    pub fn log_summary(&self) {
        info!(
            host = %self.host,
            port = self.port,
            client_url = %self.client_url,
            "Server configuration"
        );
        info!(
            openai_api_key = set_or_not(&self.openai_api_key),
            stripe_secret_key = set_or_not(&self.stripe_secret_key),
            "API credentials"
        );
        info!(
            max_file_size = self.max_file_size,
            rate_limit_max_requests = self.rate_limit_max_requests,
            rate_limit_window_ms = self.rate_limit_window.as_millis() as u64,
            "Limits"
        );
    }
}

fn require<F>(lookup: &F, key: &'static str, missing: &mut Vec<&'static str>) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.is_empty() => value,
        _ => {
            missing.push(key);
            String::new()
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        }),
    }
}

fn set_or_not(value: &str) -> &'static str {
    if value.is_empty() {
        "not set"
    } else {
        "set"
    }
}
