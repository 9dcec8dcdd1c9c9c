//! Client configuration.
//!
//! The API key is never read from process-global state by the client itself;
//! callers build a [`ClientConfig`] (usually via [`ClientConfig::from_env`]) and
//! hand it to [`crate::client::TrugardClient`].

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::{ProbeError, Result};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "TRUGARD_API_KEY";

/// Optional environment variable overriding the endpoint.
pub const ENDPOINT_ENV: &str = "TRUGARD_ENDPOINT";

/// Header the API reads the key from.
pub const API_KEY_HEADER: &str = "x-apikey";

/// Public GraphQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.trugard.ai/tg/query";

/// Connection settings for the TruGard API.
#[derive(Clone)]
pub struct ClientConfig {
    /// API key sent in the `x-apikey` header
    pub api_key: SecretString,
    /// Full URL of the GraphQL endpoint
    pub endpoint: String,
    /// Request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// User-Agent header value
    pub user_agent: String,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    /// Create a configuration with the given key and default settings.
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
            user_agent: default_user_agent(),
        }
    }

    /// Build a configuration from the process environment.
    ///
    /// Fails with [`ProbeError::MissingApiKey`] when `TRUGARD_API_KEY` is unset
    /// or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ProbeError::MissingApiKey(API_KEY_ENV.to_string()))?;

        let mut config = Self::new(api_key);
        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|e| !e.trim().is_empty()) {
            config.endpoint = endpoint.trim().to_string();
        }
        config.validate()?;
        Ok(config)
    }

    /// Set the endpoint URL
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the request timeout
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the User-Agent header
    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Check the configuration before any request is made.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(ProbeError::MissingApiKey(API_KEY_ENV.to_string()));
        }
        let lower = self.endpoint.to_ascii_lowercase();
        if !(lower.starts_with("https://") || lower.starts_with("http://")) {
            return Err(ProbeError::ConfigurationError(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(ProbeError::ConfigurationError(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
