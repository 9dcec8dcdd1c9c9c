//! HTTP Headers Utility
//!
//! Builds the header set sent with every API request.

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use secrecy::ExposeSecret;

use crate::config::{API_KEY_HEADER, ClientConfig};
use crate::error::{ProbeError, Result};

/// HTTP header builder for API requests
pub struct HttpHeaderBuilder {
    headers: HeaderMap,
}

impl HttpHeaderBuilder {
    pub fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
        }
    }

    /// Add an API key under a custom header name (e.g. `x-apikey`).
    ///
    /// The value is marked sensitive so it is skipped by reqwest's debug output.
    pub fn with_api_key(mut self, header_name: &str, key: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(header_name.as_bytes()).map_err(|e| {
            ProbeError::ConfigurationError(format!("Invalid header name '{header_name}': {e}"))
        })?;
        let mut value = HeaderValue::from_str(key)
            .map_err(|e| ProbeError::ConfigurationError(format!("Invalid API key format: {e}")))?;
        value.set_sensitive(true);
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Add JSON content type and accept headers
    pub fn with_json_content_type(mut self) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.headers
            .insert(ACCEPT, HeaderValue::from_static("application/json"));
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Result<Self> {
        self.headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .map_err(|e| ProbeError::ConfigurationError(format!("Invalid user agent: {e}")))?,
        );
        Ok(self)
    }

    /// Build the final HeaderMap
    pub fn build(self) -> HeaderMap {
        self.headers
    }
}

impl Default for HttpHeaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Headers for a GraphQL request made with `config`.
pub fn request_headers(config: &ClientConfig) -> Result<HeaderMap> {
    Ok(HttpHeaderBuilder::new()
        .with_api_key(API_KEY_HEADER, config.api_key.expose_secret())?
        .with_json_content_type()
        .with_user_agent(&config.user_agent)?
        .build())
}
