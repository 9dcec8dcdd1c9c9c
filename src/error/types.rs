//! Core error types.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, ProbeError>;

/// Coarse grouping of errors for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Local configuration problem, detected before any request is sent
    Configuration,
    /// The API rejected the credentials
    Authentication,
    /// The API is throttling this key
    RateLimit,
    /// 4xx responses other than auth/rate limit
    Client,
    /// 5xx responses
    Server,
    /// Transport-level failures
    Network,
    /// Response body could not be decoded or had an unexpected layout
    Parsing,
    /// Local I/O
    Io,
}

/// Errors produced while querying the API or summarizing its response.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The API key environment variable is unset or empty
    #[error("Missing API key: set the {0} environment variable")]
    MissingApiKey(String),

    /// Invalid configuration value (endpoint, header, timeout, ...)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Transport failure (connect, TLS, timeout, body read)
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// 401/403 from the API
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// 429 from the API
    #[error("Rate limited: {0}")]
    RateLimitError(String),

    /// Any other non-success status
    #[error("API error {code}: {message}")]
    ApiError {
        code: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Body was not valid JSON, or JSON did not match the expected envelope
    #[error("JSON error: {0}")]
    JsonError(String),

    /// The response envelope had no `data` member
    #[error("Response has no `data` field")]
    MissingData,

    /// The API answered with GraphQL errors and no data
    #[error("GraphQL errors: {}", .0.join("; "))]
    GraphQlErrors(Vec<String>),

    /// A top-level list value had no element to take keys from
    #[error("Cannot read keys of `{key}`: the list is empty")]
    EmptyRecordList { key: String },

    /// A value was neither an object nor a list of objects
    #[error("Unsupported shape at `{key}`: expected an object or a list of objects, found {found}")]
    UnsupportedShape { key: String, found: &'static str },

    /// Local I/O (query files, stdout)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProbeError {
    /// HTTP status associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            Self::AuthenticationError(_) => Some(401),
            Self::RateLimitError(_) => Some(429),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingApiKey(_) | Self::ConfigurationError(_) => ErrorCategory::Configuration,
            Self::AuthenticationError(_) => ErrorCategory::Authentication,
            Self::RateLimitError(_) => ErrorCategory::RateLimit,
            Self::ApiError { code, .. } if *code >= 500 => ErrorCategory::Server,
            Self::ApiError { .. } => ErrorCategory::Client,
            Self::HttpError(_) => ErrorCategory::Network,
            Self::JsonError(_)
            | Self::MissingData
            | Self::GraphQlErrors(_)
            | Self::EmptyRecordList { .. }
            | Self::UnsupportedShape { .. } => ErrorCategory::Parsing,
            Self::Io(_) => ErrorCategory::Io,
        }
    }
}

/// Map a failed HTTP response to a `ProbeError`.
///
/// The body is sampled (first 200 chars) so that HTML error pages from a
/// proxy do not flood the terminal.
pub fn classify_http_error(status: u16, body_text: &str, fallback_message: Option<&str>) -> ProbeError {
    let body_sample = body_text.chars().take(200).collect::<String>();

    match status {
        401 | 403 => ProbeError::AuthenticationError(format!(
            "http={status} body_sample={body_sample}"
        )),
        429 => ProbeError::RateLimitError(format!("http=429 body_sample={body_sample}")),
        _ => {
            let details = serde_json::from_str::<serde_json::Value>(body_text).ok();
            let message = details
                .as_ref()
                .and_then(|v| v.get("message").or_else(|| v.get("error")))
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .or_else(|| fallback_message.map(str::to_string))
                .unwrap_or_else(|| body_sample.clone());
            ProbeError::ApiError {
                code: status,
                message,
                details,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_authentication() {
        let err = classify_http_error(401, "nope", Some("Unauthorized"));
        assert!(matches!(err, ProbeError::AuthenticationError(_)));
        assert_eq!(err.category(), ErrorCategory::Authentication);

        let err = classify_http_error(403, "", None);
        assert_eq!(err.category(), ErrorCategory::Authentication);
    }

    #[test]
    fn too_many_requests_maps_to_rate_limit() {
        let err = classify_http_error(429, "slow down", None);
        assert!(matches!(err, ProbeError::RateLimitError(_)));
        assert_eq!(err.status_code(), Some(429));
    }

    #[test]
    fn json_error_body_message_is_used() {
        let err = classify_http_error(400, r#"{"message":"bad query"}"#, Some("Bad Request"));
        match err {
            ProbeError::ApiError {
                code,
                message,
                details,
            } => {
                assert_eq!(code, 400);
                assert_eq!(message, "bad query");
                assert!(details.is_some());
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn plain_body_falls_back_to_reason() {
        let err = classify_http_error(502, "<html>gateway</html>", Some("Bad Gateway"));
        assert_eq!(err.category(), ErrorCategory::Server);
        assert_eq!(err.to_string(), "API error 502: Bad Gateway");
    }

    #[test]
    fn long_bodies_are_sampled() {
        let body = "x".repeat(1000);
        let err = classify_http_error(429, &body, None);
        assert!(err.to_string().len() < 300);
    }

    #[test]
    fn io_errors_convert_via_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ProbeError = io_err.into();
        assert!(matches!(err, ProbeError::Io(_)));
        assert_eq!(err.category(), ErrorCategory::Io);
    }

    #[test]
    fn missing_key_message_names_the_variable() {
        let err = ProbeError::MissingApiKey("TRUGARD_API_KEY".into());
        assert!(err.to_string().contains("TRUGARD_API_KEY"));
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }
}
