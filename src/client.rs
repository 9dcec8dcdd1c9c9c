//! TruGard API client.
//!
//! One POST per call, no retries and no caching. Failures are classified into
//! [`ProbeError`] variants and returned to the caller.

use crate::config::ClientConfig;
use crate::error::{ProbeError, Result, classify_http_error};
use crate::headers::request_headers;
use crate::query::{GraphQlRequest, GraphQlResponse};
use crate::shape::ResponseDocument;

/// Client for the TruGard GraphQL endpoint.
#[derive(Clone, Debug)]
pub struct TrugardClient {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl TrugardClient {
    /// Create a client with its own HTTP connection pool.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http_client = build_http_client(&config)?;
        Ok(Self {
            config,
            http_client,
        })
    }

    /// Create a client on top of an existing `reqwest::Client`.
    ///
    /// The timeout in `config` is applied per request.
    pub fn with_http_client(config: ClientConfig, http_client: reqwest::Client) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send `request` and decode the response envelope.
    pub async fn execute(&self, request: &GraphQlRequest) -> Result<GraphQlResponse> {
        let headers = request_headers(&self.config)?;

        tracing::debug!(
            endpoint = %self.config.endpoint,
            query_len = request.query.len(),
            has_variables = request.variables.is_some(),
            "sending GraphQL query"
        );

        let mut builder = self
            .http_client
            .post(&self.config.endpoint)
            .headers(headers)
            .json(request);
        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        tracing::debug!(status = status.as_u16(), bytes = text.len(), "received response");

        if !status.is_success() {
            let err = classify_http_error(status.as_u16(), &text, status.canonical_reason());
            tracing::error!(status = status.as_u16(), error = %err, "request failed");
            return Err(err);
        }

        let envelope: GraphQlResponse = serde_json::from_str(&text)?;
        Ok(envelope)
    }

    /// Send `request` and return its `data` member.
    ///
    /// GraphQL errors are fatal only when no data came back; otherwise they
    /// are logged and the partial data is returned.
    pub async fn fetch_data(&self, request: &GraphQlRequest) -> Result<serde_json::Value> {
        let envelope = self.execute(request).await?;

        match envelope.data {
            Some(data) if !data.is_null() => {
                for err in &envelope.errors {
                    tracing::warn!(error = %err.message, path = ?err.path, "GraphQL error alongside data");
                }
                Ok(data)
            }
            _ if !envelope.errors.is_empty() => Err(ProbeError::GraphQlErrors(
                envelope.errors.into_iter().map(|e| e.message).collect(),
            )),
            _ => Err(ProbeError::MissingData),
        }
    }

    /// Send `request` and parse its `data` member into a [`ResponseDocument`].
    pub async fn fetch_document(&self, request: &GraphQlRequest) -> Result<ResponseDocument> {
        ResponseDocument::from_json(self.fetch_data(request).await?)
    }
}

fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| ProbeError::ConfigurationError(format!("Failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_invalid_config() {
        let config = ClientConfig::new("k").with_endpoint("not a url");
        assert!(matches!(
            TrugardClient::new(config),
            Err(ProbeError::ConfigurationError(_))
        ));
    }

    #[test]
    fn new_keeps_config() {
        let client = TrugardClient::new(ClientConfig::new("k")).unwrap();
        assert_eq!(client.config().endpoint, crate::config::DEFAULT_ENDPOINT);
    }

    #[tokio::test]
    async fn non_success_status_is_classified() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/tg/query")
            .with_status(401)
            .with_body("invalid key")
            .create_async()
            .await;

        let config = ClientConfig::new("k").with_endpoint(format!("{}/tg/query", server.url()));
        let client = TrugardClient::new(config).unwrap();
        let err = client
            .execute(&GraphQlRequest::new("query { a }"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::AuthenticationError(_)));
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn errors_alongside_data_are_logged() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/tg/query")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"data":{"contract":{"name":"X"}},"errors":[{"message":"facets unavailable"}]}"#,
            )
            .create_async()
            .await;

        let config = ClientConfig::new("k").with_endpoint(format!("{}/tg/query", server.url()));
        let client = TrugardClient::new(config).unwrap();
        let data = client
            .fetch_data(&GraphQlRequest::new("query { contract { name } }"))
            .await
            .unwrap();

        assert_eq!(data["contract"]["name"], "X");
        assert!(logs_contain("GraphQL error alongside data"));
        assert!(logs_contain("facets unavailable"));
    }

    #[tokio::test]
    async fn non_json_body_is_a_json_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/tg/query")
            .with_status(200)
            .with_body("<html>ok</html>")
            .create_async()
            .await;

        let config = ClientConfig::new("k").with_endpoint(format!("{}/tg/query", server.url()));
        let client = TrugardClient::new(config).unwrap();
        let err = client
            .execute(&GraphQlRequest::new("query { a }"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::JsonError(_)));
    }
}
