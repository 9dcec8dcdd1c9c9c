//! End-to-end probe: configuration, one query, shape output.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use crate::client::TrugardClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::query::{GraphQlRequest, Preset};
use crate::shape::{ResponseDocument, Shape};

/// Where the query text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySource {
    Preset(Preset),
    File(PathBuf),
}

impl Default for QuerySource {
    fn default() -> Self {
        Self::Preset(Preset::default())
    }
}

impl QuerySource {
    pub async fn load(&self) -> Result<GraphQlRequest> {
        match self {
            Self::Preset(preset) => Ok(GraphQlRequest::from(*preset)),
            Self::File(path) => GraphQlRequest::from_file(path).await,
        }
    }
}

/// Options for one probe run.
#[derive(Debug, Clone, Default)]
pub struct ProbeOptions {
    pub query: QuerySource,
    /// Overrides the configured endpoint
    pub endpoint: Option<String>,
    pub timeout: Option<Duration>,
    /// Print the shape as JSON instead of text
    pub json: bool,
    /// Print the full `data` payload before the shape
    pub dump: bool,
}

/// Run a probe with configuration taken from `lookup`.
///
/// The API key is resolved before the query is loaded or any connection is
/// opened.
pub async fn run_with_lookup<F, W>(lookup: F, options: &ProbeOptions, out: &mut W) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
    W: Write,
{
    let mut config = ClientConfig::from_lookup(lookup)?;
    if let Some(endpoint) = &options.endpoint {
        config = config.with_endpoint(endpoint.clone());
    }
    if let Some(timeout) = options.timeout {
        config = config.with_timeout(timeout);
    }
    run(config, options, out).await
}

/// Run a probe with an explicit configuration.
pub async fn run<W: Write>(config: ClientConfig, options: &ProbeOptions, out: &mut W) -> Result<()> {
    let client = TrugardClient::new(config)?;
    let request = options.query.load().await?;

    let data = client.fetch_data(&request).await?;
    if options.dump {
        writeln!(out, "{}", serde_json::to_string_pretty(&data)?)?;
    }

    let document = ResponseDocument::from_json(data)?;
    let shape = Shape::of(&document)?;
    tracing::info!(types = shape.types.len(), "computed response shape");

    if options.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&shape)?)?;
    } else {
        shape.render(out)?;
    }
    out.flush()?;
    Ok(())
}
