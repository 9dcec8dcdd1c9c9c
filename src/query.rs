//! GraphQL request payloads.
//!
//! Query text is opaque here: it is sent as-is and never parsed locally.
//! Example queries for the API live at <https://apidocs.trugard.ai/example-queries>.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ProbeError, Result};

/// Contracts on Ethereum exposing the function selector `0xbf120ae5`.
///
/// Returns `data.contracts` as a list.
pub const CONTRACTS_BY_SIGNATURE: &str = r#"
query {
  contracts(network: ETH, example: {signatures: {functions: ["0xbf120ae5"]}}) {
    name
    deploy { to from block { timestamp number hash } }
    standards
    signatures { functions }
    contractData {
      ... on CodeSize {
        initcode { operation size }
        bytecode { operation size }
        disassembly { operation size }
        verified { operation size }
      }
    }
    metadata { key value }
    opcodes { name qty }
    facets {
      features {
        category { category }
        threat { risk confidence }
        id
      }
    }
  }
}
"#;

/// A single contract looked up by address.
///
/// Returns `data.contract` as an object.
pub const CONTRACT_BY_ADDRESS: &str = r#"
query {
  contract(network: ETH, id: "0x8355048D74888569ad9f9675ae9B6920F54b9985") {
    facets {
      features {
        category { category }
        threat { risk confidence }
        notes { key value }
        timestamp
      }
      threats {
        category { category }
        threat { risk confidence }
        id
        of
        timestamp
        notes { key value }
      }
    }
    network
    deploy {
      block { number hash timestamp }
      hash
      index
      from
      to
    }
    address
    name
    contractData {
      ... on CodeSize {
        initcode { size }
        bytecode { size }
        disassembly { size }
        verified { size }
      }
    }
    signatures { functions }
    metadata { key value }
    standards
    opcodes { name qty }
    errors
  }
}
"#;

/// Built-in queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Contracts matching a function signature (list result)
    #[default]
    ContractsBySignature,
    /// One contract by address (object result)
    ContractByAddress,
}

impl Preset {
    pub fn query_text(self) -> &'static str {
        match self {
            Self::ContractsBySignature => CONTRACTS_BY_SIGNATURE,
            Self::ContractByAddress => CONTRACT_BY_ADDRESS,
        }
    }
}

/// JSON body of a GraphQL POST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
}

impl GraphQlRequest {
    pub fn new<S: Into<String>>(query: S) -> Self {
        Self {
            query: query.into(),
            variables: None,
        }
    }

    /// Attach a variables object.
    pub fn with_variables(mut self, variables: serde_json::Value) -> Self {
        self.variables = Some(variables);
        self
    }

    /// Read query text from a file.
    pub async fn from_file(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path).await?;
        if text.trim().is_empty() {
            return Err(ProbeError::ConfigurationError(format!(
                "query file '{}' is empty",
                path.display()
            )));
        }
        Ok(Self::new(text))
    }
}

impl From<Preset> for GraphQlRequest {
    fn from(preset: Preset) -> Self {
        Self::new(preset.query_text())
    }
}

/// One entry of a GraphQL `errors` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

/// Decoded response envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}
