//! trugard-probe
//!
//! Sends a GraphQL query to the TruGard threat-intelligence API and prints the
//! shape of the returned `data`: each top-level field and the keys under it.
//!
//! ```rust,ignore
//! use trugard_probe::{ClientConfig, GraphQlRequest, Preset, TrugardClient, print_shape};
//!
//! let client = TrugardClient::new(ClientConfig::from_env()?)?;
//! let document = client.fetch_document(&GraphQlRequest::from(Preset::ContractByAddress)).await?;
//! print_shape(&document, &mut std::io::stdout())?;
//! ```
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod probe;
pub mod query;
pub mod shape;
pub mod telemetry;

pub use client::TrugardClient;
pub use config::ClientConfig;
pub use error::{ProbeError, Result};
pub use query::{GraphQlRequest, GraphQlResponse, Preset};
pub use shape::{FieldValue, ResponseDocument, Shape, print_shape};
