//! Error Handling Module
//!
//! This module provides the error type shared by every part of the crate:
//! - Core error type (`ProbeError`, `ErrorCategory`)
//! - HTTP status classification for failed API calls
//! - Type conversions from common error types
//!
//! # Example
//!
//! ```rust,ignore
//! use trugard_probe::error::{ErrorCategory, classify_http_error};
//!
//! let error = classify_http_error(500, "internal error", Some("Internal Server Error"));
//! assert_eq!(error.category(), ErrorCategory::Server);
//! ```

mod conversions;
pub mod types;

pub use types::*;
