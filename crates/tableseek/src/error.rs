//! Error types for the tableseek crate.
//!
//! Filter evaluation itself never fails (see [`Outcome`](crate::Outcome)).
//! These errors only come from the fallible edges: loading configuration
//! and parsing serialized query state.

use thiserror::Error;

/// Errors that can occur when loading configuration or query state.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Input was not valid YAML for the expected shape.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Input was not valid JSON for the expected shape.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A page size of zero was configured.
    #[error("page size must be greater than zero, got {size}")]
    InvalidPageSize { size: usize },

    /// The list of selectable page sizes is empty.
    #[error("page size options must not be empty")]
    EmptyPageSizeOptions,
}

/// Result type for tableseek operations.
pub type Result<T> = std::result::Result<T, QueryError>;
