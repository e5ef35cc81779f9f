//! Error types for the helpers
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Error Enum ==
/// Unified error type for the array helpers and cache items.
#[derive(Error, Debug)]
pub enum Error {
    /// Argument of an unsupported type or format
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON input could not be parsed
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration value could not be used
    #[error("Invalid configuration: {0}")]
    Config(String),
}

// == Result Type Alias ==
/// Convenience Result type for the helpers.
pub type Result<T> = std::result::Result<T, Error>;
