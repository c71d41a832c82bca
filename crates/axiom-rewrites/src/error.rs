//! Error types for route rewriting.

use thiserror::Error;

/// Errors that can occur while producing framework configuration.
#[derive(Error, Debug)]
pub enum RewriteError {
    /// The original rewrites provider failed.
    #[error("Rewrites provider failed: {0}")]
    Provider(String),

    /// A configuration function failed.
    #[error("Config function failed: {0}")]
    ConfigFn(String),

    /// Configuration is not a JSON object or has an invalid shape.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for RewriteError {
    fn from(err: serde_json::Error) -> Self {
        RewriteError::InvalidConfig(err.to_string())
    }
}
