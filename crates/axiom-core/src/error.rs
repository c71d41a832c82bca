//! Error types for axiom-core.

use thiserror::Error;

/// Errors raised while reading configuration or request data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A URL could not be parsed.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A detail field name is not recognized.
    #[error("Unknown request detail field: {0}")]
    UnknownDetailField(String),

    /// A header value is not valid.
    #[error("Invalid header '{0}'")]
    InvalidHeader(String),
}
