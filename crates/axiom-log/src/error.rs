//! Error types for logging and delivery.

use thiserror::Error;

/// Unrecognized log level name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown log level: {0}")]
pub struct LevelParseError(pub String);

/// Error type for delivering a batch of events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Request error: {0}")]
    Request(String),
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        TransportError::Serialization(e.to_string())
    }
}
