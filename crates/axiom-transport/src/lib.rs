//! Delivery of log batches to the ingest endpoint.
//!
//! This crate provides:
//! - `HttpTransport` - JSON batch POST with automatic timeout/retry
//! - `RetryPolicy` - Retry strategies
//! - `TimeoutConfig` - Connect and total timeouts
//! - `transport_for` - Picks HTTP or console delivery from configuration

mod client;
mod retry;
mod timeout;

pub use client::*;
pub use retry::*;
pub use timeout::*;

use std::sync::Arc;

use axiom_core::{AxiomConfig, EndpointType};
use axiom_log::{ConsoleTransport, LogFormat, Transport};

/// Choose the transport for a configuration.
///
/// Unconfigured environments, and a client that fails to build, fall back to
/// console output.
pub fn transport_for(config: &AxiomConfig) -> Arc<dyn Transport> {
    let Some(url) = config.ingest_url(EndpointType::Logs) else {
        return Arc::new(ConsoleTransport::new(LogFormat::Human));
    };

    match HttpTransport::new(url, TransportOptions::default()) {
        Ok(transport) => Arc::new(transport.with_token(config.token.clone())),
        Err(e) => {
            tracing::warn!(error = %e, "axiom: failed to build HTTP transport, sending logs to console");
            Arc::new(ConsoleTransport::new(LogFormat::Human))
        }
    }
}
