//! Delivery seam for drained event batches.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::event::LogEvent;

/// Delivers a batch of drained events.
///
/// Implementations own batching, retries and delivery. `Logger::flush`
/// calls `send` at most once per flush.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, events: Vec<LogEvent>) -> Result<(), TransportError>;
}

/// Output format for console delivery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON format (for log aggregation).
    Json,
    /// Human-readable format (for development).
    #[default]
    Human,
}

/// Writes events to stderr. Used when no ingest endpoint is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleTransport {
    format: LogFormat,
}

impl ConsoleTransport {
    pub fn new(format: LogFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    fn render(&self, event: &LogEvent) -> String {
        match self.format {
            LogFormat::Json => event.to_json(),
            LogFormat::Human => event.to_human(),
        }
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn send(&self, events: Vec<LogEvent>) -> Result<(), TransportError> {
        for event in &events {
            eprintln!("{}", self.render(event));
        }
        Ok(())
    }
}

#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryTransport;

#[cfg(any(test, feature = "test-util"))]
mod memory {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::Transport;
    use crate::error::TransportError;
    use crate::event::LogEvent;

    /// Records every batch it receives. Can be told to fail.
    #[derive(Debug, Clone, Default)]
    pub struct MemoryTransport {
        batches: Arc<Mutex<Vec<Vec<LogEvent>>>>,
        fail: bool,
    }

    impl MemoryTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// A transport that records batches and then reports a failure.
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        /// Number of `send` calls received.
        pub fn send_count(&self) -> usize {
            self.lock().len()
        }

        pub fn batches(&self) -> Vec<Vec<LogEvent>> {
            self.lock().clone()
        }

        /// All received events, in order.
        pub fn events(&self) -> Vec<LogEvent> {
            self.lock().iter().flatten().cloned().collect()
        }

        fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Vec<LogEvent>>> {
            self.batches.lock().unwrap_or_else(|e| e.into_inner())
        }
    }

    #[async_trait]
    impl Transport for MemoryTransport {
        async fn send(&self, events: Vec<LogEvent>) -> Result<(), TransportError> {
            self.lock().push(events);
            if self.fail {
                return Err(TransportError::Connection("memory transport set to fail".into()));
            }
            Ok(())
        }
    }
}
