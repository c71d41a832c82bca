//! Buffered structured logging for axiom-edge.
//!
//! This crate provides:
//! - `LogLevel` - Ordered severity levels
//! - `LogEvent` - One buffered structured event
//! - `Logger` - Shared event buffer with child loggers and `flush`
//! - `Transport` - Seam for delivering drained batches

mod error;
mod event;
mod level;
mod logger;
mod transport;

pub use error::*;
pub use event::*;
pub use level::*;
pub use logger::*;
pub use transport::*;

// Re-export the report type events carry
pub use axiom_core::{PlatformInfo, RequestReport};
