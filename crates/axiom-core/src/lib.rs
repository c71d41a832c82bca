//! Core abstractions for axiom-edge.
//!
//! This crate provides the fundamental types shared by the other crates:
//! - `AxiomConfig` - Environment snapshot, ingest URLs and capability flags
//! - `RequestContext` - Inbound request with framework extensions
//! - `RequestDetails` - Serializable request snapshot for detail capture
//! - `RequestReport` - Timing and outcome of one wrapped invocation

mod config;
mod context;
mod details;
mod error;
mod report;

pub use config::*;
pub use context::*;
pub use details::*;
pub use error::*;
pub use report::*;
