//! Route handler instrumentation for axiom-edge.
//!
//! This crate provides:
//! - `WrappedHandler` - Runs a handler and reports its timing and outcome
//! - `AxiomRequest` - The request handed to handlers, with a `log` child logger
//! - `HandlerError` - Not-found and redirect signals plus genuine failures
//! - `RouteHandlerOptions` - Detail capture and outcome log levels
//! - `Instrumentation` - Configuration, transport and flush scheduling
//! - `WaitUntil` / `BackgroundTasks` - Deferred flush on the target platform

mod error;
mod flush;
mod handler;
mod instrumentation;
mod options;
mod outcome;
mod request;

pub use error::*;
pub use flush::*;
pub use handler::*;
pub use instrumentation::*;
pub use options::*;
pub use outcome::*;
pub use request::*;
