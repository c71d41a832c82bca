//! Public SDK for axiom-edge.
//!
//! This crate re-exports the workspace and provides the `with_axiom` entry
//! points:
//!
//! ```ignore
//! use axiom_sdk::prelude::*;
//!
//! // Routing configuration: adds the telemetry proxy rewrites.
//! let config = with_axiom_config(FrameworkConfig::new().with_setting("reactStrictMode", true));
//!
//! // Route handler: reports every invocation and flushes its logs.
//! let handler = with_axiom(|req: AxiomRequest| async move {
//!     req.log.info("Loading product");
//!     Ok::<_, HandlerError>(http::Response::new(String::from("ok")))
//! });
//! let response = handler.handle(request).await?;
//! ```

mod dispatch;

pub use dispatch::*;

pub use axiom_core;
pub use axiom_handler;
pub use axiom_log;
pub use axiom_rewrites;
pub use axiom_transport;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::dispatch::*;
    pub use axiom_core::*;
    pub use axiom_handler::*;
    pub use axiom_log::*;
    pub use axiom_rewrites::*;
    pub use axiom_transport::*;
}
