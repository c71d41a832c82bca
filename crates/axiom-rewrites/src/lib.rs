//! Route rewriting for client telemetry.
//!
//! Client-side web-vitals and logs are posted to same-origin proxy paths
//! (`/_axiom/web-vitals`, `/_axiom/logs`). This crate extends the
//! framework's routing configuration with the two rewrites that forward
//! those paths to the resolved ingest endpoints.
//!
//! ```rust,ignore
//! use axiom_rewrites::{apply_rewrites, FrameworkConfig};
//!
//! let config = FrameworkConfig::new().with_setting("reactStrictMode", true);
//! let config = apply_rewrites(config, AxiomConfig::global());
//! let rules = config.resolve_rewrites().await?;
//! ```

mod config;
mod error;
mod rewriter;
mod rule;

pub use config::*;
pub use error::*;
pub use rewriter::*;
pub use rule::*;
