//! Ship one test event through the configured transport.

use anyhow::{Context as _, Result};

use axiom_core::EndpointType;
use axiom_log::{LogLevel, Logger};
use axiom_transport::transport_for;

use super::PingArgs;
use crate::context::Context;

/// Run the ping command.
pub async fn run(args: PingArgs, ctx: &Context) -> Result<()> {
    let level: LogLevel = args.level.parse().context("Invalid --level")?;

    match ctx.config.ingest_url(EndpointType::Logs) {
        Some(url) => ctx.output.info(&format!("Sending test event to {}", url)),
        None => ctx
            .output
            .warn("Telemetry is not configured: the event is printed to the console only"),
    }

    let logger = Logger::new(transport_for(&ctx.config))
        .with_source(ctx.config.runtime_source())
        .with_platform(ctx.config.platform.clone());

    logger
        .builder(level, args.message.as_str())
        .field("cli", env!("CARGO_PKG_VERSION"))
        .emit();
    if logger.pending() == 0 {
        tracing::debug!(%level, "ping event filtered out by level");
    }

    let shipped = logger.flush().await.context("Failed to ship test event")?;
    ctx.output.success(&format!("Shipped {} event(s)", shipped));
    Ok(())
}
