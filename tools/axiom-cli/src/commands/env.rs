//! Show the resolved configuration.

use anyhow::Result;
use serde::Serialize;

use axiom_core::{AxiomConfig, EndpointType};

use super::EnvArgs;
use crate::context::Context;
use crate::output::{flag, optional};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvReport<'a> {
    #[serde(flatten)]
    config: &'a AxiomConfig,
    configured: bool,
    vercel_integration: bool,
    runtime_source: &'static str,
    web_vitals_url: Option<String>,
    logs_url: Option<String>,
}

/// Run the env command.
pub async fn run(args: EnvArgs, ctx: &Context) -> Result<()> {
    let config = ctx.config.as_ref();

    if ctx.output.is_json() {
        ctx.output.json(&EnvReport {
            config,
            configured: config.is_configured(),
            vercel_integration: config.is_vercel_integration(),
            runtime_source: config.runtime_source(),
            web_vitals_url: config.ingest_url(EndpointType::WebVitals),
            logs_url: config.ingest_url(EndpointType::Logs),
        });
        return Ok(());
    }

    ctx.output.header("Ingest");
    ctx.output.kv("Integration endpoint", &optional(config.ingest_endpoint.as_deref()));
    ctx.output.kv("API URL", &config.axiom_url);
    ctx.output.kv("Dataset", &optional(config.dataset.as_deref()));
    ctx.output.kv("Token", &optional(token_display(config, args.show_token).as_deref()));
    ctx.output.kv(
        "Web vitals URL",
        &optional(config.ingest_url(EndpointType::WebVitals).as_deref()),
    );
    ctx.output.kv("Logs URL", &optional(config.ingest_url(EndpointType::Logs).as_deref()));

    ctx.output.header("Runtime");
    ctx.output.kv("Target platform", &flag(config.is_vercel));
    ctx.output.kv("Managed integration", &flag(config.is_vercel_integration()));
    ctx.output.kv("Edge runtime", &flag(config.is_edge_runtime));
    ctx.output.kv("Source", config.runtime_source());
    ctx.output.kv("Log level", config.log_level.as_deref().unwrap_or("debug"));
    ctx.output.kv("Proxy path", &config.proxy_path);

    if let Some(platform) = &config.platform {
        ctx.output.header("Platform");
        ctx.output.kv("Environment", &optional(platform.environment.as_deref()));
        ctx.output.kv("Region", &optional(platform.region.as_deref()));
        ctx.output.kv("Deployment URL", &optional(platform.deployment_url.as_deref()));
        ctx.output.kv("Git commit", &optional(platform.git_commit_sha.as_deref()));
        ctx.output.kv("Git ref", &optional(platform.git_ref.as_deref()));
    }

    println!();
    if config.is_configured() {
        ctx.output.success("Telemetry is configured");
    } else {
        ctx.output.warn("Telemetry is not configured: logs go to the console and no rewrites are added");
    }

    Ok(())
}

fn token_display(config: &AxiomConfig, show: bool) -> Option<String> {
    let token = config.token.as_deref()?;
    if show {
        return Some(token.to_string());
    }
    let visible: String = token.chars().take(5).collect();
    Some(format!("{visible}…"))
}
