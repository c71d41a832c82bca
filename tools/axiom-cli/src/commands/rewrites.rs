//! Show the proxy rewrites that would be injected.

use std::fs;

use anyhow::{Context as _, Result};

use axiom_rewrites::{apply_rewrites, proxy_rules, FrameworkConfig, Rewrites};

use super::RewritesArgs;
use crate::context::Context;

/// Run the rewrites command.
pub async fn run(args: RewritesArgs, ctx: &Context) -> Result<()> {
    let Some(rules) = proxy_rules(&ctx.config) else {
        ctx.output
            .warn("No ingest endpoint configured: rewrites would be left unchanged");
        if let Some(path) = &args.file {
            let original = load_rewrites(path)?;
            ctx.output.json(&original);
        }
        return Ok(());
    };

    let Some(path) = args.file else {
        if ctx.output.is_json() {
            ctx.output.json(&rules);
        } else {
            ctx.output.header("Proxy rewrites");
            for rule in &rules {
                ctx.output.list_item(&format!("{} → {}", rule.source, rule.destination));
            }
        }
        return Ok(());
    };

    let original = load_rewrites(&path)?;
    ctx.output.debug(&format!("Loaded {} existing rules from {}", original.len(), path));

    let config = apply_rewrites(
        FrameworkConfig::new().with_static_rewrites(original),
        ctx.config.clone(),
    );
    let merged = config
        .resolve_rewrites()
        .await?
        .context("Rewrites provider disappeared")?;

    ctx.output.json(&merged);
    Ok(())
}

fn load_rewrites(path: &str) -> Result<Rewrites> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rewrites file: {}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid rewrites in {}", path))
}
