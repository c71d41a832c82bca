//! axiom-edge CLI - Diagnostics for request instrumentation.
//!
//! Commands:
//! - `axiom-edge env` - Show the resolved configuration and capability flags
//! - `axiom-edge rewrites` - Show the proxy rewrites that would be injected
//! - `axiom-edge ping` - Ship one test event through the configured transport

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{EnvArgs, PingArgs, RewritesArgs};

/// axiom-edge CLI - Inspect and verify telemetry configuration
#[derive(Parser)]
#[command(name = "axiom-edge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Read additional variables from a KEY=VALUE file
    #[arg(short, long, global = true)]
    env_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resolved configuration
    Env(EnvArgs),

    /// Show the proxy rewrites that would be injected
    Rewrites(RewritesArgs),

    /// Send a test event to the ingest endpoint
    Ping(PingArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let output = output::Output::new(cli.verbose, cli.json);
    let ctx = context::Context::load(cli.env_file.as_deref(), output)?;

    let result = match cli.command {
        Commands::Env(args) => commands::env::run(args, &ctx).await,
        Commands::Rewrites(args) => commands::rewrites::run(args, &ctx).await,
        Commands::Ping(args) => commands::ping::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
