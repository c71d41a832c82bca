//! CLI command implementations.

pub mod env;
pub mod ping;
pub mod rewrites;

use clap::Args;

/// Arguments for the env command.
#[derive(Args)]
pub struct EnvArgs {
    /// Show the token instead of masking it.
    #[arg(long)]
    pub show_token: bool,
}

/// Arguments for the rewrites command.
#[derive(Args)]
pub struct RewritesArgs {
    /// JSON file with existing rewrites (a list or a phased object).
    #[arg(short, long)]
    pub file: Option<String>,
}

/// Arguments for the ping command.
#[derive(Args)]
pub struct PingArgs {
    /// Message of the test event.
    #[arg(short, long, default_value = "axiom-edge ping")]
    pub message: String,

    /// Level of the test event.
    #[arg(short, long, default_value = "info")]
    pub level: String,
}
