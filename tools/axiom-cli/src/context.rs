//! CLI execution context.

use std::collections::HashMap;
use std::fs;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use axiom_core::AxiomConfig;

use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// Configuration resolved from the environment and the env file.
    pub config: Arc<AxiomConfig>,
    /// Output handler.
    pub output: Output,
}

impl Context {
    /// Resolve configuration. Variables from `env_file` override the process
    /// environment.
    pub fn load(env_file: Option<&str>, output: Output) -> Result<Self> {
        let mut vars: HashMap<String, String> = std::env::vars().collect();

        if let Some(path) = env_file {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read env file: {}", path))?;
            let parsed = parse_env_file(&content);
            output.debug(&format!("Loaded {} variables from {}", parsed.len(), path));
            tracing::debug!(path, vars = parsed.len(), "env file overlaid on process environment");
            vars.extend(parsed);
        }

        Ok(Self {
            config: Arc::new(AxiomConfig::from_vars(vars)),
            output,
        })
    }
}

/// Parse `KEY=VALUE` lines. Blank lines, `#` comments and an `export `
/// prefix are allowed; surrounding quotes are stripped.
fn parse_env_file(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            Some((key.trim().to_string(), value.to_string()))
        })
        .collect()
}
