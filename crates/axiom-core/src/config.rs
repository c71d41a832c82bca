//! Environment-derived configuration.
//!
//! `AxiomConfig` is built once from an environment snapshot and passed
//! explicitly to the logger, the route rewriter and the request wrapper.
//! An unconfigured snapshot (no ingest endpoint, no dataset/token) is a
//! valid state: both ingest URLs resolve to `None`.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

/// Default API base URL for self-hosted mode.
pub const DEFAULT_AXIOM_URL: &str = "https://api.axiom.co";

/// Default same-origin prefix under which client telemetry is proxied.
pub const DEFAULT_PROXY_PATH: &str = "/_axiom";

/// The two ingest endpoints client telemetry is proxied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndpointType {
    WebVitals,
    Logs,
}

impl EndpointType {
    /// Wire name, also used as the proxy path suffix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WebVitals => "web-vitals",
            Self::Logs => "logs",
        }
    }
}

impl fmt::Display for EndpointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deployment metadata attached to events when running on the target platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_commit_sha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
}

/// Resolved configuration for one process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxiomConfig {
    /// Managed-integration ingest endpoint.
    pub ingest_endpoint: Option<String>,
    /// API base URL used in self-hosted mode.
    pub axiom_url: String,
    /// Dataset used in self-hosted mode.
    pub dataset: Option<String>,
    /// API token used in self-hosted mode.
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Raw minimum log level, parsed by the logger.
    pub log_level: Option<String>,
    /// Proxy path prefix for rewrites.
    pub proxy_path: String,
    /// Running on the target cloud platform.
    pub is_vercel: bool,
    /// Running in a restricted edge runtime.
    pub is_edge_runtime: bool,
    /// Deployment metadata, populated only on the target platform.
    pub platform: Option<PlatformInfo>,
}

impl Default for AxiomConfig {
    fn default() -> Self {
        Self {
            ingest_endpoint: None,
            axiom_url: DEFAULT_AXIOM_URL.to_string(),
            dataset: None,
            token: None,
            log_level: None,
            proxy_path: DEFAULT_PROXY_PATH.to_string(),
            is_vercel: false,
            is_edge_runtime: false,
            platform: None,
        }
    }
}

static GLOBAL: OnceLock<Arc<AxiomConfig>> = OnceLock::new();

impl AxiomConfig {
    /// Build from the current process environment.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Process-wide configuration, read from the environment on first use.
    pub fn global() -> Arc<Self> {
        GLOBAL.get_or_init(|| Arc::new(Self::from_env())).clone()
    }

    /// Build from an arbitrary key/value snapshot.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let env = EnvSnapshot::new(vars);

        let is_vercel = env.flag(&["NEXT_PUBLIC_VERCEL", "VERCEL"]);
        let is_edge_runtime = env
            .first(&["NEXT_RUNTIME"])
            .is_some_and(|runtime| runtime == "edge")
            || env.flag(&["EDGE_RUNTIME"]);

        let platform = is_vercel.then(|| PlatformInfo {
            environment: env.first(&["NEXT_PUBLIC_VERCEL_ENV", "VERCEL_ENV"]),
            region: env.first(&["VERCEL_REGION"]),
            deployment_url: env.first(&["NEXT_PUBLIC_VERCEL_URL", "VERCEL_URL"]),
            git_commit_sha: env.first(&[
                "NEXT_PUBLIC_VERCEL_GIT_COMMIT_SHA",
                "VERCEL_GIT_COMMIT_SHA",
            ]),
            git_ref: env.first(&["NEXT_PUBLIC_VERCEL_GIT_COMMIT_REF", "VERCEL_GIT_COMMIT_REF"]),
        });

        Self {
            ingest_endpoint: env.first(&[
                "NEXT_PUBLIC_AXIOM_INGEST_ENDPOINT",
                "AXIOM_INGEST_ENDPOINT",
            ]),
            axiom_url: env
                .first(&["NEXT_PUBLIC_AXIOM_URL", "AXIOM_URL"])
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_AXIOM_URL.to_string()),
            dataset: env.first(&["NEXT_PUBLIC_AXIOM_DATASET", "AXIOM_DATASET"]),
            token: env.first(&["NEXT_PUBLIC_AXIOM_TOKEN", "AXIOM_TOKEN"]),
            log_level: env.first(&["NEXT_PUBLIC_AXIOM_LOG_LEVEL", "AXIOM_LOG_LEVEL"]),
            proxy_path: env
                .first(&["AXIOM_PROXY_PATH"])
                .map(|path| path.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_PROXY_PATH.to_string()),
            is_vercel,
            is_edge_runtime,
            platform,
        }
    }

    /// Logs are forwarded by the hosting platform's integration.
    pub fn is_vercel_integration(&self) -> bool {
        self.ingest_endpoint.is_some()
    }

    /// Whether any ingest destination is configured.
    pub fn is_configured(&self) -> bool {
        self.is_vercel_integration() || (self.dataset.is_some() && self.token.is_some())
    }

    /// Resolve the ingest URL for an endpoint type.
    ///
    /// Returns `None` when unconfigured; callers treat that as a no-op state.
    pub fn ingest_url(&self, endpoint: EndpointType) -> Option<String> {
        if let Some(base) = &self.ingest_endpoint {
            let separator = if base.contains('?') { '&' } else { '?' };
            return Some(format!("{base}{separator}type={endpoint}"));
        }

        match (&self.dataset, &self.token) {
            (Some(dataset), Some(_)) => Some(format!(
                "{}/v1/datasets/{}/ingest",
                self.axiom_url, dataset
            )),
            _ => None,
        }
    }

    /// Proxy route for an endpoint type, e.g. `/_axiom/logs`.
    pub fn proxy_route(&self, endpoint: EndpointType) -> String {
        format!("{}/{}", self.proxy_path, endpoint)
    }

    /// Runtime tag used as the event source: `edge` or `lambda`.
    pub fn runtime_source(&self) -> &'static str {
        if self.is_edge_runtime {
            "edge"
        } else {
            "lambda"
        }
    }
}

/// Snapshot of environment variables; empty values count as unset.
struct EnvSnapshot(HashMap<String, String>);

impl EnvSnapshot {
    fn new<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .filter(|(_, v)| !v.trim().is_empty())
                .collect(),
        )
    }

    fn first(&self, names: &[&str]) -> Option<String> {
        names.iter().find_map(|name| self.0.get(*name).cloned())
    }

    fn flag(&self, names: &[&str]) -> bool {
        self.first(names)
            .is_some_and(|value| !matches!(value.as_str(), "0" | "false"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(vars: &[(&str, &str)]) -> AxiomConfig {
        AxiomConfig::from_vars(vars.iter().map(|(k, v)| (k.to_string(), v.to_string())))
    }

    // === Resolution Tests ===

    #[test]
    fn test_unconfigured_resolves_nothing() {
        let config = config(&[]);

        assert!(!config.is_configured());
        assert!(!config.is_vercel_integration());
        assert_eq!(config.ingest_url(EndpointType::Logs), None);
        assert_eq!(config.ingest_url(EndpointType::WebVitals), None);
        assert_eq!(config.proxy_path, "/_axiom");
        assert_eq!(config.axiom_url, DEFAULT_AXIOM_URL);
    }

    #[test]
    fn test_integration_endpoint_gets_type_param() {
        let config = config(&[("AXIOM_INGEST_ENDPOINT", "https://ingest.example.com/v1")]);

        assert!(config.is_vercel_integration());
        assert_eq!(
            config.ingest_url(EndpointType::WebVitals).as_deref(),
            Some("https://ingest.example.com/v1?type=web-vitals")
        );
        assert_eq!(
            config.ingest_url(EndpointType::Logs).as_deref(),
            Some("https://ingest.example.com/v1?type=logs")
        );
    }

    #[test]
    fn test_integration_endpoint_with_existing_query() {
        let config = config(&[("AXIOM_INGEST_ENDPOINT", "https://ingest.example.com/?key=1")]);

        assert_eq!(
            config.ingest_url(EndpointType::Logs).as_deref(),
            Some("https://ingest.example.com/?key=1&type=logs")
        );
    }

    #[test]
    fn test_public_prefix_wins() {
        let config = config(&[
            ("AXIOM_INGEST_ENDPOINT", "https://private"),
            ("NEXT_PUBLIC_AXIOM_INGEST_ENDPOINT", "https://public"),
        ]);

        assert_eq!(config.ingest_endpoint.as_deref(), Some("https://public"));
    }

    #[test]
    fn test_self_hosted_requires_dataset_and_token() {
        let only_dataset = config(&[("AXIOM_DATASET", "web")]);
        assert_eq!(only_dataset.ingest_url(EndpointType::Logs), None);
        assert!(!only_dataset.is_configured());

        let full = config(&[
            ("AXIOM_DATASET", "web"),
            ("AXIOM_TOKEN", "xaat-123"),
            ("AXIOM_URL", "https://axiom.internal/"),
        ]);
        assert!(full.is_configured());
        assert!(!full.is_vercel_integration());
        assert_eq!(
            full.ingest_url(EndpointType::Logs).as_deref(),
            Some("https://axiom.internal/v1/datasets/web/ingest")
        );
    }

    #[test]
    fn test_resolution_is_pure() {
        let config = config(&[("AXIOM_INGEST_ENDPOINT", "https://ingest")]);

        assert_eq!(
            config.ingest_url(EndpointType::Logs),
            config.ingest_url(EndpointType::Logs)
        );
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = config(&[("AXIOM_INGEST_ENDPOINT", "  "), ("VERCEL", "")]);

        assert!(!config.is_configured());
        assert!(!config.is_vercel);
    }

    // === Capability Flag Tests ===

    #[test]
    fn test_platform_flags() {
        let config = config(&[
            ("VERCEL", "1"),
            ("VERCEL_ENV", "production"),
            ("VERCEL_REGION", "iad1"),
            ("NEXT_RUNTIME", "edge"),
        ]);

        assert!(config.is_vercel);
        assert!(config.is_edge_runtime);
        assert_eq!(config.runtime_source(), "edge");

        let platform = config.platform.expect("platform info");
        assert_eq!(platform.environment.as_deref(), Some("production"));
        assert_eq!(platform.region.as_deref(), Some("iad1"));
    }

    #[test]
    fn test_platform_info_only_on_vercel() {
        let config = config(&[("VERCEL_REGION", "iad1")]);

        assert!(!config.is_vercel);
        assert!(config.platform.is_none());
        assert_eq!(config.runtime_source(), "lambda");
    }

    #[test]
    fn test_false_flag_values() {
        let config = config(&[("VERCEL", "false"), ("EDGE_RUNTIME", "0")]);

        assert!(!config.is_vercel);
        assert!(!config.is_edge_runtime);
    }

    #[test]
    fn test_proxy_route() {
        let config = config(&[("AXIOM_PROXY_PATH", "/telemetry/")]);

        assert_eq!(config.proxy_route(EndpointType::Logs), "/telemetry/logs");
        assert_eq!(
            config.proxy_route(EndpointType::WebVitals),
            "/telemetry/web-vitals"
        );
    }
}
