//! Injection of the telemetry proxy rewrites.

use std::sync::Arc;

use futures::FutureExt;

use axiom_core::{AxiomConfig, EndpointType};

use crate::config::{ConfigContext, ConfigFn, FrameworkConfig, RewritesProvider};
use crate::error::RewriteError;
use crate::rule::{merge_rewrites, RouteRule, Rewrites};

/// The two proxy rules for a configuration, or `None` when neither ingest
/// endpoint resolves.
pub fn proxy_rules(env: &AxiomConfig) -> Option<Vec<RouteRule>> {
    let web_vitals = env.ingest_url(EndpointType::WebVitals);
    let logs = env.ingest_url(EndpointType::Logs);
    if web_vitals.is_none() && logs.is_none() {
        return None;
    }

    Some(vec![
        RouteRule::new(
            env.proxy_route(EndpointType::WebVitals),
            web_vitals.unwrap_or_default(),
        )
        .without_base_path(),
        RouteRule::new(env.proxy_route(EndpointType::Logs), logs.unwrap_or_default())
            .without_base_path(),
    ])
}

/// Return a copy of `config` whose rewrites provider also yields the proxy rules.
///
/// The input is not modified. Each call of the new provider re-invokes the
/// original one and merges into its fresh result, so repeated calls produce
/// the same rule set. Without configured endpoints the provider degrades to
/// the original rewrites (or an empty list) after logging a warning.
pub fn apply_rewrites(config: FrameworkConfig, env: Arc<AxiomConfig>) -> FrameworkConfig {
    let original = config.rewrites().cloned();

    let provider: RewritesProvider = Arc::new(move || {
        let original = original.clone();
        let env = env.clone();
        async move {
            let rewrites = match original {
                Some(provider) => Some(provider().await?),
                None => None,
            };

            match proxy_rules(&env) {
                Some(rules) => Ok::<_, RewriteError>(merge_rewrites(rewrites, rules)),
                None => {
                    tracing::warn!(
                        "axiom: Envvars not detected. If this is production please see https://github.com/axiomhq/next-axiom for help"
                    );
                    tracing::warn!("axiom: Sending Web Vitals to /dev/null and logs to console");
                    Ok(rewrites.unwrap_or_default())
                }
            }
        }
        .boxed()
    });

    config.with_provider(provider)
}

/// Wrap a configuration function so its result gets the proxy rewrites.
pub fn wrap_config_fn(f: ConfigFn, env: Arc<AxiomConfig>) -> ConfigFn {
    Arc::new(move |phase: String, ctx: ConfigContext| {
        let f = f.clone();
        let env = env.clone();
        async move {
            let config = f(phase, ctx).await?;
            Ok::<_, RewriteError>(apply_rewrites(config, env))
        }
        .boxed()
    })
}
