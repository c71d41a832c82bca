//! Framework configuration as seen by the rewriter.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::{Map, Value};

use crate::error::RewriteError;
use crate::rule::Rewrites;

/// Produces the framework's rewrite set. May be called any number of times.
pub type RewritesProvider =
    Arc<dyn Fn() -> BoxFuture<'static, Result<Rewrites, RewriteError>> + Send + Sync>;

/// A configuration-generating function, called with `(phase, context)`.
pub type ConfigFn =
    Arc<dyn Fn(String, ConfigContext) -> BoxFuture<'static, Result<FrameworkConfig, RewriteError>> + Send + Sync>;

/// Context handed to configuration functions.
#[derive(Debug, Clone, Default)]
pub struct ConfigContext {
    pub default_config: FrameworkConfig,
}

/// The framework's configuration object.
///
/// Everything other than `rewrites` is opaque and carried verbatim in
/// `settings`. Cloning is shallow: the rewrites provider is shared.
#[derive(Clone, Default)]
pub struct FrameworkConfig {
    settings: Map<String, Value>,
    rewrites: Option<RewritesProvider>,
}

impl fmt::Debug for FrameworkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameworkConfig")
            .field("settings", &self.settings)
            .field("rewrites", &self.rewrites.as_ref().map(|_| "<provider>"))
            .finish()
    }
}

impl FrameworkConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object of settings.
    pub fn from_json(value: Value) -> Result<Self, RewriteError> {
        match value {
            Value::Object(settings) => Ok(Self {
                settings,
                rewrites: None,
            }),
            other => Err(RewriteError::InvalidConfig(format!(
                "expected an object, got {other}"
            ))),
        }
    }

    /// Set an opaque setting.
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Install a rewrites provider.
    pub fn with_rewrites<F, Fut>(mut self, provider: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Rewrites, RewriteError>> + Send + 'static,
    {
        self.rewrites = Some(Arc::new(move || provider().boxed()));
        self
    }

    /// Install a fixed rewrite set.
    pub fn with_static_rewrites(self, rewrites: Rewrites) -> Self {
        self.with_rewrites(move || {
            let rewrites = rewrites.clone();
            async move { Ok(rewrites) }
        })
    }

    pub(crate) fn with_provider(mut self, provider: RewritesProvider) -> Self {
        self.rewrites = Some(provider);
        self
    }

    /// Get a setting by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }

    /// All opaque settings.
    pub fn settings(&self) -> &Map<String, Value> {
        &self.settings
    }

    /// The rewrites provider, if any.
    pub fn rewrites(&self) -> Option<&RewritesProvider> {
        self.rewrites.as_ref()
    }

    pub fn has_rewrites(&self) -> bool {
        self.rewrites.is_some()
    }

    /// Invoke the rewrites provider, if one is installed.
    pub async fn resolve_rewrites(&self) -> Result<Option<Rewrites>, RewriteError> {
        match &self.rewrites {
            Some(provider) => provider().await.map(Some),
            None => Ok(None),
        }
    }
}

/// Box a configuration function.
pub fn config_fn<F, Fut>(f: F) -> ConfigFn
where
    F: Fn(String, ConfigContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<FrameworkConfig, RewriteError>> + Send + 'static,
{
    Arc::new(move |phase, ctx| f(phase, ctx).boxed())
}
