//! Entry points and the `with_axiom` convenience dispatch.
//!
//! Three explicit entry points cover the three things that can be
//! instrumented: `with_axiom_config` for a routing configuration,
//! `with_axiom_config_fn` for a configuration-generating function and
//! `with_axiom_handler` for a route handler.
//!
//! `with_axiom` picks one of them from the shape of its argument through the
//! `IntoWithAxiom` marker trait. This is a heuristic: a two-parameter
//! callable is only recognized as a configuration function when its
//! parameters are `(String, ConfigContext)`, and a handler must take exactly
//! one `AxiomRequest`. Handlers that take a passthrough argument go through
//! `with_axiom_handler`.

use std::future::Future;
use std::marker::PhantomData;

use axiom_core::AxiomConfig;
use axiom_handler::{
    wrap_handler, AxiomRequest, HandlerError, Instrumentation, ResponseStatus,
    RouteHandlerOptions, WrappedHandler,
};
use axiom_rewrites::{
    apply_rewrites, config_fn, wrap_config_fn, ConfigContext, ConfigFn, FrameworkConfig,
    RewriteError,
};

/// Which path an argument to `with_axiom` takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchTarget {
    /// Routing configuration: rewrites are injected.
    Config,
    /// Configuration function: rewrites are injected into its result.
    ConfigFn,
    /// Route handler: wrapped with request reporting.
    Handler,
}

/// Marker for `FrameworkConfig` arguments.
#[derive(Debug)]
pub struct ConfigMarker;

/// Marker for `(phase, context)` configuration functions.
#[derive(Debug)]
pub struct ConfigFnMarker<Fut>(PhantomData<Fut>);

/// Marker for single-argument route handlers.
#[derive(Debug)]
pub struct HandlerMarker<Fut, R>(PhantomData<(Fut, R)>);

/// Arguments accepted by `with_axiom`.
///
/// `M` only disambiguates the implementations; callers never name it.
pub trait IntoWithAxiom<M> {
    type Output;

    const TARGET: DispatchTarget;

    fn into_with_axiom(self, instrumentation: &Instrumentation, options: RouteHandlerOptions)
        -> Self::Output;
}

impl IntoWithAxiom<ConfigMarker> for FrameworkConfig {
    type Output = FrameworkConfig;

    const TARGET: DispatchTarget = DispatchTarget::Config;

    fn into_with_axiom(self, instrumentation: &Instrumentation, _: RouteHandlerOptions) -> FrameworkConfig {
        apply_rewrites(self, instrumentation.config().clone())
    }
}

impl<F, Fut> IntoWithAxiom<ConfigFnMarker<Fut>> for F
where
    F: Fn(String, ConfigContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<FrameworkConfig, RewriteError>> + Send + 'static,
{
    type Output = ConfigFn;

    const TARGET: DispatchTarget = DispatchTarget::ConfigFn;

    fn into_with_axiom(self, instrumentation: &Instrumentation, _: RouteHandlerOptions) -> ConfigFn {
        wrap_config_fn(config_fn(self), instrumentation.config().clone())
    }
}

impl<F, Fut, R> IntoWithAxiom<HandlerMarker<Fut, R>> for F
where
    F: Fn(AxiomRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, HandlerError>> + Send + 'static,
    R: ResponseStatus + Send + 'static,
{
    type Output = WrappedHandler<(), R>;

    const TARGET: DispatchTarget = DispatchTarget::Handler;

    fn into_with_axiom(
        self,
        instrumentation: &Instrumentation,
        options: RouteHandlerOptions,
    ) -> WrappedHandler<(), R> {
        wrap_handler(self, options, instrumentation.clone())
    }
}

/// The path `param` would take through `with_axiom`.
pub fn dispatch_target<M, P: IntoWithAxiom<M>>(_param: &P) -> DispatchTarget {
    P::TARGET
}

/// Instrument a configuration, configuration function or handler.
pub fn with_axiom<M, P: IntoWithAxiom<M>>(param: P) -> P::Output {
    with_axiom_options(param, RouteHandlerOptions::default())
}

/// `with_axiom` with handler options. Options are ignored on the config paths.
pub fn with_axiom_options<M, P: IntoWithAxiom<M>>(param: P, options: RouteHandlerOptions) -> P::Output {
    with_axiom_in(param, &Instrumentation::global(), options)
}

/// `with_axiom` against explicit instrumentation.
pub fn with_axiom_in<M, P: IntoWithAxiom<M>>(
    param: P,
    instrumentation: &Instrumentation,
    options: RouteHandlerOptions,
) -> P::Output {
    tracing::debug!(path = ?P::TARGET, "axiom: instrumenting");
    param.into_with_axiom(instrumentation, options)
}

/// Wrap a route handler that takes the request and a passthrough argument.
pub fn with_axiom_handler<F, Fut, A, R>(handler: F, options: RouteHandlerOptions) -> WrappedHandler<A, R>
where
    F: Fn(AxiomRequest, A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, HandlerError>> + Send + 'static,
    A: Send + 'static,
    R: ResponseStatus + Send + 'static,
{
    WrappedHandler::new(handler, options, Instrumentation::global())
}

/// Add the telemetry proxy rewrites to a routing configuration.
pub fn with_axiom_config(config: FrameworkConfig) -> FrameworkConfig {
    apply_rewrites(config, AxiomConfig::global())
}

/// Add the telemetry proxy rewrites to whatever `f` produces.
pub fn with_axiom_config_fn<F, Fut>(f: F) -> ConfigFn
where
    F: Fn(String, ConfigContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<FrameworkConfig, RewriteError>> + Send + 'static,
{
    wrap_config_fn(config_fn(f), AxiomConfig::global())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axiom_rewrites::Rewrites;

    // === Dispatch Target Tests ===

    #[test]
    fn test_config_object_target() {
        assert_eq!(dispatch_target(&FrameworkConfig::new()), DispatchTarget::Config);
    }

    #[test]
    fn test_two_parameter_function_target() {
        let f = |_phase: String, _ctx: ConfigContext| async {
            Ok::<_, RewriteError>(FrameworkConfig::new())
        };

        assert_eq!(dispatch_target(&f), DispatchTarget::ConfigFn);
    }

    #[test]
    fn test_handler_target() {
        let h = |_req: AxiomRequest| async { Ok::<u16, HandlerError>(200) };

        assert_eq!(dispatch_target(&h), DispatchTarget::Handler);
    }

    #[tokio::test]
    async fn test_config_entry_point_keeps_settings() {
        let config = with_axiom_config(
            FrameworkConfig::new()
                .with_setting("reactStrictMode", true)
                .with_static_rewrites(Rewrites::List(Vec::new())),
        );

        assert!(config.has_rewrites());
        assert_eq!(config.get("reactStrictMode"), Some(&serde_json::Value::Bool(true)));
        assert!(config.resolve_rewrites().await.is_ok());
    }
}
