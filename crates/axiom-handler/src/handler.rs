//! The request wrapper.
//!
//! Each invocation builds a `RequestReport`, runs the handler with a child
//! logger attached to the request, classifies the outcome, records the
//! summary line and the status, and flushes before handing the handler's
//! own result back unchanged.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Map;

use axiom_core::{now_millis, RequestContext, RequestReport};
use axiom_log::{LogLevel, Logger};

use crate::error::HandlerError;
use crate::instrumentation::Instrumentation;
use crate::options::RouteHandlerOptions;
use crate::outcome::{Outcome, ResponseStatus};
use crate::request::AxiomRequest;

type BoxedHandler<A, R> =
    Arc<dyn Fn(AxiomRequest, A) -> BoxFuture<'static, Result<R, HandlerError>> + Send + Sync>;

/// A route handler wrapped with request reporting.
///
/// `A` is the passthrough argument handed to the handler alongside the
/// request (route params, for instance); `R` is its response type.
pub struct WrappedHandler<A = (), R = http::Response<String>> {
    handler: BoxedHandler<A, R>,
    options: Arc<RouteHandlerOptions>,
    instrumentation: Instrumentation,
}

impl<A, R> Clone for WrappedHandler<A, R> {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
            options: self.options.clone(),
            instrumentation: self.instrumentation.clone(),
        }
    }
}

impl<A, R> fmt::Debug for WrappedHandler<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrappedHandler")
            .field("options", &self.options)
            .field("instrumentation", &self.instrumentation)
            .finish()
    }
}

impl<A, R> WrappedHandler<A, R>
where
    A: Send + 'static,
    R: ResponseStatus + Send + 'static,
{
    /// Wrap `handler`.
    pub fn new<F, Fut>(handler: F, options: RouteHandlerOptions, instrumentation: Instrumentation) -> Self
    where
        F: Fn(AxiomRequest, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, HandlerError>> + Send + 'static,
    {
        Self {
            handler: Arc::new(move |req, arg| handler(req, arg).boxed()),
            options: Arc::new(options),
            instrumentation,
        }
    }

    pub fn options(&self) -> &RouteHandlerOptions {
        &self.options
    }

    pub fn instrumentation(&self) -> &Instrumentation {
        &self.instrumentation
    }

    /// Run one invocation.
    ///
    /// Returns exactly what the handler returned. The summary line and the
    /// status attachment are recorded before the flush is started.
    pub async fn call(&self, request: RequestContext, arg: A) -> Result<R, HandlerError> {
        let details = self.options.log_request_details.capture(&request);
        let mut report = RequestReport::start(&request, details);

        let logger = self.instrumentation.logger();
        let log = logger
            .child(Map::new())
            .with_source(self.instrumentation.child_source());

        let result = (self.handler)(AxiomRequest::new(request, log.clone()), arg).await;
        let end_time = now_millis();

        match result {
            Ok(response) => {
                let outcome = Outcome::success(&response);
                report.complete(end_time, outcome.status);
                self.record_request(&logger, outcome.level, &report);
                log.attach_response_status(outcome.status);

                self.instrumentation.flush(&logger).await;
                Ok(response)
            }
            Err(error) => {
                let outcome = Outcome::classify(&error, &self.options);
                report.complete(end_time, outcome.status);
                self.record_request(&logger, outcome.level, &report);
                log.log_error(outcome.level, &error.to_string(), error.name(), &error);
                log.attach_response_status(outcome.status);

                self.instrumentation.flush(&logger).await;
                Err(error)
            }
        }
    }

    fn record_request(&self, logger: &Logger, level: LogLevel, report: &RequestReport) {
        // The platform integration already records requests.
        if self.instrumentation.config().is_vercel_integration() {
            return;
        }
        logger.log_http_request(level, &report.summary(), report, Map::new());
    }
}

impl<R> WrappedHandler<(), R>
where
    R: ResponseStatus + Send + 'static,
{
    /// Run one invocation of a handler without a passthrough argument.
    pub async fn handle(&self, request: RequestContext) -> Result<R, HandlerError> {
        self.call(request, ()).await
    }
}

/// Wrap a handler that ignores the passthrough argument.
pub fn wrap_handler<F, Fut, R>(
    handler: F,
    options: RouteHandlerOptions,
    instrumentation: Instrumentation,
) -> WrappedHandler<(), R>
where
    F: Fn(AxiomRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, HandlerError>> + Send + 'static,
    R: ResponseStatus + Send + 'static,
{
    WrappedHandler::new(move |req, ()| handler(req), options, instrumentation)
}
