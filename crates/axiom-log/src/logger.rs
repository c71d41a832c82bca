//! Buffered logger with child derivation.
//!
//! A `Logger` and every child derived from it share one event buffer and one
//! transport. Children carry their own context fields and a status scope:
//! `attach_response_status` on a logger applies to every event that logger
//! and its descendants emitted or will emit, and is resolved when the buffer
//! is drained by `flush`.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::{Map, Value};

use axiom_core::{PlatformInfo, RequestReport};

use crate::error::TransportError;
use crate::event::{error_value, LogEvent};
use crate::level::LogLevel;
use crate::transport::Transport;

/// Default event source.
pub const DEFAULT_SOURCE: &str = "lambda";

struct Shared {
    buffer: Mutex<Vec<Pending>>,
    transport: Arc<dyn Transport>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Vec<Pending>> {
        self.buffer.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Status overlay for one logger handle.
#[derive(Default)]
struct Scope {
    parent: Option<Arc<Scope>>,
    status: Mutex<Option<u16>>,
}

impl Scope {
    fn child(parent: &Arc<Scope>) -> Arc<Scope> {
        Arc::new(Scope {
            parent: Some(parent.clone()),
            status: Mutex::new(None),
        })
    }

    fn set(&self, status: u16) {
        *self.status.lock().unwrap_or_else(|e| e.into_inner()) = Some(status);
    }

    /// Innermost attached status along the ancestor chain.
    fn resolve(&self) -> Option<u16> {
        let own = *self.status.lock().unwrap_or_else(|e| e.into_inner());
        own.or_else(|| self.parent.as_ref().and_then(|p| p.resolve()))
    }
}

struct Pending {
    event: LogEvent,
    scope: Arc<Scope>,
}

impl Pending {
    fn resolve(self) -> LogEvent {
        let mut event = self.event;
        if let Some(status) = self.scope.resolve() {
            event.set_status_code(status);
        }
        event
    }
}

/// Structured logger backed by a shared event buffer.
#[derive(Clone)]
pub struct Logger {
    shared: Arc<Shared>,
    scope: Arc<Scope>,
    source: String,
    fields: Map<String, Value>,
    min_level: LogLevel,
    platform: Option<PlatformInfo>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("source", &self.source)
            .field("fields", &self.fields)
            .field("min_level", &self.min_level)
            .field("pending", &self.pending())
            .finish()
    }
}

impl Logger {
    /// Create a root logger with an empty buffer.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            shared: Arc::new(Shared {
                buffer: Mutex::new(Vec::new()),
                transport,
            }),
            scope: Arc::new(Scope::default()),
            source: DEFAULT_SOURCE.to_string(),
            fields: Map::new(),
            min_level: LogLevel::Debug,
            platform: None,
        }
    }

    /// Set the event source tag.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Set minimum log level.
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Attach deployment metadata to every event.
    pub fn with_platform(mut self, platform: Option<PlatformInfo>) -> Self {
        self.platform = platform;
        self
    }

    /// Add a context field carried by every event.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Derive a child sharing this logger's buffer and transport.
    ///
    /// `fields` are merged over this logger's context fields.
    pub fn child(&self, fields: Map<String, Value>) -> Logger {
        let mut merged = self.fields.clone();
        merged.extend(fields);

        Logger {
            shared: self.shared.clone(),
            scope: Scope::child(&self.scope),
            source: self.source.clone(),
            fields: merged,
            min_level: self.min_level,
            platform: self.platform.clone(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Events buffered and not yet flushed, across all handles.
    pub fn pending(&self) -> usize {
        self.shared.lock().len()
    }

    /// Log at debug level.
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message, Map::new());
    }

    /// Log at info level.
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message, Map::new());
    }

    /// Log at warn level.
    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message, Map::new());
    }

    /// Log at error level.
    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message, Map::new());
    }

    /// Log with additional fields.
    pub fn log(&self, level: LogLevel, message: &str, fields: Map<String, Value>) {
        self.record(level, message, fields, None);
    }

    /// Log an error value under the `error` field.
    pub fn log_error(
        &self,
        level: LogLevel,
        message: &str,
        name: &str,
        error: &(dyn std::error::Error + 'static),
    ) {
        self.builder(level, message).error(name, error).emit();
    }

    /// Start building an event at `level`.
    pub fn builder(&self, level: LogLevel, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, level, message)
    }

    /// Log the HTTP summary of a request, carrying its report.
    pub fn log_http_request(
        &self,
        level: LogLevel,
        message: &str,
        report: &RequestReport,
        fields: Map<String, Value>,
    ) {
        let request = match serde_json::to_value(report) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        };
        self.record(level, message, fields, request);
    }

    /// Attach a response status to every event of this logger and its children.
    pub fn attach_response_status(&self, status: u16) {
        self.scope.set(status);
    }

    /// Drain the shared buffer and hand it to the transport.
    ///
    /// Returns the number of events shipped. Drained events are not re-buffered
    /// when the transport fails.
    pub async fn flush(&self) -> Result<usize, TransportError> {
        let drained = std::mem::take(&mut *self.shared.lock());
        if drained.is_empty() {
            return Ok(0);
        }

        let events: Vec<LogEvent> = drained.into_iter().map(Pending::resolve).collect();
        let count = events.len();
        tracing::debug!(events = count, source = %self.source, "axiom: flushing log batch");
        self.shared.transport.send(events).await?;
        Ok(count)
    }

    fn record(
        &self,
        level: LogLevel,
        message: &str,
        fields: Map<String, Value>,
        request: Option<Map<String, Value>>,
    ) {
        if !self.min_level.admits(level) {
            return;
        }

        let mut event = LogEvent::new(level, message, self.source.clone());
        event.fields = self.fields.clone();
        event.fields.extend(fields);
        event.request = request;
        event.platform = self.platform.clone();

        self.shared.lock().push(Pending {
            event,
            scope: self.scope.clone(),
        });
    }
}

/// Builder for one log event.
pub struct LogBuilder<'a> {
    logger: &'a Logger,
    level: LogLevel,
    message: String,
    fields: Map<String, Value>,
}

impl<'a> LogBuilder<'a> {
    pub fn new(logger: &'a Logger, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            logger,
            level,
            message: message.into(),
            fields: Map::new(),
        }
    }

    /// Add a field.
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Attach an error under the `error` field.
    pub fn error(mut self, name: &str, error: &(dyn std::error::Error + 'static)) -> Self {
        self.fields
            .insert("error".to_string(), error_value(name, error));
        self
    }

    /// Emit the log event.
    pub fn emit(self) {
        self.logger.log(self.level, &self.message, self.fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;
    use axiom_core::RequestContext;

    fn logger() -> (Logger, MemoryTransport) {
        let transport = MemoryTransport::new();
        (Logger::new(Arc::new(transport.clone())), transport)
    }

    fn fields(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    // === Buffer Tests ===

    #[tokio::test]
    async fn test_flush_drains_buffer() {
        let (logger, transport) = logger();
        logger.info("one");
        logger.warn("two");
        assert_eq!(logger.pending(), 2);

        let shipped = logger.flush().await.unwrap();

        assert_eq!(shipped, 2);
        assert_eq!(logger.pending(), 0);
        assert_eq!(transport.send_count(), 1);
        assert_eq!(transport.events()[0].message, "one");
        assert_eq!(transport.events()[1].level, LogLevel::Warn);
    }

    #[tokio::test]
    async fn test_flush_empty_buffer_skips_transport() {
        let (logger, transport) = logger();

        assert_eq!(logger.flush().await.unwrap(), 0);
        assert_eq!(transport.send_count(), 0);
    }

    #[tokio::test]
    async fn test_repeated_flush_ships_only_new_events() {
        let (logger, transport) = logger();
        logger.info("first");
        logger.flush().await.unwrap();
        logger.info("second");
        logger.flush().await.unwrap();

        let batches = transport.batches();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].len(), 1);
        assert_eq!(batches[1][0].message, "second");
    }

    #[tokio::test]
    async fn test_failed_flush_is_not_retried() {
        let transport = MemoryTransport::failing();
        let logger = Logger::new(Arc::new(transport.clone()));
        logger.error("lost");

        assert!(logger.flush().await.is_err());
        assert_eq!(logger.pending(), 0);
        assert_eq!(logger.flush().await.unwrap(), 0);
        assert_eq!(transport.send_count(), 1);
    }

    // === Child Logger Tests ===

    #[tokio::test]
    async fn test_child_shares_buffer() {
        let (parent, transport) = logger();
        let child = parent.child(fields(&[("user", Value::from("u1"))]));

        child.info("from child");
        assert_eq!(parent.pending(), 1);

        parent.flush().await.unwrap();
        let events = transport.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].fields["user"], "u1");
    }

    #[tokio::test]
    async fn test_child_fields_merge_over_parent() {
        let (parent, transport) = logger();
        let parent = parent.with_field("app", "shop").with_field("tier", "free");
        let child = parent.child(fields(&[("tier", Value::from("pro"))]));

        child.log(LogLevel::Info, "x", fields(&[("step", Value::from(2))]));
        child.flush().await.unwrap();

        let event = &transport.events()[0];
        assert_eq!(event.fields["app"], "shop");
        assert_eq!(event.fields["tier"], "pro");
        assert_eq!(event.fields["step"], 2);
        assert!(parent.fields().get("step").is_none());
    }

    #[tokio::test]
    async fn test_child_source_override() {
        let (parent, transport) = logger();
        let parent = parent.with_source("edge");
        let child = parent.child(Map::new()).with_source("edge-log");

        parent.info("main");
        child.info("user");
        parent.flush().await.unwrap();

        let events = transport.events();
        assert_eq!(events[0].source, "edge");
        assert_eq!(events[1].source, "edge-log");
    }

    // === Status Attachment Tests ===

    #[tokio::test]
    async fn test_status_applies_to_prior_and_later_events() {
        let (parent, transport) = logger();
        let child = parent.child(Map::new());

        child.info("before");
        child.attach_response_status(404);
        child.info("after");
        parent.flush().await.unwrap();

        let events = transport.events();
        assert_eq!(events[0].status_code(), Some(404));
        assert_eq!(events[1].status_code(), Some(404));
    }

    #[tokio::test]
    async fn test_status_reaches_grandchildren_not_parent() {
        let (parent, transport) = logger();
        let child = parent.child(Map::new());
        let grandchild = child.child(Map::new());

        parent.info("parent");
        grandchild.info("grandchild");
        child.attach_response_status(201);
        parent.flush().await.unwrap();

        let events = transport.events();
        assert_eq!(events[0].status_code(), None);
        assert_eq!(events[1].status_code(), Some(201));
    }

    #[tokio::test]
    async fn test_innermost_status_wins() {
        let (parent, transport) = logger();
        let child = parent.child(Map::new());
        let grandchild = child.child(Map::new());

        grandchild.info("inner");
        child.attach_response_status(500);
        grandchild.attach_response_status(503);
        parent.flush().await.unwrap();

        assert_eq!(transport.events()[0].status_code(), Some(503));
    }

    // === Level and Enrichment Tests ===

    #[tokio::test]
    async fn test_min_level_filters() {
        let (logger, transport) = logger();
        let logger = logger.with_min_level(LogLevel::Warn);

        logger.debug("dropped");
        logger.info("dropped");
        logger.warn("kept");
        logger.error("kept");
        logger.flush().await.unwrap();

        assert_eq!(transport.events().len(), 2);
    }

    #[tokio::test]
    async fn test_level_off_drops_everything() {
        let (logger, _) = logger();
        let logger = logger.with_min_level(LogLevel::Off);

        logger.error("dropped");
        assert_eq!(logger.pending(), 0);
    }

    #[tokio::test]
    async fn test_http_request_event_carries_report() {
        let (logger, transport) = logger();
        let ctx = RequestContext::new(http::Method::GET, "https://example.com/health");
        let mut report = RequestReport::start_at(100, &ctx, None);
        report.complete(130, 200);

        logger.log_http_request(LogLevel::Info, &report.summary(), &report, Map::new());
        logger.flush().await.unwrap();

        let event = &transport.events()[0];
        assert_eq!(event.message, "GET /health 200 in 30ms");
        assert_eq!(event.status_code(), Some(200));
        let request = event.request.as_ref().unwrap();
        assert_eq!(request["durationMs"], 30);
        assert_eq!(request["path"], "/health");
    }

    #[tokio::test]
    async fn test_platform_attached() {
        let (logger, transport) = logger();
        let platform = PlatformInfo {
            region: Some("iad1".to_string()),
            ..Default::default()
        };
        let logger = logger.with_platform(Some(platform.clone()));

        logger.child(Map::new()).info("x");
        logger.flush().await.unwrap();

        assert_eq!(transport.events()[0].platform, Some(platform));
    }

    #[tokio::test]
    async fn test_log_error_and_builder() {
        let (logger, transport) = logger();
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");

        logger.log_error(LogLevel::Error, "write failed", "Error", &err);
        logger
            .builder(LogLevel::Info, "cache miss")
            .field("key", "user:1")
            .field("lookup", 12)
            .emit();
        logger.flush().await.unwrap();

        let events = transport.events();
        assert_eq!(events[0].level, LogLevel::Error);
        assert_eq!(events[0].message, "write failed");
        assert_eq!(events[0].fields["error"]["message"], "disk full");
        assert_eq!(events[1].level, LogLevel::Info);
        assert_eq!(events[1].fields["key"], "user:1");
        assert_eq!(events[1].fields["lookup"], 12);
    }
}
