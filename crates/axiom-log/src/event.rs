//! Structured log events.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use axiom_core::PlatformInfo;

use crate::level::LogLevel;

/// Field under which request data and the response status are attached.
pub const REQUEST_FIELD: &str = "request";

/// A structured log event as shipped to the ingest endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEvent {
    /// Log level.
    pub level: LogLevel,
    /// Log message.
    pub message: String,
    /// Time the event was recorded.
    #[serde(rename = "_time")]
    pub time: DateTime<Utc>,
    /// Emitting runtime, e.g. `lambda-log`.
    pub source: String,
    /// Logger context merged with per-call fields.
    pub fields: Map<String, Value>,
    /// Request report and attached response status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<Map<String, Value>>,
    /// Deployment metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<PlatformInfo>,
}

impl LogEvent {
    /// Create an event stamped with the current time.
    pub fn new(level: LogLevel, message: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            time: Utc::now(),
            source: source.into(),
            fields: Map::new(),
            request: None,
            platform: None,
        }
    }

    /// Response status attached to this event, if any.
    pub fn status_code(&self) -> Option<u16> {
        self.request
            .as_ref()?
            .get("statusCode")?
            .as_u64()
            .and_then(|s| u16::try_from(s).ok())
    }

    /// Set the response status on this event's request data.
    pub fn set_status_code(&mut self, status: u16) {
        self.request
            .get_or_insert_with(Map::new)
            .insert("statusCode".to_string(), Value::from(status));
    }

    /// Format as JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }

    /// Format as human-readable string.
    pub fn to_human(&self) -> String {
        let mut s = format!("[{}] {}", self.level, self.message);

        if let Some(status) = self.status_code() {
            s.push_str(&format!(" ({})", status));
        }

        if !self.fields.is_empty() {
            s.push_str(" | ");
            let fields: Vec<String> = self
                .fields
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            s.push_str(&fields.join(" "));
        }

        s
    }
}

/// Structured representation of an error and its `source()` chain.
pub fn error_value(name: &str, error: &(dyn std::error::Error + 'static)) -> Value {
    let mut causes = Vec::new();
    let mut source = error.source();
    while let Some(cause) = source {
        causes.push(Value::from(cause.to_string()));
        source = cause.source();
    }

    let mut value = Map::new();
    value.insert("name".to_string(), Value::from(name));
    value.insert("message".to_string(), Value::from(error.to_string()));
    if !causes.is_empty() {
        value.insert("cause".to_string(), Value::Array(causes));
    }
    Value::Object(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "connection reset")
        }
    }

    impl std::error::Error for Inner {}

    #[derive(Debug)]
    struct Outer(Inner);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "upstream failed")
        }
    }

    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    // === Event Tests ===

    #[test]
    fn test_status_code_roundtrip() {
        let mut event = LogEvent::new(LogLevel::Info, "hello", "lambda");
        assert_eq!(event.status_code(), None);

        event.set_status_code(404);
        assert_eq!(event.status_code(), Some(404));
    }

    #[test]
    fn test_json_shape() {
        let mut event = LogEvent::new(LogLevel::Warn, "slow", "edge-log");
        event.fields.insert("ms".to_string(), Value::from(900));
        let json: Value = serde_json::from_str(&event.to_json()).unwrap();

        assert_eq!(json["level"], "warn");
        assert_eq!(json["message"], "slow");
        assert_eq!(json["source"], "edge-log");
        assert_eq!(json["fields"]["ms"], 900);
        assert!(json["_time"].is_string());
        assert!(json.get("request").is_none());
        assert!(json.get("platform").is_none());
    }

    #[test]
    fn test_human_format() {
        let mut event = LogEvent::new(LogLevel::Error, "boom", "lambda");
        event.fields.insert("user".to_string(), Value::from("u1"));
        event.set_status_code(500);

        assert_eq!(event.to_human(), "[ERROR] boom (500) | user=\"u1\"");
    }

    // === Error Value Tests ===

    #[test]
    fn test_error_value_includes_chain() {
        let value = error_value("Error", &Outer(Inner));

        assert_eq!(value["name"], "Error");
        assert_eq!(value["message"], "upstream failed");
        assert_eq!(value["cause"][0], "connection reset");
    }

    #[test]
    fn test_error_value_without_cause() {
        let value = error_value("NotFound", &Inner);

        assert!(value.get("cause").is_none());
    }
}
