//! Per-invocation request report.

use serde::{Deserialize, Serialize};

use crate::context::RequestContext;
use crate::details::RequestDetails;

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Timing and outcome of one wrapped request.
///
/// Created at the start of an invocation with `end_time == start_time`,
/// completed exactly once, owned by that invocation alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestReport {
    pub start_time: i64,
    pub end_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<RequestDetails>,
}

impl RequestReport {
    /// Start a report for the request, stamped with the current time.
    pub fn start(ctx: &RequestContext, details: Option<RequestDetails>) -> Self {
        Self::start_at(now_millis(), ctx, details)
    }

    /// Start a report with an explicit start time.
    pub fn start_at(start_time: i64, ctx: &RequestContext, details: Option<RequestDetails>) -> Self {
        Self {
            start_time,
            end_time: start_time,
            path: Some(ctx.pathname()),
            method: Some(ctx.method.to_string()),
            host: ctx.header("host").map(str::to_string),
            user_agent: ctx.header("user-agent").map(str::to_string),
            scheme: ctx.scheme(),
            ip: ctx.header("x-forwarded-for").map(str::to_string),
            region: Some(ctx.region()),
            status_code: None,
            duration_ms: None,
            details,
        }
    }

    /// Record completion. `duration_ms` is always `end_time - start_time`.
    pub fn complete(&mut self, end_time: i64, status_code: u16) {
        self.end_time = end_time;
        self.status_code = Some(status_code);
        self.duration_ms = Some(end_time - self.start_time);
    }

    pub fn is_complete(&self) -> bool {
        self.status_code.is_some()
    }

    /// One-line summary, e.g. `GET /api 200 in 12ms`.
    pub fn summary(&self) -> String {
        format!(
            "{} {} {} in {}ms",
            self.method.as_deref().unwrap_or("-"),
            self.path.as_deref().unwrap_or(""),
            self.status_code
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
            self.end_time - self.start_time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    fn request() -> RequestContext {
        RequestContext::new(Method::GET, "https://example.com/products/7")
            .with_header("host", "example.com")
            .unwrap()
            .with_header("user-agent", "test-agent")
            .unwrap()
            .with_header("x-forwarded-for", "198.51.100.4")
            .unwrap()
    }

    // === Lifecycle Tests ===

    #[test]
    fn test_start_sets_sentinel_end_time() {
        let report = RequestReport::start_at(1_000, &request(), None);

        assert_eq!(report.start_time, 1_000);
        assert_eq!(report.end_time, report.start_time);
        assert!(!report.is_complete());
        assert_eq!(report.duration_ms, None);
    }

    #[test]
    fn test_start_extracts_request_fields() {
        let report = RequestReport::start_at(0, &request(), None);

        assert_eq!(report.path.as_deref(), Some("/products/7"));
        assert_eq!(report.method.as_deref(), Some("GET"));
        assert_eq!(report.host.as_deref(), Some("example.com"));
        assert_eq!(report.user_agent.as_deref(), Some("test-agent"));
        assert_eq!(report.scheme.as_deref(), Some("https"));
        assert_eq!(report.ip.as_deref(), Some("198.51.100.4"));
        assert_eq!(report.region.as_deref(), Some(""));
    }

    #[test]
    fn test_complete_derives_duration() {
        let mut report = RequestReport::start_at(1_000, &request(), None);
        report.complete(1_250, 201);

        assert_eq!(report.end_time, 1_250);
        assert_eq!(report.status_code, Some(201));
        assert_eq!(report.duration_ms, Some(report.end_time - report.start_time));
    }

    #[test]
    fn test_summary() {
        let mut report = RequestReport::start_at(1_000, &request(), None);
        report.complete(1_012, 200);

        assert_eq!(report.summary(), "GET /products/7 200 in 12ms");
    }

    #[test]
    fn test_serializes_camel_case() {
        let mut report = RequestReport::start_at(5, &request(), None);
        report.complete(9, 404);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["statusCode"], 404);
        assert_eq!(json["durationMs"], 4);
        assert_eq!(json["userAgent"], "test-agent");
        assert!(json.get("details").is_none());
    }
}
