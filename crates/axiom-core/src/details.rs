//! Serializable snapshot of an inbound request.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::context::{GeoInfo, NextUrl, RequestContext};
use crate::error::CoreError;

/// Field names accepted in a request-details allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DetailField {
    Method,
    Url,
    Headers,
    Cookies,
    NextUrl,
    Ip,
    Geo,
    Body,
}

impl DetailField {
    pub const ALL: [DetailField; 8] = [
        Self::Method,
        Self::Url,
        Self::Headers,
        Self::Cookies,
        Self::NextUrl,
        Self::Ip,
        Self::Geo,
        Self::Body,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::Url => "url",
            Self::Headers => "headers",
            Self::Cookies => "cookies",
            Self::NextUrl => "nextUrl",
            Self::Ip => "ip",
            Self::Geo => "geo",
            Self::Body => "body",
        }
    }
}

impl fmt::Display for DetailField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetailField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| CoreError::UnknownDetailField(s.to_string()))
    }
}

/// Request metadata captured when detail logging is enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_url: Option<NextUrl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl RequestDetails {
    /// Capture every available field of the request.
    pub fn capture(ctx: &RequestContext) -> Self {
        let headers = ctx
            .headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        Self {
            method: Some(ctx.method.to_string()),
            url: Some(ctx.url.clone()),
            headers: Some(headers),
            cookies: Some(ctx.cookies()),
            next_url: ctx.next_url.clone(),
            ip: ctx.ip.clone(),
            geo: ctx.geo.clone(),
            body: ctx.body.clone(),
        }
    }

    /// Keep only the listed fields.
    pub fn retain(mut self, allow: &[DetailField]) -> Self {
        let keep = |field: DetailField| allow.contains(&field);

        if !keep(DetailField::Method) {
            self.method = None;
        }
        if !keep(DetailField::Url) {
            self.url = None;
        }
        if !keep(DetailField::Headers) {
            self.headers = None;
        }
        if !keep(DetailField::Cookies) {
            self.cookies = None;
        }
        if !keep(DetailField::NextUrl) {
            self.next_url = None;
        }
        if !keep(DetailField::Ip) {
            self.ip = None;
        }
        if !keep(DetailField::Geo) {
            self.geo = None;
        }
        if !keep(DetailField::Body) {
            self.body = None;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    fn request() -> RequestContext {
        RequestContext::new(Method::POST, "https://example.com/api/orders")
            .with_header("host", "example.com")
            .unwrap()
            .with_header("cookie", "cart=42")
            .unwrap()
            .with_ip("203.0.113.9")
            .with_body(r#"{"sku":"A1"}"#)
    }

    // === Capture Tests ===

    #[test]
    fn test_capture_all_fields() {
        let details = RequestDetails::capture(&request());

        assert_eq!(details.method.as_deref(), Some("POST"));
        assert_eq!(details.url.as_deref(), Some("https://example.com/api/orders"));
        assert_eq!(
            details.headers.as_ref().and_then(|h| h.get("host")).map(String::as_str),
            Some("example.com")
        );
        assert_eq!(
            details.cookies.as_ref().and_then(|c| c.get("cart")).map(String::as_str),
            Some("42")
        );
        assert_eq!(details.ip.as_deref(), Some("203.0.113.9"));
        assert!(details.geo.is_none());
    }

    #[test]
    fn test_retain_allow_list() {
        let details =
            RequestDetails::capture(&request()).retain(&[DetailField::Method, DetailField::Body]);

        assert_eq!(details.method.as_deref(), Some("POST"));
        assert_eq!(details.body.as_deref(), Some(r#"{"sku":"A1"}"#));
        assert!(details.url.is_none());
        assert!(details.headers.is_none());
        assert!(details.cookies.is_none());
        assert!(details.ip.is_none());
    }

    #[test]
    fn test_retain_serializes_only_listed_keys() {
        let details = RequestDetails::capture(&request()).retain(&[DetailField::Ip]);
        let json = serde_json::to_value(&details).unwrap();

        assert_eq!(json, serde_json::json!({ "ip": "203.0.113.9" }));
    }

    // === DetailField Tests ===

    #[test]
    fn test_detail_field_from_str() {
        assert_eq!("nextUrl".parse::<DetailField>().unwrap(), DetailField::NextUrl);
        assert_eq!("headers".parse::<DetailField>().unwrap(), DetailField::Headers);
        assert!(matches!(
            "password".parse::<DetailField>(),
            Err(CoreError::UnknownDetailField(_))
        ));
    }
}
