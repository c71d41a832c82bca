//! Inbound request context with framework extensions.

use std::collections::BTreeMap;

use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method, Uri};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Geographic information supplied by the edge network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoInfo {
    /// ISO country code (e.g., "US").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Region/state code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// City name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
}

/// URL pre-parsed by the framework.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextUrl {
    pub pathname: String,
    #[serde(default)]
    pub search: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default)]
    pub base_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl NextUrl {
    /// Derive from an absolute or origin-relative URL.
    pub fn parse(url: &str) -> Result<Self, CoreError> {
        let uri: Uri = url.parse().map_err(|e: http::uri::InvalidUri| CoreError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let protocol = uri.scheme_str().map(|s| format!("{s}:"));
        let host = uri.authority().map(|a| a.as_str().to_string());
        let origin = match (uri.scheme_str(), &host) {
            (Some(scheme), Some(host)) => Some(format!("{scheme}://{host}")),
            _ => None,
        };

        Ok(Self {
            pathname: uri.path().to_string(),
            search: uri.query().map(|q| format!("?{q}")).unwrap_or_default(),
            hostname: uri.host().map(str::to_string),
            host,
            origin,
            protocol,
            href: Some(url.to_string()),
            base_path: String::new(),
            locale: None,
        })
    }
}

/// Request context passed through the wrapper to user handlers.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// HTTP method.
    pub method: Method,
    /// Raw request URL, usually absolute.
    pub url: String,
    /// HTTP headers.
    pub headers: HeaderMap,
    /// Geographic information, when the platform provides it.
    pub geo: Option<GeoInfo>,
    /// Framework-parsed URL, when available.
    pub next_url: Option<NextUrl>,
    /// Client IP as resolved by the platform.
    pub ip: Option<String>,
    /// Request body as text, when already buffered.
    pub body: Option<String>,
}

impl RequestContext {
    /// Create a new request context.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            geo: None,
            next_url: None,
            ip: None,
            body: None,
        }
    }

    /// Build from `http` request parts.
    pub fn from_parts(parts: http::request::Parts) -> Self {
        let mut ctx = Self::new(parts.method, parts.uri.to_string());
        ctx.headers = parts.headers;
        ctx
    }

    /// Add a header. Invalid names or values are rejected.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, CoreError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| CoreError::InvalidHeader(name.to_string()))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| CoreError::InvalidHeader(name.to_string()))?;
        self.headers.append(name, value);
        Ok(self)
    }

    /// Attach geo information.
    pub fn with_geo(mut self, geo: GeoInfo) -> Self {
        self.geo = Some(geo);
        self
    }

    /// Attach a framework-parsed URL.
    pub fn with_next_url(mut self, next_url: NextUrl) -> Self {
        self.next_url = Some(next_url);
        self
    }

    /// Attach the platform-resolved client IP.
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    /// Attach a buffered body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Request pathname, preferring the framework-parsed URL.
    pub fn pathname(&self) -> String {
        if let Some(next_url) = &self.next_url {
            return next_url.pathname.clone();
        }
        self.url
            .parse::<Uri>()
            .map(|uri| uri.path().to_string())
            .unwrap_or_default()
    }

    /// Scheme segment of the raw URL, e.g. `https`.
    pub fn scheme(&self) -> Option<String> {
        self.url
            .split_once("://")
            .map(|(scheme, _)| scheme.to_string())
    }

    /// Geo region, or empty when the request carries no geo information.
    pub fn region(&self) -> String {
        self.geo
            .as_ref()
            .and_then(|geo| geo.region.clone())
            .unwrap_or_default()
    }

    /// Cookies parsed from the `cookie` header.
    pub fn cookies(&self) -> BTreeMap<String, String> {
        self.headers
            .get_all(http::header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| {
                let (name, value) = pair.split_once('=')?;
                let name = name.trim();
                (!name.is_empty()).then(|| (name.to_string(), value.trim().to_string()))
            })
            .collect()
    }
}
