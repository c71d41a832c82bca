//! Per-handler options.

use axiom_core::{DetailField, RequestContext, RequestDetails};
use axiom_log::LogLevel;

/// Which request details to capture into the report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogRequestDetails {
    /// No detail capture.
    #[default]
    Off,
    /// Capture every available field.
    All,
    /// Capture only the listed fields.
    Fields(Vec<DetailField>),
}

impl LogRequestDetails {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Off)
    }

    /// Snapshot the request according to this setting.
    pub fn capture(&self, ctx: &RequestContext) -> Option<RequestDetails> {
        match self {
            Self::Off => None,
            Self::All => Some(RequestDetails::capture(ctx)),
            Self::Fields(fields) => Some(RequestDetails::capture(ctx).retain(fields)),
        }
    }
}

impl From<bool> for LogRequestDetails {
    fn from(enabled: bool) -> Self {
        if enabled {
            Self::All
        } else {
            Self::Off
        }
    }
}

impl From<Vec<DetailField>> for LogRequestDetails {
    fn from(fields: Vec<DetailField>) -> Self {
        Self::Fields(fields)
    }
}

impl<const N: usize> From<[DetailField; N]> for LogRequestDetails {
    fn from(fields: [DetailField; N]) -> Self {
        Self::Fields(fields.to_vec())
    }
}

/// Options recognized by the request wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteHandlerOptions {
    pub log_request_details: LogRequestDetails,
    /// Level for the not-found signal.
    pub not_found_log_level: LogLevel,
    /// Level for the redirect signal.
    pub redirect_log_level: LogLevel,
}

impl Default for RouteHandlerOptions {
    fn default() -> Self {
        Self {
            log_request_details: LogRequestDetails::Off,
            not_found_log_level: LogLevel::Warn,
            redirect_log_level: LogLevel::Info,
        }
    }
}

impl RouteHandlerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log_request_details(mut self, details: impl Into<LogRequestDetails>) -> Self {
        self.log_request_details = details.into();
        self
    }

    pub fn with_not_found_log_level(mut self, level: LogLevel) -> Self {
        self.not_found_log_level = level;
        self
    }

    pub fn with_redirect_log_level(mut self, level: LogLevel) -> Self {
        self.redirect_log_level = level;
        self
    }
}
