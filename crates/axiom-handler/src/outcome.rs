//! Classification of handler results into a status and a level.

use axiom_log::LogLevel;

use crate::error::{HandlerError, NOT_FOUND_MESSAGE, REDIRECT_MESSAGE};
use crate::options::RouteHandlerOptions;

/// Status used for a redirect whose digest is missing or unparseable.
pub const DEFAULT_REDIRECT_STATUS: u16 = 307;

/// Anything a handler may return that carries an HTTP status.
pub trait ResponseStatus {
    fn status_code(&self) -> u16;
}

impl<B> ResponseStatus for http::Response<B> {
    fn status_code(&self) -> u16 {
        self.status().as_u16()
    }
}

impl ResponseStatus for http::StatusCode {
    fn status_code(&self) -> u16 {
        self.as_u16()
    }
}

impl ResponseStatus for u16 {
    fn status_code(&self) -> u16 {
        *self
    }
}

/// Status code and severity reported for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub status: u16,
    pub level: LogLevel,
}

impl Outcome {
    /// A successful response.
    pub fn success(response: &impl ResponseStatus) -> Self {
        Self {
            status: response.status_code(),
            level: LogLevel::Info,
        }
    }

    /// Classify a handler error.
    ///
    /// Not-found maps to 404 and redirect to the digest's status, each at its
    /// configured level. A failure whose message is one of the signal
    /// conventions is treated as that signal. Everything else is a 500 error.
    pub fn classify(error: &HandlerError, options: &RouteHandlerOptions) -> Self {
        let not_found = Self {
            status: 404,
            level: options.not_found_log_level,
        };
        let redirect = |digest: Option<&str>| Self {
            status: redirect_status(digest),
            level: options.redirect_log_level,
        };

        match error {
            HandlerError::NotFound => not_found,
            HandlerError::Redirect { digest } => redirect(digest.as_deref()),
            HandlerError::Failed(e) => match e.to_string().as_str() {
                NOT_FOUND_MESSAGE => not_found,
                REDIRECT_MESSAGE => redirect(None),
                _ => Self {
                    status: 500,
                    level: LogLevel::Error,
                },
            },
        }
    }
}

/// Redirect status from the 4th `;`-separated digest segment.
pub fn redirect_status(digest: Option<&str>) -> u16 {
    digest
        .and_then(|d| d.split(';').nth(3))
        .and_then(|segment| segment.trim().parse().ok())
        .unwrap_or(DEFAULT_REDIRECT_STATUS)
}
