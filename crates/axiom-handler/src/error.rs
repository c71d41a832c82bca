//! Errors a wrapped handler can return.

use thiserror::Error;

/// Message carried by the framework's not-found signal.
pub const NOT_FOUND_MESSAGE: &str = "NEXT_NOT_FOUND";

/// Message carried by the framework's redirect signal.
pub const REDIRECT_MESSAGE: &str = "NEXT_REDIRECT";

/// Outcome of a handler that did not produce a response.
///
/// `NotFound` and `Redirect` are control-flow signals for the framework; they
/// are reported at their configured level and returned unchanged.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// The requested resource does not exist.
    #[error("NEXT_NOT_FOUND")]
    NotFound,

    /// Navigation to another URL.
    ///
    /// `digest` is the framework's `;`-separated encoding whose 4th segment
    /// is the redirect status.
    #[error("NEXT_REDIRECT")]
    Redirect { digest: Option<String> },

    /// Any other failure.
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl HandlerError {
    /// Not-found signal.
    pub fn not_found() -> Self {
        Self::NotFound
    }

    /// Redirect signal carrying `status` in its digest.
    pub fn redirect(url: &str, status: u16) -> Self {
        Self::Redirect {
            digest: Some(format!("{REDIRECT_MESSAGE};replace;{url};{status};")),
        }
    }

    /// Redirect signal without a digest.
    pub fn bare_redirect() -> Self {
        Self::Redirect { digest: None }
    }

    /// Wrap a failure.
    pub fn failed(error: impl Into<anyhow::Error>) -> Self {
        Self::Failed(error.into())
    }

    /// The redirect digest, if any.
    pub fn digest(&self) -> Option<&str> {
        match self {
            Self::Redirect { digest } => digest.as_deref(),
            _ => None,
        }
    }

    /// Name recorded with the error event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotFound => "NotFoundError",
            Self::Redirect { .. } => "RedirectError",
            Self::Failed(_) => "Error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_messages() {
        assert_eq!(HandlerError::not_found().to_string(), NOT_FOUND_MESSAGE);
        assert_eq!(HandlerError::bare_redirect().to_string(), REDIRECT_MESSAGE);
    }

    #[test]
    fn test_redirect_digest_layout() {
        let error = HandlerError::redirect("/login", 308);

        let digest = error.digest().unwrap();
        assert_eq!(digest, "NEXT_REDIRECT;replace;/login;308;");
        assert_eq!(digest.split(';').nth(3), Some("308"));
    }

    #[test]
    fn test_failed_keeps_message() {
        let error = HandlerError::failed(anyhow::anyhow!("database unavailable"));

        assert_eq!(error.to_string(), "database unavailable");
        assert_eq!(error.name(), "Error");
        assert!(error.digest().is_none());
    }

    #[test]
    fn test_question_mark_converts_anyhow() {
        fn run() -> Result<(), HandlerError> {
            Err(anyhow::anyhow!("boom"))?;
            Ok(())
        }

        assert!(matches!(run(), Err(HandlerError::Failed(_))));
    }
}
