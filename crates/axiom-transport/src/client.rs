//! HTTP transport for log batches.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};

use axiom_log::{LogEvent, Transport, TransportError};

use crate::retry::RetryPolicy;
use crate::timeout::TimeoutConfig;

/// `User-Agent` sent with every batch.
pub const CLIENT_USER_AGENT: &str = concat!("axiom-edge/", env!("CARGO_PKG_VERSION"));

/// Delivery policy combining timeout and retry configuration.
#[derive(Debug, Clone, Default)]
pub struct TransportOptions {
    /// Timeout configuration.
    pub timeout: TimeoutConfig,
    /// Retry policy.
    pub retry: RetryPolicy,
}

impl TransportOptions {
    /// Create a new delivery policy.
    pub fn new(timeout: TimeoutConfig, retry: RetryPolicy) -> Self {
        Self { timeout, retry }
    }
}

/// POSTs each batch as one JSON array to the ingest URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
    retry: RetryPolicy,
}

impl HttpTransport {
    /// Create a transport for an ingest URL.
    pub fn new(url: impl Into<String>, options: TransportOptions) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(options.timeout.connect)
            .timeout(options.timeout.total)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
            token: None,
            retry: options.retry,
        })
    }

    /// Send a bearer token with every batch.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Get the ingest URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn send_once(&self, body: &[u8]) -> Result<(), TransportError> {
        let mut request = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .body(body.to_vec());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Http {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }
        Ok(())
    }

    fn map_error(&self, error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout(error.to_string())
        } else if error.is_connect() {
            TransportError::Connection(error.to_string())
        } else {
            TransportError::Request(error.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, events: Vec<LogEvent>) -> Result<(), TransportError> {
        if events.is_empty() {
            return Ok(());
        }

        let body = serde_json::to_vec(&events)?;
        let count = events.len();
        let mut attempt = 0;

        loop {
            match self.send_once(&body).await {
                Ok(()) => {
                    tracing::debug!(count, attempt, url = %self.url, "axiom: shipped log batch");
                    return Ok(());
                }
                Err(e) if self.retry.should_retry(&e, attempt) => {
                    let delay = self.retry.backoff.delay_for_attempt(attempt);
                    tracing::debug!(error = %e, attempt, ?delay, "axiom: retrying log batch");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(error = %e, count, "axiom: failed to ship log batch");
                    return Err(e);
                }
            }
        }
    }
}
