//! Shared state for wrapped handlers: configuration, transport and flush policy.

use std::fmt;
use std::sync::{Arc, OnceLock};

use futures::FutureExt;

use axiom_core::AxiomConfig;
use axiom_log::{LogLevel, Logger, Transport};

use crate::flush::{BackgroundTasks, WaitUntil};

/// Everything a wrapped handler needs besides the handler itself.
#[derive(Clone)]
pub struct Instrumentation {
    config: Arc<AxiomConfig>,
    transport: Arc<dyn Transport>,
    min_level: LogLevel,
    wait_until: Arc<dyn WaitUntil>,
    background: BackgroundTasks,
}

impl fmt::Debug for Instrumentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instrumentation")
            .field("config", &self.config)
            .field("min_level", &self.min_level)
            .field("background", &self.background)
            .finish()
    }
}

static GLOBAL: OnceLock<Instrumentation> = OnceLock::new();

impl Instrumentation {
    /// Process-wide instance, built from the environment on first use.
    ///
    /// Deferred flushes of every handler wrapped through it land in the same
    /// `background()` tracker.
    pub fn global() -> Self {
        GLOBAL.get_or_init(Self::from_env).clone()
    }

    /// Process-wide configuration with the transport it selects.
    pub fn from_env() -> Self {
        Self::from_config(AxiomConfig::global())
    }

    /// Use `config` and the transport it selects.
    pub fn from_config(config: Arc<AxiomConfig>) -> Self {
        let transport = axiom_transport::transport_for(&config);
        Self::new(config, transport)
    }

    /// Use an explicit transport.
    pub fn new(config: Arc<AxiomConfig>, transport: Arc<dyn Transport>) -> Self {
        let min_level = match config.log_level.as_deref().map(str::parse::<LogLevel>) {
            Some(Ok(level)) => level,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "axiom: invalid log level, using debug");
                LogLevel::Debug
            }
            None => LogLevel::Debug,
        };
        let background = BackgroundTasks::new();

        Self {
            config,
            transport,
            min_level,
            wait_until: Arc::new(background.clone()),
            background,
        }
    }

    /// Hand deferred flushes to the host instead of the built-in tracker.
    pub fn with_wait_until(mut self, wait_until: Arc<dyn WaitUntil>) -> Self {
        self.wait_until = wait_until;
        self
    }

    pub fn config(&self) -> &Arc<AxiomConfig> {
        &self.config
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Built-in tracker of deferred flushes. Empty when `with_wait_until`
    /// replaced it.
    pub fn background(&self) -> &BackgroundTasks {
        &self.background
    }

    /// Fresh request-scoped logger with its own buffer.
    pub fn logger(&self) -> Logger {
        Logger::new(self.transport.clone())
            .with_source(self.config.runtime_source())
            .with_min_level(self.min_level)
            .with_platform(self.config.platform.clone())
    }

    /// Source tag for the logger handed to the handler.
    ///
    /// The `-log` suffix is dropped when the platform forwards logs itself.
    pub fn child_source(&self) -> String {
        let runtime = self.config.runtime_source();
        if self.config.is_vercel_integration() {
            runtime.to_string()
        } else {
            format!("{runtime}-log")
        }
    }

    /// Flush `logger`: deferred on the target platform, awaited elsewhere.
    ///
    /// Failures are reported through `tracing` and never propagate.
    pub async fn flush(&self, logger: &Logger) {
        if self.config.is_vercel {
            let logger = logger.clone();
            self.wait_until.wait_until(
                async move {
                    if let Err(e) = logger.flush().await {
                        tracing::warn!(error = %e, "axiom: deferred flush failed");
                    }
                }
                .boxed(),
            );
        } else if let Err(e) = logger.flush().await {
            tracing::warn!(error = %e, "axiom: flush failed");
        }
    }
}
