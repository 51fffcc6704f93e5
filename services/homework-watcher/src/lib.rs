//! Homework watcher - review status polling and notification service
//!
//! Polls the homework review API, detects status changes, and reports them
//! (and any failures along the way) to a Telegram chat.

pub mod api_client;
pub mod clock;
pub mod config;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod io;
pub mod notifier;
pub mod telegram;
pub mod validator;
pub mod verdict;

pub use config::{load_config, Config};
pub use error::{Result, WatcherError};

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api_client::{PracticumClient, StatusSource};
use crate::clock::{Clock, SystemClock};
use crate::config::NotifierConfig;
use crate::engine::PollLoop;
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::notifier::Notifier;
use crate::telegram::TelegramNotifier;

/// Assembles a [`Watcher`] from configuration, with optional test seams
pub struct WatcherBuilder {
    config: Config,
    http: Option<Arc<dyn HttpClient>>,
    clock: Option<Arc<dyn Clock>>,
}

impl WatcherBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: None,
            clock: None,
        }
    }

    /// Use `http` instead of a reqwest client for every outbound call
    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Validate the configuration and wire up the poll loop.
    ///
    /// Fails with [`WatcherError::ConfigurationMissing`] before any network
    /// client is created if a required secret is absent.
    pub fn build(self) -> Result<Watcher> {
        self.config.validate().inspect_err(|e| {
            tracing::error!("Cannot start: {}", e);
        })?;

        let http: Arc<dyn HttpClient> = match self.http {
            Some(http) => http,
            None => Arc::new(ReqwestHttpClient::with_timeout(Duration::from_secs(
                self.config.api.request_timeout_seconds,
            ))?),
        };
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let source: Arc<dyn StatusSource> =
            Arc::new(PracticumClient::new(&self.config.api, Arc::clone(&http)));
        let notifier: Arc<dyn Notifier> = match &self.config.notifier {
            NotifierConfig::Telegram { .. } => {
                Arc::new(TelegramNotifier::new(&self.config.notifier, Arc::clone(&http)))
            }
        };

        let poll_loop = PollLoop::new(
            source,
            notifier,
            clock,
            Duration::from_secs(self.config.polling.retry_period_seconds),
        );

        Ok(Watcher {
            poll_loop,
            cancel: CancellationToken::new(),
        })
    }
}

/// A configured watcher, ready to poll
#[derive(Debug)]
pub struct Watcher {
    poll_loop: PollLoop,
    cancel: CancellationToken,
}

impl Watcher {
    pub fn retry_period(&self) -> Duration {
        self.poll_loop.retry_period()
    }

    /// Token that stops the poll loop when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run until Ctrl-C is received
    pub async fn start(self) -> Result<()> {
        let cancel_for_signal = self.cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!("Shutdown signal received"),
                Err(e) => tracing::error!("Failed to listen for ctrl-c: {}", e),
            }
            cancel_for_signal.cancel();
        });

        self.run().await
    }

    /// Run until the cancellation token fires
    pub async fn run(mut self) -> Result<()> {
        tracing::info!("Homework watcher started");
        self.poll_loop.run(self.cancel.clone()).await;
        tracing::info!("Homework watcher stopped");
        Ok(())
    }
}
