//! Engine: the poll-detect-notify loop

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api_client::StatusSource;
use crate::clock::Clock;
use crate::dedup::{Deduplicator, Track};
use crate::extractor::extract;
use crate::notifier::Notifier;
use crate::validator::validate;

/// Prefix of every error report sent to the chat
pub const ERROR_REPORT_PREFIX: &str = "Malfunction in the program: ";

/// What a single tick ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A new text was delivered on the track
    Sent(Track),
    /// The text matched the last one delivered on the track
    Suppressed(Track),
    /// The API reported no homework since `from_date`
    Idle,
    /// The notifier failed; dedup state was left alone
    DeliveryFailed(Track),
}

/// Polls a status source and forwards changes to a notifier
pub struct PollLoop {
    source: Arc<dyn StatusSource>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    retry_period: Duration,
    dedup: Deduplicator,
}

impl std::fmt::Debug for PollLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollLoop")
            .field("notifier", &self.notifier)
            .field("retry_period", &self.retry_period)
            .field("dedup", &self.dedup)
            .finish()
    }
}

impl PollLoop {
    pub fn new(
        source: Arc<dyn StatusSource>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        retry_period: Duration,
    ) -> Self {
        Self {
            source,
            notifier,
            clock,
            retry_period,
            dedup: Deduplicator::new(),
        }
    }

    pub fn retry_period(&self) -> Duration {
        self.retry_period
    }

    pub fn dedup(&self) -> &Deduplicator {
        &self.dedup
    }

    /// Tick every retry period until `cancel` fires.
    ///
    /// Failures never escape: each one is reported through the notifier and
    /// the loop sleeps before the next tick regardless.
    pub async fn run(&mut self, cancel: CancellationToken) {
        tracing::info!(
            "Polling every {}s via '{}'",
            self.retry_period.as_secs(),
            self.notifier.type_name()
        );

        loop {
            let outcome = self.tick().await;
            tracing::debug!("Tick finished: {:?}", outcome);

            tokio::select! {
                _ = tokio::time::sleep(self.retry_period) => {}
                _ = cancel.cancelled() => {
                    tracing::debug!("Poll loop cancelled");
                    break;
                }
            }
        }
    }

    /// Run one poll: fetch, validate, extract, then notify if needed
    pub async fn tick(&mut self) -> TickOutcome {
        let from_date = self.clock.now_epoch_seconds();
        tracing::debug!("Tick at {}", from_date);

        match self.check(from_date).await {
            Ok(Some(message)) => self.deliver(Track::Status, message).await,
            Ok(None) => {
                tracing::debug!("No homework updates since {}", from_date);
                TickOutcome::Idle
            }
            Err(e) => {
                if !e.is_recoverable() {
                    tracing::warn!("Unexpected fatal error inside the poll loop: {}", e);
                }
                let report = format!("{}{}", ERROR_REPORT_PREFIX, e);
                tracing::error!("{}", report);
                self.deliver(Track::Error, report).await
            }
        }
    }

    async fn check(&self, from_date: u64) -> crate::Result<Option<String>> {
        let response = validate(self.source.fetch(from_date).await?)?;
        tracing::debug!(
            "API current_date {} with {} homework(s)",
            response.current_date(),
            response.homeworks().len()
        );
        match response.homeworks().first() {
            Some(latest) => extract(latest).map(Some),
            None => Ok(None),
        }
    }

    async fn deliver(&mut self, track: Track, text: String) -> TickOutcome {
        if !self.dedup.should_send(track, &text) {
            tracing::debug!("Same {} text as last time, not sending", track);
            return TickOutcome::Suppressed(track);
        }

        match self.notifier.notify(&text).await {
            Ok(()) => {
                tracing::info!("Sent {} notification: {}", track, text);
                self.dedup.mark_sent(track, text);
                TickOutcome::Sent(track)
            }
            Err(e) => {
                tracing::error!(
                    "Sending {} notification via '{}' failed: {}",
                    track,
                    self.notifier.type_name(),
                    e
                );
                TickOutcome::DeliveryFailed(track)
            }
        }
    }
}
