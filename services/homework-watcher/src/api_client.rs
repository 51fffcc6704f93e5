//! Client for the homework review status API

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::io::HttpClient;

/// Anything that can answer "what changed since `from_date`"
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait StatusSource: Send + Sync {
    /// Fetch the raw status response for changes since `from_date`
    async fn fetch(&self, from_date: u64) -> crate::Result<Value>;
}

/// Production client for the review API
pub struct PracticumClient {
    endpoint: String,
    authorization: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl PracticumClient {
    pub fn new(config: &ApiConfig, http: Arc<dyn HttpClient>) -> Self {
        tracing::debug!("Created PracticumClient for {}", config.endpoint);

        Self {
            endpoint: config.endpoint.clone(),
            authorization: format!("OAuth {}", config.token),
            http,
        }
    }
}

#[async_trait]
impl StatusSource for PracticumClient {
    async fn fetch(&self, from_date: u64) -> crate::Result<Value> {
        tracing::debug!("Requesting homework statuses since {}", from_date);

        let from_date = from_date.to_string();
        let response = self
            .http
            .get(
                &self.endpoint,
                &[("Authorization", self.authorization.as_str())],
                &[("from_date", from_date.as_str())],
            )
            .await
            .inspect_err(|e| tracing::error!("Request to the review API failed: {}", e))?;

        if !response.is_success() {
            tracing::error!(
                "Review API unavailable: {} {}",
                response.status,
                response.reason
            );
            return Err(crate::WatcherError::RemoteUnavailable(format!(
                "{} (HTTP {})",
                response.reason, response.status
            )));
        }

        let body: Value = serde_json::from_str(&response.body)
            .inspect_err(|e| tracing::error!("Review API returned invalid JSON: {}", e))?;

        tracing::info!("Homework statuses received");
        Ok(body)
    }
}
