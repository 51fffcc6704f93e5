//! Error types for the homework watcher

/// Errors that can occur in the homework watcher
#[derive(Debug, thiserror::Error)]
pub enum WatcherError {
    #[error("Missing required configuration: {0}")]
    ConfigurationMissing(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Remote API unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Unexpected response schema: {0}")]
    Schema(String),

    #[error("Missing field in homework record: {0}")]
    MissingField(String),

    #[error("Undocumented homework status: {0}")]
    UnknownStatus(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Notification delivery failed: {0}")]
    Notify(String),
}

impl WatcherError {
    /// Whether the poll loop reports this failure and carries on.
    ///
    /// Only configuration problems are fatal, and those are raised before
    /// the loop is entered.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            WatcherError::ConfigurationMissing(_) | WatcherError::Config(_) | WatcherError::Io(_)
        )
    }
}

/// Result type alias for watcher operations
pub type Result<T> = std::result::Result<T, WatcherError>;
