//! Configuration types for the homework watcher

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable holding the review API token
pub const API_TOKEN_ENV: &str = "PRACTICUM_TOKEN";
/// Environment variable holding the Telegram bot token
pub const TELEGRAM_TOKEN_ENV: &str = "TELEGRAM_TOKEN";
/// Environment variable holding the Telegram chat id
pub const TELEGRAM_CHAT_ID_ENV: &str = "TELEGRAM_CHAT_ID";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
    #[serde(default)]
    pub polling: PollingConfig,
}

/// Review API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            token: String::new(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

/// Notifier configuration with tagged enum for extensibility
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NotifierConfig {
    #[serde(rename = "telegram")]
    Telegram {
        #[serde(default)]
        bot_token: String,
        #[serde(default)]
        chat_id: String,
    },
}

impl Default for NotifierConfig {
    fn default() -> Self {
        NotifierConfig::Telegram {
            bot_token: String::new(),
            chat_id: String::new(),
        }
    }
}

impl NotifierConfig {
    pub fn type_name(&self) -> &str {
        match self {
            NotifierConfig::Telegram { .. } => "telegram",
        }
    }
}

/// Poll loop timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_retry_period")]
    pub retry_period_seconds: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            retry_period_seconds: default_retry_period(),
        }
    }
}

fn default_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_retry_period() -> u64 {
    600
}

impl Config {
    /// Fill empty secrets from the process environment
    pub fn resolve_secrets(&mut self) {
        self.resolve_secrets_with(|name| std::env::var(name).ok());
    }

    /// Fill empty secrets using `lookup` to read variables by name
    pub fn resolve_secrets_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        fill_from(&mut self.api.token, API_TOKEN_ENV, &lookup);
        match &mut self.notifier {
            NotifierConfig::Telegram { bot_token, chat_id } => {
                fill_from(bot_token, TELEGRAM_TOKEN_ENV, &lookup);
                fill_from(chat_id, TELEGRAM_CHAT_ID_ENV, &lookup);
            }
        }
    }

    /// Check that every required secret is present and the timings are sane
    pub fn validate(&self) -> crate::Result<()> {
        let mut missing = Vec::new();
        if self.api.token.trim().is_empty() {
            missing.push(API_TOKEN_ENV);
        }
        match &self.notifier {
            NotifierConfig::Telegram { bot_token, chat_id } => {
                if bot_token.trim().is_empty() {
                    missing.push(TELEGRAM_TOKEN_ENV);
                }
                if chat_id.trim().is_empty() {
                    missing.push(TELEGRAM_CHAT_ID_ENV);
                }
            }
        }
        if !missing.is_empty() {
            return Err(crate::WatcherError::ConfigurationMissing(missing.join(", ")));
        }

        if self.polling.retry_period_seconds == 0 {
            return Err(crate::WatcherError::Config(
                "retry_period_seconds must be greater than zero".to_string(),
            ));
        }
        if self.api.request_timeout_seconds == 0
            || self.api.request_timeout_seconds >= self.polling.retry_period_seconds
        {
            return Err(crate::WatcherError::Config(format!(
                "request_timeout_seconds ({}) must be between 1 and retry_period_seconds ({})",
                self.api.request_timeout_seconds, self.polling.retry_period_seconds
            )));
        }
        Ok(())
    }
}

fn fill_from<F>(slot: &mut String, name: &str, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    if !slot.is_empty() {
        return;
    }
    if let Some(value) = lookup(name) {
        tracing::debug!("Using {} from the environment", name);
        *slot = value;
    }
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    read_config(path).inspect_err(|e| {
        tracing::error!("Cannot load configuration from {:?}: {}", path, e);
    })
}

fn read_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::WatcherError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
