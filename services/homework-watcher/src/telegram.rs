//! Telegram Bot API notifier
//!
//! Delivers plain-text messages with `POST /bot<token>/sendMessage`.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::config::NotifierConfig;
use crate::io::HttpClient;
use crate::notifier::Notifier;

const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Telegram `sendMessage` text limit (characters)
const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

/// Telegram notification sender
pub struct TelegramNotifier {
    bot_token: String,
    chat_id: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramNotifier {
    pub fn new(config: &NotifierConfig, http: Arc<dyn HttpClient>) -> Self {
        let NotifierConfig::Telegram { bot_token, chat_id } = config;

        tracing::debug!("Created TelegramNotifier for chat {}", chat_id);

        Self {
            bot_token: bot_token.clone(),
            chat_id: chat_id.clone(),
            http,
        }
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", TELEGRAM_API_URL, self.bot_token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn type_name(&self) -> &str {
        "telegram"
    }

    async fn notify(&self, message: &str) -> crate::Result<()> {
        let payload = json!({
            "chat_id": self.chat_id,
            "text": truncate_message(message, TELEGRAM_MESSAGE_LIMIT),
        });

        tracing::debug!("Sending Telegram message to chat {}", self.chat_id);

        let response = self
            .http
            .post_json(&self.send_message_url(), &payload)
            .await
            .map_err(|e| crate::WatcherError::Notify(e.to_string()))?;

        if !response.is_success() {
            let description = serde_json::from_str::<serde_json::Value>(&response.body)
                .ok()
                .and_then(|body| body["description"].as_str().map(str::to_string))
                .unwrap_or(response.body);
            return Err(crate::WatcherError::Notify(format!(
                "Telegram API returned status {}: {}",
                response.status, description
            )));
        }

        tracing::info!("Telegram message sent");
        Ok(())
    }
}

/// Cut `text` to at most `limit` characters, marking the cut with an ellipsis
fn truncate_message(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(limit.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}
