//! BDD test world for the homework watcher

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use cucumber::World;
use homework_watcher::clock::Clock;
use homework_watcher::engine::{PollLoop, TickOutcome};
use homework_watcher::io::{HttpClient, HttpResponse};
use homework_watcher::notifier::Notifier;
use homework_watcher::validator::ValidatedResponse;
use homework_watcher::{Config, Watcher, WatcherError};

/// A scripted reply from the fake review API
#[derive(Debug, Clone)]
pub enum ApiReply {
    Body(String),
    Status(u16, String),
    Unreachable,
}

/// In-memory stand-in for both the review API and the Telegram API
#[derive(Debug, Default)]
pub struct FakeServices {
    replies: Mutex<VecDeque<ApiReply>>,
    api_calls: AtomicUsize,
    chat: Mutex<Vec<String>>,
    chat_rejects: AtomicBool,
}

impl FakeServices {
    pub fn script(&self, reply: ApiReply, times: usize) {
        let mut replies = self.replies.lock().unwrap();
        for _ in 0..times {
            replies.push_back(reply.clone());
        }
    }

    pub fn api_calls(&self) -> usize {
        self.api_calls.load(Ordering::SeqCst)
    }

    pub fn chat(&self) -> Vec<String> {
        self.chat.lock().unwrap().clone()
    }

    pub fn set_chat_rejects(&self, rejects: bool) {
        self.chat_rejects.store(rejects, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl HttpClient for FakeServices {
    async fn get(
        &self,
        _url: &str,
        _headers: &[(&str, &str)],
        _query: &[(&str, &str)],
    ) -> homework_watcher::Result<HttpResponse> {
        self.api_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| ApiReply::Body(r#"{"homeworks": [], "current_date": 0}"#.to_string()));

        match reply {
            ApiReply::Body(body) => Ok(HttpResponse {
                status: 200,
                reason: "OK".to_string(),
                body,
            }),
            ApiReply::Status(status, reason) => Ok(HttpResponse {
                status,
                reason,
                body: String::new(),
            }),
            ApiReply::Unreachable => Err(WatcherError::NetworkFailure(
                "connection refused".to_string(),
            )),
        }
    }

    async fn post_json(
        &self,
        _url: &str,
        body: &serde_json::Value,
    ) -> homework_watcher::Result<HttpResponse> {
        if self.chat_rejects.load(Ordering::SeqCst) {
            return Ok(HttpResponse {
                status: 403,
                reason: "Forbidden".to_string(),
                body: r#"{"ok":false,"description":"Forbidden: bot was blocked by the user"}"#
                    .to_string(),
            });
        }
        let text = body["text"].as_str().unwrap_or_default().to_string();
        self.chat.lock().unwrap().push(text);
        Ok(HttpResponse {
            status: 200,
            reason: "OK".to_string(),
            body: r#"{"ok":true}"#.to_string(),
        })
    }
}

/// A clock frozen at a single instant
#[derive(Debug)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default, World)]
pub struct WatcherWorld {
    // Validation and extraction
    pub response: Option<serde_json::Value>,
    pub validation_result: Option<homework_watcher::Result<ValidatedResponse>>,
    pub homework: Option<serde_json::Value>,
    pub extraction_result: Option<homework_watcher::Result<String>>,

    // Notifier testing
    pub notifier: Option<Box<dyn Notifier>>,
    pub notification_result: Option<homework_watcher::Result<()>>,

    // Poll loop testing
    pub services: Arc<FakeServices>,
    pub poll_loop: Option<PollLoop>,
    pub outcomes: Vec<TickOutcome>,

    // Lifecycle testing
    pub config: Option<Config>,
    pub watcher: Option<Watcher>,
    pub build_error: Option<WatcherError>,
}
