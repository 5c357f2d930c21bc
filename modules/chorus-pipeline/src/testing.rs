// Test doubles for the summarizer.
//
// MockModel stands in for the chat service: replies are keyed by a marker
// substring of the user prompt (the windowed account text), so each test
// account can get its own canned answer. Calls are recorded.

use std::sync::Mutex;

use anyhow::{bail, Result};
use apify_client::Tweet;
use async_trait::async_trait;

use crate::analyze::SummaryModel;

enum Reply {
    Text(String),
    Error(String),
}

/// Marker-keyed chat model. Returns `Err` when no marker matches and no
/// fallback is set.
pub struct MockModel {
    replies: Vec<(String, Reply)>,
    fallback: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl MockModel {
    pub fn new() -> Self {
        Self {
            replies: Vec::new(),
            fallback: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Reply with `body` when the user prompt contains `marker`.
    pub fn on_text(mut self, marker: &str, body: impl Into<String>) -> Self {
        self.replies.push((marker.to_string(), Reply::Text(body.into())));
        self
    }

    /// Fail the request when the user prompt contains `marker`.
    pub fn fail_on(mut self, marker: &str, message: &str) -> Self {
        self.replies
            .push((marker.to_string(), Reply::Error(message.to_string())));
        self
    }

    /// Reply used when nothing else matches.
    pub fn fallback(mut self, body: impl Into<String>) -> Self {
        self.fallback = Some(body.into());
        self
    }

    /// User prompts received so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SummaryModel for MockModel {
    async fn complete_json(&self, _system: &str, user: &str) -> Result<String> {
        self.calls.lock().unwrap().push(user.to_string());

        for (marker, reply) in &self.replies {
            if user.contains(marker.as_str()) {
                return match reply {
                    Reply::Text(body) => Ok(body.clone()),
                    Reply::Error(message) => bail!("{message}"),
                };
            }
        }

        match &self.fallback {
            Some(body) => Ok(body.clone()),
            None => bail!("MockModel: no reply registered for prompt"),
        }
    }
}

/// A reply with exactly five topics and `narratives` narratives.
pub fn well_formed_reply(narratives: usize) -> String {
    let narratives: Vec<String> = (1..=narratives).map(|i| format!("narrative {i}")).collect();
    serde_json::json!({
        "top_topics": ["topic 1", "topic 2", "topic 3", "topic 4", "topic 5"],
        "narratives": narratives,
    })
    .to_string()
}

/// A raw scraper item for `handle`.
pub fn raw_tweet(handle: &str, id: u64, text: &str, created_at: &str) -> Tweet {
    Tweet {
        id: Some(serde_json::json!(id)),
        url: Some(format!("https://x.com/{handle}/status/{id}")),
        text: Some(text.to_string()),
        created_at: Some(created_at.to_string()),
        like_count: Some(10),
        retweet_count: Some(2),
        reply_count: Some(1),
        quote_count: None,
    }
}
