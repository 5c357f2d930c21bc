use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Input for the apidojo/tweet-scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct TweetScraperInput {
    #[serde(rename = "twitterHandles")]
    pub twitter_handles: Vec<String>,
    #[serde(rename = "maxItems")]
    pub max_items: u32,
    /// "Latest" or "Top".
    pub sort: String,
}

/// A single tweet from the tweet scraper dataset.
///
/// Every field is optional: the scraper omits or nulls fields freely, and
/// `id` comes back as either a string or a number depending on the actor version.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Tweet {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "likeCount", default)]
    pub like_count: Option<i64>,
    #[serde(rename = "retweetCount", default)]
    pub retweet_count: Option<i64>,
    #[serde(rename = "replyCount", default)]
    pub reply_count: Option<i64>,
    #[serde(rename = "quoteCount", default)]
    pub quote_count: Option<i64>,
}

impl Tweet {
    /// The tweet id rendered as a string; empty when absent.
    pub fn id_string(&self) -> String {
        match &self.id {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

/// Wrapper for Apify API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Apify actor run metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    pub id: String,
    pub status: String,
    #[serde(rename = "defaultDatasetId")]
    pub default_dataset_id: String,
    #[serde(rename = "startedAt")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(rename = "finishedAt")]
    pub finished_at: Option<DateTime<Utc>>,
}
