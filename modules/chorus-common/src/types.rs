use serde::{Deserialize, Serialize};

pub const UNKNOWN: &str = "Unknown";

/// Roster metadata attached to a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMeta {
    pub group: String,
    pub label: String,
}

impl AccountMeta {
    pub fn unknown() -> Self {
        Self {
            group: UNKNOWN.to_string(),
            label: UNKNOWN.to_string(),
        }
    }
}

/// One scraped post flattened into the dataset schema.
///
/// Field order is the column order of the CSV output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizedTweet {
    pub id: String,
    pub url: String,
    pub username: String,
    pub display_name: String,
    pub group: String,
    pub label: String,
    pub text: String,
    pub created_at: String,
    pub likes: i64,
    pub retweets: i64,
    pub replies: i64,
    pub quotes: i64,
    pub virality_score: i64,
}

/// Topics and narratives extracted for one account, after shape repair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicAnalysis {
    pub top_topics: Vec<String>,
    pub narratives: Vec<String>,
}

/// Per-account entry in the summarizer output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub username: String,
    pub display_name: String,
    pub group: String,
    pub top_topics: Vec<String>,
    pub narratives: Vec<String>,
}

impl AccountSummary {
    pub fn new(
        username: impl Into<String>,
        display_name: impl Into<String>,
        group: impl Into<String>,
        analysis: TopicAnalysis,
    ) -> Self {
        Self {
            username: username.into(),
            display_name: display_name.into(),
            group: group.into(),
            top_topics: analysis.top_topics,
            narratives: analysis.narratives,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_tweet_reads_partial_records() {
        let tweet: NormalizedTweet =
            serde_json::from_str(r#"{"username": "AyOdeh", "likes": 3}"#).unwrap();
        assert_eq!(tweet.username, "AyOdeh");
        assert_eq!(tweet.likes, 3);
        assert_eq!(tweet.text, "");
        assert_eq!(tweet.virality_score, 0);
    }
}
