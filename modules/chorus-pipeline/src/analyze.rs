//! Per-account topic/narrative extraction against a chat model.
//!
//! One request per account. A failure for one account (no text, service
//! error, unusable response) is returned as an [`AnalysisError`] and never
//! stops the batch.

use std::collections::BTreeMap;

use ai_client::{strip_code_blocks, Agent, OpenAi, PromptBuilder};
use async_trait::async_trait;
use chorus_common::{AccountSummary, NormalizedTweet, TopicAnalysis};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::grouping::{group_by_account, AccountPosts};
use crate::window::{prepare_account_text, WindowLimits};

pub const TOPIC_COUNT: usize = 5;
pub const MAX_NARRATIVES: usize = 3;
pub const MIN_NARRATIVES: usize = 2;

/// Sampling temperature for analysis requests.
pub const TEMPERATURE: f32 = 0.3;

pub const SYSTEM_PROMPT: &str = "You are a political data analyst. Your task is to analyze public social media posts in a neutral, descriptive, and non-judgmental way. Do not express opinions, emotions, praise, or criticism. Do not infer sentiment or intent. Focus only on identifying recurring topics and messages based strictly on the provided content.";

const USER_PROMPT_TEMPLATE: &str = r#"Analyze the following tweets from a single account. Identify:

1. The top 5 main topics discussed across these tweets as short noun phrases (2-5 words each, describing what is discussed rather than opinions).
2. 2-3 recurring narratives that summarize repeated messages or themes in neutral, analytical language.

Tweets:
{tweets}

Return your response in strict JSON format only, with exactly two keys:
- "top_topics": an array of exactly five strings
- "narratives": an array of two or three strings

Do not include any additional text, explanations, or formatting outside the JSON."#;

pub fn user_prompt(account_text: &str) -> String {
    USER_PROMPT_TEMPLATE.replace("{tweets}", account_text)
}

// =============================================================================
// Model seam
// =============================================================================

/// A chat model that answers a system + user prompt with a JSON object string.
#[async_trait]
pub trait SummaryModel: Send + Sync {
    async fn complete_json(&self, system: &str, user: &str) -> anyhow::Result<String>;
}

#[async_trait]
impl SummaryModel for OpenAi {
    async fn complete_json(&self, system: &str, user: &str) -> anyhow::Result<String> {
        self.prompt(user)
            .preamble(system)
            .temperature(TEMPERATURE)
            .json_object()
            .send()
            .await
    }
}

// =============================================================================
// Response validation
// =============================================================================

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no tweet text available")]
    EmptyContent,

    #[error("service error: {0}")]
    Service(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    top_topics: Vec<String>,
    narratives: Vec<String>,
}

/// Parse a model reply. Both keys must be present and hold string arrays;
/// lengths are repaired afterwards, not validated here.
pub fn parse_response(raw: &str) -> Result<TopicAnalysis, AnalysisError> {
    let body = strip_code_blocks(raw);
    if body.is_empty() {
        return Err(AnalysisError::MalformedResponse("empty response".to_string()));
    }

    let parsed: RawAnalysis = serde_json::from_str(body)
        .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;

    Ok(TopicAnalysis {
        top_topics: parsed.top_topics,
        narratives: parsed.narratives,
    })
}

/// Force exactly [`TOPIC_COUNT`] topics: pad with empty strings or truncate.
pub fn repair_topics(mut topics: Vec<String>) -> Vec<String> {
    topics.resize(TOPIC_COUNT, String::new());
    topics
}

/// Cap narratives at [`MAX_NARRATIVES`]. An empty list becomes a single
/// empty placeholder; a single narrative is kept as-is.
pub fn repair_narratives(mut narratives: Vec<String>) -> Vec<String> {
    if narratives.is_empty() {
        return vec![String::new()];
    }
    narratives.truncate(MAX_NARRATIVES);
    narratives
}

/// Run one account through the model and return a shape-repaired analysis.
pub async fn analyze_account<M: SummaryModel + ?Sized>(
    model: &M,
    username: &str,
    account_text: &str,
) -> Result<TopicAnalysis, AnalysisError> {
    if account_text.trim().is_empty() {
        return Err(AnalysisError::EmptyContent);
    }

    let reply = model
        .complete_json(SYSTEM_PROMPT, &user_prompt(account_text))
        .await
        .map_err(|e| AnalysisError::Service(e.to_string()))?;

    let analysis = parse_response(&reply)?;

    if analysis.top_topics.len() != TOPIC_COUNT {
        warn!(
            username,
            got = analysis.top_topics.len(),
            "Expected {TOPIC_COUNT} topics, repairing"
        );
    }
    if analysis.narratives.len() < MIN_NARRATIVES || analysis.narratives.len() > MAX_NARRATIVES {
        warn!(
            username,
            got = analysis.narratives.len(),
            "Expected {MIN_NARRATIVES}-{MAX_NARRATIVES} narratives, repairing"
        );
    }

    Ok(TopicAnalysis {
        top_topics: repair_topics(analysis.top_topics),
        narratives: repair_narratives(analysis.narratives),
    })
}

// =============================================================================
// Batch driver
// =============================================================================

/// Outcome of a summarizer run.
#[derive(Debug, Default)]
pub struct SummaryReport {
    /// Successful accounts keyed by lowercased username.
    pub summaries: BTreeMap<String, AccountSummary>,
    /// Accounts that were skipped, with the reason.
    pub failures: Vec<(String, AnalysisError)>,
    pub total_accounts: usize,
}

impl std::fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "analyzed {} of {} accounts ({} skipped)",
            self.summaries.len(),
            self.total_accounts,
            self.failures.len()
        )
    }
}

pub struct Summarizer<M> {
    model: M,
    limits: WindowLimits,
    concurrency: usize,
}

impl<M: SummaryModel> Summarizer<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            limits: WindowLimits::default(),
            concurrency: 1,
        }
    }

    pub fn with_limits(mut self, limits: WindowLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Number of accounts in flight at once. 1 (the default) is strictly sequential.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub async fn run(&self, tweets: &[NormalizedTweet]) -> SummaryReport {
        let groups = group_by_account(tweets);
        info!(accounts = groups.len(), "Found unique accounts");

        let mut report = SummaryReport {
            total_accounts: groups.len(),
            ..SummaryReport::default()
        };

        // `buffered` yields results in grouping order regardless of completion order.
        let mut outcomes = std::pin::pin!(stream::iter(groups.iter())
            .map(|group| self.summarize_group(group))
            .buffered(self.concurrency));

        while let Some((username, outcome)) = outcomes.next().await {
            match outcome {
                Ok(summary) => {
                    info!(username = %username, "Completed account");
                    report.summaries.insert(username, summary);
                }
                Err(e) => {
                    warn!(username = %username, error = %e, "Failed to analyze account, skipping");
                    report.failures.push((username, e));
                }
            }
        }

        report
    }

    async fn summarize_group(
        &self,
        group: &AccountPosts,
    ) -> (String, Result<AccountSummary, AnalysisError>) {
        let username = group.username.clone();
        let (display_name, account_group) = match group.latest() {
            Some(t) => (t.display_name.clone(), t.group.clone()),
            None => (username.clone(), chorus_common::UNKNOWN.to_string()),
        };

        info!(
            username = %username,
            display_name = %display_name,
            group = %account_group,
            posts = group.tweets.len(),
            "Analyzing account"
        );

        let text = prepare_account_text(&group.tweets, &self.limits);
        let outcome = analyze_account(&self.model, &username, &text)
            .await
            .map(|analysis| {
                AccountSummary::new(username.clone(), display_name, account_group, analysis)
            });

        (username, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn prompt_embeds_account_text() {
        let prompt = user_prompt("tweet one\n\ntweet two");
        assert!(prompt.contains("Tweets:\ntweet one\n\ntweet two\n"));
        assert!(!prompt.contains("{tweets}"));
    }

    #[test]
    fn short_topic_list_is_padded() {
        let topics = repair_topics(strings(&["a", "b", "c"]));
        assert_eq!(topics, strings(&["a", "b", "c", "", ""]));
    }

    #[test]
    fn long_topic_list_is_truncated() {
        let topics = repair_topics(strings(&["1", "2", "3", "4", "5", "6", "7"]));
        assert_eq!(topics, strings(&["1", "2", "3", "4", "5"]));
    }

    #[test]
    fn long_narrative_list_is_truncated() {
        let narratives = repair_narratives(strings(&["a", "b", "c", "d", "e"]));
        assert_eq!(narratives, strings(&["a", "b", "c"]));
    }

    #[test]
    fn empty_narratives_become_placeholder() {
        assert_eq!(repair_narratives(Vec::new()), strings(&[""]));
    }

    #[test]
    fn single_narrative_is_kept() {
        assert_eq!(repair_narratives(strings(&["only"])), strings(&["only"]));
    }

    #[test]
    fn parse_accepts_fenced_json() {
        let raw = "```json\n{\"top_topics\": [\"a\"], \"narratives\": [\"n\"]}\n```";
        let analysis = parse_response(raw).unwrap();
        assert_eq!(analysis.top_topics, strings(&["a"]));
    }

    #[test]
    fn parse_rejects_missing_key() {
        let err = parse_response(r#"{"top_topics": ["a"]}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[test]
    fn parse_rejects_non_json_and_empty() {
        assert!(matches!(
            parse_response("Here are the topics: ..."),
            Err(AnalysisError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_response("   "),
            Err(AnalysisError::MalformedResponse(_))
        ));
    }

    #[test]
    fn parse_rejects_wrong_value_types() {
        let err = parse_response(r#"{"top_topics": "a, b", "narratives": []}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[test]
    fn report_display_counts_skips() {
        let report = SummaryReport {
            failures: vec![("x".into(), AnalysisError::EmptyContent)],
            total_accounts: 3,
            ..SummaryReport::default()
        };
        assert_eq!(report.to_string(), "analyzed 0 of 3 accounts (1 skipped)");
    }
}
