//! Select and trim an account's recent posts into one prompt-sized block.

use ai_client::truncate_chars;
use chorus_common::NormalizedTweet;

pub const MAX_TWEETS_PER_ACCOUNT: usize = 30;
pub const MAX_CHARS_PER_TWEET: usize = 280;
/// Rough stand-in for a token budget (~4 chars per token).
pub const MAX_TOTAL_CHARS: usize = 30_000;

const ELLIPSIS: &str = "...";
const SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowLimits {
    pub max_tweets: usize,
    pub max_chars_per_tweet: usize,
    pub max_total_chars: usize,
}

impl Default for WindowLimits {
    fn default() -> Self {
        Self {
            max_tweets: MAX_TWEETS_PER_ACCOUNT,
            max_chars_per_tweet: MAX_CHARS_PER_TWEET,
            max_total_chars: MAX_TOTAL_CHARS,
        }
    }
}

/// Build the text block sent for one account.
///
/// `tweets` must already be newest-first. Lengths are counted in characters.
/// The post that pushes the running total past `max_total_chars` is still
/// included; accumulation stops after it.
pub fn prepare_account_text(tweets: &[NormalizedTweet], limits: &WindowLimits) -> String {
    let mut texts: Vec<String> = Vec::new();
    let mut total_chars = 0usize;

    for tweet in tweets.iter().take(limits.max_tweets) {
        let text = tweet.text.trim();
        if text.is_empty() {
            continue;
        }

        let truncated = truncate_chars(text, limits.max_chars_per_tweet);
        let text = if truncated.len() < text.len() {
            format!("{truncated}{ELLIPSIS}")
        } else {
            text.to_string()
        };

        total_chars += text.chars().count();
        texts.push(text);

        if total_chars > limits.max_total_chars {
            break;
        }
    }

    texts.join(SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tweets(texts: &[&str]) -> Vec<NormalizedTweet> {
        texts
            .iter()
            .map(|t| NormalizedTweet {
                text: t.to_string(),
                ..NormalizedTweet::default()
            })
            .collect()
    }

    #[test]
    fn joins_with_blank_line_and_skips_empty() {
        let out = prepare_account_text(
            &tweets(&["first", "   ", "", " second "]),
            &WindowLimits::default(),
        );
        assert_eq!(out, "first\n\nsecond");
    }

    #[test]
    fn long_post_is_truncated_with_ellipsis() {
        let long = "a".repeat(300);
        let out = prepare_account_text(&tweets(&[&long]), &WindowLimits::default());
        assert_eq!(out.chars().count(), MAX_CHARS_PER_TWEET + 3);
        assert!(out.ends_with("..."));
        assert!(out.starts_with(&"a".repeat(MAX_CHARS_PER_TWEET)));
    }

    #[test]
    fn post_at_exact_limit_is_untouched() {
        let exact = "b".repeat(MAX_CHARS_PER_TWEET);
        let out = prepare_account_text(&tweets(&[&exact]), &WindowLimits::default());
        assert_eq!(out, exact);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let arabic = "ب".repeat(300);
        let out = prepare_account_text(&tweets(&[&arabic]), &WindowLimits::default());
        assert_eq!(out.chars().count(), MAX_CHARS_PER_TWEET + 3);
    }

    #[test]
    fn takes_at_most_max_tweets() {
        let many: Vec<String> = (0..40).map(|i| format!("t{i}")).collect();
        let refs: Vec<&str> = many.iter().map(String::as_str).collect();
        let out = prepare_account_text(&tweets(&refs), &WindowLimits::default());
        assert_eq!(out.split(SEPARATOR).count(), MAX_TWEETS_PER_ACCOUNT);
        assert!(out.ends_with("t29"));
    }

    #[test]
    fn empty_posts_still_count_toward_max_tweets() {
        let limits = WindowLimits {
            max_tweets: 2,
            ..WindowLimits::default()
        };
        let out = prepare_account_text(&tweets(&["", "one", "two"]), &limits);
        assert_eq!(out, "one");
    }

    #[test]
    fn budget_breaks_after_the_crossing_post() {
        let limits = WindowLimits {
            max_tweets: 10,
            max_chars_per_tweet: 100,
            max_total_chars: 10,
        };
        let out = prepare_account_text(&tweets(&["aaaaaa", "bbbbbb", "cccccc"]), &limits);
        // 6 chars, then 12 > 10: "bbbbbb" is kept, "cccccc" is not.
        assert_eq!(out, "aaaaaa\n\nbbbbbb");
    }

    #[test]
    fn no_text_yields_empty_block() {
        let out = prepare_account_text(&tweets(&["", "  "]), &WindowLimits::default());
        assert!(out.is_empty());
    }
}
