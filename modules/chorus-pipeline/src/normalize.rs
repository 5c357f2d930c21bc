//! Raw scraper items → flat dataset records.

use apify_client::Tweet;
use chorus_common::{NormalizedTweet, Roster};

/// Pull the account handle out of a tweet permalink.
///
/// `https://x.com/<handle>/status/<id>` splits on `/` into
/// `["https:", "", "x.com", "<handle>", ...]`; the handle is segment 3.
/// Anything shorter yields an empty handle.
pub fn extract_handle(url: &str) -> &str {
    url.split('/').nth(3).unwrap_or("")
}

pub fn normalize_tweet(raw: &Tweet, roster: &Roster) -> NormalizedTweet {
    let url = raw.url.clone().unwrap_or_default();
    let username = extract_handle(&url).to_string();
    let meta = roster.lookup(&username);

    let likes = raw.like_count.unwrap_or(0);
    let retweets = raw.retweet_count.unwrap_or(0);
    let replies = raw.reply_count.unwrap_or(0);
    let quotes = raw.quote_count.unwrap_or(0);

    NormalizedTweet {
        id: raw.id_string(),
        url,
        username,
        display_name: meta.label.clone(),
        group: meta.group,
        label: meta.label,
        text: raw.text.clone().unwrap_or_default(),
        created_at: raw.created_at.clone().unwrap_or_default(),
        likes,
        retweets,
        replies,
        quotes,
        virality_score: likes + retweets + replies + quotes,
    }
}

/// Normalize every record, preserving input order. Never drops a record.
pub fn normalize_tweets(raw: &[Tweet], roster: &Roster) -> Vec<NormalizedTweet> {
    let tweets: Vec<NormalizedTweet> = raw.iter().map(|t| normalize_tweet(t, roster)).collect();

    let unknown = tweets
        .iter()
        .filter(|t| t.group == chorus_common::UNKNOWN)
        .count();
    if unknown > 0 {
        tracing::warn!(unknown, total = tweets.len(), "Tweets from handles not in roster");
    }

    tweets
}
