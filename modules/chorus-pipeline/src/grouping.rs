//! Partition normalized tweets by account and order them newest-first.

use std::cmp::Reverse;
use std::collections::HashMap;

use chorus_common::NormalizedTweet;
use chrono::{DateTime, NaiveDateTime, Utc};

/// Twitter's legacy format, e.g. "Thu Apr 29 17:09:14 +0000 2021".
const TWITTER_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";
const ISO_OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";
/// No offset; read as UTC.
const NAIVE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a scraper timestamp. Never fails: anything unrecognized maps to the
/// Unix epoch so it sorts after every real post.
pub fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    let raw = raw.trim();

    DateTime::parse_from_str(raw, TWITTER_FORMAT)
        .or_else(|_| DateTime::parse_from_str(raw, ISO_OFFSET_FORMAT))
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, NAIVE_FORMAT).map(|dt| dt.and_utc()))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// All posts for one account, most recent first.
#[derive(Debug, Clone)]
pub struct AccountPosts {
    /// Lowercased username; the grouping key.
    pub username: String,
    pub tweets: Vec<NormalizedTweet>,
}

impl AccountPosts {
    /// The newest post, which carries the metadata reported for the account.
    pub fn latest(&self) -> Option<&NormalizedTweet> {
        self.tweets.first()
    }
}

/// Group tweets by case-folded username, in order of first appearance.
///
/// Tweets with an empty username are left out. Each group is sorted by
/// parsed timestamp, newest first; ties keep their input order.
pub fn group_by_account(tweets: &[NormalizedTweet]) -> Vec<AccountPosts> {
    let mut groups: Vec<AccountPosts> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for tweet in tweets {
        let key = tweet.username.to_lowercase();
        if key.is_empty() {
            continue;
        }
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(AccountPosts {
                username: key,
                tweets: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].tweets.push(tweet.clone());
    }

    for group in &mut groups {
        group
            .tweets
            .sort_by_cached_key(|t| Reverse(parse_timestamp(&t.created_at)));
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn tweet(username: &str, created_at: &str, id: &str) -> NormalizedTweet {
        NormalizedTweet {
            id: id.to_string(),
            username: username.to_string(),
            created_at: created_at.to_string(),
            ..NormalizedTweet::default()
        }
    }

    #[test]
    fn parses_twitter_legacy_format() {
        let dt = parse_timestamp("Thu Apr 29 17:09:14 +0000 2021");
        assert_eq!(dt, Utc.with_ymd_and_hms(2021, 4, 29, 17, 9, 14).unwrap());
    }

    #[test]
    fn parses_iso_with_offset() {
        let dt = parse_timestamp("2021-04-29T19:09:14+0200");
        assert_eq!(dt, Utc.with_ymd_and_hms(2021, 4, 29, 17, 9, 14).unwrap());

        let dt = parse_timestamp("2021-04-29T17:09:14.000Z");
        assert_eq!(dt, Utc.with_ymd_and_hms(2021, 4, 29, 17, 9, 14).unwrap());
    }

    #[test]
    fn parses_naive_as_utc() {
        let dt = parse_timestamp("2021-04-29 17:09:14");
        assert_eq!(dt, Utc.with_ymd_and_hms(2021, 4, 29, 17, 9, 14).unwrap());
    }

    #[test]
    fn garbage_maps_to_epoch() {
        assert_eq!(parse_timestamp("yesterday-ish"), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(parse_timestamp(""), DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn grouping_is_case_insensitive() {
        let tweets = vec![
            tweet("Foo", "2021-01-01 00:00:00", "1"),
            tweet("bar", "2021-01-01 00:00:00", "2"),
            tweet("foo", "2021-01-02 00:00:00", "3"),
        ];
        let groups = group_by_account(&tweets);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].username, "foo");
        assert_eq!(groups[0].tweets.len(), 2);
        assert_eq!(groups[1].username, "bar");
    }

    #[test]
    fn empty_usernames_are_not_grouped() {
        let tweets = vec![tweet("", "", "1"), tweet("foo", "", "2")];
        let groups = group_by_account(&tweets);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].username, "foo");
    }

    #[test]
    fn mixed_formats_sort_newest_first_with_unparseable_last() {
        let tweets = vec![
            tweet("foo", "not a date", "bad"),
            tweet("foo", "2021-04-29 17:09:14", "naive"),
            tweet("foo", "Fri Apr 30 08:00:00 +0000 2021", "legacy"),
            tweet("foo", "2021-05-01T00:00:00+0000", "iso"),
        ];
        let groups = group_by_account(&tweets);
        let ids: Vec<_> = groups[0].tweets.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["iso", "legacy", "naive", "bad"]);
        assert_eq!(groups[0].latest().unwrap().id, "iso");
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let tweets = vec![
            tweet("foo", "bad", "first"),
            tweet("foo", "also bad", "second"),
        ];
        let groups = group_by_account(&tweets);
        let ids: Vec<_> = groups[0].tweets.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }
}
