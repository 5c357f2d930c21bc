pub mod analyze;
pub mod grouping;
pub mod normalize;
pub mod output;
pub mod scrape;
pub mod window;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use analyze::{analyze_account, AnalysisError, SummaryModel, SummaryReport, Summarizer};
pub use grouping::{group_by_account, parse_timestamp, AccountPosts};
pub use normalize::{extract_handle, normalize_tweet, normalize_tweets};
pub use window::{prepare_account_text, WindowLimits};
