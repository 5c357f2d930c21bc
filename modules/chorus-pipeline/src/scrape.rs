use apify_client::ApifyClient;
use chorus_common::{PipelineError, Roster};

/// Scrape recent tweets for every roster handle.
///
/// Dataset items are returned untouched so the stored file keeps the
/// scraper's own shape for the normalizer.
pub async fn scrape_roster(
    client: &ApifyClient,
    roster: &Roster,
    max_items: u32,
) -> Result<Vec<serde_json::Value>, PipelineError> {
    let handles = roster.handles();
    tracing::info!(accounts = handles.len(), max_items, "Scraping roster");

    client
        .scrape_tweets(&handles, max_items)
        .await
        .map_err(|e| PipelineError::Scrape(e.to_string()))
}
