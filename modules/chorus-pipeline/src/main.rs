use std::path::{Path, PathBuf};

use ai_client::OpenAi;
use anyhow::{Context, Result};
use apify_client::{ApifyClient, Tweet};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use chorus_common::{Config, NormalizedTweet, Roster};
use chorus_pipeline::output::{read_json, write_csv, write_json};
use chorus_pipeline::scrape::scrape_roster;
use chorus_pipeline::window::{MAX_CHARS_PER_TWEET, MAX_TOTAL_CHARS, MAX_TWEETS_PER_ACCOUNT};
use chorus_pipeline::{normalize_tweets, Summarizer, WindowLimits};

#[derive(Parser)]
#[command(name = "chorus")]
#[command(about = "Scrape, normalize and summarize posts from a roster of X accounts")]
#[command(version)]
struct Cli {
    /// Directory holding pipeline inputs and outputs
    #[arg(long, global = true, env = "CHORUS_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// JSON roster (`[{handle, group, label}]`) replacing the built-in accounts
    #[arg(long, global = true, env = "CHORUS_ROSTER")]
    roster: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Apify tweet scraper for every roster handle
    Scrape {
        /// Raw dataset output [default: <data-dir>/apify_raw_tweets.json]
        #[arg(long)]
        output: Option<PathBuf>,

        /// Maximum tweets to fetch across all handles
        #[arg(long, default_value_t = 1000)]
        max_items: u32,
    },

    /// Flatten raw scraper output into the CSV and JSON dataset
    Normalize {
        /// Raw scraper JSON [default: <data-dir>/apify_raw_tweets.json]
        #[arg(long)]
        input: Option<PathBuf>,

        /// [default: <data-dir>/all_tweets.csv]
        #[arg(long)]
        csv: Option<PathBuf>,

        /// [default: <data-dir>/all_tweets.json]
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Extract topics and narratives per account
    Summarize(SummarizeArgs),
}

#[derive(Args)]
struct SummarizeArgs {
    /// Normalized dataset [default: <data-dir>/all_tweets.json]
    #[arg(long)]
    input: Option<PathBuf>,

    /// [default: <data-dir>/topics_and_narratives.json]
    #[arg(long)]
    output: Option<PathBuf>,

    /// Accounts analyzed concurrently
    #[arg(long, default_value_t = 1)]
    concurrency: usize,

    #[arg(long, default_value_t = MAX_TWEETS_PER_ACCOUNT)]
    max_tweets: usize,

    #[arg(long, default_value_t = MAX_CHARS_PER_TWEET)]
    max_chars_per_tweet: usize,

    #[arg(long, default_value_t = MAX_TOTAL_CHARS)]
    max_total_chars: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter()?)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    config.log_redacted();

    let roster = match &cli.roster {
        Some(path) => Roster::load(path)?,
        None => Roster::builtin(),
    };
    info!(accounts = roster.len(), "Roster loaded");

    let data = cli.data_dir.as_path();
    match cli.command {
        Commands::Scrape { output, max_items } => {
            let output = output.unwrap_or_else(|| data.join("apify_raw_tweets.json"));
            scrape(&config, &roster, &output, max_items).await
        }
        Commands::Normalize { input, csv, json } => {
            let input = input.unwrap_or_else(|| data.join("apify_raw_tweets.json"));
            let csv = csv.unwrap_or_else(|| data.join("all_tweets.csv"));
            let json = json.unwrap_or_else(|| data.join("all_tweets.json"));
            normalize(&roster, &input, &csv, &json)
        }
        Commands::Summarize(args) => summarize(&config, data, args).await,
    }
}

/// `RUST_LOG` plus info-level defaults for the pipeline and scraper crates.
fn log_filter() -> Result<EnvFilter> {
    Ok(EnvFilter::from_default_env()
        .add_directive("chorus=info".parse()?)
        .add_directive("apify_client=info".parse()?))
}

async fn scrape(config: &Config, roster: &Roster, output: &Path, max_items: u32) -> Result<()> {
    let client = ApifyClient::new(config.require_apify_key()?.to_string());

    let items = scrape_roster(&client, roster, max_items).await?;
    write_json(output, &items)
        .with_context(|| format!("writing {}", output.display()))?;

    info!(count = items.len(), path = %output.display(), "Saved raw tweets");
    Ok(())
}

fn normalize(roster: &Roster, input: &Path, csv: &Path, json: &Path) -> Result<()> {
    let raw: Vec<Tweet> = read_json(input)?;
    info!(count = raw.len(), path = %input.display(), "Loaded raw tweets");

    let tweets = normalize_tweets(&raw, roster);
    info!(count = tweets.len(), "Normalized tweets");

    write_csv(csv, &tweets).with_context(|| format!("writing {}", csv.display()))?;
    info!(path = %csv.display(), "Saved CSV");

    write_json(json, &tweets).with_context(|| format!("writing {}", json.display()))?;
    info!(path = %json.display(), "Saved JSON");

    Ok(())
}

async fn summarize(config: &Config, data: &Path, args: SummarizeArgs) -> Result<()> {
    let input = args.input.unwrap_or_else(|| data.join("all_tweets.json"));
    let output = args
        .output
        .unwrap_or_else(|| data.join("topics_and_narratives.json"));

    let mut model = OpenAi::new(config.require_openai_key()?, &config.openai_model);
    if let Some(ref url) = config.openai_base_url {
        model = model.with_base_url(url);
    }

    let tweets: Vec<NormalizedTweet> = read_json(&input)?;
    info!(count = tweets.len(), path = %input.display(), "Loaded tweets");

    let summarizer = Summarizer::new(model)
        .with_limits(WindowLimits {
            max_tweets: args.max_tweets,
            max_chars_per_tweet: args.max_chars_per_tweet,
            max_total_chars: args.max_total_chars,
        })
        .with_concurrency(args.concurrency);

    let report = summarizer.run(&tweets).await;

    write_json(&output, &report.summaries)
        .with_context(|| format!("writing {}", output.display()))?;
    info!(path = %output.display(), "Results written");
    info!(
        skipped = report.failures.len(),
        "Analysis complete: {report}"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scraper_progress_is_logged_by_default() {
        let filter = log_filter().unwrap().to_string();
        assert!(filter.contains("chorus=info"));
        assert!(filter.contains("apify_client=info"));
    }
}
