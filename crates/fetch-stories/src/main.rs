use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use shared::{ExcerptExtractor, FetchConfig, HackerNewsClient};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fetch-stories")]
#[command(about = "Fetch top Hacker News stories with excerpts and save them as JSON")]
struct Args {
    /// Number of valid stories to keep (overrides TOP_STORY_COUNT)
    #[arg(short, long)]
    count: Option<usize>,

    /// Output file (overrides STORIES_FILE)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    shared::logging::init_logging();
    let args = Args::parse();
    let mut config = FetchConfig::from_env()?;

    if let Some(count) = args.count {
        config.top_story_count = count;
    }
    if let Some(output) = args.output {
        config.stories_path = output;
    }

    let datestamp = Local::now().format("%Y-%m-%d");
    tracing::info!("Starting fetch of Hacker News top stories on {}", datestamp);

    let client = HackerNewsClient::new(config.api_base_url.clone(), config.fetch_timeout)?;
    let extractor = ExcerptExtractor::new(config.excerpt_chars)?;

    let story_ids = client
        .top_story_ids()
        .await
        .context("Failed to fetch top story IDs")?;

    let stories = client
        .fetch_stories_by_ids(&story_ids, config.top_story_count, &extractor)
        .await
        .context("Failed to fetch stories")?;

    shared::save_stories(&stories, &config.stories_path)?;

    tracing::info!(
        "Finished fetching and saving {} top stories to {}",
        stories.stories.len(),
        config.stories_path.display()
    );

    Ok(())
}
