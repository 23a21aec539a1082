use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use shared::{GeminiImageClient, ImageConfig, ImageMetadata};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "generate-images")]
#[command(about = "Generate one illustration per saved story and write the batch metadata")]
struct Args {
    /// Stories file to read (overrides HN_STORIES_JSON_PATH)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Batch date used for the output directory (defaults to today)
    #[arg(short, long)]
    date: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    shared::logging::init_logging();
    let args = Args::parse();
    let mut config = ImageConfig::from_env()?;

    if let Some(file) = args.file {
        config.stories_path = file;
    }

    let datestamp = args
        .date
        .unwrap_or_else(|| Local::now().format("%Y-%m-%d").to_string());
    tracing::info!("Generating images for: {}", datestamp);

    let images_dir = config.images_base_dir.join(&datestamp);
    std::fs::create_dir_all(&images_dir)
        .with_context(|| format!("Failed to create {}", images_dir.display()))?;

    tracing::info!("Loading Hacker News stories from {}", config.stories_path.display());
    let stories = shared::load_stories(&config.stories_path)?;

    let client = GeminiImageClient::new(config.api_key.clone(), config.model_name.clone())?;
    let written = shared::imagegen::generate_images_for_stories(
        &client,
        &stories,
        &config.instructions,
        &images_dir,
        config.image_size,
        config.request_pause,
    )
    .await;

    let meta_path = images_dir.join("meta.json");
    tracing::info!("Writing metadata to {}", meta_path.display());
    shared::write_json(&ImageMetadata::from_stories(&stories), &meta_path)?;

    tracing::info!(
        "Done: {}/{} images in {}",
        written.len(),
        stories.stories.len(),
        images_dir.display()
    );

    Ok(())
}
