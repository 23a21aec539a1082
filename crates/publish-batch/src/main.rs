use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use shared::manifest::{date_label, date_prefix, label_for_prefix, update_manifest};
use shared::{LocalObjectStore, ObjectStore, PublishConfig, S3ObjectStore};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "publish-batch")]
#[command(about = "Upload today's image batch and add it to the manifest")]
struct Args {
    /// Batch prefix to publish (defaults to today's UTC date)
    #[arg(short, long)]
    prefix: Option<String>,

    /// Publish into a local directory instead of S3_BUCKET_NAME
    #[arg(long)]
    local_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    shared::logging::init_logging();
    let args = Args::parse();
    let config = PublishConfig::from_env()?;

    let now = Utc::now();
    let (prefix, label) = match args.prefix {
        Some(prefix) => {
            let label = label_for_prefix(&prefix)?;
            (prefix, label)
        }
        None => (date_prefix(now), date_label(now)),
    };
    tracing::info!("Datestamp: {}", prefix);

    let store: Box<dyn ObjectStore> = match args.local_dir {
        Some(dir) => {
            tracing::info!("Publishing to {}", dir.display());
            Box::new(LocalObjectStore::new(dir))
        }
        None => {
            tracing::info!("Publishing to s3://{}", config.bucket);
            Box::new(S3ObjectStore::from_env(config.bucket.clone()).await)
        }
    };
    let images_dir = config.images_base_dir.join(&prefix);

    let uploaded = shared::store::upload_directory(store.as_ref(), &images_dir, &prefix).await?;
    tracing::info!("Uploaded {} files from {}", uploaded, images_dir.display());

    update_manifest(store.as_ref(), &config.manifest_key, &prefix, &label, now).await?;

    Ok(())
}
