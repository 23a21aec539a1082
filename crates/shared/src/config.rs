use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::extractor::EXCERPT_CHARS;
use crate::hackernews::HACKER_NEWS_API_BASE_URL;
use crate::imagegen::ImageSize;

/// Settings for the `fetch-stories` stage
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub api_base_url: String,
    pub fetch_timeout: Duration,
    pub top_story_count: usize,
    pub excerpt_chars: usize,
    pub stories_path: PathBuf,
}

/// Settings for the `generate-images` stage
#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub api_key: String,
    pub model_name: String,
    pub instructions: String,
    pub stories_path: PathBuf,
    pub request_pause: Duration,
    pub image_size: ImageSize,
    pub images_base_dir: PathBuf,
}

/// Settings for the `publish-batch` stage
#[derive(Debug, Clone)]
pub struct PublishConfig {
    pub bucket: String,
    pub images_base_dir: PathBuf,
    pub manifest_key: String,
}

impl FetchConfig {
    pub fn from_env() -> Result<Self> {
        load_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            api_base_url: lookup("HN_API_BASE_URL")
                .unwrap_or_else(|| HACKER_NEWS_API_BASE_URL.to_string()),
            fetch_timeout: Duration::from_secs(parse_or(&lookup, "FETCH_TIMEOUT", 12)?),
            top_story_count: parse_or(&lookup, "TOP_STORY_COUNT", 9)?,
            excerpt_chars: parse_or(&lookup, "EXCERPT_CHARS", EXCERPT_CHARS)?,
            stories_path: lookup("STORIES_FILE")
                .unwrap_or_else(|| "hackernews.json".to_string())
                .into(),
        })
    }
}

impl ImageConfig {
    pub fn from_env() -> Result<Self> {
        load_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = ["MODEL_NAME", "IMAGE_GEN_INSTRUCTIONS", "HN_STORIES_JSON_PATH", "GEMINI_API_KEY"];
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|key| lookup(key).map_or(true, |v| v.is_empty()))
            .collect();
        if !missing.is_empty() {
            anyhow::bail!(
                "Missing required environment variable(s): {}.\n\n\
                Set them in the environment or in ~/.config/story-pipeline/.env",
                missing.join(", ")
            );
        }

        Ok(Self {
            api_key: lookup("GEMINI_API_KEY").unwrap_or_default(),
            model_name: lookup("MODEL_NAME").unwrap_or_default(),
            instructions: lookup("IMAGE_GEN_INSTRUCTIONS").unwrap_or_default(),
            stories_path: lookup("HN_STORIES_JSON_PATH").unwrap_or_default().into(),
            request_pause: Duration::from_secs(parse_or(
                &lookup,
                "WAIT_BETWEEN_REQUESTS_SECONDS",
                2,
            )?),
            image_size: ImageSize {
                width: parse_or(&lookup, "IMAGE_WIDTH", ImageSize::default().width)?,
                height: parse_or(&lookup, "IMAGE_HEIGHT", ImageSize::default().height)?,
            },
            images_base_dir: images_base_dir(&lookup),
        })
    }
}

impl PublishConfig {
    pub fn from_env() -> Result<Self> {
        load_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bucket = lookup("S3_BUCKET_NAME")
            .filter(|v| !v.is_empty())
            .context("S3_BUCKET_NAME environment variable must be set.")?;

        Ok(Self {
            bucket,
            images_base_dir: images_base_dir(&lookup),
            manifest_key: lookup("MANIFEST_S3_KEY").unwrap_or_else(|| "manifest.json".to_string()),
        })
    }
}

fn images_base_dir(lookup: &impl Fn(&str) -> Option<String>) -> PathBuf {
    lookup("IMAGES_BASE_DIR")
        .unwrap_or_else(|| "./imgs".to_string())
        .into()
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

/// Loads the first `.env` found, if any.
pub fn load_dotenv() {
    // Try locations in order of preference:

    // 1. Current directory (for development)
    if dotenvy::dotenv().is_ok() {
        return;
    }

    // 2. ~/.config/story-pipeline/.env (standard config location)
    if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("story-pipeline").join(".env");
        if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
            return;
        }
    }

    // 3. ~/.env (home directory)
    if let Some(home_dir) = dirs::home_dir() {
        let home_path = home_dir.join(".env");
        if home_path.exists() {
            let _ = dotenvy::from_path(&home_path);
        }
    }

    // If none found, that's okay - environment variables might be set system-wide
}
