// Public modules
pub mod config;
pub mod extractor;
pub mod hackernews;
pub mod imagegen;
pub mod io;
pub mod logging;
pub mod manifest;
pub mod models;
pub mod readability;
pub mod store;

// Re-export commonly used types
pub use config::{FetchConfig, ImageConfig, PublishConfig};
pub use extractor::{ExcerptExtractor, ExtractError, MainContentSource, WebContentSource};
pub use hackernews::HackerNewsClient;
pub use imagegen::{GeminiImageClient, GeneratedImage, ImageSize};
pub use io::{load_stories, save_stories, write_json};
pub use manifest::{Manifest, ManifestItem};
pub use models::{ImageMetadata, Story, StoryList};
pub use store::{LocalObjectStore, ObjectStore, S3ObjectStore};
