use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use scraper::{Html, Node};
use url::Url;

use crate::models::Story;
use crate::readability;

/// Default excerpt length, in characters
pub const EXCERPT_CHARS: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP error: {0}")]
    Status(StatusCode),
    #[error("empty response body")]
    EmptyBody,
    #[error("no main content found")]
    NoContent,
}

/// Something that can turn a URL into the plain text of its main content.
#[async_trait]
pub trait MainContentSource: Send + Sync {
    async fn extract_main_content(&self, url: &str) -> Result<String, ExtractError>;
}

/// Fetches pages over HTTP and runs readability extraction on them.
pub struct WebContentSource {
    client: Client,
}

impl WebContentSource {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (compatible; StoryPipeline/1.0)")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl MainContentSource for WebContentSource {
    async fn extract_main_content(&self, url: &str) -> Result<String, ExtractError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ExtractError::Status(status));
        }

        let html = response.text().await?;
        if html.trim().is_empty() {
            return Err(ExtractError::EmptyBody);
        }

        readability::extract_main_text(&html, Some(url)).ok_or(ExtractError::NoContent)
    }
}

/// Produces the excerpt for a story, either from its own body or from the
/// page it links to. Never fails: an empty string means "no excerpt".
pub struct ExcerptExtractor<S = WebContentSource> {
    source: S,
    limit: usize,
}

impl ExcerptExtractor<WebContentSource> {
    pub fn new(limit: usize) -> Result<Self> {
        Ok(Self::with_source(WebContentSource::new()?, limit))
    }
}

impl<S: MainContentSource> ExcerptExtractor<S> {
    pub fn with_source(source: S, limit: usize) -> Self {
        Self { source, limit }
    }

    pub async fn extract_excerpt(&self, story: &Story) -> String {
        match story.text.as_deref() {
            Some(html) if !html.is_empty() => {
                tracing::info!(story_id = ?story.id, "Cleaning HTML for story");
                trim_excerpt(&clean_html_to_text(html), self.limit)
            }
            _ => {
                tracing::info!(story_id = ?story.id, url = ?story.url, "Fetching external excerpt");
                match story.url.as_deref() {
                    Some(url) if Url::parse(url).is_ok() => self.external_excerpt(url).await,
                    _ => String::new(),
                }
            }
        }
    }

    async fn external_excerpt(&self, url: &str) -> String {
        match self.source.extract_main_content(url).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to fetch or extract excerpt from {}: {}", url, e);
                String::new()
            }
        }
    }
}

/// Drops `<script>`/`<style>` content and returns the visible text of an HTML
/// fragment on a single whitespace-normalised line.
pub fn clean_html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);

    let pieces: Vec<&str> = fragment
        .tree
        .root()
        .descendants()
        .filter(|node| {
            !node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| matches!(el.name(), "script" | "style"))
            })
        })
        .filter_map(|node| match node.value() {
            Node::Text(text) => Some(&**text),
            _ => None,
        })
        .collect();

    collapse_whitespace(&pieces.join("\n"))
}

/// Collapses every whitespace run to a single space and strips both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cuts `text` to at most `limit` characters, preferring the last ". " that
/// fits entirely inside the limit. The period is kept. A boundary at index 0
/// does not count.
pub fn trim_excerpt(text: &str, limit: usize) -> String {
    let text = collapse_whitespace(text);
    if text.chars().count() <= limit {
        return text;
    }

    // Byte offset of the first character past the limit
    let end = text
        .char_indices()
        .nth(limit)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let window = &text[..end];

    let cut = match window.rfind(". ") {
        Some(boundary) if boundary > 0 => boundary + 1,
        _ => end,
    };

    text[..cut].trim().to_string()
}
