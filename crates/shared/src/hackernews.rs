use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::extractor::{ExcerptExtractor, MainContentSource};
use crate::models::{Story, StoryList};

pub const HACKER_NEWS_API_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";
pub const HACKER_NEWS_WEB_URL: &str = "https://news.ycombinator.com";

#[derive(Debug, Deserialize)]
struct Item {
    id: Option<u64>,
    #[serde(rename = "type")]
    kind: Option<String>,
    title: Option<String>,
    url: Option<String>,
    text: Option<String>,
}

pub fn build_hacker_news_url(item_id: u64) -> String {
    format!("{}/item?id={}", HACKER_NEWS_WEB_URL, item_id)
}

pub struct HackerNewsClient {
    client: Client,
    base_url: String,
}

impl HackerNewsClient {
    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("StoryPipeline/1.0")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Hacker News API returned error: {} for {}", status, url);
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse Hacker News response from {}", url))
    }

    pub async fn top_story_ids(&self) -> Result<Vec<u64>> {
        let url = format!("{}/topstories.json", self.base_url);
        let ids: Vec<u64> = self.fetch_json(&url).await?;
        tracing::info!("Fetched {} top story IDs", ids.len());
        Ok(ids)
    }

    /// Returns an empty story for deleted items and anything that isn't a story.
    pub async fn fetch_story(&self, story_id: u64) -> Result<Story> {
        let url = format!("{}/item/{}.json", self.base_url, story_id);
        let item: Option<Item> = self.fetch_json(&url).await?;

        let Some(item) = item.filter(|i| i.kind.as_deref() == Some("story")) else {
            return Ok(Story::default());
        };

        let discussion = build_hacker_news_url(story_id);
        Ok(Story {
            id: item.id,
            title: item.title,
            url: Some(
                item.url
                    .filter(|u| !u.is_empty())
                    .unwrap_or_else(|| discussion.clone()),
            ),
            discussion: Some(discussion),
            excerpt: None,
            text: item.text,
        })
    }

    /// Walks `story_ids` in order until `max_count` valid stories are collected.
    pub async fn fetch_stories_by_ids<S: MainContentSource>(
        &self,
        story_ids: &[u64],
        max_count: usize,
        extractor: &ExcerptExtractor<S>,
    ) -> Result<StoryList> {
        tracing::info!("Fetching up to {} stories", max_count);
        let mut story_list = StoryList::default();

        for &story_id in story_ids {
            if story_list.stories.len() >= max_count {
                break;
            }

            let mut story = self.fetch_story(story_id).await?;
            story.excerpt = Some(extractor.extract_excerpt(&story).await);

            if !story.is_valid() {
                tracing::info!("Skipped invalid story {}", story_id);
                continue;
            }

            story_list.stories.push(story);
            tracing::info!("Fetched story {}", story_id);
        }

        tracing::info!("Fetched {} valid stories", story_list.stories.len());
        Ok(story_list)
    }
}
