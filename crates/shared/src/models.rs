use serde::{Deserialize, Serialize};

/// Minimum title length (exclusive) for a story to be published
pub const MIN_TITLE_CHARS: usize = 10;
/// Minimum excerpt length (exclusive) for a story to be published
pub const MIN_EXCERPT_CHARS: usize = 50;

/// A single Hacker News story as it moves through the pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub discussion: Option<String>,
    pub excerpt: Option<String>,
    pub text: Option<String>,
}

impl Story {
    /// A story is publishable once it has a meaningful title and excerpt.
    pub fn is_valid(&self) -> bool {
        let title_ok = self
            .title
            .as_deref()
            .is_some_and(|t| t.chars().count() > MIN_TITLE_CHARS);
        let excerpt_ok = self
            .excerpt
            .as_deref()
            .is_some_and(|e| e.chars().count() > MIN_EXCERPT_CHARS);

        title_ok && excerpt_ok
    }

    /// Context block embedded into the image prompt
    pub fn story_context(&self) -> String {
        format!(
            "News article:\nTitle: {}\nExcerpt: {}",
            self.title.as_deref().unwrap_or_default(),
            self.excerpt.as_deref().unwrap_or_default()
        )
    }
}

/// The stories file written by `fetch-stories` and read by `generate-images`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryList {
    #[serde(default)]
    pub stories: Vec<Story>,
}

/// One entry of `meta.json` in a batch directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageMeta {
    pub title: Option<String>,
    pub url: Option<String>,
}

/// Contents of `meta.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub images: Vec<ImageMeta>,
}

impl ImageMetadata {
    pub fn from_stories(stories: &StoryList) -> Self {
        let images = stories
            .stories
            .iter()
            .map(|story| ImageMeta {
                title: story.title.clone(),
                url: story.discussion.clone(),
            })
            .collect();

        Self { images }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(title: &str, excerpt_len: usize) -> Story {
        Story {
            title: Some(title.to_string()),
            excerpt: Some("x".repeat(excerpt_len)),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_story_just_over_thresholds() {
        assert!(story("Eleven char", 51).is_valid());
    }

    #[test]
    fn test_excerpt_of_exactly_fifty_is_invalid() {
        assert!(!story("A long enough title", 50).is_valid());
    }

    #[test]
    fn test_title_of_exactly_ten_is_invalid() {
        assert!(!story("Ten chars!", 200).is_valid());
    }

    #[test]
    fn test_missing_fields_are_invalid() {
        assert!(!Story::default().is_valid());

        let no_excerpt = Story {
            title: Some("A perfectly fine title".to_string()),
            ..Default::default()
        };
        assert!(!no_excerpt.is_valid());
    }

    #[test]
    fn test_lengths_count_characters_not_bytes() {
        // 6 chars, 12 bytes
        let s = story("éééééé", 200);
        assert!(!s.is_valid());
    }

    #[test]
    fn test_story_context_includes_title_and_excerpt() {
        let s = Story {
            title: Some("Rust 2.0 released".to_string()),
            excerpt: Some("Everything changed.".to_string()),
            ..Default::default()
        };
        let ctx = s.story_context();
        assert!(ctx.starts_with("News article:"));
        assert!(ctx.contains("Title: Rust 2.0 released"));
        assert!(ctx.contains("Excerpt: Everything changed."));
    }

    #[test]
    fn test_story_list_json_shape() {
        let list = StoryList {
            stories: vec![Story {
                id: Some(1),
                title: Some("Title".to_string()),
                ..Default::default()
            }],
        };
        let json = serde_json::to_value(&list).unwrap();
        let first = &json["stories"][0];
        for key in ["id", "title", "url", "discussion", "excerpt", "text"] {
            assert!(first.get(key).is_some(), "missing key {}", key);
        }
    }

    #[test]
    fn test_metadata_uses_discussion_link() {
        let list = StoryList {
            stories: vec![Story {
                title: Some("Title".to_string()),
                url: Some("https://example.com".to_string()),
                discussion: Some("https://news.ycombinator.com/item?id=1".to_string()),
                ..Default::default()
            }],
        };
        let meta = ImageMetadata::from_stories(&list);
        assert_eq!(
            meta.images[0].url.as_deref(),
            Some("https://news.ycombinator.com/item?id=1")
        );
    }
}
