use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::models::StoryList;

/// Write any serializable value as pretty JSON, creating parent directories.
pub fn write_json<T: Serialize>(value: &T, filepath: &Path) -> Result<()> {
    if let Some(parent) = filepath.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;

    fs::write(filepath, json)
        .with_context(|| format!("Failed to write {}", filepath.display()))?;

    Ok(())
}

/// Save the story list to a JSON file
pub fn save_stories(stories: &StoryList, filepath: &Path) -> Result<()> {
    write_json(stories, filepath)
}

/// Load the story list from a JSON file
pub fn load_stories(filepath: &Path) -> Result<StoryList> {
    if !filepath.exists() {
        anyhow::bail!("Stories file not found: {}", filepath.display());
    }

    let content = fs::read_to_string(filepath)
        .with_context(|| format!("Failed to read stories file: {}", filepath.display()))?;

    let data: StoryList = serde_json::from_str(&content).with_context(|| {
        format!(
            "Failed to parse stories JSON from {}. Regenerate it with fetch-stories.",
            filepath.display()
        )
    })?;

    Ok(data)
}
