use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::store::ObjectStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestItem {
    pub label: String,
    pub prefix: String,
}

/// Index of published batches, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub items: Vec<ManifestItem>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Keys we don't know about are written back untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Batch prefix for a publish date, e.g. `2025-10-18`
pub fn date_prefix(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// Human label for a publish date, e.g. `18 Oct`
pub fn date_label(now: DateTime<Utc>) -> String {
    now.format("%d %b").to_string()
}

/// Label for an explicit batch prefix, so republishing an older batch keeps
/// its own date rather than today's.
pub fn label_for_prefix(prefix: &str) -> Result<String> {
    let date = NaiveDate::parse_from_str(prefix, "%Y-%m-%d")
        .with_context(|| format!("Batch prefix {:?} is not a YYYY-MM-DD date", prefix))?;
    Ok(date.format("%d %b").to_string())
}

impl Manifest {
    /// Puts the batch at the front unless it is already listed, and stamps
    /// `updatedAt` either way.
    pub fn merge(&mut self, prefix: &str, label: &str, now: DateTime<Utc>) {
        if !self.items.iter().any(|item| item.prefix == prefix) {
            self.items.insert(
                0,
                ManifestItem {
                    label: label.to_string(),
                    prefix: prefix.to_string(),
                },
            );
        }
        self.updated_at = Some(now.format("%Y-%m-%dT%H:%M:%SZ").to_string());
    }
}

/// Fetches the manifest, merges the batch in and writes it back.
///
/// A missing or unreadable manifest is logged and left alone; this never
/// creates a new one. Returns the manifest that was written.
pub async fn update_manifest(
    store: &dyn ObjectStore,
    manifest_key: &str,
    prefix: &str,
    label: &str,
    now: DateTime<Utc>,
) -> Result<Option<Manifest>> {
    let mut manifest = match fetch_manifest(store, manifest_key).await {
        Ok(manifest) => manifest,
        Err(e) => {
            tracing::error!("Failed to fetch manifest: {:#}", e);
            return Ok(None);
        }
    };

    manifest.merge(prefix, label, now);

    let body = serde_json::to_vec_pretty(&manifest).context("Failed to serialize manifest")?;
    store
        .put(manifest_key, body, "application/json")
        .await
        .context("Failed to write manifest")?;
    tracing::info!("Manifest {} updated with {}", manifest_key, prefix);

    Ok(Some(manifest))
}

async fn fetch_manifest(store: &dyn ObjectStore, manifest_key: &str) -> Result<Manifest> {
    let bytes = store
        .get(manifest_key)
        .await?
        .with_context(|| format!("Manifest {} does not exist", manifest_key))?;
    serde_json::from_slice(&bytes).context("Manifest is not valid JSON")
}
