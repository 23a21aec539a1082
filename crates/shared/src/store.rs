use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Minimal key/value object storage used for publishing batches.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// `Ok(None)` when the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()>;
}

/// An S3 bucket, using the standard AWS credential and region chain.
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ObjectStore {
    pub async fn from_env(bucket: impl Into<String>) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await;
        Self::new(aws_sdk_s3::Client::new(&sdk_config), bucket)
    }

    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    return Ok(None);
                }
                return Err(service_error)
                    .with_context(|| format!("Failed to get s3://{}/{}", self.bucket, key));
            }
        };

        let body = output
            .body
            .collect()
            .await
            .with_context(|| format!("Failed to read s3://{}/{}", self.bucket, key))?;
        Ok(Some(body.into_bytes().to_vec()))
    }

    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .with_context(|| format!("Failed to put s3://{}/{}", self.bucket, key))?;
        tracing::debug!("Stored s3://{}/{} ({})", self.bucket, key, content_type);
        Ok(())
    }
}

/// A bucket backed by a local directory (a mounted bucket or a staging area).
///
/// Keys map to relative paths under the root; content types are not stored.
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        if relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            anyhow::bail!("Invalid object key: {}", key);
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&path, body)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!("Stored {} ({})", key, content_type);
        Ok(())
    }
}

/// Guesses a content type from a file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|s| s.to_str()) {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

/// Uploads every regular file in `directory` under `<prefix>/<filename>`.
/// Individual failures are logged and skipped. Returns the number uploaded.
pub async fn upload_directory(store: &dyn ObjectStore, directory: &Path, prefix: &str) -> Result<usize> {
    let mut entries = tokio::fs::read_dir(directory)
        .await
        .with_context(|| format!("Failed to read directory {}", directory.display()))?;

    let mut uploaded = 0;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let filename = entry.file_name().to_string_lossy().into_owned();
        let key = format!("{}/{}", prefix, filename);

        let result = match tokio::fs::read(&path).await {
            Ok(body) => store.put(&key, body, content_type_for(&path)).await,
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(()) => {
                tracing::info!("File uploaded to {}", key);
                uploaded += 1;
            }
            Err(e) => tracing::error!("Failed to upload {}: {:#}", path.display(), e),
        }
    }

    Ok(uploaded)
}
