use anyhow::{Context, Result};
use base64::Engine;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::models::StoryList;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Side of the white square used when the model returns no image
const PLACEHOLDER_SIDE: u32 = 512;

/// Output dimensions of every published image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ImageSize {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<TextPart>,
}

#[derive(Serialize)]
struct TextPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<String>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: Option<String>,
}

/// Raw image bytes as returned by the model
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl GeneratedImage {
    pub fn decode(&self) -> Result<DynamicImage> {
        image::load_from_memory(&self.bytes)
            .with_context(|| format!("Failed to decode {} image", self.mime_type))
    }
}

/// Plain white stand-in so every story still gets a picture.
pub fn placeholder_image() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(
        PLACEHOLDER_SIDE,
        PLACEHOLDER_SIDE,
        Rgb([255, 255, 255]),
    ))
}

/// Resizes to exactly `size` and encodes as JPEG.
pub fn encode_jpeg(image: &DynamicImage, size: ImageSize) -> Result<Vec<u8>> {
    let resized = image.resize_exact(size.width, size.height, FilterType::CatmullRom);
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut out = Cursor::new(Vec::new());
    rgb.write_to(&mut out, ImageFormat::Jpeg)
        .context("Failed to encode JPEG")?;
    Ok(out.into_inner())
}

pub fn build_image_prompt(instructions: &str, story_context: &str) -> String {
    format!("{}\n\n{}\n", instructions, story_context)
}

pub struct GeminiImageClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiImageClient {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        Self::with_base_url(api_key, model, GEMINI_BASE_URL)
    }

    pub fn with_base_url(api_key: String, model: String, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// `Ok(None)` when the model answered without an image part.
    pub async fn generate_image(&self, prompt: &str) -> Result<Option<GeneratedImage>> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![TextPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
            },
        };

        tracing::debug!("Sending image request to: {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Gemini API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            anyhow::bail!("Gemini API error ({}): {}", status, error_text);
        }

        let body = response
            .json::<GenerateResponse>()
            .await
            .context("Failed to parse Gemini API response")?;

        first_inline_image(body)
    }
}

fn first_inline_image(body: GenerateResponse) -> Result<Option<GeneratedImage>> {
    let Some(parts) = body
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts)
    else {
        return Ok(None);
    };

    for inline in parts.into_iter().filter_map(|p| p.inline_data) {
        if let Some(data) = inline.data {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(data.as_bytes())
                .context("Image data is not valid base64")?;
            return Ok(Some(GeneratedImage {
                mime_type: inline.mime_type.unwrap_or_else(|| "image/jpeg".to_string()),
                bytes,
            }));
        }
    }

    Ok(None)
}

/// Writes `<idx>.jpg` for every story in `images_dir`, pausing after each
/// request. A failed or image-less response gets a white placeholder so the
/// files always line up with `meta.json`. Returns the paths that were written.
pub async fn generate_images_for_stories(
    client: &GeminiImageClient,
    stories: &StoryList,
    instructions: &str,
    images_dir: &Path,
    size: ImageSize,
    pause: std::time::Duration,
) -> Vec<PathBuf> {
    tracing::info!("Starting image generation for {} stories", stories.stories.len());
    let mut written = Vec::new();

    for (idx, story) in stories.stories.iter().enumerate() {
        let prompt = build_image_prompt(instructions, &story.story_context());

        let image = match client.generate_image(&prompt).await.and_then(|generated| {
            generated.map(|g| g.decode()).transpose()
        }) {
            Ok(Some(image)) => image,
            Ok(None) => {
                tracing::warn!("No image returned for story {}, using placeholder", idx);
                placeholder_image()
            }
            Err(e) => {
                tracing::error!("Failed to generate image for story {}: {:#}", idx, e);
                placeholder_image()
            }
        };

        let path = images_dir.join(format!("{}.jpg", idx));
        let saved = match encode_jpeg(&image, size) {
            Ok(jpeg) => tokio::fs::write(&path, jpeg)
                .await
                .with_context(|| format!("Failed to write {}", path.display())),
            Err(e) => Err(e),
        };
        match saved {
            Ok(()) => {
                tracing::info!(
                    "Generated image for story {} at {}. Waiting {:?}.",
                    idx,
                    path.display(),
                    pause
                );
                written.push(path);
            }
            Err(e) => tracing::error!("Failed to save image for story {}: {:#}", idx, e),
        }

        tokio::time::sleep(pause).await;
    }

    tracing::info!("Completed image generation for all stories");
    written
}
