use crate::error::{GenerationError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use std::path::PathBuf;

/// `flux-generated-<unix millis>.png`
pub fn export_filename(timestamp_ms: i64) -> String {
    format!("flux-generated-{}.png", timestamp_ms)
}

/// Saves a displayed image somewhere the user can get at it.
#[async_trait]
pub trait ImageExporter: Send + Sync {
    async fn export(&self, uri: &str, filename: &str) -> Result<PathBuf>;
}

/// Writes exported images into a directory. `data:` URIs are decoded in
/// place; `http(s)` URIs are downloaded first.
pub struct FileExporter {
    client: Client,
    dir: PathBuf,
}

impl FileExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            client: Client::new(),
            dir: dir.into(),
        }
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GenerationError::Export(format!("Download of {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(GenerationError::Export(format!(
                "Download of {} failed with status {}",
                url,
                response.status().as_u16()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GenerationError::Export(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ImageExporter for FileExporter {
    async fn export(&self, uri: &str, filename: &str) -> Result<PathBuf> {
        let bytes = if uri.starts_with("data:") {
            decode_data_uri(uri)?
        } else if uri.starts_with("http://") || uri.starts_with("https://") {
            self.fetch(uri).await?
        } else {
            return Err(GenerationError::Export(format!(
                "Unsupported image URI scheme: {}",
                uri.split(':').next().unwrap_or(uri)
            )));
        };

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            GenerationError::Export(format!("Failed to create {}: {}", self.dir.display(), e))
        })?;

        let path = self.dir.join(filename);
        tokio::fs::write(&path, &bytes).await.map_err(|e| {
            GenerationError::Export(format!("Failed to write {}: {}", path.display(), e))
        })?;

        log::info!("💾 Image saved to: {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

/// Decode a base64 `data:` URI into raw bytes.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| GenerationError::Export("Not a data URI".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| GenerationError::Export("Data URI has no payload".into()))?;

    if !header.ends_with(";base64") {
        return Err(GenerationError::Export(
            "Only base64 data URIs are supported".into(),
        ));
    }

    STANDARD
        .decode(payload.trim())
        .map_err(|e| GenerationError::Export(format!("Failed to decode base64 image: {}", e)))
}
