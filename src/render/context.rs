//! Render context: shared resources available to components while a tree is
//! being rasterized.
//!
//! Most components ignore it. Components that need external resources
//! (an image on disk or behind a URL) name an [`ImageSource`]; the pipeline
//! loads it through the context and publishes the result in a per-call
//! [`ResourceTable`].

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use image::DynamicImage;

use crate::StarPrntError;

/// Where an asynchronously loaded image comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageSource {
    /// Local file.
    Path(PathBuf),
    /// HTTP(S) URL.
    Url(String),
}

impl ImageSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Load state of one image source.
#[derive(Debug, Clone)]
pub enum ImageResource {
    /// Load started, not finished.
    Pending,
    /// Decoded and ready to paint.
    Ready(Arc<DynamicImage>),
    /// Load failed; the message is kept for logging.
    Failed(String),
}

/// Load states of every source requested during one rasterization.
pub type ResourceTable = HashMap<ImageSource, ImageResource>;

/// Shared infrastructure for loading external resources.
///
/// Cheap to clone; the HTTP client is reference-counted internally. One
/// context may serve any number of rasterizations.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// HTTP client for downloading external resources.
    pub http_client: reqwest::Client,
}

impl RenderContext {
    /// Create a context around an existing HTTP client.
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    /// Create a context with a default HTTP client.
    pub fn empty() -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent("starprnt/0.1")
            .build()
            .unwrap_or_default();
        Self { http_client }
    }

    /// Load and decode an image.
    pub async fn fetch_image(&self, source: &ImageSource) -> Result<DynamicImage, StarPrntError> {
        let bytes = match source {
            ImageSource::Path(path) => tokio::fs::read(path).await?,
            ImageSource::Url(url) => self.download(url).await?,
        };

        image::load_from_memory(&bytes)
            .map_err(|e| StarPrntError::Image(format!("Failed to decode {}: {}", source, e)))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, StarPrntError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| StarPrntError::Image(format!("Failed to download {}: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(StarPrntError::Image(format!(
                "Failed to download {}: HTTP {}",
                url,
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| StarPrntError::Image(format!("Failed to read image data: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_display() {
        assert_eq!(ImageSource::path("assets/logo.png").to_string(), "assets/logo.png");
        assert_eq!(
            ImageSource::url("https://example.com/a.png").to_string(),
            "https://example.com/a.png"
        );
    }

    #[tokio::test]
    async fn test_fetch_missing_file_is_io_error() {
        let ctx = RenderContext::empty();
        let result = ctx
            .fetch_image(&ImageSource::path("/nonexistent/starprnt/logo.png"))
            .await;
        assert!(matches!(result, Err(StarPrntError::Io(_))));
    }

    #[tokio::test]
    async fn test_fetch_undecodable_file_is_image_error() {
        let path = std::env::temp_dir().join(format!("starprnt-ctx-{}.png", std::process::id()));
        tokio::fs::write(&path, b"not a png").await.unwrap();
        let result = RenderContext::empty()
            .fetch_image(&ImageSource::Path(path.clone()))
            .await;
        let _ = tokio::fs::remove_file(&path).await;
        assert!(matches!(result, Err(StarPrntError::Image(_))));
    }
}
