//! Avatar image download.

use crate::enrich::EnrichmentError;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Request timeout for avatar downloads.
const DOWNLOAD_TIMEOUT_SECS: u64 = 30;

/// A downloaded image.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    /// Raw image bytes.
    pub bytes: Vec<u8>,

    /// MIME type from the `content-type` header, without parameters.
    pub mime_type: Option<String>,
}

/// Downloads images over HTTP.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Downloads the image at `url`.
    async fn fetch(&self, url: &str) -> Result<FetchedImage, EnrichmentError>;
}

/// [`ImageFetcher`] backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    /// Builds a fetcher with a dedicated HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("release-monitor/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedImage, EnrichmentError> {
        let parsed = Url::parse(url).map_err(|e| EnrichmentError::InvalidUrl {
            url: url.to_string(),
            source: e,
        })?;

        let response = self.client.get(parsed).send().await?.error_for_status()?;
        let mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_mime_type);
        let bytes = response.bytes().await?.to_vec();

        debug!(url, size = bytes.len(), mime_type = ?mime_type, "Downloaded avatar");
        Ok(FetchedImage { bytes, mime_type })
    }
}

/// Strips parameters such as `; charset=binary` from a content type.
fn parse_mime_type(content_type: &str) -> Option<String> {
    let essence = content_type.split(';').next()?.trim();
    if essence.is_empty() {
        None
    } else {
        Some(essence.to_ascii_lowercase())
    }
}
