//! Enrichment error types.

use crate::github::FetchError;
use thiserror::Error;

/// Errors that can occur while resolving an avatar or extracting its colors.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// Neither the organization nor the user profile could be looked up.
    #[error("Failed to resolve avatar: {0}")]
    AvatarLookup(#[from] FetchError),

    /// The avatar URL is not a valid URL.
    #[error("Invalid avatar URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Downloading the avatar failed.
    #[error("Failed to download avatar: {0}")]
    DownloadFailed(#[from] reqwest::Error),

    /// The avatar could not be decoded as an image.
    #[error("Failed to decode avatar image: {0}")]
    DecodeFailed(#[from] image::ImageError),

    /// Color extraction produced no colors.
    #[error("No colors could be extracted from the avatar")]
    NoColors,
}
