//! Avatar and accent color enrichment for release notifications.
//!
//! Resolves the repository owner's avatar (organization first, then user),
//! downloads it, and picks the dominant color to tint the notification.

mod color;
mod error;
mod fetch;

pub use color::{accent_color, AccentColor, ColorExtractor, PaletteExtractor, Rgb};
pub use error::EnrichmentError;
pub use fetch::{FetchedImage, HttpImageFetcher, ImageFetcher};

use crate::github::{FetchError, RepositoryProvider};
use tracing::{debug, info_span, Instrument};

/// Presentational data attached to a release notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    /// Owner avatar URL.
    pub avatar_url: String,

    /// Dominant avatar color.
    pub accent_color: AccentColor,
}

/// Resolves the avatar URL for a repository owner.
///
/// Tries the organization profile first and falls back to the user profile.
///
/// # Errors
///
/// Returns the user lookup's [`FetchError`] if both lookups fail.
pub async fn resolve_avatar(
    provider: &dyn RepositoryProvider,
    owner: &str,
) -> Result<String, FetchError> {
    match provider.organization_avatar(owner).await {
        Ok(url) => Ok(url),
        Err(e) => {
            debug!(owner, error = %e, "Organization lookup failed, trying user");
            provider.user_avatar(owner).await
        }
    }
}

/// Downloads an avatar and returns its dominant color.
///
/// # Errors
///
/// Returns [`EnrichmentError`] if the download, decoding, or extraction fails,
/// or if no colors were found.
pub async fn extract_accent_color(
    images: &dyn ImageFetcher,
    colors: &dyn ColorExtractor,
    avatar_url: &str,
) -> Result<AccentColor, EnrichmentError> {
    let image = images.fetch(avatar_url).await?;
    let palette = colors.extract_colors(&image.bytes, image.mime_type.as_deref())?;
    accent_color(&palette)
}

/// Resolves the owner's avatar and its accent color.
///
/// # Errors
///
/// Returns [`EnrichmentError`] if either step fails.
pub async fn enrich(
    provider: &dyn RepositoryProvider,
    images: &dyn ImageFetcher,
    colors: &dyn ColorExtractor,
    owner: &str,
) -> Result<Enrichment, EnrichmentError> {
    let span = info_span!("enrich", owner);

    async {
        let avatar_url = resolve_avatar(provider, owner).await?;
        let accent_color = extract_accent_color(images, colors, &avatar_url).await?;
        debug!(avatar_url = %avatar_url, accent_color = %accent_color, "Enriched release");
        Ok(Enrichment {
            avatar_url,
            accent_color,
        })
    }
    .instrument(span)
    .await
}
