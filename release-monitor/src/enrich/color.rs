//! Accent color extraction from avatar images.

use crate::enrich::EnrichmentError;
use image::{DynamicImage, ImageFormat};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Images are downsampled to at most this many pixels per side before counting.
const THUMBNAIL_SIZE: u32 = 64;

/// Pixels with lower alpha are ignored.
const MIN_ALPHA: u8 = 125;

/// Bits kept per channel when bucketing colors.
const BUCKET_BITS: u8 = 4;

/// Default number of colors returned by [`PaletteExtractor`].
const DEFAULT_PALETTE_SIZE: usize = 5;

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Returns the color as a `#rrggbb` accent color.
    #[must_use]
    pub fn hex(&self) -> AccentColor {
        AccentColor(format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b))
    }
}

/// A `#rrggbb` color used to tint a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AccentColor(String);

impl AccentColor {
    /// Returns the hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extracts a palette from encoded image bytes.
pub trait ColorExtractor: Send + Sync {
    /// Returns colors ordered from most to least dominant.
    fn extract_colors(
        &self,
        bytes: &[u8],
        mime_type: Option<&str>,
    ) -> Result<Vec<Rgb>, EnrichmentError>;
}

/// Picks the dominant color out of an extracted palette.
///
/// # Errors
///
/// Returns [`EnrichmentError::NoColors`] if the palette is empty.
pub fn accent_color(colors: &[Rgb]) -> Result<AccentColor, EnrichmentError> {
    colors
        .first()
        .map(Rgb::hex)
        .ok_or(EnrichmentError::NoColors)
}

/// [`ColorExtractor`] that buckets pixels by color and ranks buckets by size.
#[derive(Debug, Clone)]
pub struct PaletteExtractor {
    palette_size: usize,
}

impl Default for PaletteExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_PALETTE_SIZE)
    }
}

impl PaletteExtractor {
    /// Creates an extractor returning at most `palette_size` colors.
    #[must_use]
    pub fn new(palette_size: usize) -> Self {
        Self {
            palette_size: palette_size.max(1),
        }
    }

    fn decode(bytes: &[u8], mime_type: Option<&str>) -> Result<DynamicImage, EnrichmentError> {
        let image = match mime_type.and_then(ImageFormat::from_mime_type) {
            Some(format) => image::load_from_memory_with_format(bytes, format)?,
            None => image::load_from_memory(bytes)?,
        };
        Ok(image)
    }
}

#[derive(Default)]
struct Bucket {
    count: u64,
    r: u64,
    g: u64,
    b: u64,
}

impl ColorExtractor for PaletteExtractor {
    fn extract_colors(
        &self,
        bytes: &[u8],
        mime_type: Option<&str>,
    ) -> Result<Vec<Rgb>, EnrichmentError> {
        let mut image = Self::decode(bytes, mime_type)?;
        if image.width() > THUMBNAIL_SIZE || image.height() > THUMBNAIL_SIZE {
            image = image.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE);
        }
        let image = image.to_rgba8();

        let shift = 8 - BUCKET_BITS;
        let mut buckets: HashMap<(u8, u8, u8), Bucket> = HashMap::new();
        for pixel in image.pixels() {
            let [r, g, b, a] = pixel.0;
            if a < MIN_ALPHA {
                continue;
            }
            let bucket = buckets.entry((r >> shift, g >> shift, b >> shift)).or_default();
            bucket.count += 1;
            bucket.r += u64::from(r);
            bucket.g += u64::from(g);
            bucket.b += u64::from(b);
        }

        let mut ranked: Vec<_> = buckets.into_iter().collect();
        ranked.sort_by(|(key_a, a), (key_b, b)| b.count.cmp(&a.count).then(key_a.cmp(key_b)));

        Ok(ranked
            .into_iter()
            .take(self.palette_size)
            .map(|(_, bucket)| Rgb {
                r: (bucket.r / bucket.count) as u8,
                g: (bucket.g / bucket.count) as u8,
                b: (bucket.b / bucket.count) as u8,
            })
            .collect())
    }
}
