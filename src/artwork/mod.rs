//! Artwork decoding and playlist thumbnail composition.
//!
//! Songs carry their own cover, bounded to [`ArtworkSize::SONG`]. Playlists
//! have no cover of their own, so one is composed from the covers of their
//! first few items:
//!
//! - no cover found: no artwork
//! - one cover: used as-is
//! - two covers: side by side in the top half of a white canvas
//! - three or four covers: a 2x2 grid, missing cells left white
//!
//! Composition is pure and deterministic, so playlists can be materialized in
//! parallel.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Number of covers a playlist thumbnail is built from.
pub const MAX_SOURCES: usize = 4;

/// How many playlist items are inspected when looking for covers.
pub const SOURCE_SCAN_LIMIT: usize = 50;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Pixel dimensions of an artwork canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtworkSize {
    pub width: u32,
    pub height: u32,
}

impl ArtworkSize {
    /// Bound for song covers.
    pub const SONG: Self = Self::new(100, 100);
    /// Canvas for playlist thumbnails.
    pub const PLAYLIST: Self = Self::new(200, 200);

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn contains(self, width: u32, height: u32) -> bool {
        width <= self.width && height <= self.height
    }
}

/// Decode an encoded image (JPEG, PNG, ...) and shrink it to fit `bound`.
///
/// Images already within the bound keep their size. Aspect ratio is
/// preserved when shrinking. Returns `None` for undecodable data.
pub fn decode(bytes: &[u8], bound: ArtworkSize) -> Option<RgbaImage> {
    let image = match image::load_from_memory(bytes) {
        Ok(image) => image,
        Err(e) => {
            tracing::debug!(error = %e, "Skipping undecodable artwork");
            return None;
        }
    };

    if bound.contains(image.width(), image.height()) {
        Some(image.to_rgba8())
    } else {
        Some(image.thumbnail(bound.width, bound.height).to_rgba8())
    }
}

/// Pick the covers a playlist thumbnail is built from.
///
/// Takes the first [`MAX_SOURCES`] decodable covers among the first
/// [`SOURCE_SCAN_LIMIT`] items, in playlist order. Items without artwork are
/// skipped.
pub fn playlist_sources(item_artwork: &[Option<Vec<u8>>]) -> Vec<RgbaImage> {
    item_artwork
        .iter()
        .take(SOURCE_SCAN_LIMIT)
        .filter_map(|bytes| bytes.as_deref())
        .filter_map(|bytes| decode(bytes, ArtworkSize::PLAYLIST))
        .take(MAX_SOURCES)
        .collect()
}

/// Combine up to four images into one thumbnail on a `canvas`-sized, white
/// background.
///
/// Each image is stretched to a half-width by half-height cell. With two
/// images the second cell starts at `x = canvas.height / 2`. Images past the
/// fourth are ignored.
pub fn compose(mut images: Vec<RgbaImage>, canvas: ArtworkSize) -> Option<RgbaImage> {
    match images.len() {
        0 => return None,
        1 => return images.pop(),
        _ => {}
    }

    let half_width = canvas.width / 2;
    let half_height = canvas.height / 2;
    let mut output = RgbaImage::from_pixel(canvas.width, canvas.height, WHITE);

    if half_width == 0 || half_height == 0 {
        return Some(output);
    }

    let origins: &[(u32, u32)] = if images.len() == 2 {
        &[(0, 0), (half_height, 0)]
    } else {
        &[
            (0, 0),
            (half_width, 0),
            (0, half_height),
            (half_width, half_height),
        ]
    };

    for (image, &(x, y)) in images.iter().zip(origins) {
        let scaled = imageops::resize(image, half_width, half_height, FilterType::Triangle);
        imageops::overlay(&mut output, &scaled, i64::from(x), i64::from(y));
    }

    Some(output)
}
