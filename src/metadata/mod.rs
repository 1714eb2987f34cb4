//! Audio file tag reading.
//!
//! Uses the lofty crate for format-independent metadata access (MP3, FLAC,
//! OGG, M4A, WAV). Missing tags stay `None`; display defaults are applied
//! later by [`Song::from_raw`](crate::model::Song::from_raw).

use anyhow::{Context, Result};
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::picture::PictureType;
use lofty::probe::Probe;
use lofty::tag::{Accessor, Tag};
use std::borrow::Cow;
use std::path::Path;

/// Tags read from one audio file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Free-text genre as tagged
    pub genre: Option<String>,
    /// Playback length in seconds
    pub duration: Option<f64>,
    /// Encoded embedded cover
    pub artwork: Option<Vec<u8>>,
}

pub fn read(path: &Path) -> Result<SongMetadata> {
    let tagged_file = Probe::open(path)
        .context("Failed to open file for probing")?
        .read()
        .context("Failed to read file metadata")?;

    // Get the primary tag, or fall back to the first available tag
    let tag = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag());

    let duration = tagged_file.properties().duration().as_secs_f64();

    Ok(SongMetadata {
        title: clean(tag.and_then(|t| t.title())),
        artist: clean(tag.and_then(|t| t.artist())),
        album: clean(tag.and_then(|t| t.album())),
        genre: clean(tag.and_then(|t| t.genre())),
        duration: (duration > 0.0).then_some(duration),
        artwork: tag.and_then(front_cover),
    })
}

/// Trimmed tag text; blank values count as missing.
fn clean(value: Option<Cow<'_, str>>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Front cover bytes, falling back to the first picture.
fn front_cover(tag: &Tag) -> Option<Vec<u8>> {
    let pictures = tag.pictures();
    pictures
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| pictures.first())
        .map(|p| p.data().to_vec())
}
