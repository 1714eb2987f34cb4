//! Core data models for the catalog.
//!
//! Defines the two entities the rest of the app works with: [`Song`] and
//! [`Playlist`]. Both are immutable snapshots built from the store's raw
//! items; cloning is cheap because artwork sits behind an `Arc`.
//!
//! # Defaults
//!
//! Stores often omit fields. Defaults are applied once, at construction:
//! - song title: [`Song::UNKNOWN_TITLE`]
//! - song artist: [`Song::UNKNOWN_ARTIST`]
//! - song album: none
//! - song genre: [`GenreCategory::Unknown`](crate::genre::GenreCategory) with no raw text
//! - song duration: zero (negative or non-finite values also become zero)
//! - song added date: the earliest representable date
//! - playlist name: [`Playlist::UNKNOWN_NAME`]

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use image::RgbaImage;

use crate::artwork::{self, ArtworkSize};
use crate::genre::Genre;
use crate::store::{RawPlaylist, RawSong};

/// Stable song identifier assigned by the store.
pub type SongId = u64;

/// Stable playlist identifier assigned by the store.
pub type PlaylistId = u64;

/// A song in the library.
#[derive(Debug, Clone)]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub genre: Genre,
    pub duration: Duration,
    /// Cover, at most [`ArtworkSize::SONG`]
    pub artwork: Option<Arc<RgbaImage>>,
    pub date_added: DateTime<Utc>,
}

impl Song {
    pub const UNKNOWN_TITLE: &'static str = "Unknown title";
    pub const UNKNOWN_ARTIST: &'static str = "Unknown artist";

    /// Build a song from a store item, applying defaults, classifying the
    /// genre and decoding the cover.
    pub fn from_raw(raw: RawSong) -> Self {
        Self {
            id: raw.id,
            title: raw.title.unwrap_or_else(|| Self::UNKNOWN_TITLE.to_string()),
            artist: raw.artist.unwrap_or_else(|| Self::UNKNOWN_ARTIST.to_string()),
            album: raw.album,
            genre: Genre::from_raw(raw.genre),
            duration: raw
                .duration
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
                .unwrap_or_default(),
            artwork: raw
                .artwork
                .as_deref()
                .and_then(|bytes| artwork::decode(bytes, ArtworkSize::SONG))
                .map(Arc::new),
            date_added: raw.date_added.unwrap_or(DateTime::<Utc>::MIN_UTC),
        }
    }
}

/// A user playlist.
///
/// Only the id refers back to the store; membership checks and additions go
/// through [`MediaStore`](crate::store::MediaStore).
#[derive(Debug, Clone)]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    /// Thumbnail composed from the first item covers
    pub artwork: Option<Arc<RgbaImage>>,
}

impl Playlist {
    pub const UNKNOWN_NAME: &'static str = "Unknown playlist";

    /// Build a playlist from a store item, composing its thumbnail.
    pub fn from_raw(raw: RawPlaylist) -> Self {
        let sources = artwork::playlist_sources(&raw.item_artwork);
        Self {
            id: raw.id,
            name: raw.name.unwrap_or_else(|| Self::UNKNOWN_NAME.to_string()),
            artwork: artwork::compose(sources, ArtworkSize::PLAYLIST).map(Arc::new),
        }
    }
}
