//! Media store interface.
//!
//! The catalog never owns songs or playlists; it queries a [`MediaStore`]
//! for raw items and turns them into [`Song`](crate::model::Song) and
//! [`Playlist`](crate::model::Playlist) snapshots. The trait keeps the
//! selection logic independent of where the library lives and lets tests
//! substitute an in-memory store.
//!
//! [`SqliteMediaStore`] is the shipped implementation.

mod sqlite;

pub use sqlite::{DEFAULT_DB_NAME, SqliteMediaStore, db_url};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::model::{PlaylistId, SongId};

/// Whether the app may read the media library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    /// Access has not been requested yet
    NotDetermined,
    /// The user (or the system) refused access
    Denied,
    /// Access is blocked by policy
    Restricted,
    Authorized,
}

/// A song as reported by the store, before defaults are applied.
#[derive(Debug, Clone, Default)]
pub struct RawSong {
    pub id: SongId,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    /// Playback length in seconds
    pub duration: Option<f64>,
    pub date_added: Option<DateTime<Utc>>,
    /// Encoded cover image (JPEG, PNG, ...)
    pub artwork: Option<Vec<u8>>,
}

/// A playlist as reported by the store.
#[derive(Debug, Clone, Default)]
pub struct RawPlaylist {
    pub id: PlaylistId,
    pub name: Option<String>,
    /// Encoded cover of each item, in playlist order. Stores may truncate
    /// this to [`SOURCE_SCAN_LIMIT`](crate::artwork::SOURCE_SCAN_LIMIT).
    pub item_artwork: Vec<Option<Vec<u8>>>,
}

/// Date constraint on when songs were added to the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    /// Strictly before the date
    Before(DateTime<Utc>),
    /// At or after the date
    After(DateTime<Utc>),
    /// Within the inclusive range
    Between(DateTime<Utc>, DateTime<Utc>),
}

impl DateFilter {
    /// Check whether a song added at `date` passes the filter.
    pub fn matches(&self, date: DateTime<Utc>) -> bool {
        match *self {
            DateFilter::Before(limit) => date < limit,
            DateFilter::After(limit) => date >= limit,
            DateFilter::Between(start, end) => start <= date && date <= end,
        }
    }
}

/// Which songs to fetch. Results are a set: no duplicates, no meaningful
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SongQuery {
    /// Songs whose added date passes the filter
    AddedDate(DateFilter),
    /// Songs in no playlist at all
    InNoPlaylist,
    /// Songs in none of the given playlists (every song if the list is empty)
    NotInPlaylists(Vec<PlaylistId>),
    /// Songs in at least one of the given playlists (none if the list is empty)
    InPlaylists(Vec<PlaylistId>),
    /// The whole library
    All,
}

/// Media store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Media library access not authorized ({0:?})")]
    NotAuthorized(AuthorizationStatus),

    #[error("Playlist {0} not found")]
    PlaylistNotFound(PlaylistId),

    #[error("Song {0} not found")]
    SongNotFound(SongId),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Narrow query interface to the media library.
///
/// Implement this trait to create mock implementations for testing.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Current access status, without prompting.
    fn authorization_status(&self) -> AuthorizationStatus;

    /// Ask for access to the library and report the outcome.
    async fn request_authorization(&self) -> AuthorizationStatus;

    /// All playlists in the library.
    async fn playlists(&self) -> Result<Vec<RawPlaylist>, StoreError>;

    /// Songs matching `query`.
    async fn songs(&self, query: &SongQuery) -> Result<Vec<RawSong>, StoreError>;

    /// Whether `song` is already in `playlist`. Unknown playlists are
    /// [`StoreError::PlaylistNotFound`].
    async fn contains(&self, playlist: PlaylistId, song: SongId) -> Result<bool, StoreError>;

    /// Append songs to a playlist. Songs already present are left in place.
    async fn add_songs(&self, playlist: PlaylistId, songs: &[SongId]) -> Result<(), StoreError>;

    /// Create an empty playlist.
    async fn create_playlist(&self, name: &str) -> Result<RawPlaylist, StoreError>;
}
