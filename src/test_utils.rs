//! Test utilities and fixtures for playlist-maker tests.
//!
//! Provides an in-memory [`MockMediaStore`], builders for raw store items,
//! image helpers and a temporary SQLite store.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{MockMediaStore, raw_song};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let store = MockMediaStore::authorized();
//!     store.add_song(raw_song(1, "Song", "Artist", Utc::now()));
//!     store.add_playlist(10, "Mix", &[1]);
//!     // ... test logic
//! }
//! ```

use std::io::Cursor;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use image::{ImageFormat, Rgba, RgbaImage};
use parking_lot::Mutex;
use tempfile::TempDir;

use crate::metadata::SongMetadata;
use crate::model::{Playlist, PlaylistId, SongId};
use crate::store::{
    AuthorizationStatus, MediaStore, RawPlaylist, RawSong, SongQuery, SqliteMediaStore,
    StoreError, db_url,
};

/// Creates an authorized SQLite store in a temporary directory.
///
/// Keep the TempDir alive for the duration of your test.
pub async fn temp_store() -> (SqliteMediaStore, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let store = SqliteMediaStore::new(db_url(Some(&dir.path().join("test.db"))));

    let status = store.request_authorization().await;
    assert_eq!(status, AuthorizationStatus::Authorized, "Failed to open test database");

    (store, dir)
}

/// Creates mock SongMetadata with sensible defaults and no artwork.
///
/// Customize with struct update syntax:
///
/// ```ignore
/// let custom = SongMetadata {
///     title: Some("Custom Title".to_string()),
///     ..mock_song_metadata()
/// };
/// ```
pub fn mock_song_metadata() -> SongMetadata {
    SongMetadata {
        title: Some("Test Song".to_string()),
        artist: Some("Test Artist".to_string()),
        album: Some("Test Album".to_string()),
        genre: Some("Rock".to_string()),
        duration: Some(180.0),
        artwork: None,
    }
}

/// A raw song with the fields selection tests care about.
pub fn raw_song(id: SongId, title: &str, artist: &str, added: DateTime<Utc>) -> RawSong {
    RawSong {
        id,
        title: Some(title.to_string()),
        artist: Some(artist.to_string()),
        date_added: Some(added),
        ..Default::default()
    }
}

/// Playlists without artwork, in the given order.
pub fn mock_playlists(entries: &[(PlaylistId, &str)]) -> Vec<Playlist> {
    entries
        .iter()
        .map(|&(id, name)| {
            Playlist::from_raw(RawPlaylist {
                id,
                name: Some(name.to_string()),
                item_artwork: Vec::new(),
            })
        })
        .collect()
}

/// A single-color image.
pub fn solid(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, color)
}

/// PNG-encode an image, as a store would hand it over.
pub fn encode_png(image: &RgbaImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("Failed to encode PNG");
    bytes
}

struct MockPlaylist {
    id: PlaylistId,
    name: String,
    items: Vec<SongId>,
}

struct MockState {
    status: AuthorizationStatus,
    /// Status a request_authorization call moves to
    on_request: AuthorizationStatus,
    songs: Vec<RawSong>,
    playlists: Vec<MockPlaylist>,
}

/// In-memory media store.
///
/// Songs come back in insertion order; query semantics match
/// [`SongQuery`].
pub struct MockMediaStore {
    state: Mutex<MockState>,
}

impl MockMediaStore {
    pub fn with_status(status: AuthorizationStatus) -> Self {
        Self {
            state: Mutex::new(MockState {
                status,
                on_request: AuthorizationStatus::Authorized,
                songs: Vec::new(),
                playlists: Vec::new(),
            }),
        }
    }

    pub fn authorized() -> Self {
        Self::with_status(AuthorizationStatus::Authorized)
    }

    pub fn set_authorization(&self, status: AuthorizationStatus) {
        self.state.lock().status = status;
    }

    /// Status granted by the next `request_authorization`.
    pub fn grant_on_request(&self, status: AuthorizationStatus) {
        self.state.lock().on_request = status;
    }

    pub fn add_song(&self, song: RawSong) {
        self.state.lock().songs.push(song);
    }

    pub fn add_playlist(&self, id: PlaylistId, name: &str, items: &[SongId]) {
        self.state.lock().playlists.push(MockPlaylist {
            id,
            name: name.to_string(),
            items: items.to_vec(),
        });
    }

    /// Song ids in a playlist, in playlist order.
    pub fn members(&self, playlist: PlaylistId) -> Vec<SongId> {
        self.state
            .lock()
            .playlists
            .iter()
            .find(|p| p.id == playlist)
            .map(|p| p.items.clone())
            .unwrap_or_default()
    }

    fn check(state: &MockState) -> Result<(), StoreError> {
        match state.status {
            AuthorizationStatus::Authorized => Ok(()),
            other => Err(StoreError::NotAuthorized(other)),
        }
    }
}

fn in_any(state: &MockState, song: SongId, ids: Option<&[PlaylistId]>) -> bool {
    state
        .playlists
        .iter()
        .filter(|p| ids.is_none_or(|ids| ids.contains(&p.id)))
        .any(|p| p.items.contains(&song))
}

#[async_trait]
impl MediaStore for MockMediaStore {
    fn authorization_status(&self) -> AuthorizationStatus {
        self.state.lock().status
    }

    async fn request_authorization(&self) -> AuthorizationStatus {
        let mut state = self.state.lock();
        if state.status != AuthorizationStatus::Authorized {
            state.status = state.on_request;
        }
        state.status
    }

    async fn playlists(&self) -> Result<Vec<RawPlaylist>, StoreError> {
        let state = self.state.lock();
        Self::check(&state)?;

        Ok(state
            .playlists
            .iter()
            .map(|p| RawPlaylist {
                id: p.id,
                name: Some(p.name.clone()),
                item_artwork: p
                    .items
                    .iter()
                    .map(|id| {
                        state
                            .songs
                            .iter()
                            .find(|s| s.id == *id)
                            .and_then(|s| s.artwork.clone())
                    })
                    .collect(),
            })
            .collect())
    }

    async fn songs(&self, query: &SongQuery) -> Result<Vec<RawSong>, StoreError> {
        let state = self.state.lock();
        Self::check(&state)?;

        let keep = |song: &RawSong| match query {
            SongQuery::All => true,
            SongQuery::InNoPlaylist => !in_any(&state, song.id, None),
            SongQuery::NotInPlaylists(ids) => !in_any(&state, song.id, Some(ids)),
            SongQuery::InPlaylists(ids) => in_any(&state, song.id, Some(ids)),
            SongQuery::AddedDate(filter) => song.date_added.is_some_and(|d| filter.matches(d)),
        };

        Ok(state.songs.iter().filter(|s| keep(s)).cloned().collect())
    }

    async fn contains(&self, playlist: PlaylistId, song: SongId) -> Result<bool, StoreError> {
        let state = self.state.lock();
        Self::check(&state)?;

        state
            .playlists
            .iter()
            .find(|p| p.id == playlist)
            .map(|p| p.items.contains(&song))
            .ok_or(StoreError::PlaylistNotFound(playlist))
    }

    async fn add_songs(&self, playlist: PlaylistId, songs: &[SongId]) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        Self::check(&state)?;

        if let Some(missing) = songs
            .iter()
            .find(|id| !state.songs.iter().any(|s| s.id == **id))
        {
            return Err(StoreError::SongNotFound(*missing));
        }

        let target = state
            .playlists
            .iter_mut()
            .find(|p| p.id == playlist)
            .ok_or(StoreError::PlaylistNotFound(playlist))?;
        for song in songs {
            if !target.items.contains(song) {
                target.items.push(*song);
            }
        }
        Ok(())
    }

    async fn create_playlist(&self, name: &str) -> Result<RawPlaylist, StoreError> {
        let mut state = self.state.lock();
        Self::check(&state)?;

        let id = state.playlists.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        state.playlists.push(MockPlaylist {
            id,
            name: name.to_string(),
            items: Vec::new(),
        });
        Ok(RawPlaylist {
            id,
            name: Some(name.to_string()),
            item_artwork: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DateFilter;

    #[tokio::test]
    async fn test_temp_store_is_authorized_and_empty() {
        let (store, _dir) = temp_store().await;
        assert!(store.playlists().await.unwrap().is_empty());
        assert!(store.songs(&SongQuery::All).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mock_store_queries() {
        let now = Utc::now();
        let store = MockMediaStore::authorized();
        store.add_song(raw_song(1, "a", "x", now));
        store.add_song(raw_song(2, "b", "y", now));
        store.add_playlist(5, "Five", &[1]);

        let ids = |songs: Vec<RawSong>| songs.into_iter().map(|s| s.id).collect::<Vec<_>>();

        assert_eq!(ids(store.songs(&SongQuery::InNoPlaylist).await.unwrap()), vec![2]);
        assert_eq!(ids(store.songs(&SongQuery::InPlaylists(vec![5])).await.unwrap()), vec![1]);
        assert_eq!(
            ids(store.songs(&SongQuery::NotInPlaylists(vec![5])).await.unwrap()),
            vec![2]
        );
        assert!(
            store
                .songs(&SongQuery::AddedDate(DateFilter::Before(now)))
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_mock_store_add_and_create() {
        let store = MockMediaStore::authorized();
        store.add_song(raw_song(1, "a", "x", Utc::now()));

        let created = store.create_playlist("New").await.unwrap();
        store.add_songs(created.id, &[1]).await.unwrap();
        store.add_songs(created.id, &[1]).await.unwrap();
        assert_eq!(store.members(created.id), vec![1]);
        assert!(store.contains(created.id, 1).await.unwrap());

        assert!(matches!(
            store.add_songs(created.id, &[9]).await,
            Err(StoreError::SongNotFound(9))
        ));
        assert!(matches!(
            store.contains(999, 1).await,
            Err(StoreError::PlaylistNotFound(999))
        ));
    }

    #[tokio::test]
    async fn test_mock_store_authorization() {
        let store = MockMediaStore::with_status(AuthorizationStatus::NotDetermined);
        assert!(store.playlists().await.is_err());

        store.grant_on_request(AuthorizationStatus::Denied);
        assert_eq!(store.request_authorization().await, AuthorizationStatus::Denied);
        assert_eq!(store.authorization_status(), AuthorizationStatus::Denied);
    }

    #[test]
    fn test_encode_png_decodes() {
        let bytes = encode_png(&solid(3, 2, Rgba([1, 2, 3, 255])));
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(*decoded.get_pixel(0, 0), Rgba([1, 2, 3, 255]));
    }
}
