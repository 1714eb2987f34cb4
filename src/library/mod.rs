//! The catalog: loaded playlists and songs plus the persisted selection.
//!
//! [`Library`] owns snapshots of the store's playlists and of the songs
//! selected for the current mode. Loads materialize items on the blocking
//! pool and swap the snapshot in one step when done, so readers keep seeing
//! the previous contents until a load completes. When two loads overlap, the
//! one that finishes last wins.

use std::sync::Arc;

use futures::future::join_all;
use parking_lot::{RwLock, RwLockReadGuard};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{Playlist, PlaylistId, Song, SongId};
use crate::selection::{
    DateSelection, SelectionMode, SelectionStore, Subset, engine,
};
use crate::settings::KeyValueStore;
use crate::store::{AuthorizationStatus, MediaStore};
use crate::text;

/// Result of adding a song to one playlist.
#[derive(Debug)]
pub struct AddOutcome {
    pub playlist: PlaylistId,
    pub result: Result<()>,
}

pub struct Library {
    store: Arc<dyn MediaStore>,
    playlists: RwLock<Arc<[Playlist]>>,
    songs: RwLock<Arc<[Song]>>,
    selection: RwLock<SelectionStore>,
}

impl Library {
    /// An empty catalog over `store`, persisting selections to `settings`.
    pub fn new(store: Arc<dyn MediaStore>, settings: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            playlists: RwLock::new(Arc::from(Vec::new())),
            songs: RwLock::new(Arc::from(Vec::new())),
            selection: RwLock::new(SelectionStore::new(settings)),
        }
    }

    pub fn authorization_status(&self) -> AuthorizationStatus {
        self.store.authorization_status()
    }

    pub async fn request_authorization(&self) -> AuthorizationStatus {
        let status = self.store.request_authorization().await;
        tracing::info!(status = ?status, "Authorization requested");
        status
    }

    fn is_authorized(&self) -> bool {
        self.store.authorization_status() == AuthorizationStatus::Authorized
    }

    /// Reload playlists from the store.
    ///
    /// Playlists are sorted by name ignoring case and accents, then the
    /// selection is re-resolved against them. Without authorization the
    /// snapshot and the in-memory subsets are emptied; the persisted
    /// selection is left alone.
    pub async fn load_playlists(&self) -> Result<Arc<[Playlist]>> {
        if !self.is_authorized() {
            tracing::debug!("Not authorized, clearing playlists");
            let empty: Arc<[Playlist]> = Arc::from(Vec::new());
            self.selection.write().clear();
            *self.playlists.write() = empty.clone();
            return Ok(empty);
        }

        let raw = self.store.playlists().await?;
        let playlists = tokio::task::spawn_blocking(move || {
            let mut playlists: Vec<Playlist> =
                raw.into_par_iter().map(Playlist::from_raw).collect();
            playlists.sort_by(|a, b| text::compare_folded(&a.name, &b.name));
            Arc::<[Playlist]>::from(playlists)
        })
        .await?;

        self.selection.write().hydrate(&playlists);
        *self.playlists.write() = playlists.clone();

        tracing::info!(count = playlists.len(), "Playlists loaded");
        Ok(playlists)
    }

    /// Reload the songs selected by `mode`.
    pub async fn load_songs(&self, mode: SelectionMode) -> Result<Arc<[Song]>> {
        let (query, dates) = {
            let selection = self.selection.read();
            let dates = selection.date_selection();
            let query = engine::prepare_query(self.store.as_ref(), mode, &selection, &dates);
            (query, dates)
        };

        let songs = match query {
            Some(query) => engine::run_query(self.store.as_ref(), query, mode, dates).await?,
            None => Arc::from(Vec::new()),
        };

        *self.songs.write() = songs.clone();
        tracing::info!(mode = %mode, count = songs.len(), "Songs loaded");
        Ok(songs)
    }

    /// Current playlist snapshot, sorted by name.
    pub fn playlists(&self) -> Arc<[Playlist]> {
        self.playlists.read().clone()
    }

    /// Current song snapshot, in presentation order.
    pub fn songs(&self) -> Arc<[Song]> {
        self.songs.read().clone()
    }

    /// Look up a loaded playlist.
    pub fn playlist(&self, id: PlaylistId) -> Option<Playlist> {
        self.playlists.read().iter().find(|p| p.id == id).cloned()
    }

    /// Read access to the persisted selection.
    pub fn selection(&self) -> RwLockReadGuard<'_, SelectionStore> {
        self.selection.read()
    }

    /// Replace a subset and persist it.
    pub fn set_subset(&self, subset: Subset, playlists: Vec<Playlist>) -> Result<()> {
        self.selection.write().set(subset, playlists)?;
        Ok(())
    }

    /// Replace a subset with loaded playlists picked by id.
    ///
    /// The subset keeps catalog order. Fails without changing anything if
    /// an id is not loaded.
    pub fn set_subset_ids(&self, subset: Subset, ids: &[PlaylistId]) -> Result<()> {
        if let Some(unknown) = ids.iter().find(|id| self.playlist(**id).is_none()) {
            return Err(Error::UnknownPlaylist(*unknown));
        }

        let picked = self
            .playlists()
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect();
        self.set_subset(subset, picked)
    }

    pub fn date_selection(&self) -> DateSelection {
        self.selection.read().date_selection()
    }

    pub fn set_date_selection(&self, dates: &DateSelection) -> Result<()> {
        self.selection.read().set_date_selection(dates)?;
        Ok(())
    }

    /// Last mode picked, for restoring a session.
    pub fn selection_mode(&self) -> SelectionMode {
        self.selection.read().selection_mode()
    }

    pub fn set_selection_mode(&self, mode: SelectionMode) -> Result<()> {
        self.selection.read().set_selection_mode(mode)?;
        Ok(())
    }

    /// Create an empty playlist named `name` (trimmed).
    ///
    /// The catalog is not reloaded; call [`Library::load_playlists`] to see
    /// the new playlist in [`Library::playlists`].
    pub async fn create_playlist(&self, name: &str) -> Result<Playlist> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidName(name.to_string()));
        }

        let raw = self.store.create_playlist(name).await?;
        tracing::info!(id = raw.id, name, "Playlist created");
        Ok(Playlist::from_raw(raw))
    }

    /// Add a song to each playlist concurrently.
    ///
    /// Every playlist gets its own outcome; one failure does not stop the
    /// others and nothing is retried.
    pub async fn add_song(&self, song: SongId, playlists: &[Playlist]) -> Vec<AddOutcome> {
        let store = self.store.as_ref();
        let outcomes = join_all(playlists.iter().map(|playlist| async move {
            let result = store
                .add_songs(playlist.id, &[song])
                .await
                .map_err(Error::from);
            if let Err(e) = &result {
                tracing::warn!(song, playlist = playlist.id, error = %e, "Failed to add song");
            }
            AddOutcome {
                playlist: playlist.id,
                result,
            }
        }))
        .await;

        tracing::debug!(
            song,
            added = outcomes.iter().filter(|o| o.result.is_ok()).count(),
            requested = playlists.len(),
            "Song filed"
        );
        outcomes
    }

    /// The playlists among `playlists` that already contain `song`.
    pub async fn playlists_containing(
        &self,
        song: SongId,
        playlists: &[Playlist],
    ) -> Result<Vec<Playlist>> {
        let store = self.store.as_ref();
        let checks = join_all(
            playlists
                .iter()
                .map(|playlist| async move { store.contains(playlist.id, song).await }),
        )
        .await;

        let mut containing = Vec::new();
        for (playlist, contains) in playlists.iter().zip(checks) {
            if contains? {
                containing.push(playlist.clone());
            }
        }
        Ok(containing)
    }
}
