//! Persisted playlist subsets and selection settings.
//!
//! Three subsets of the catalog's playlists are remembered between sessions:
//! playlists to exclude from, playlists to include from, and destination
//! playlists. Each is stored as a list of playlist ids and written through to
//! the [`KeyValueStore`] on every change.
//!
//! On load, stored ids are matched against the playlists that currently
//! exist; ids of deleted playlists drop out and catalog order wins over the
//! stored order. If no destination survives, every playlist becomes a
//! destination.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::mode::{
    self, DateSelection, DateSelectionMode, SelectionMode, date_mode_from_storage,
    date_storage_value,
};
use crate::model::{Playlist, PlaylistId};
use crate::settings::{KeyValueStore, SettingsError};

const KEY_DATE_MODE: &str = "date_selection_mode";
const KEY_DATE_STABLE: &str = "date_selection_updates";
const KEY_DATE_FROM: &str = "date_selection_date";
const KEY_DATE_UNTIL: &str = "date_selection_until";
const KEY_SELECTION_MODE: &str = "song_selection_mode";

/// One of the persisted playlist subsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subset {
    /// Playlists whose songs are skipped in [`SelectionMode::NotInPlaylists`]
    ExcludeFrom,
    /// Playlists whose songs are offered in [`SelectionMode::InPlaylists`]
    IncludeFrom,
    /// Playlists songs get filed into
    Destinations,
}

impl Subset {
    pub const ALL: [Subset; 3] = [Subset::ExcludeFrom, Subset::IncludeFrom, Subset::Destinations];

    /// Settings key holding the subset's ids.
    pub fn key(self) -> &'static str {
        match self {
            Subset::ExcludeFrom => "selection_not_in_playlists",
            Subset::IncludeFrom => "selection_in_playlists",
            Subset::Destinations => "destination_playlists",
        }
    }
}

/// The three playlist subsets plus date and mode settings.
pub struct SelectionStore {
    settings: Arc<dyn KeyValueStore>,
    exclude_from: Vec<Playlist>,
    include_from: Vec<Playlist>,
    destinations: Vec<Playlist>,
}

impl SelectionStore {
    /// A store with empty subsets. Nothing is read or written.
    pub fn new(settings: Arc<dyn KeyValueStore>) -> Self {
        Self {
            settings,
            exclude_from: Vec::new(),
            include_from: Vec::new(),
            destinations: Vec::new(),
        }
    }

    /// Build a store and hydrate it against `playlists`.
    pub fn load(settings: Arc<dyn KeyValueStore>, playlists: &[Playlist]) -> Self {
        let mut store = Self::new(settings);
        store.hydrate(playlists);
        store
    }

    /// Re-resolve the stored ids against the current playlists.
    ///
    /// Each subset is then assigned (and so persisted) again. Persist
    /// failures are logged, never returned.
    pub fn hydrate(&mut self, playlists: &[Playlist]) {
        for subset in Subset::ALL {
            let stored = self.stored_ids(subset);
            let mut resolved: Vec<Playlist> = playlists
                .iter()
                .filter(|p| stored.contains(&p.id))
                .cloned()
                .collect();

            if subset == Subset::Destinations && resolved.is_empty() {
                resolved = playlists.to_vec();
            }

            if let Err(e) = self.set(subset, resolved) {
                tracing::warn!(subset = ?subset, error = %e, "Failed to persist selection");
            }
        }

        tracing::debug!(
            exclude = self.exclude_from.len(),
            include = self.include_from.len(),
            destinations = self.destinations.len(),
            "Selection hydrated"
        );
    }

    /// Ids persisted for a subset, in stored order. Missing or malformed
    /// entries read as empty.
    pub fn stored_ids(&self, subset: Subset) -> Vec<PlaylistId> {
        let Some(value) = self.settings.get(subset.key()) else {
            return Vec::new();
        };

        match serde_json::from_value::<Vec<PlaylistId>>(value) {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(subset = ?subset, error = %e, "Ignoring malformed stored selection");
                Vec::new()
            }
        }
    }

    /// Playlists currently in a subset.
    pub fn get(&self, subset: Subset) -> &[Playlist] {
        match subset {
            Subset::ExcludeFrom => &self.exclude_from,
            Subset::IncludeFrom => &self.include_from,
            Subset::Destinations => &self.destinations,
        }
    }

    pub fn exclude_from(&self) -> &[Playlist] {
        &self.exclude_from
    }

    pub fn include_from(&self) -> &[Playlist] {
        &self.include_from
    }

    pub fn destinations(&self) -> &[Playlist] {
        &self.destinations
    }

    /// Ids of the playlists in a subset, in subset order.
    pub fn ids(&self, subset: Subset) -> Vec<PlaylistId> {
        self.get(subset).iter().map(|p| p.id).collect()
    }

    /// Replace a subset and persist its ids immediately.
    ///
    /// The in-memory subset is replaced even if persisting fails.
    pub fn set(&mut self, subset: Subset, playlists: Vec<Playlist>) -> Result<(), SettingsError> {
        let ids: Vec<PlaylistId> = playlists.iter().map(|p| p.id).collect();
        match subset {
            Subset::ExcludeFrom => self.exclude_from = playlists,
            Subset::IncludeFrom => self.include_from = playlists,
            Subset::Destinations => self.destinations = playlists,
        }
        self.settings.set(subset.key(), Value::from(ids))
    }

    /// Empty every subset in memory. The persisted ids are kept, so the
    /// next [`SelectionStore::hydrate`] restores them.
    pub fn clear(&mut self) {
        self.exclude_from.clear();
        self.include_from.clear();
        self.destinations.clear();
    }

    /// Stored settings for added-date selection.
    ///
    /// A missing mode reads as [`DateSelectionMode::Before`] (stored value
    /// 0); an unrecognized one as [`DateSelectionMode::After`].
    pub fn date_selection(&self) -> DateSelection {
        let mode_value = self
            .settings
            .get(KEY_DATE_MODE)
            .and_then(|v| v.as_i64())
            .unwrap_or(0);

        DateSelection {
            mode: date_mode_from_storage(mode_value).unwrap_or(DateSelectionMode::After),
            date: self.timestamp(KEY_DATE_FROM).unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            until: self.timestamp(KEY_DATE_UNTIL).unwrap_or_else(Utc::now),
            stable_order: self
                .settings
                .get(KEY_DATE_STABLE)
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        }
    }

    /// Persist added-date settings.
    pub fn set_date_selection(&self, dates: &DateSelection) -> Result<(), SettingsError> {
        self.settings
            .set(KEY_DATE_MODE, Value::from(date_storage_value(dates.mode)))?;
        self.settings
            .set(KEY_DATE_FROM, Value::from(dates.date.timestamp()))?;
        self.settings
            .set(KEY_DATE_UNTIL, Value::from(dates.until.timestamp()))?;
        self.settings
            .set(KEY_DATE_STABLE, Value::from(dates.stable_order))
    }

    /// Last mode the user picked, [`SelectionMode::InNoPlaylist`] by default.
    pub fn selection_mode(&self) -> SelectionMode {
        self.settings
            .get(KEY_SELECTION_MODE)
            .and_then(|v| v.as_i64())
            .and_then(mode::mode_from_storage)
            .unwrap_or(SelectionMode::InNoPlaylist)
    }

    /// Remember the mode the user picked.
    pub fn set_selection_mode(&self, mode: SelectionMode) -> Result<(), SettingsError> {
        self.settings
            .set(KEY_SELECTION_MODE, Value::from(mode::storage_value(mode)))
    }

    fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        self.settings
            .get(key)
            .and_then(|v| v.as_i64())
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    }
}
