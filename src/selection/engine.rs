//! Song selection: turns a mode plus the stored subsets into an ordered
//! song list.

use std::sync::Arc;

use rayon::prelude::*;

use super::mode::{DateSelection, SelectionMode};
use super::store::SelectionStore;
use crate::error::Result;
use crate::model::Song;
use crate::store::{AuthorizationStatus, MediaStore, RawSong, SongQuery};
use crate::text;

/// Store query for a mode, or `None` when the mode selects nothing.
pub fn song_query(
    mode: SelectionMode,
    selection: &SelectionStore,
    dates: &DateSelection,
) -> Option<SongQuery> {
    use super::store::Subset;

    let query = match mode {
        SelectionMode::AddedDate => SongQuery::AddedDate(dates.filter()),
        SelectionMode::InNoPlaylist => SongQuery::InNoPlaylist,
        SelectionMode::InNoDestination => {
            SongQuery::NotInPlaylists(selection.ids(Subset::Destinations))
        }
        SelectionMode::NotInPlaylists => {
            SongQuery::NotInPlaylists(selection.ids(Subset::ExcludeFrom))
        }
        SelectionMode::InPlaylists => SongQuery::InPlaylists(selection.ids(Subset::IncludeFrom)),
        SelectionMode::AllSongs => SongQuery::All,
        SelectionMode::Destination => return None,
    };
    Some(query)
}

/// Store query for `mode`, or `None` when nothing should be selected.
///
/// An unauthorized store and [`SelectionMode::Destination`] both select
/// nothing.
pub fn prepare_query(
    store: &dyn MediaStore,
    mode: SelectionMode,
    selection: &SelectionStore,
    dates: &DateSelection,
) -> Option<SongQuery> {
    if store.authorization_status() != AuthorizationStatus::Authorized {
        tracing::debug!("Library not authorized, selecting nothing");
        return None;
    }

    let query = song_query(mode, selection, dates);
    if query.is_none() {
        tracing::debug!(mode = %mode, "Mode selects no songs");
    }
    query
}

/// Order songs for presentation.
///
/// Chronological by added date for stable "after" selections, otherwise by
/// artist compared without case or accents. Both sorts are stable.
pub fn sort_songs(songs: &mut [Song], mode: SelectionMode, dates: &DateSelection) {
    if mode == SelectionMode::AddedDate && dates.keeps_stable_order() {
        songs.sort_by_key(|song| song.date_added);
    } else {
        songs.sort_by_cached_key(|song| text::fold(&song.artist));
    }
}

/// Build songs from raw store items in parallel, keeping their order.
pub fn materialize(raw: Vec<RawSong>) -> Vec<Song> {
    raw.into_par_iter().map(Song::from_raw).collect()
}

/// Run a prepared query and return the sorted songs.
///
/// Decoding and sorting run on the blocking pool.
pub async fn run_query(
    store: &dyn MediaStore,
    query: SongQuery,
    mode: SelectionMode,
    dates: DateSelection,
) -> Result<Arc<[Song]>> {
    let raw = store.songs(&query).await?;
    let count = raw.len();

    let songs = tokio::task::spawn_blocking(move || {
        let mut songs = materialize(raw);
        sort_songs(&mut songs, mode, &dates);
        Arc::<[Song]>::from(songs)
    })
    .await?;

    tracing::debug!(mode = %mode, count, "Songs selected");
    Ok(songs)
}

/// Select the songs offered for sorting under `mode`.
///
/// An unauthorized store and [`SelectionMode::Destination`] both yield an
/// empty list.
pub async fn select_songs(
    store: &dyn MediaStore,
    mode: SelectionMode,
    selection: &SelectionStore,
    dates: &DateSelection,
) -> Result<Arc<[Song]>> {
    let Some(query) = prepare_query(store, mode, selection, dates) else {
        return Ok(Arc::from(Vec::new()));
    };

    run_query(store, query, mode, *dates).await
}
