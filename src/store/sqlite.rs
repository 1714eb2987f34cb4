//! SQLite-backed media store.
//!
//! Uses SQLx with SQLite for a lightweight, embedded library. Requesting
//! authorization opens the database (creating and migrating it if needed);
//! until then every query reports [`StoreError::NotAuthorized`].
//!
//! # Example
//!
//! ```ignore
//! use playlist_maker::store::{MediaStore, SqliteMediaStore};
//!
//! let store = SqliteMediaStore::new("sqlite:library.db");
//! store.request_authorization().await;
//! let playlists = store.playlists().await?;
//! ```

use std::path::Path;
use std::sync::OnceLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{Sqlite, SqlitePool, SqlitePoolOptions};
use sqlx::{FromRow, QueryBuilder};

use super::{
    AuthorizationStatus, DateFilter, MediaStore, RawPlaylist, RawSong, SongQuery, StoreError,
};
use crate::artwork::SOURCE_SCAN_LIMIT;
use crate::metadata::SongMetadata;
use crate::model::{PlaylistId, SongId};

/// Default database filename.
pub const DEFAULT_DB_NAME: &str = "playlist_maker.db";

const SELECT_SONGS: &str = "SELECT s.id, s.title, s.artist, s.album, s.genre, s.duration, \
                            s.date_added, s.artwork FROM songs s";

/// Build a SQLite database URL from an optional path.
///
/// If no path is provided, uses [`DEFAULT_DB_NAME`] in the current directory.
pub fn db_url(path: Option<&Path>) -> String {
    match path {
        Some(p) => format!("sqlite:{}", p.display()),
        None => format!("sqlite:{}", DEFAULT_DB_NAME),
    }
}

/// Initialize the database connection pool and run migrations.
///
/// Creates the database file if it doesn't exist.
pub async fn init_db(db_url: &str) -> Result<SqlitePool, StoreError> {
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        Sqlite::create_database(db_url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

// Ids round-trip through SQLite's signed integers bit-for-bit.
fn sql_id(id: u64) -> i64 {
    id as i64
}

fn store_id(id: i64) -> u64 {
    id as u64
}

#[derive(Debug, FromRow)]
struct SongRow {
    id: i64,
    title: Option<String>,
    artist: Option<String>,
    album: Option<String>,
    genre: Option<String>,
    duration: Option<f64>,
    date_added: Option<i64>,
    artwork: Option<Vec<u8>>,
}

impl From<SongRow> for RawSong {
    fn from(row: SongRow) -> Self {
        Self {
            id: store_id(row.id),
            title: row.title,
            artist: row.artist,
            album: row.album,
            genre: row.genre,
            duration: row.duration,
            date_added: row
                .date_added
                .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
            artwork: row.artwork,
        }
    }
}

/// Media library stored in a SQLite database.
pub struct SqliteMediaStore {
    url: String,
    pool: OnceLock<SqlitePool>,
    denied: Mutex<bool>,
}

impl SqliteMediaStore {
    /// Create a store for the database at `url`. Nothing is opened until
    /// [`MediaStore::request_authorization`] is called.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pool: OnceLock::new(),
            denied: Mutex::new(false),
        }
    }

    fn pool(&self) -> Result<&SqlitePool, StoreError> {
        self.pool
            .get()
            .ok_or_else(|| StoreError::NotAuthorized(self.authorization_status()))
    }

    /// Insert or update a song, keyed by file path.
    ///
    /// Re-scanning a file refreshes its tags but keeps the date it was first
    /// added. Returns the song id.
    pub async fn upsert_song(
        &self,
        meta: &SongMetadata,
        path: &str,
        added: DateTime<Utc>,
    ) -> Result<SongId, StoreError> {
        let row: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO songs (path, title, artist, album, genre, duration, date_added, artwork)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(path) DO UPDATE SET
                title = excluded.title,
                artist = excluded.artist,
                album = excluded.album,
                genre = excluded.genre,
                duration = excluded.duration,
                artwork = excluded.artwork
            RETURNING id
            "#,
        )
        .bind(path)
        .bind(&meta.title)
        .bind(&meta.artist)
        .bind(&meta.album)
        .bind(&meta.genre)
        .bind(meta.duration)
        .bind(added.timestamp())
        .bind(&meta.artwork)
        .fetch_one(self.pool()?)
        .await?;

        Ok(store_id(row.0))
    }

    async fn item_artwork(&self, playlist: i64) -> Result<Vec<Option<Vec<u8>>>, StoreError> {
        let rows: Vec<(Option<Vec<u8>>,)> = sqlx::query_as(
            r#"
            SELECT s.artwork FROM playlist_items pi
            JOIN songs s ON s.id = pi.song_id
            WHERE pi.playlist_id = ?
            ORDER BY pi.position
            LIMIT ?
            "#,
        )
        .bind(playlist)
        .bind(SOURCE_SCAN_LIMIT as i64)
        .fetch_all(self.pool()?)
        .await?;

        Ok(rows.into_iter().map(|(artwork,)| artwork).collect())
    }

    async fn playlist_exists(&self, playlist: PlaylistId) -> Result<bool, StoreError> {
        let found: Option<(i64,)> = sqlx::query_as("SELECT id FROM playlists WHERE id = ?")
            .bind(sql_id(playlist))
            .fetch_optional(self.pool()?)
            .await?;
        Ok(found.is_some())
    }
}

fn push_ids(builder: &mut QueryBuilder<'_, Sqlite>, ids: &[PlaylistId]) {
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(sql_id(*id));
    }
}

#[async_trait]
impl MediaStore for SqliteMediaStore {
    fn authorization_status(&self) -> AuthorizationStatus {
        if self.pool.get().is_some() {
            AuthorizationStatus::Authorized
        } else if *self.denied.lock() {
            AuthorizationStatus::Denied
        } else {
            AuthorizationStatus::NotDetermined
        }
    }

    async fn request_authorization(&self) -> AuthorizationStatus {
        if self.pool.get().is_some() {
            return AuthorizationStatus::Authorized;
        }

        match init_db(&self.url).await {
            Ok(pool) => {
                // A concurrent request may have won; its pool is just as good
                let _ = self.pool.set(pool);
                *self.denied.lock() = false;
                tracing::info!(url = %self.url, "Library opened");
                AuthorizationStatus::Authorized
            }
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "Library access denied");
                *self.denied.lock() = true;
                AuthorizationStatus::Denied
            }
        }
    }

    async fn playlists(&self) -> Result<Vec<RawPlaylist>, StoreError> {
        let rows: Vec<(i64, Option<String>)> =
            sqlx::query_as("SELECT id, name FROM playlists ORDER BY id")
                .fetch_all(self.pool()?)
                .await?;

        let mut playlists = Vec::with_capacity(rows.len());
        for (id, name) in rows {
            playlists.push(RawPlaylist {
                id: store_id(id),
                name,
                item_artwork: self.item_artwork(id).await?,
            });
        }
        Ok(playlists)
    }

    async fn songs(&self, query: &SongQuery) -> Result<Vec<RawSong>, StoreError> {
        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_SONGS);

        match query {
            SongQuery::All => {}
            SongQuery::InNoPlaylist => {
                builder.push(
                    " WHERE NOT EXISTS (SELECT 1 FROM playlist_items pi WHERE pi.song_id = s.id)",
                );
            }
            SongQuery::NotInPlaylists(ids) => {
                if !ids.is_empty() {
                    builder.push(
                        " WHERE NOT EXISTS (SELECT 1 FROM playlist_items pi \
                         WHERE pi.song_id = s.id AND pi.playlist_id IN (",
                    );
                    push_ids(&mut builder, ids);
                    builder.push("))");
                }
            }
            SongQuery::InPlaylists(ids) => {
                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                builder.push(
                    " WHERE EXISTS (SELECT 1 FROM playlist_items pi \
                     WHERE pi.song_id = s.id AND pi.playlist_id IN (",
                );
                push_ids(&mut builder, ids);
                builder.push("))");
            }
            SongQuery::AddedDate(filter) => match *filter {
                DateFilter::Before(limit) => {
                    builder.push(" WHERE s.date_added < ");
                    builder.push_bind(limit.timestamp());
                }
                DateFilter::After(limit) => {
                    builder.push(" WHERE s.date_added >= ");
                    builder.push_bind(limit.timestamp());
                }
                DateFilter::Between(start, end) => {
                    builder.push(" WHERE s.date_added BETWEEN ");
                    builder.push_bind(start.timestamp());
                    builder.push(" AND ");
                    builder.push_bind(end.timestamp());
                }
            },
        }
        builder.push(" ORDER BY s.id");

        let rows: Vec<SongRow> = builder.build_query_as().fetch_all(self.pool()?).await?;
        Ok(rows.into_iter().map(RawSong::from).collect())
    }

    async fn contains(&self, playlist: PlaylistId, song: SongId) -> Result<bool, StoreError> {
        if !self.playlist_exists(playlist).await? {
            return Err(StoreError::PlaylistNotFound(playlist));
        }

        let found: Option<(i64,)> = sqlx::query_as(
            "SELECT 1 FROM playlist_items WHERE playlist_id = ? AND song_id = ?",
        )
        .bind(sql_id(playlist))
        .bind(sql_id(song))
        .fetch_optional(self.pool()?)
        .await?;
        Ok(found.is_some())
    }

    async fn add_songs(&self, playlist: PlaylistId, songs: &[SongId]) -> Result<(), StoreError> {
        if !self.playlist_exists(playlist).await? {
            return Err(StoreError::PlaylistNotFound(playlist));
        }

        let mut tx = self.pool()?.begin().await?;
        for &song in songs {
            let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM songs WHERE id = ?")
                .bind(sql_id(song))
                .fetch_optional(&mut *tx)
                .await?;
            if exists.is_none() {
                return Err(StoreError::SongNotFound(song));
            }

            sqlx::query(
                r#"
                INSERT OR IGNORE INTO playlist_items (playlist_id, song_id, position)
                VALUES (?, ?, (SELECT COALESCE(MAX(position) + 1, 0)
                               FROM playlist_items WHERE playlist_id = ?))
                "#,
            )
            .bind(sql_id(playlist))
            .bind(sql_id(song))
            .bind(sql_id(playlist))
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        tracing::debug!(playlist, count = songs.len(), "Songs added");
        Ok(())
    }

    async fn create_playlist(&self, name: &str) -> Result<RawPlaylist, StoreError> {
        let result = sqlx::query("INSERT INTO playlists (name) VALUES (?)")
            .bind(name)
            .execute(self.pool()?)
            .await?;

        Ok(RawPlaylist {
            id: store_id(result.last_insert_rowid()),
            name: Some(name.to_string()),
            item_artwork: Vec::new(),
        })
    }
}
