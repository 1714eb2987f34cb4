//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while the
//! CLI and `main` use `anyhow` for convenient error propagation.
//!
//! - [`Error`]: top-level error for catalog operations
//! - Module errors ([`StoreError`](crate::store::StoreError),
//!   [`SettingsError`](crate::settings::SettingsError),
//!   [`ConfigError`](crate::config::ConfigError)) for detailed handling
//!
//! Authorization problems are not errors at this level: an unauthorized
//! library simply yields empty results.
//!
//! # Example
//!
//! ```ignore
//! use playlist_maker::error::{Result, ResultExt};
//!
//! async fn load(store: &dyn MediaStore) -> Result<Vec<RawPlaylist>> {
//!     store.playlists().await.with_context("loading playlists")
//! }
//! ```

use crate::model::PlaylistId;
use crate::settings::SettingsError;
use crate::store::StoreError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Media store query or mutation failed
    #[error("Media store error: {0}")]
    Store(#[from] StoreError),

    /// Persisting the selection failed
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Background work panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Rejected playlist name
    #[error("Invalid playlist name: {0:?}")]
    InvalidName(String),

    /// Id not present in the loaded catalog
    #[error("Unknown playlist: {0}")]
    UnknownPlaylist(PlaylistId),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidName("   ".to_string());
        assert!(err.to_string().contains("\"   \""));

        let err = Error::from(StoreError::PlaylistNotFound(12));
        assert!(err.to_string().contains("Playlist 12 not found"));
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::UnknownPlaylist(3).context("while selecting destinations");
        let msg = err.to_string();
        assert!(msg.contains("while selecting destinations"));
        assert!(msg.contains("Unknown playlist: 3"));
    }

    #[test]
    fn test_result_ext_converts_module_errors() {
        let result: std::result::Result<(), StoreError> = Err(StoreError::SongNotFound(8));
        let err = result.with_context("adding song").unwrap_err();

        match err {
            Error::WithContext { context, source } => {
                assert_eq!(context, "adding song");
                assert!(matches!(*source, Error::Store(StoreError::SongNotFound(8))));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
