//! Library import from a music folder.

use chrono::Utc;
use futures::stream::{Stream, StreamExt};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use walkdir::WalkDir;

use crate::error::{Result, ResultExt};
use crate::metadata;
use crate::store::SqliteMediaStore;

const AUDIO_EXTENSIONS: [&str; 5] = ["mp3", "flac", "ogg", "wav", "m4a"];

/// Whether a path looks like a supported audio file (case-insensitive).
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Scans the given root directory recursively for audio files.
///
/// Returns a Stream of PathBufs.
pub fn scan(root: PathBuf) -> impl Stream<Item = PathBuf> {
    let (tx, rx) = mpsc::channel(100);

    tokio::task::spawn_blocking(move || {
        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            if entry.file_type().is_file() && is_audio_file(entry.path()) {
                // Receiver dropped: stop walking
                if tx.blocking_send(entry.into_path()).is_err() {
                    break;
                }
            }
        }
    });

    futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|path| (path, rx))
    })
}

/// Counts from one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub failed: usize,
}

/// Read tags from every audio file under `root` and upsert them into the
/// store. Unreadable files are logged and counted, not fatal.
pub async fn import(store: &SqliteMediaStore, root: PathBuf) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();
    let mut paths = Box::pin(scan(root));

    while let Some(path) = paths.next().await {
        let read_path = path.clone();
        let meta = match tokio::task::spawn_blocking(move || metadata::read(&read_path)).await? {
            Ok(meta) => meta,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable file");
                summary.failed += 1;
                continue;
            }
        };

        store
            .upsert_song(&meta, &path.to_string_lossy(), Utc::now())
            .await
            .with_context(format!("importing {}", path.display()))?;
        summary.imported += 1;
    }

    tracing::info!(imported = summary.imported, failed = summary.failed, "Import finished");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MediaStore, SongQuery};
    use crate::test_utils::temp_store;
    use std::fs::File;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_scan_audio_files() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        File::create(root.join("song.mp3")).unwrap();
        File::create(root.join("music.flac")).unwrap();
        File::create(root.join("notes.txt")).unwrap();
        File::create(root.join("image.png")).unwrap();
        File::create(root.join("UPPERCASE.OGG")).unwrap();

        let subdir = root.join("subdir");
        std::fs::create_dir(&subdir).unwrap();
        File::create(subdir.join("track.wav")).unwrap();
        File::create(subdir.join("ignore.doc")).unwrap();

        let paths: Vec<PathBuf> = scan(root.to_path_buf()).collect().await;
        assert_eq!(paths.len(), 4);

        let file_names: Vec<String> = paths
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(|s| s.to_string()))
            .collect();

        assert!(file_names.contains(&"song.mp3".to_string()));
        assert!(file_names.contains(&"music.flac".to_string()));
        assert!(file_names.contains(&"track.wav".to_string()));
        assert!(file_names.contains(&"UPPERCASE.OGG".to_string()));
        assert!(!file_names.contains(&"notes.txt".to_string()));
    }

    #[test]
    fn test_is_audio_file() {
        assert!(is_audio_file(Path::new("/a/b.M4A")));
        assert!(!is_audio_file(Path::new("/a/b.m4a.txt")));
        assert!(!is_audio_file(Path::new("/a/mp3")));
    }

    #[tokio::test]
    async fn test_import_counts_unreadable_files() {
        let (store, _db) = temp_store().await;
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("fake.mp3"), b"not audio").unwrap();
        std::fs::write(dir.path().join("cover.jpg"), b"not audio either").unwrap();

        let summary = import(&store, dir.path().to_path_buf()).await.unwrap();
        assert_eq!(summary, ImportSummary { imported: 0, failed: 1 });
        assert!(store.songs(&SongQuery::All).await.unwrap().is_empty());
    }
}
