//! Playlist editing commands.

use tokio::runtime::Runtime;

use super::Session;
use crate::model::{Playlist, PlaylistId, SongId};

/// Create an empty playlist
pub fn cmd_create_playlist(rt: &Runtime, session: &Session, name: &str) -> anyhow::Result<()> {
    rt.block_on(async {
        let library = session.open_library().await?;
        let playlist = library.create_playlist(name).await?;
        println!("Created playlist {} \"{}\"", playlist.id, playlist.name);
        Ok(())
    })
}

/// Add a song to the given playlists, or to the destinations
pub fn cmd_add(
    rt: &Runtime,
    session: &Session,
    song: SongId,
    to: &[PlaylistId],
) -> anyhow::Result<()> {
    rt.block_on(async {
        let library = session.open_library().await?;

        let targets: Vec<Playlist> = if to.is_empty() {
            library.selection().destinations().to_vec()
        } else {
            to.iter()
                .map(|id| {
                    library
                        .playlist(*id)
                        .ok_or_else(|| anyhow::anyhow!("Unknown playlist: {id}"))
                })
                .collect::<anyhow::Result<_>>()?
        };
        if targets.is_empty() {
            anyhow::bail!("No playlists to add to");
        }

        // Songs cannot be taken out of a playlist again, so never add twice
        let already = library.playlists_containing(song, &targets).await?;
        for playlist in &already {
            println!("Already in \"{}\"", playlist.name);
        }
        let pending: Vec<Playlist> = targets
            .into_iter()
            .filter(|p| !already.iter().any(|a| a.id == p.id))
            .collect();

        let mut failed = 0;
        for (playlist, outcome) in pending.iter().zip(library.add_song(song, &pending).await) {
            match outcome.result {
                Ok(()) => println!("Added to \"{}\"", playlist.name),
                Err(e) => {
                    failed += 1;
                    eprintln!("Failed to add to \"{}\": {}", playlist.name, e);
                }
            }
        }

        if failed > 0 {
            anyhow::bail!("{failed} of {} additions failed", pending.len());
        }
        Ok(())
    })
}
