//! Listing and inspection commands.

use anyhow::Context;
use std::path::Path;
use tokio::runtime::Runtime;

use super::Session;
use crate::genre;
use crate::selection::{SelectionMode, Subset};

/// List playlists with their subset markers
pub fn cmd_playlists(rt: &Runtime, session: &Session) -> anyhow::Result<()> {
    rt.block_on(async {
        let library = session.open_library().await?;
        let playlists = library.playlists();
        let selection = library.selection();

        let marker = |subset: Subset, id: u64, flag: char| {
            if selection.get(subset).iter().any(|p| p.id == id) {
                flag
            } else {
                '-'
            }
        };

        for playlist in playlists.iter() {
            println!(
                "{:>6}  {}{}{}  {}",
                playlist.id,
                marker(Subset::Destinations, playlist.id, 'D'),
                marker(Subset::ExcludeFrom, playlist.id, 'E'),
                marker(Subset::IncludeFrom, playlist.id, 'I'),
                playlist.name
            );
        }
        println!("\n{} playlists (D: destination, E: excluded, I: included)", playlists.len());
        Ok(())
    })
}

/// List the songs selected by a mode
pub fn cmd_songs(rt: &Runtime, session: &Session, mode: Option<SelectionMode>) -> anyhow::Result<()> {
    rt.block_on(async {
        let library = session.open_library().await?;
        let mode = match mode {
            Some(mode) => {
                library.set_selection_mode(mode)?;
                mode
            }
            None => library.selection_mode(),
        };

        if mode == SelectionMode::Destination {
            println!("The destination mode selects no songs; use `playlists` to review destinations.");
            return Ok(());
        }

        let songs = library.load_songs(mode).await?;
        for song in songs.iter() {
            println!(
                "{:>6}  {}  {}  {} - {}",
                song.id,
                song.date_added.format("%Y-%m-%d"),
                song.genre.category.symbol(),
                song.artist,
                song.title
            );
        }
        println!("\n{} songs ({})", songs.len(), mode);
        Ok(())
    })
}

/// Show how a genre string is categorized
pub fn cmd_classify(text: &str) -> anyhow::Result<()> {
    let category = genre::classify(Some(text));
    match genre::match_rule(text) {
        Some(_) => println!("{} {}", category.symbol(), category),
        None => println!("{} {} (no rule matched)", category.symbol(), category),
    }
    Ok(())
}

/// Write a playlist's composed artwork to a PNG file
pub fn cmd_artwork(rt: &Runtime, session: &Session, id: u64, output: &Path) -> anyhow::Result<()> {
    rt.block_on(async {
        let library = session.open_library().await?;
        let playlist = library
            .playlist(id)
            .with_context(|| format!("Unknown playlist: {id}"))?;
        let artwork = playlist
            .artwork
            .with_context(|| format!("Playlist \"{}\" has no artwork", playlist.name))?;

        artwork
            .save(output)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        println!(
            "Wrote {}x{} artwork for \"{}\" to {}",
            artwork.width(),
            artwork.height(),
            playlist.name,
            output.display()
        );
        Ok(())
    })
}
