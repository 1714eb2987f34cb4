//! Playlist Maker - sort a music library into playlists.
//!
//! Loads the library's playlists and songs, offers the songs matching a
//! selection mode (not yet filed, added recently, in or out of chosen
//! playlists), and files them into destination playlists. Selections are
//! remembered between sessions.

pub mod artwork;
pub mod cli;
pub mod config;
pub mod error;
pub mod genre;
pub mod library;
pub mod metadata;
pub mod model;
pub mod scanner;
pub mod selection;
pub mod settings;
pub mod store;
#[cfg(test)]
pub mod test_utils;
pub mod text;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("playlist_maker=info".parse()?))
        .init();

    cli::run_command(&args)
}
