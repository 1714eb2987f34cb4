//! Command-line interface for playlist-maker.
//!
//! Commands for importing a music folder into the library database,
//! reviewing the songs each selection mode offers, and filing songs into
//! playlists.

mod commands;

pub use commands::{Cli, Commands, Session, run_command};
