//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `scan`: importing audio files into the library database
//! - `catalog`: listing playlists and songs, classifying genres, artwork
//! - `selection`: editing the persisted playlist subsets and date settings
//! - `playlist`: creating playlists and filing songs into them
//! - `configure`: showing and editing the config file

mod catalog;
mod configure;
mod playlist;
mod scan;
mod selection;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

use crate::config::{self, Config};
use crate::library::Library;
use crate::selection::{DateSelectionMode, SelectionMode, SelectionStore, Subset};
use crate::settings::JsonFileStore;
use crate::store::{AuthorizationStatus, MediaStore, SqliteMediaStore, db_url};

pub use catalog::{cmd_artwork, cmd_classify, cmd_playlists, cmd_songs};
pub use configure::cmd_config;
pub use playlist::{cmd_add, cmd_create_playlist};
pub use scan::cmd_scan;
pub use selection::{cmd_dates, cmd_select};

/// Playlist Maker CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: config.toml in the OS config directory)
    #[arg(long, global = true, env = "PLAYLIST_MAKER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Library database, overrides the config file
    #[arg(long, global = true, env = "PLAYLIST_MAKER_DB")]
    pub db: Option<PathBuf>,

    /// Selection settings file, overrides the config file
    #[arg(long, global = true)]
    pub selection_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Playlist subsets as named on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SubsetArg {
    /// Playlists whose songs are skipped by `not-in-playlists`
    Exclude,
    /// Playlists whose songs are listed by `in-playlists`
    Include,
    /// Playlists songs get added to
    Destinations,
}

impl From<SubsetArg> for Subset {
    fn from(arg: SubsetArg) -> Self {
        match arg {
            SubsetArg::Exclude => Subset::ExcludeFrom,
            SubsetArg::Include => Subset::IncludeFrom,
            SubsetArg::Destinations => Subset::Destinations,
        }
    }
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Import audio files into the library
    Scan {
        /// Directory to scan (default: library.music_dir from the config)
        path: Option<PathBuf>,
    },
    /// List playlists and the subsets they belong to
    Playlists,
    /// List the songs to sort
    Songs {
        /// Selection mode (default: the last one used)
        #[arg(short, long)]
        mode: Option<SelectionMode>,
    },
    /// Set one of the persisted playlist subsets
    Select {
        /// Subset to replace
        #[arg(value_enum)]
        subset: SubsetArg,
        /// Playlist ids (none clears the subset)
        ids: Vec<u64>,
    },
    /// Show or change the added-date selection
    Dates {
        /// before, after or range
        mode: Option<DateSelectionMode>,
        /// Pivot date, or start of the range (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// End of the range (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Keep "after" selections in added-date order
        #[arg(long)]
        stable: Option<bool>,
    },
    /// Show the genre category for a genre string
    Classify {
        /// Genre text as tagged
        text: String,
    },
    /// Write a playlist's artwork as PNG
    Artwork {
        /// Playlist id
        playlist: u64,
        /// Output file
        output: PathBuf,
    },
    /// Create an empty playlist
    CreatePlaylist {
        /// Playlist name
        name: String,
    },
    /// Show the config, or change it and save it
    Config {
        /// Library database file
        #[arg(long)]
        database: Option<PathBuf>,
        /// Folder imported by a bare `scan`
        #[arg(long)]
        music_dir: Option<PathBuf>,
        /// Selection settings file
        #[arg(long)]
        settings_file: Option<PathBuf>,
    },
    /// Add a song to playlists
    Add {
        /// Song id
        song: u64,
        /// Playlist ids (default: the destination playlists)
        #[arg(long, num_args = 1..)]
        to: Vec<u64>,
    },
}

/// Paths resolved from the config file and command-line overrides.
pub struct Session {
    /// Config file in use, if one could be located
    pub config_path: Option<PathBuf>,
    pub config: Config,
    pub db_path: PathBuf,
    pub selection_path: PathBuf,
}

impl Session {
    pub fn from_cli(cli: &Cli) -> Self {
        let config_path = cli.config.clone().or_else(config::config_path);
        let config = match &config_path {
            Some(path) => config::load_from(path),
            None => config::load(),
        };
        let db_path = cli.db.clone().unwrap_or_else(|| config.database_path());
        let selection_path = cli
            .selection_file
            .clone()
            .unwrap_or_else(|| config.selection_path());

        tracing::debug!(
            db = %db_path.display(),
            selection = %selection_path.display(),
            "Session paths resolved"
        );
        Self {
            config_path,
            config,
            db_path,
            selection_path,
        }
    }

    /// Open (creating if needed) the library database.
    pub async fn open_store(&self) -> anyhow::Result<Arc<SqliteMediaStore>> {
        if let Some(dir) = self.db_path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        let store = Arc::new(SqliteMediaStore::new(db_url(Some(&self.db_path))));
        match store.request_authorization().await {
            AuthorizationStatus::Authorized => Ok(store),
            status => anyhow::bail!(
                "Cannot open library at {} ({:?})",
                self.db_path.display(),
                status
            ),
        }
    }

    /// Selection settings without touching the library.
    pub fn open_selection(&self) -> SelectionStore {
        SelectionStore::new(Arc::new(JsonFileStore::open(&self.selection_path)))
    }

    /// Open the library and load its playlists.
    pub async fn open_library(&self) -> anyhow::Result<Library> {
        let store = self.open_store().await?;
        let settings = Arc::new(JsonFileStore::open(&self.selection_path));
        let library = Library::new(store, settings);
        library
            .load_playlists()
            .await
            .context("Failed to load playlists")?;
        Ok(library)
    }
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let session = Session::from_cli(cli);

    match &cli.command {
        Commands::Scan { path } => cmd_scan(&rt, &session, path.as_ref()),
        Commands::Playlists => cmd_playlists(&rt, &session),
        Commands::Songs { mode } => cmd_songs(&rt, &session, *mode),
        Commands::Select { subset, ids } => cmd_select(&rt, &session, (*subset).into(), ids),
        Commands::Dates {
            mode,
            from,
            to,
            stable,
        } => cmd_dates(&session, *mode, *from, *to, *stable),
        Commands::Classify { text } => cmd_classify(text),
        Commands::Artwork { playlist, output } => cmd_artwork(&rt, &session, *playlist, output),
        Commands::CreatePlaylist { name } => cmd_create_playlist(&rt, &session, name),
        Commands::Config {
            database,
            music_dir,
            settings_file,
        } => cmd_config(
            &session,
            database.as_ref(),
            music_dir.as_ref(),
            settings_file.as_ref(),
        ),
        Commands::Add { song, to } => cmd_add(&rt, &session, *song, to),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_modes_and_dates() {
        let cli = Cli::try_parse_from(["playlist-maker", "songs", "--mode", "in-no-destination"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Songs {
                mode: Some(SelectionMode::InNoDestination)
            }
        ));

        let cli = Cli::try_parse_from([
            "playlist-maker",
            "dates",
            "range",
            "--from",
            "2024-01-01",
            "--to",
            "2024-02-01",
        ])
        .unwrap();
        match cli.command {
            Commands::Dates { mode, from, to, .. } => {
                assert_eq!(mode, Some(DateSelectionMode::Range));
                assert_eq!(from, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert_eq!(to, NaiveDate::from_ymd_opt(2024, 2, 1));
            }
            _ => panic!("expected dates command"),
        }

        assert!(Cli::try_parse_from(["playlist-maker", "songs", "--mode", "shuffle"]).is_err());
    }

    #[test]
    fn test_cli_global_overrides() {
        let cli = Cli::try_parse_from([
            "playlist-maker",
            "select",
            "destinations",
            "3",
            "4",
            "--db",
            "/tmp/lib.db",
        ])
        .unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/lib.db")));
        match cli.command {
            Commands::Select { subset, ids } => {
                assert_eq!(Subset::from(subset), Subset::Destinations);
                assert_eq!(ids, vec![3, 4]);
            }
            _ => panic!("expected select command"),
        }
    }
}
