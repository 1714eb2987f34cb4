//! The `config` command.

use anyhow::Context;
use std::path::PathBuf;

use super::Session;
use crate::config::{self, Config};

/// Apply the given settings, save the config if anything changed, and print
/// the result.
pub fn cmd_config(
    session: &Session,
    database: Option<&PathBuf>,
    music_dir: Option<&PathBuf>,
    settings_file: Option<&PathBuf>,
) -> anyhow::Result<()> {
    let mut updated = session.config.clone();
    if let Some(path) = database {
        updated.library.database = Some(path.clone());
    }
    if let Some(path) = music_dir {
        updated.library.music_dir = Some(path.clone());
    }
    if let Some(path) = settings_file {
        updated.selection.settings_file = Some(path.clone());
    }

    if updated != session.config {
        let path = session
            .config_path
            .as_deref()
            .context("Could not determine config directory, pass --config")?;
        config::save_to(&updated, path)?;
        println!("Saved {}", path.display());
    }

    print_config(&updated);
    Ok(())
}

fn print_config(config: &Config) {
    println!("Database:      {}", config.database_path().display());
    match &config.library.music_dir {
        Some(dir) => println!("Music folder:  {}", dir.display()),
        None => println!("Music folder:  (not set)"),
    }
    println!("Selection:     {}", config.selection_path().display());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(config_path: PathBuf) -> Session {
        let config = config::load_from(&config_path);
        Session {
            config_path: Some(config_path),
            db_path: config.database_path(),
            selection_path: config.selection_path(),
            config,
        }
    }

    #[test]
    fn test_config_saves_changes() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let music = PathBuf::from("/music");
        cmd_config(&session(path.clone()), None, Some(&music), None).unwrap();

        let saved = config::load_from(&path);
        assert_eq!(saved.library.music_dir, Some(music));
        assert!(saved.library.database.is_none());

        // Reloaded session sees the saved value and keeps it on the next edit
        let db = PathBuf::from("/data/lib.db");
        cmd_config(&session(path.clone()), Some(&db), None, None).unwrap();
        let saved = config::load_from(&path);
        assert_eq!(saved.library.database, Some(db));
        assert_eq!(saved.library.music_dir, Some(PathBuf::from("/music")));
    }

    #[test]
    fn test_config_without_changes_writes_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");

        cmd_config(&session(path.clone()), None, None, None).unwrap();
        assert!(!path.exists());
    }
}
