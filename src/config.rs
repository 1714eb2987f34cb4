//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\playlist-maker\config.toml
//! - macOS: ~/Library/Application Support/playlist-maker/config.toml
//! - Linux: ~/.config/playlist-maker/config.toml
//!
//! The config file is human-readable and editable. It only says where
//! things live; the selection itself is kept in a separate JSON document
//! (see [`crate::settings`]) because it changes on every click.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::store::DEFAULT_DB_NAME;

/// File name of the persisted selection, next to the config file.
pub const SELECTION_FILE_NAME: &str = "selection.json";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Media library settings
    pub library: LibraryConfig,

    /// Selection persistence settings
    pub selection: SelectionConfig,
}

/// Media library settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// SQLite database file (default: `playlist_maker.db` in the config dir)
    pub database: Option<PathBuf>,

    /// Folder imported by a bare `scan`
    pub music_dir: Option<PathBuf>,
}

/// Selection persistence settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// JSON file holding playlist subsets and date settings
    /// (default: `selection.json` in the config dir)
    pub settings_file: Option<PathBuf>,
}

impl Config {
    /// Database path: configured, else in the config dir, else the
    /// working directory.
    pub fn database_path(&self) -> PathBuf {
        resolve(self.library.database.as_deref(), DEFAULT_DB_NAME)
    }

    /// Selection file path, resolved like [`Config::database_path`].
    pub fn selection_path(&self) -> PathBuf {
        resolve(self.selection.settings_file.as_deref(), SELECTION_FILE_NAME)
    }
}

fn resolve(configured: Option<&Path>, file_name: &str) -> PathBuf {
    match configured {
        Some(path) => path.to_path_buf(),
        None => config_dir()
            .map(|d| d.join(file_name))
            .unwrap_or_else(|| PathBuf::from(file_name)),
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("playlist-maker"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location.
///
/// Returns default config if file doesn't exist or can't be parsed.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from `path`.
///
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!(path = %path.display(), "No config file found, using defaults");
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "Loaded config");
                config
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to parse config file");
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to read config file");
            Config::default()
        }
    }
}

/// Save configuration to `path`.
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!(path = %path.display(), "Saved config");
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let toml = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(toml.contains("[library]"));
        assert!(toml.contains("[selection]"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
[library]
database = "/data/music.db"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.database_path(), PathBuf::from("/data/music.db"));
        assert!(config.library.music_dir.is_none());
        assert!(config.selection.settings_file.is_none());
        assert!(config.selection_path().ends_with(SELECTION_FILE_NAME));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.library.music_dir = Some(PathBuf::from("/music"));
        config.selection.settings_file = Some(PathBuf::from("/tmp/sel.json"));
        save_to(&config, &path).unwrap();

        assert_eq!(load_from(&path), config);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "library = [[[").unwrap();

        assert_eq!(load_from(&path), Config::default());
        assert_eq!(load_from(&temp.path().join("missing.toml")), Config::default());
    }
}
