//! Key/value storage for user selections.
//!
//! Selection state (playlist subsets, date settings, last mode) is a handful
//! of small values written every time the user changes one, so it lives in a
//! flat key/value document rather than the TOML config.
//!
//! - [`JsonFileStore`]: a JSON object on disk, rewritten atomically on every
//!   `set`
//! - [`MemoryStore`]: process-local, for tests and throwaway sessions
//!
//! Reads never fail: a missing or corrupt document reads as empty.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::{Map, Value};

/// Settings storage errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to create settings directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(serde_json::Error),

    #[error("Failed to write settings to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

/// Flat, synchronous key/value storage.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. Missing keys are `None`.
    fn get(&self, key: &str) -> Option<Value>;

    /// Write a value and persist it before returning.
    fn set(&self, key: &str, value: Value) -> Result<(), SettingsError>;
}

/// Settings kept in memory only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<Map<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), SettingsError> {
        self.values.lock().insert(key.to_string(), value);
        Ok(())
    }
}

/// Settings persisted as a JSON object in a single file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
}

impl JsonFileStore {
    /// Open the document at `path`.
    ///
    /// A missing file starts empty. An unreadable or malformed file is
    /// logged and also starts empty; it is overwritten on the next `set`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = read_document(&path);
        Self {
            path,
            values: Mutex::new(values),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &Map<String, Value>) -> Result<(), SettingsError> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)
                .map_err(|e| SettingsError::CreateDir(dir.to_path_buf(), e))?;
        }

        let contents = serde_json::to_string_pretty(values).map_err(SettingsError::Serialize)?;

        // Write atomically (write to temp, then rename)
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, contents)
            .map_err(|e| SettingsError::Write(temp_path.clone(), e))?;
        std::fs::rename(&temp_path, &self.path)
            .map_err(|e| SettingsError::Rename(temp_path, self.path.clone(), e))?;
        Ok(())
    }
}

fn read_document(path: &Path) -> Map<String, Value> {
    if !path.exists() {
        return Map::new();
    }

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read settings, starting empty");
            return Map::new();
        }
    };

    match serde_json::from_str::<Value>(&contents) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            tracing::warn!(path = %path.display(), "Settings file is not a JSON object, starting empty");
            Map::new()
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to parse settings, starting empty");
            Map::new()
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), SettingsError> {
        let mut values = self.values.lock();
        values.insert(key.to_string(), value);
        // Hold the lock across the write so concurrent sets land in order
        self.persist(&values)
    }
}
