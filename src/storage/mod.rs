//! Best-effort local key/value store.
//!
//! Each key is one JSON file in the data directory. Reads of missing or
//! corrupt files yield `None`; failed writes are logged and dropped. Callers
//! that need the reason use [`Storage::try_load`] / [`Storage::try_save`].

mod error;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::types::constants::DATA_DIR_NAME;

pub use error::StorageError;

// ============================================================================
// StorageKey
// ============================================================================

/// The keys the dashboard stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Array of todo records
    Todos,
    /// `{ "sessionCount": n }`
    Timer,
    /// Weather cache record
    Weather,
}

impl StorageKey {
    /// Every key, for clear-all.
    pub const ALL: [StorageKey; 3] = [StorageKey::Todos, StorageKey::Timer, StorageKey::Weather];

    /// Returns the stored key name.
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Todos => "retrodash_todos",
            StorageKey::Timer => "retrodash_timer",
            StorageKey::Weather => "retrodash_weather",
        }
    }

    fn file_name(&self) -> String {
        format!("{}.json", self.as_str())
    }
}

// ============================================================================
// Storage
// ============================================================================

/// File-backed JSON store rooted at one directory.
#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    /// Creates a store rooted at `dir`. The directory is created lazily on
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a store in the platform data directory, falling back to the
    /// working directory when none is known.
    pub fn open_default() -> Self {
        Self::new(default_data_dir())
    }

    /// Returns the directory holding the store's files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file backing `key`.
    pub fn path_for(&self, key: StorageKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Loads and decodes the value stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing is stored (or the file is empty).
    pub fn try_load<T: DeserializeOwned>(&self, key: StorageKey) -> Result<Option<T>, StorageError> {
        let path = self.path_for(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        if raw.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Decode {
                key: key.as_str(),
                source,
            })
    }

    /// Loads the value under `key`, treating any failure as absent.
    pub fn load<T: DeserializeOwned>(&self, key: StorageKey) -> Option<T> {
        match self.try_load(key) {
            Ok(value) => value,
            Err(e) if e.is_decode_error() => {
                warn!(key = key.as_str(), error = %e, "Ignoring corrupt stored value");
                None
            }
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "Failed to read from storage");
                None
            }
        }
    }

    /// Loads the value under `key`, or `T::default()` when absent or corrupt.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: StorageKey) -> T {
        self.load(key).unwrap_or_default()
    }

    /// Encodes and stores `value` under `key`.
    ///
    /// Writes a sibling temporary file first and renames it into place so a
    /// crash mid-write never leaves a truncated record.
    pub fn try_save<T: Serialize + ?Sized>(
        &self,
        key: StorageKey,
        value: &T,
    ) -> Result<(), StorageError> {
        let encoded = serde_json::to_vec(value).map_err(|source| StorageError::Encode {
            key: key.as_str(),
            source,
        })?;

        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, encoded).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StorageError::Io { path, source })?;

        debug!(key = key.as_str(), "Saved to storage");
        Ok(())
    }

    /// Stores `value` under `key`, logging and dropping any failure.
    pub fn save<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) {
        if let Err(e) = self.try_save(key, value) {
            warn!(key = key.as_str(), error = %e, "Failed to save to storage");
        }
    }

    /// Removes the value under `key`. Missing values are not an error.
    pub fn remove(&self, key: StorageKey) {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => debug!(key = key.as_str(), "Removed from storage"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(key = key.as_str(), error = %e, "Failed to remove from storage"),
        }
    }

    /// Removes every dashboard key.
    pub fn clear_all(&self) {
        for key in StorageKey::ALL {
            self.remove(key);
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(DATA_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

// ============================================================================
// Tests
// ============================================================================
