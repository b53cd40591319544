//! Key-value persistence for the widget state.
//!
//! The store mirrors browser local storage: string keys mapping to string
//! values, read once at startup and written after every render. Two backends
//! are provided:
//!
//! - [`MemoryStore`]: process-local map, used by tests
//! - [`FileStore`]: one JSON file per key inside a data directory
//!
//! The [`persistence`] module is the bridge between a store and
//! [`AppState`](crate::models::AppState).

pub mod persistence;

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use std::fs;
use thiserror::Error;

pub use persistence::{load_state, read_state, save_state};

/// Key the whole state blob is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "todos";

/// Errors raised by a store backend
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// A string key-value store.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: IndexMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed store keeping each key in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: Utf8PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open<P: AsRef<Utf8Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();

        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
                path: dir.clone(),
                source,
            })?;
        }

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> Result<Utf8PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');

        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }

        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| StorageError::Io { path, source })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp_path = path.with_extension("json.tmp");

        // Write-then-rename so a crash never leaves a half-written blob
        fs::write(&tmp_path, value).map_err(|source| StorageError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &path).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!("Wrote {} bytes to {}", value.len(), path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let dir = Utf8PathBuf::try_from(temp_dir.path().join("storage")).unwrap();
        let store = FileStore::open(&dir).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_memory_store_get_set() {
        let mut store = MemoryStore::new();
        assert!(store.get("todos").unwrap().is_none());

        store.set("todos", "{}").unwrap();
        store.set("todos", "{\"lists\":[]}").unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("todos").unwrap().as_deref(), Some("{\"lists\":[]}"));
    }

    #[test]
    fn test_file_store_creates_directory() {
        let (store, _temp_dir) = create_test_store();
        assert!(store.dir().exists());
    }

    #[test]
    fn test_file_store_get_set() {
        let (mut store, _temp_dir) = create_test_store();
        assert!(store.get("todos").unwrap().is_none());

        store.set("todos", "hello").unwrap();

        assert_eq!(store.get("todos").unwrap().as_deref(), Some("hello"));
        assert!(store.path_for("todos").unwrap().exists());
        assert!(!store.dir().join("todos.json.tmp").exists());
    }

    #[test]
    fn test_file_store_rejects_path_keys() {
        let (mut store, _temp_dir) = create_test_store();

        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(matches!(
                store.set(key, "x"),
                Err(StorageError::InvalidKey(_))
            ));
        }
    }
}
