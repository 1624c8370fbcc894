use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fixed storage key for the lookup history.
pub const HISTORY_KEY: &str = "github-search-history";

/// Most entries kept.
pub const HISTORY_LIMIT: usize = 10;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),
}

// ---------------------------------------------------------------------------
// Storage backends
// ---------------------------------------------------------------------------

/// Key-value string storage. The history only ever touches one key.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `~/.config/ghcard`, or the working directory when there is no home.
    pub fn default_location() -> Self {
        let dir = crate::config::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(dir)
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Process-local storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RefCell<HashMap<String, String>>,
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// History store
// ---------------------------------------------------------------------------

/// Most-recent-first list of looked-up identifiers, unique and capped at
/// [`HISTORY_LIMIT`]. Storage is read once when the store is opened; every
/// change is written straight through. Storage failures are logged and
/// otherwise ignored.
#[derive(Debug)]
pub struct HistoryStore<S> {
    storage: S,
    entries: Vec<String>,
}

impl<S: Storage> HistoryStore<S> {
    pub fn new(storage: S) -> Self {
        let entries = load(&storage);
        Self { storage, entries }
    }

    /// Current entries, most recent first.
    pub fn list(&self) -> &[String] {
        &self.entries
    }

    /// Move `identifier` to the front (exact, case-sensitive match) and trim.
    pub fn record(&mut self, identifier: &str) {
        self.entries.retain(|e| e != identifier);
        self.entries.insert(0, identifier.to_string());
        self.entries.truncate(HISTORY_LIMIT);
        self.write();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        if let Err(e) = self.storage.remove(HISTORY_KEY) {
            tracing::warn!("clearing history failed: {e}");
        }
    }

    fn write(&self) {
        let json = match serde_json::to_string(&self.entries) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("encoding history failed: {e}");
                return;
            }
        };
        if let Err(e) = self.storage.set(HISTORY_KEY, &json) {
            tracing::warn!("saving history failed: {e}");
        }
    }
}

/// Stored entries. Missing or unreadable data reads as empty.
fn load(storage: &impl Storage) -> Vec<String> {
    let raw = match storage.get(HISTORY_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!("reading history failed: {e}");
            return Vec::new();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!("discarding corrupt history: {e}");
        Vec::new()
    })
}
