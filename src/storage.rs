//! Durable key-value storage for study-buddy
//!
//! Three records live under fixed keys:
//!
//! ```text
//! <data dir>/
//!   buddy.toml                    # Optional configuration
//!   study-buddy-users.json        # JSON array of accounts
//!   study-buddy-tasks.json        # JSON array of task items
//!   study-buddy-session.json      # Current session, absent when logged out
//! ```
//!
//! Callers in the data layer never see storage errors: [`load_record`],
//! [`save_record`] and [`erase_record`] log and swallow them.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{de::DeserializeOwned, Serialize};

use crate::config::{Config, StorageBackend};
use crate::error::{Error, Result};
use crate::lock;

/// Key of the accounts collection
pub const ACCOUNTS_KEY: &str = "study-buddy-users";

/// Key of the tasks collection
pub const TASKS_KEY: &str = "study-buddy-tasks";

/// Key of the session record
pub const SESSION_KEY: &str = "study-buddy-session";

/// A string-keyed store of string values that outlives the process
/// (or, for [`MemoryStore`], pretends to).
pub trait KeyValueStore {
    /// Read the value under `key`, `None` if never set or removed.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the value under `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<()>;

    /// Whether values survive the process.
    fn is_durable(&self) -> bool;
}

/// Shared handle to the store, handed to the data store and session manager.
pub type StoreHandle = Rc<dyn KeyValueStore>;

/// One JSON file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    lock_timeout_ms: u64,
}

impl FileStore {
    /// Open (creating if needed) the data directory.
    pub fn open(dir: impl Into<PathBuf>, lock_timeout_ms: u64) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let metadata = fs::metadata(&dir)?;
        if !metadata.is_dir() {
            return Err(Error::StorageUnavailable(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        if metadata.permissions().readonly() {
            return Err(Error::StorageUnavailable(format!(
                "{} is read-only",
                dir.display()
            )));
        }

        Ok(Self {
            dir,
            lock_timeout_ms,
        })
    }

    /// Data directory backing this store
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the value for `key`
    pub fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        lock::read_locked_str(self.record_path(key), self.lock_timeout_ms)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        lock::write_atomic_locked(self.record_path(key), value.as_bytes(), self.lock_timeout_ms)
    }

    fn remove(&self, key: &str) -> Result<()> {
        lock::remove_locked(self.record_path(key), self.lock_timeout_ms)
    }

    fn is_durable(&self) -> bool {
        true
    }
}

/// Process-local store. Used in tests and when no durable store opens.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }
}

/// Backend whose every call fails, for exercising the log-and-continue paths.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FailingStore;

#[cfg(test)]
impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(Error::StorageUnavailable("read refused".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(Error::StorageUnavailable("write refused".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Err(Error::StorageUnavailable("remove refused".to_string()))
    }

    fn is_durable(&self) -> bool {
        true
    }
}

/// Open the backend named by `config` in `data_dir`.
///
/// If the file store cannot be opened the process runs on a fresh
/// [`MemoryStore`] instead; nothing is persisted in that case.
pub fn open_store(config: &Config, data_dir: &Path) -> StoreHandle {
    match config.storage.backend {
        StorageBackend::Memory => Rc::new(MemoryStore::new()),
        StorageBackend::File => {
            match FileStore::open(data_dir, config.storage.lock_timeout_ms) {
                Ok(store) => {
                    tracing::debug!(dir = %store.dir().display(), "opened file store");
                    Rc::new(store)
                }
                Err(err) => {
                    tracing::warn!(
                        dir = %data_dir.display(),
                        error = %err,
                        "durable storage unavailable; running in memory"
                    );
                    Rc::new(MemoryStore::new())
                }
            }
        }
    }
}

/// Decode the JSON record under `key`.
///
/// Missing, unreadable and undecodable records all yield `None`; the
/// latter two are logged.
pub fn load_record<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!(key, error = %err, "failed to read record");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key, error = %err, "discarding undecodable record");
            None
        }
    }
}

/// Serialize `value` under `key`. Failures are logged, not returned.
pub fn save_record<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(Error::from)
        .and_then(|json| store.set(key, &json));
    if let Err(err) = result {
        tracing::warn!(key, error = %err, "failed to persist record");
    }
}

/// Remove the record under `key`. Failures are logged, not returned.
pub fn erase_record(store: &dyn KeyValueStore, key: &str) {
    if let Err(err) = store.remove(key) {
        tracing::warn!(key, error = %err, "failed to erase record");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        assert!(!store.is_durable());
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path(), 500).unwrap();
        store.set(TASKS_KEY, "[]").unwrap();
        assert!(store.record_path(TASKS_KEY).exists());

        let reopened = FileStore::open(dir.path(), 500).unwrap();
        assert_eq!(reopened.get(TASKS_KEY).unwrap().as_deref(), Some("[]"));

        reopened.remove(TASKS_KEY).unwrap();
        assert_eq!(store.get(TASKS_KEY).unwrap(), None);
    }

    #[test]
    fn file_store_rejects_plain_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("not-a-dir");
        fs::write(&file, "x").unwrap();

        assert!(FileStore::open(&file, 500).is_err());
    }

    #[test]
    fn open_store_falls_back_to_memory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("not-a-dir");
        fs::write(&file, "x").unwrap();

        let store = open_store(&Config::default(), &file);
        assert!(!store.is_durable());
        store.set(ACCOUNTS_KEY, "[]").unwrap();
    }

    #[test]
    fn open_store_honours_memory_backend() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage.backend = StorageBackend::Memory;

        let store = open_store(&config, dir.path());
        assert!(!store.is_durable());
    }

    #[test]
    fn undecodable_record_loads_as_none() {
        let store = MemoryStore::new();
        store.set(TASKS_KEY, "{not json").unwrap();
        let loaded: Option<Vec<String>> = load_record(&store, TASKS_KEY);
        assert!(loaded.is_none());
    }

    #[test]
    fn failing_backend_errors_are_swallowed() {
        let store = FailingStore;
        let loaded: Option<Vec<String>> = load_record(&store, TASKS_KEY);
        assert!(loaded.is_none());
        save_record(&store, TASKS_KEY, &vec!["a"]);
        erase_record(&store, SESSION_KEY);
    }

    #[test]
    fn save_then_load_record() {
        let store = MemoryStore::new();
        save_record(&store, ACCOUNTS_KEY, &vec!["a", "b"]);
        let loaded: Option<Vec<String>> = load_record(&store, ACCOUNTS_KEY);
        assert_eq!(loaded, Some(vec!["a".to_string(), "b".to_string()]));

        erase_record(&store, ACCOUNTS_KEY);
        assert_eq!(store.get(ACCOUNTS_KEY).unwrap(), None);
    }
}
