//! Persisted key-value storage for session state
//!
//! The API client reads the session token from a [`KeyValueStore`]; the
//! login, signup and logout flows write it. Two implementations ship here:
//!
//! - [`MemoryStore`]: process-local map, used by tests and one-shot calls
//! - [`FileStore`]: a single JSON object on disk with an in-memory copy
//!
//! # Example
//!
//! ```rust,ignore
//! use pressureguard_core::storage::{FileStore, KeyValueStore, AUTH_TOKEN_KEY};
//!
//! let store = FileStore::open_default()?;
//! store.set(AUTH_TOKEN_KEY, "abc123")?;
//! assert_eq!(store.get(AUTH_TOKEN_KEY)?.as_deref(), Some("abc123"));
//! ```

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Key under which the session token is persisted
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Key under which the signed-in user's display name is persisted
pub const USER_NAME_KEY: &str = "userName";

/// Default file name of the on-disk store
const STORE_FILE_NAME: &str = "session.json";

/// String key-value store shared between the client and the auth flows
///
/// Implementations must be safe to share across tasks. Reads are expected
/// to be cheap but may block on I/O.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `Ok(None)` if the key is absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value, returning whether it existed
    fn remove(&self, key: &str) -> Result<bool>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a session token
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut guard) = store.entries.write() {
            guard.insert(AUTH_TOKEN_KEY.to_string(), token.into());
        }
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let guard = self.entries.read().map_err(|_| Error::lock_poisoned())?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self.entries.write().map_err(|_| Error::lock_poisoned())?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let mut guard = self.entries.write().map_err(|_| Error::lock_poisoned())?;
        Ok(guard.remove(key).is_some())
    }
}

/// JSON-file-backed store
///
/// The whole file is rewritten on every mutation. The in-memory copy is
/// loaded once at open time; external edits to the file while the store
/// is open are not observed.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| Error::store_corrupt(&path).with_source(e))?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Open the store at the platform default location
    pub fn open_default() -> Result<Self> {
        Self::open(default_store_path())
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, data)
            .map_err(|e| Error::store_write(format!("Failed to write {}", self.path.display())).with_source(e))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let guard = self.entries.read().map_err(|_| Error::lock_poisoned())?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self.entries.write().map_err(|_| Error::lock_poisoned())?;
        guard.insert(key.to_string(), value.to_string());
        self.persist(&guard)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let mut guard = self.entries.write().map_err(|_| Error::lock_poisoned())?;
        let existed = guard.remove(key).is_some();
        if existed {
            self.persist(&guard)?;
        }
        Ok(existed)
    }
}

/// Default location of the on-disk session store
pub fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from(".local"))
        .join("pressureguard")
        .join(STORE_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);

        store.set(AUTH_TOKEN_KEY, "abc123").unwrap();
        assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("abc123"));

        assert!(store.remove(AUTH_TOKEN_KEY).unwrap());
        assert!(!store.remove(AUTH_TOKEN_KEY).unwrap());
        assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_memory_store_with_token() {
        let store = MemoryStore::with_token("t0k");
        assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("t0k"));
    }

    #[test]
    fn test_file_store_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileStore::open(&path).unwrap();
        store.set(AUTH_TOKEN_KEY, "abc123").unwrap();
        store.set(USER_NAME_KEY, "Mona").unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("abc123"));
        assert_eq!(reopened.get(USER_NAME_KEY).unwrap().as_deref(), Some("Mona"));
    }

    #[test]
    fn test_file_store_remove_is_persisted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let store = FileStore::open(&path).unwrap();
        store.set(AUTH_TOKEN_KEY, "abc123").unwrap();
        assert!(store.remove(AUTH_TOKEN_KEY).unwrap());

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(AUTH_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_empty_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert_eq!(err.code, ErrorCode::StoreCorrupt);
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_default_store_path() {
        let path = default_store_path();
        assert!(path.ends_with("pressureguard/session.json"));
    }
}
