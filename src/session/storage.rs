//! Storage providers and session bootstrap.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use thiserror::Error;
use uuid::Uuid;

/// Storage key the session id lives under.
pub const SESSION_STORAGE_KEY: &str = "chatWidgetSessionId";

/// Number of base-36 characters after the `session-` prefix.
const SESSION_SUFFIX_LEN: usize = 9;

/// Errors raised while persisting storage entries.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file does not hold a JSON object of strings.
    #[error("storage JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Minimal local-storage interface.
///
/// Reads never fail: a missing or unreadable entry is simply absent.
pub trait StorageProvider: Send + Sync {
    /// Look up a stored string.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store a string under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageProvider for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage persisted as a flat JSON object in a single file.
///
/// The whole file is rewritten on every `set_item`. Entries written by other
/// processes are picked up on the next read.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileStorage {
    /// Create a store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl StorageProvider for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let _guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);
        match self.load() {
            Ok(mut items) => items.remove(key),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read storage file");
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        // A corrupt file is replaced rather than blocking every future write.
        let mut items = self.load().unwrap_or_default();
        items.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&items)?)?;
        Ok(())
    }
}

/// Return the stored session id, creating and persisting one if absent.
///
/// A failed write is logged and the fresh id is still returned, so the
/// current widget keeps working for the lifetime of the process.
pub fn get_or_create_session_id(storage: &dyn StorageProvider) -> String {
    if let Some(id) = storage.get_item(SESSION_STORAGE_KEY) {
        return id;
    }

    let id = new_session_id();
    if let Err(e) = storage.set_item(SESSION_STORAGE_KEY, &id) {
        tracing::warn!(error = %e, "Failed to persist session id");
    } else {
        tracing::debug!(session_id = %id, "Created new session id");
    }
    id
}

/// `session-` followed by random lowercase base-36 characters.
// `n % 36` always fits in a usize.
#[allow(clippy::cast_possible_truncation)]
fn new_session_id() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut n = Uuid::new_v4().as_u128();
    let mut id = String::with_capacity("session-".len() + SESSION_SUFFIX_LEN);
    id.push_str("session-");
    for _ in 0..SESSION_SUFFIX_LEN {
        id.push(char::from(ALPHABET[(n % 36) as usize]));
        n /= 36;
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_format() {
        let id = new_session_id();
        let suffix = id.strip_prefix("session-").unwrap();
        assert_eq!(suffix.len(), SESSION_SUFFIX_LEN);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
        );
    }

    #[test]
    fn test_session_id_is_reused() {
        let storage = MemoryStorage::new();
        assert!(storage.is_empty());

        let first = get_or_create_session_id(&storage);
        let second = get_or_create_session_id(&storage);
        assert_eq!(first, second);
        assert_eq!(storage.len(), 1);
        assert_eq!(storage.get_item(SESSION_STORAGE_KEY).unwrap(), first);
    }

    #[test]
    fn test_existing_id_is_kept() {
        let storage = MemoryStorage::new();
        storage.set_item(SESSION_STORAGE_KEY, "session-abc").unwrap();
        assert_eq!(get_or_create_session_id(&storage), "session-abc");
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("local-storage.json");

        let first = get_or_create_session_id(&FileStorage::new(&path));
        assert!(path.exists());

        let second = get_or_create_session_id(&FileStorage::new(&path));
        assert_eq!(first, second);
    }

    #[test]
    fn test_file_storage_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("store.json"));

        storage.set_item("theme", "dark").unwrap();
        storage.set_item(SESSION_STORAGE_KEY, "session-1").unwrap();

        assert_eq!(storage.get_item("theme").as_deref(), Some("dark"));
        assert_eq!(
            storage.get_item(SESSION_STORAGE_KEY).as_deref(),
            Some("session-1")
        );
    }

    #[test]
    fn test_corrupt_file_reads_as_empty_and_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").unwrap();

        let storage = FileStorage::new(&path);
        assert!(storage.get_item(SESSION_STORAGE_KEY).is_none());

        let id = get_or_create_session_id(&storage);
        assert_eq!(storage.get_item(SESSION_STORAGE_KEY), Some(id));
    }
}
