//! Local key-value persistence.
//!
//! The page persists its flags the way a browser's `localStorage` does: a
//! flat map of string keys to string values. [`KeyValueStore`] is that
//! contract; the flag store reads and writes a single JSON-encoded record
//! through it.
//!
//! # Implementations
//!
//! | Type | Backing |
//! |------|---------|
//! | [`MemoryStorage`] | In-process map, lost on exit |
//! | [`FileStorage`] | JSON object file, atomically replaced on every write |
//! | `web::LocalStorage` | `window.localStorage` (feature `web`) |

use std::collections::BTreeMap;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;

/// A string-keyed store of string values.
pub trait KeyValueStore {
    /// Read the value stored at `key`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` at `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be written.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value at `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be written.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &mut T {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

// =========================================================================
// JSON helpers
// =========================================================================

/// Read the value at `key` and deserialize it from JSON.
///
/// Returns `Ok(None)` when the key is absent.
///
/// # Errors
///
/// Returns [`StorageError::Serialization`] if the value is not valid JSON
/// for `T`, or the store's own error if the read fails.
pub fn load_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    store
        .get_item(key)?
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(StorageError::from)
}

/// Serialize `value` as JSON and store it at `key`.
///
/// # Errors
///
/// Returns [`StorageError::Serialization`] if serialization fails, or the
/// store's own error if the write fails.
pub fn save_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string(value)?;
    store.set_item(key, &json)
}

// =========================================================================
// MemoryStorage
// =========================================================================

/// An in-process key-value store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    /// Create a store holding a single entry.
    pub fn with_item(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut items = BTreeMap::new();
        items.insert(key.into(), value.into());
        Self { items }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

// =========================================================================
// FileStorage
// =========================================================================

/// A key-value store persisted as a single JSON object file.
///
/// The file is read once on [`open`](Self::open) and replaced in full on
/// every mutation. Each write goes to a temporary file in the same
/// directory which is then renamed over the old one, so the file on disk is
/// always a complete record. A missing file opens as an empty store; its
/// parent directory is created on the first write.
///
/// The in-memory map only changes once the write has succeeded.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the file exists but cannot be read,
    /// or [`StorageError::Serialization`] if it is not a JSON object of
    /// strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let items = match std::fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), entries = items.len(), "opened file storage");
        Ok(Self { path, items })
    }

    /// Open the store at `path`, starting empty if the file is corrupt.
    ///
    /// The corrupt file is left in place until the first write replaces it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the file exists but cannot be read.
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        match Self::open(path.clone()) {
            Err(StorageError::Serialization(e)) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "storage file is corrupt, starting from an empty store"
                );
                Ok(Self {
                    path,
                    items: BTreeMap::new(),
                })
            }
            other => other,
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                std::fs::create_dir_all(parent)?;
                parent
            }
            None => Path::new("."),
        };
        let json = serde_json::to_string_pretty(items)?;

        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        file.write_all(json.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(std::io::Error::from)?;
        Ok(())
    }
}

impl KeyValueStore for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.clone();
        items.insert(key.to_owned(), value.to_owned());
        self.flush(&items)?;
        self.items = items;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        if !self.items.contains_key(key) {
            return Ok(());
        }
        let mut items = self.items.clone();
        items.remove(key);
        self.flush(&items)?;
        self.items = items;
        Ok(())
    }
}
