//! Error types for the storage seam.
//!
//! The flag store itself never fails: it falls back to defaults on bad
//! input and logs write failures. [`StorageError`] surfaces only from the
//! [`KeyValueStore`](crate::storage::KeyValueStore) implementations and
//! from [`FlagStore::save`](crate::store::FlagStore::save).

/// Errors that can occur while reading or writing the local key-value store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backing file could not be read or written.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store is not available in this environment (no window, storage
    /// disabled by the browser, ...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
