//! Durable key-value storage and media blob storage.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(target_arch = "wasm32")]
mod indexeddb;
#[cfg(target_arch = "wasm32")]
mod local;

pub use memory::{MemoryBlobStore, MemoryStore};

#[cfg(not(target_arch = "wasm32"))]
pub use file::{FileBlobStore, FileStore};

#[cfg(target_arch = "wasm32")]
pub use indexeddb::IndexedDbBlobStore;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorageStore;

use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// String key-value store with the semantics of browser local storage.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// String key-value store (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Store for media payloads referenced from scene objects by id.
#[cfg(not(target_arch = "wasm32"))]
pub trait BlobStore: Send + Sync {
    /// Persist `data` under `id`, replacing any previous payload.
    fn save(&self, id: &str, data: &[u8], mime: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Produce a URL the media can be played from, or `None` when no payload
    /// is stored under `id`.
    fn resolve(&self, id: &str) -> BoxFuture<'_, StorageResult<Option<String>>>;

    /// Store the payload of `from` under `to` as well. Returns false when
    /// nothing is stored under `from`.
    fn copy(&self, from: &str, to: &str) -> BoxFuture<'_, StorageResult<bool>>;

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;
}

/// Store for media payloads (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait BlobStore {
    fn save(&self, id: &str, data: &[u8], mime: &str) -> BoxFuture<'_, StorageResult<()>>;

    fn resolve(&self, id: &str) -> BoxFuture<'_, StorageResult<Option<String>>>;

    fn copy(&self, from: &str, to: &str) -> BoxFuture<'_, StorageResult<bool>>;

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;
}

/// Map an id onto a filename-safe string.
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
pub(crate) fn sanitize_id(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Default durable store for the current platform.
#[cfg(not(target_arch = "wasm32"))]
pub fn create_default_store() -> StorageResult<FileStore> {
    FileStore::default_location()
}

/// Default durable store for the current platform.
#[cfg(target_arch = "wasm32")]
pub fn create_default_store() -> StorageResult<LocalStorageStore> {
    LocalStorageStore::new()
}
