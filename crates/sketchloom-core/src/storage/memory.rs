//! In-memory stores for tests and ephemeral sessions.

use super::{BlobStore, BoxFuture, KeyValueStore, StorageError, StorageResult};
use base64::{Engine, engine::general_purpose::STANDARD};
use std::collections::HashMap;
use std::sync::RwLock;

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

/// In-memory key-value store.
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let values = self.values.read().map_err(lock_error)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut values = self.values.write().map_err(lock_error)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut values = self.values.write().map_err(lock_error)?;
        values.remove(key);
        Ok(())
    }
}

/// In-memory blob store. Resolves payloads to inline data URLs.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, (String, Vec<u8>)>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.read().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlobStore for MemoryBlobStore {
    fn save(&self, id: &str, data: &[u8], mime: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let entry = (mime.to_string(), data.to_vec());
        Box::pin(async move {
            let mut blobs = self.blobs.write().map_err(lock_error)?;
            blobs.insert(id, entry);
            Ok(())
        })
    }

    fn resolve(&self, id: &str) -> BoxFuture<'_, StorageResult<Option<String>>> {
        let id = id.to_string();
        Box::pin(async move {
            let blobs = self.blobs.read().map_err(lock_error)?;
            Ok(blobs
                .get(&id)
                .map(|(mime, data)| format!("data:{};base64,{}", mime, STANDARD.encode(data))))
        })
    }

    fn copy(&self, from: &str, to: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let (from, to) = (from.to_string(), to.to_string());
        Box::pin(async move {
            let mut blobs = self.blobs.write().map_err(lock_error)?;
            let Some(entry) = blobs.get(&from).cloned() else {
                return Ok(false);
            };
            blobs.insert(to, entry);
            Ok(true)
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut blobs = self.blobs.write().map_err(lock_error)?;
            blobs.remove(&id);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("missing").unwrap(), None);

        store.set("historyIndex", "3").unwrap();
        assert_eq!(store.get("historyIndex").unwrap().as_deref(), Some("3"));

        store.set("historyIndex", "4").unwrap();
        assert_eq!(store.get("historyIndex").unwrap().as_deref(), Some("4"));

        store.remove("historyIndex").unwrap();
        assert_eq!(store.get("historyIndex").unwrap(), None);
        store.remove("historyIndex").unwrap();
    }

    #[test]
    fn test_memory_blob_store() {
        let store = MemoryBlobStore::new();
        assert!(pollster::block_on(store.resolve("v1")).unwrap().is_none());

        pollster::block_on(store.save("v1", b"abc", "video/mp4")).unwrap();
        assert_eq!(store.len(), 1);
        let url = pollster::block_on(store.resolve("v1")).unwrap().unwrap();
        assert_eq!(url, "data:video/mp4;base64,YWJj");

        pollster::block_on(store.delete("v1")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_blob_copy() {
        let store = MemoryBlobStore::new();
        assert!(!pollster::block_on(store.copy("v1", "v2")).unwrap());

        pollster::block_on(store.save("v1", b"abc", "video/mp4")).unwrap();
        assert!(pollster::block_on(store.copy("v1", "v2")).unwrap());
        pollster::block_on(store.delete("v1")).unwrap();
        let url = pollster::block_on(store.resolve("v2")).unwrap().unwrap();
        assert_eq!(url, "data:video/mp4;base64,YWJj");
    }
}
