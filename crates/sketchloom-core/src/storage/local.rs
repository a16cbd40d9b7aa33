//! Browser local storage backend.

use super::{KeyValueStore, StorageError, StorageResult};
use web_sys::Storage;

/// Key-value store over `window.localStorage`.
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    pub fn new() -> StorageResult<Self> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Other("No window object".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StorageError::Other(format!("localStorage error: {:?}", e)))?
            .ok_or_else(|| StorageError::Other("localStorage not available".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Other(format!("Get error: {:?}", e)))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        // Fails when the origin's quota is exhausted.
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Io(format!("Set error: {:?}", e)))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Other(format!("Remove error: {:?}", e)))
    }
}
