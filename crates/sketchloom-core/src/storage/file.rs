//! File-based stores for native platforms.

use super::{BlobStore, BoxFuture, KeyValueStore, StorageError, StorageResult, sanitize_id};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

fn ensure_dir(path: &Path) -> StorageResult<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| {
            StorageError::Io(format!("Failed to create storage directory: {}", e))
        })?;
    }
    Ok(())
}

/// Key-value store keeping one file per key in a directory.
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `base_path`, creating the directory if needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        ensure_dir(&base_path)?;
        Ok(Self { base_path })
    }

    /// Create a store in the default location.
    ///
    /// On Unix: `~/.local/share/sketchloom/session/`
    /// On Windows: `%LOCALAPPDATA%\sketchloom\session\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("sketchloom").join("session"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", sanitize_id(key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.key_path(key);
        fs::write(&path, value)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.key_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

/// Blob store writing each payload to its own file. Resolves to `file://` URLs.
pub struct FileBlobStore {
    base_path: PathBuf,
}

impl FileBlobStore {
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        ensure_dir(&base_path)?;
        Ok(Self { base_path })
    }

    fn blob_path(&self, id: &str) -> PathBuf {
        self.base_path.join(format!("{}.blob", sanitize_id(id)))
    }
}

impl BlobStore for FileBlobStore {
    fn save(&self, id: &str, data: &[u8], _mime: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.blob_path(id);
        let data = data.to_vec();
        Box::pin(async move {
            fs::write(&path, data).map_err(|e| {
                StorageError::Io(format!("Failed to write {}: {}", path.display(), e))
            })
        })
    }

    fn resolve(&self, id: &str) -> BoxFuture<'_, StorageResult<Option<String>>> {
        let path = self.blob_path(id);
        Box::pin(async move {
            if !path.is_file() {
                return Ok(None);
            }
            let absolute = path.canonicalize().map_err(|e| {
                StorageError::Io(format!("Failed to resolve {}: {}", path.display(), e))
            })?;
            Ok(Some(format!("file://{}", absolute.display())))
        })
    }

    fn copy(&self, from: &str, to: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let source = self.blob_path(from);
        let target = self.blob_path(to);
        Box::pin(async move {
            if !source.is_file() {
                return Ok(false);
            }
            fs::copy(&source, &target).map_err(|e| {
                StorageError::Io(format!("Failed to copy {}: {}", source.display(), e))
            })?;
            Ok(true)
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.blob_path(id);
        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_set_get() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();

        assert_eq!(store.get("canvasHistory").unwrap(), None);
        store.set("canvasHistory", "[]").unwrap();
        assert_eq!(store.get("canvasHistory").unwrap().as_deref(), Some("[]"));

        // A second handle on the same directory sees the value.
        let reopened = FileStore::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.get("canvasHistory").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_store_remove() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        store.remove("k").unwrap();
    }

    #[test]
    fn test_file_store_sanitizes_key() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        store.set("../escape:key", "x").unwrap();
        assert_eq!(store.get("../escape:key").unwrap().as_deref(), Some("x"));
        assert!(dir.path().join("___escape_key.json").exists());
    }

    #[test]
    fn test_file_blob_store() {
        let dir = tempdir().unwrap();
        let store = FileBlobStore::new(dir.path().join("blobs")).unwrap();

        assert!(pollster::block_on(store.resolve("clip")).unwrap().is_none());
        pollster::block_on(store.save("clip", b"bytes", "video/webm")).unwrap();

        let url = pollster::block_on(store.resolve("clip")).unwrap().unwrap();
        assert!(url.starts_with("file://"));
        assert!(url.ends_with("clip.blob"));

        pollster::block_on(store.delete("clip")).unwrap();
        assert!(pollster::block_on(store.resolve("clip")).unwrap().is_none());
    }

    #[test]
    fn test_file_blob_copy_survives_source_delete() {
        let dir = tempdir().unwrap();
        let store = FileBlobStore::new(dir.path().to_path_buf()).unwrap();
        assert!(!pollster::block_on(store.copy("clip", "copy")).unwrap());

        pollster::block_on(store.save("clip", b"bytes", "video/webm")).unwrap();
        assert!(pollster::block_on(store.copy("clip", "copy")).unwrap());
        pollster::block_on(store.delete("clip")).unwrap();
        assert_eq!(std::fs::read(dir.path().join("copy.blob")).unwrap(), b"bytes");
    }
}
