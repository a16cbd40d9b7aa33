//! IndexedDB blob store for WebAssembly.
//!
//! Video payloads are stored as `Blob`s keyed by the id of the scene object
//! that references them, and resolved to object URLs for playback.

use super::{BlobStore, BoxFuture, StorageError, StorageResult};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, IdbDatabase, IdbObjectStore, IdbRequest, IdbTransactionMode};

const DB_NAME: &str = "videoDB";
const DB_VERSION: u32 = 1;
const STORE_NAME: &str = "videos";

/// IndexedDB-backed blob store.
///
/// Note: This is intentionally not Send/Sync since WASM is single-threaded
/// and IndexedDB handles are not thread-safe.
pub struct IndexedDbBlobStore {
    db: Rc<RefCell<Option<IdbDatabase>>>,
}

impl IndexedDbBlobStore {
    /// The connection is opened lazily on first use.
    pub fn new() -> Self {
        Self {
            db: Rc::new(RefCell::new(None)),
        }
    }

    async fn get_db(&self) -> StorageResult<IdbDatabase> {
        if let Some(db) = self.db.borrow().as_ref() {
            return Ok(db.clone());
        }

        let window = web_sys::window()
            .ok_or_else(|| StorageError::Other("No window object".to_string()))?;
        let idb_factory = window
            .indexed_db()
            .map_err(|e| StorageError::Other(format!("IndexedDB error: {:?}", e)))?
            .ok_or_else(|| StorageError::Other("IndexedDB not available".to_string()))?;
        let open_request = idb_factory
            .open_with_u32(DB_NAME, DB_VERSION)
            .map_err(|e| StorageError::Other(format!("Failed to open DB: {:?}", e)))?;

        let onupgrade = Closure::once(Box::new(move |event: web_sys::IdbVersionChangeEvent| {
            let Some(target) = event.target() else {
                return;
            };
            let request: IdbRequest = target.unchecked_into();
            let Ok(result) = request.result() else {
                return;
            };
            let db: IdbDatabase = result.unchecked_into();
            if !db.object_store_names().contains(STORE_NAME) {
                if let Err(e) = db.create_object_store(STORE_NAME) {
                    log::error!("Failed to create object store: {:?}", e);
                }
            }
        }) as Box<dyn FnOnce(_)>);
        open_request.set_onupgradeneeded(Some(onupgrade.as_ref().unchecked_ref()));
        onupgrade.forget();

        let db = await_idb_request::<IdbDatabase>(&open_request).await?;
        *self.db.borrow_mut() = Some(db.clone());
        Ok(db)
    }

    fn get_store(&self, db: &IdbDatabase, mode: IdbTransactionMode) -> StorageResult<IdbObjectStore> {
        let transaction = db
            .transaction_with_str_and_mode(STORE_NAME, mode)
            .map_err(|e| StorageError::Other(format!("Transaction error: {:?}", e)))?;
        transaction
            .object_store(STORE_NAME)
            .map_err(|e| StorageError::Other(format!("Store error: {:?}", e)))
    }
}

impl Default for IndexedDbBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

fn to_blob(data: &[u8], mime: &str) -> StorageResult<Blob> {
    let bytes = js_sys::Uint8Array::from(data);
    let parts = js_sys::Array::of1(&bytes);
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|e| StorageError::Serialization(format!("Blob error: {:?}", e)))
}

impl BlobStore for IndexedDbBlobStore {
    fn save(&self, id: &str, data: &[u8], mime: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let blob = to_blob(data, mime);
        Box::pin(async move {
            let blob = blob?;
            let db = self.get_db().await?;
            let store = self.get_store(&db, IdbTransactionMode::Readwrite)?;
            let request = store
                .put_with_key(&blob, &JsValue::from_str(&id))
                .map_err(|e| StorageError::Other(format!("Put error: {:?}", e)))?;
            await_idb_request::<JsValue>(&request).await?;
            Ok(())
        })
    }

    fn resolve(&self, id: &str) -> BoxFuture<'_, StorageResult<Option<String>>> {
        let id = id.to_string();
        Box::pin(async move {
            let db = self.get_db().await?;
            let store = self.get_store(&db, IdbTransactionMode::Readonly)?;
            let request = store
                .get(&JsValue::from_str(&id))
                .map_err(|e| StorageError::Other(format!("Get error: {:?}", e)))?;
            let result = await_idb_request::<JsValue>(&request).await?;
            if result.is_undefined() || result.is_null() {
                return Ok(None);
            }
            let blob: Blob = result
                .dyn_into()
                .map_err(|_| StorageError::Serialization("Stored value is not a Blob".to_string()))?;
            web_sys::Url::create_object_url_with_blob(&blob)
                .map(Some)
                .map_err(|e| StorageError::Other(format!("Object URL error: {:?}", e)))
        })
    }

    fn copy(&self, from: &str, to: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let (from, to) = (from.to_string(), to.to_string());
        Box::pin(async move {
            let db = self.get_db().await?;
            let store = self.get_store(&db, IdbTransactionMode::Readonly)?;
            let request = store
                .get(&JsValue::from_str(&from))
                .map_err(|e| StorageError::Other(format!("Get error: {:?}", e)))?;
            let blob = await_idb_request::<JsValue>(&request).await?;
            if blob.is_undefined() || blob.is_null() {
                return Ok(false);
            }
            let store = self.get_store(&db, IdbTransactionMode::Readwrite)?;
            let request = store
                .put_with_key(&blob, &JsValue::from_str(&to))
                .map_err(|e| StorageError::Other(format!("Put error: {:?}", e)))?;
            await_idb_request::<JsValue>(&request).await?;
            Ok(true)
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let db = self.get_db().await?;
            let store = self.get_store(&db, IdbTransactionMode::Readwrite)?;
            let request = store
                .delete(&JsValue::from_str(&id))
                .map_err(|e| StorageError::Other(format!("Delete error: {:?}", e)))?;
            await_idb_request::<JsValue>(&request).await?;
            Ok(())
        })
    }
}

/// Await an IndexedDB request through a Promise.
async fn await_idb_request<T: JsCast>(request: &IdbRequest) -> StorageResult<T> {
    use wasm_bindgen_futures::JsFuture;

    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        let onsuccess = Closure::once(Box::new(move |event: web_sys::Event| {
            let result = event
                .target()
                .map(|t| t.unchecked_into::<IdbRequest>())
                .and_then(|r| r.result().ok())
                .unwrap_or(JsValue::UNDEFINED);
            let _ = resolve.call1(&JsValue::NULL, &result);
        }) as Box<dyn FnOnce(_)>);

        let onerror = Closure::once(Box::new(move |_event: web_sys::Event| {
            let _ = reject.call1(
                &JsValue::NULL,
                &JsValue::from_str("IndexedDB request failed"),
            );
        }) as Box<dyn FnOnce(_)>);

        request.set_onsuccess(Some(onsuccess.as_ref().unchecked_ref()));
        request.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onsuccess.forget();
        onerror.forget();
    });

    JsFuture::from(promise)
        .await
        .map_err(|e| StorageError::Other(format!("IndexedDB request failed: {:?}", e)))?
        .dyn_into::<T>()
        .map_err(|_| StorageError::Other("Type conversion failed".to_string()))
}
