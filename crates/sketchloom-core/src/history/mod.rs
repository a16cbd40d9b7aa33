//! Snapshot-based undo/redo with durable persistence.
//!
//! The log is a linear sequence of full-scene snapshots with a cursor at the
//! displayed state. Every push discards the redo branch. The whole log and
//! the cursor are written to the key-value store after each change so a
//! session survives reloads; write failures only cost durability.

mod debounce;

pub use debounce::{Debouncer, Instant};

use crate::config::{BG_COLOR_KEY, HISTORY_INDEX_KEY, HISTORY_KEY};
use crate::media::resolve_video_placeholders;
use crate::scene::Scene;
use crate::shapes::SerializableColor;
use crate::storage::{BlobStore, KeyValueStore};
use serde_json::Value;
use std::sync::Arc;

/// How a session was brought back from the durable store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// A persisted log was loaded and the scene shows the snapshot at `index`.
    Restored { index: usize, len: usize },
    /// Nothing usable was stored; the log holds one snapshot of the current scene.
    Fresh,
}

/// Undo/redo log over scene snapshots.
pub struct HistoryManager {
    log: Vec<Value>,
    index: usize,
    restoring: bool,
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for HistoryManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryManager")
            .field("len", &self.log.len())
            .field("index", &self.index)
            .field("restoring", &self.restoring)
            .finish()
    }
}

impl HistoryManager {
    /// Create an empty log persisting to `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            log: Vec::new(),
            index: 0,
            restoring: false,
            store,
        }
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// The cursor. Meaningful only when the log is non-empty.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn snapshots(&self) -> &[Value] {
        &self.log
    }

    /// Snapshot at the cursor.
    pub fn current(&self) -> Option<&Value> {
        self.log.get(self.index)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.log.len()
    }

    /// True while an undo, redo or restore is loading a snapshot.
    pub fn is_restoring(&self) -> bool {
        self.restoring
    }

    /// Record the scene's current state.
    ///
    /// A snapshot equal to the one at the cursor is not recorded. Returns
    /// whether the log grew.
    pub fn push_state(&mut self, scene: &Scene) -> bool {
        let snapshot = scene.snapshot();
        if self.current() == Some(&snapshot) {
            return false;
        }
        if !self.log.is_empty() {
            self.log.truncate(self.index + 1);
        }
        self.log.push(snapshot);
        self.index = self.log.len() - 1;
        log::debug!("History push: {} entries, cursor {}", self.log.len(), self.index);
        self.persist();
        true
    }

    /// [`push_state`](Self::push_state) unless a snapshot is being restored.
    pub fn safe_push(&mut self, scene: &Scene) -> bool {
        if self.restoring {
            log::debug!("History push suppressed during restore");
            return false;
        }
        self.push_state(scene)
    }

    /// Step back one snapshot. Returns false when there is nothing to undo.
    pub async fn undo(&mut self, scene: &mut Scene, blobs: &dyn BlobStore) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.index -= 1;
        log::info!("Undo to {}/{}", self.index + 1, self.log.len());
        self.restore_current(scene, blobs).await;
        self.persist_index();
        true
    }

    /// Step forward one snapshot. Returns false when there is nothing to redo.
    pub async fn redo(&mut self, scene: &mut Scene, blobs: &dyn BlobStore) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.index += 1;
        log::info!("Redo to {}/{}", self.index + 1, self.log.len());
        self.restore_current(scene, blobs).await;
        self.persist_index();
        true
    }

    /// Collapse the log to a single snapshot of the current scene.
    pub fn reset_history(&mut self, scene: &Scene) {
        self.log = vec![scene.snapshot()];
        self.index = 0;
        log::debug!("History reset");
        self.persist();
    }

    /// Load the persisted log and show the snapshot at the persisted cursor.
    ///
    /// Missing or corrupt data (unparseable JSON, an empty log, an
    /// out-of-range cursor) falls back to a single snapshot of the current
    /// scene. A saved background colour is applied either way.
    pub async fn restore_from_storage(
        &mut self,
        scene: &mut Scene,
        blobs: &dyn BlobStore,
    ) -> RestoreOutcome {
        let outcome = match self.load_persisted() {
            Some((log, index)) => {
                self.log = log;
                self.index = index;
                self.restore_current(scene, blobs).await;
                log::info!("Restored history: {} entries, cursor {}", self.log.len(), index);
                RestoreOutcome::Restored {
                    index,
                    len: self.log.len(),
                }
            }
            None => {
                self.reset_history(scene);
                RestoreOutcome::Fresh
            }
        };

        match self.store.get(BG_COLOR_KEY) {
            Ok(Some(hex)) => match SerializableColor::from_hex(&hex) {
                Some(color) => scene.set_background(color),
                None => log::warn!("Ignoring invalid saved background colour {:?}", hex),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Failed to read saved background colour: {}", e),
        }
        outcome
    }

    fn load_persisted(&self) -> Option<(Vec<Value>, usize)> {
        let raw = match self.store.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Failed to read history: {}", e);
                return None;
            }
        };
        let log: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(log) => log,
            Err(e) => {
                log::warn!("Discarding corrupt history: {}", e);
                return None;
            }
        };
        if log.is_empty() {
            return None;
        }
        let index = self
            .store
            .get(HISTORY_INDEX_KEY)
            .ok()
            .flatten()
            .and_then(|s| s.trim().parse::<usize>().ok());
        match index {
            Some(index) if index < log.len() => Some((log, index)),
            _ => {
                log::warn!("Discarding history with invalid cursor {:?}", index);
                None
            }
        }
    }

    async fn restore_current(&mut self, scene: &mut Scene, blobs: &dyn BlobStore) {
        let Some(snapshot) = self.log.get(self.index).cloned() else {
            return;
        };
        self.restoring = true;
        let dropped = scene.load_snapshot(&snapshot);
        if dropped > 0 {
            log::warn!("Dropped {} object(s) while restoring history", dropped);
        }
        resolve_video_placeholders(scene, blobs).await;
        scene.request_render();
        self.restoring = false;
    }

    fn persist(&self) {
        match serde_json::to_string(&self.log) {
            Ok(json) => {
                if let Err(e) = self.store.set(HISTORY_KEY, &json) {
                    log::warn!("Failed to persist history: {}", e);
                }
            }
            Err(e) => log::warn!("Failed to serialize history: {}", e),
        }
        self.persist_index();
    }

    fn persist_index(&self) {
        if let Err(e) = self.store.set(HISTORY_INDEX_KEY, &self.index.to_string()) {
            log::warn!("Failed to persist history index: {}", e);
        }
    }
}
