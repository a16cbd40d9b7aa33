//! The editing session: scene, layers, history and selection-derived state
//! behind one set of mutation entry points.
//!
//! Every entry point mutates the [`Scene`] and then drains its events:
//! added/removed objects schedule a debounced history push, modified
//! objects push immediately, moving/scaling objects snap to the grid when
//! snapping is on, and selection changes refresh [`UiState`]. Hosts call
//! [`Editor::tick`] from their event loop so debounced pushes fire.

mod commands;
mod factory;
mod properties;

pub use factory::OutlineShape;

use crate::config::EditorConfig;
use crate::export::{self, ExportArtifact, ExportEncoder, ExportResult};
use crate::history::{Debouncer, HistoryManager, Instant, RestoreOutcome};
use crate::layers::{Layer, LayerRegistry};
use crate::scene::{Scene, SceneEvent};
use crate::shapes::{ObjectKind, SceneObject, ShapeId};
use crate::snap::snap_object_to_grid;
use crate::storage::{BlobStore, KeyValueStore, MemoryBlobStore, MemoryStore};
use crate::viewport::Viewport;
use kurbo::{Size, Vec2};
use serde::Serialize;
use std::sync::Arc;

/// UI state derived from the active selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UiState {
    /// Layer highlighted in the layer panel; property edits apply to it.
    pub selected_layer: Option<ShapeId>,
    /// Rounded scaled size of a single active object.
    pub dimensions: Option<(f64, f64)>,
    /// Content of a single active text block.
    pub text: Option<String>,
}

/// An editing session.
pub struct Editor {
    config: EditorConfig,
    scene: Scene,
    layers: LayerRegistry,
    history: HistoryManager,
    blobs: Arc<dyn BlobStore>,
    debounce: Debouncer,
    viewport: Viewport,
    ui: UiState,
    clipboard: Option<SceneObject>,
    snap_to_grid: bool,
    grid_visible: bool,
}

impl Editor {
    /// Create a session over the given stores. The history is empty until
    /// [`restore`](Self::restore) or the first push.
    pub fn new(config: EditorConfig, store: Arc<dyn KeyValueStore>, blobs: Arc<dyn BlobStore>) -> Self {
        let scene = Scene::new(config.canvas_size(), config.background);
        let viewport = Viewport::new(config.min_zoom, config.max_zoom, config.zoom_step);
        let debounce = Debouncer::new(config.history_debounce());
        Self {
            scene,
            layers: LayerRegistry::new(),
            history: HistoryManager::new(store),
            blobs,
            debounce,
            viewport,
            ui: UiState::default(),
            clipboard: None,
            snap_to_grid: false,
            grid_visible: false,
            config,
        }
    }

    /// A session backed by in-memory stores.
    pub fn in_memory(config: EditorConfig) -> Self {
        Self::new(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryBlobStore::new()),
        )
    }

    /// Bring back the persisted session, or start a fresh log with one
    /// snapshot of the current scene.
    pub async fn restore(&mut self) -> RestoreOutcome {
        self.debounce.cancel();
        let outcome = self
            .history
            .restore_from_storage(&mut self.scene, self.blobs.as_ref())
            .await;
        self.after_restore();
        outcome
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn layers(&self) -> &[Layer] {
        self.layers.layers()
    }

    pub fn layer_registry(&self) -> &LayerRegistry {
        &self.layers
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn blobs(&self) -> &Arc<dyn BlobStore> {
        &self.blobs
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn clipboard(&self) -> Option<&SceneObject> {
        self.clipboard.as_ref()
    }

    pub fn object(&self, id: ShapeId) -> Option<&SceneObject> {
        self.scene.get(id)
    }

    /// Whether a repaint was requested since the last call.
    pub fn take_render_request(&mut self) -> bool {
        self.scene.take_render_request()
    }

    // --- Event loop ---

    /// Fire the debounced history push once its deadline has passed.
    /// Returns whether a push ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.debounce.poll(now) {
            self.debounced_push();
            true
        } else {
            false
        }
    }

    /// Run a pending debounced push immediately.
    pub fn flush(&mut self) -> bool {
        if self.debounce.flush() {
            self.debounced_push();
            true
        } else {
            false
        }
    }

    pub fn has_pending_push(&self) -> bool {
        self.debounce.is_pending()
    }

    fn debounced_push(&mut self) {
        self.layers.rebuild(&self.scene);
        self.history.safe_push(&self.scene);
    }

    /// Drain scene events and fan them out.
    fn process_events(&mut self) {
        let now = Instant::now();
        for event in self.scene.take_events() {
            match event {
                SceneEvent::ObjectAdded(_) | SceneEvent::ObjectRemoved(_) => {
                    self.layers.rebuild(&self.scene);
                    self.debounce.schedule(now);
                }
                SceneEvent::ObjectModified(_) | SceneEvent::CustomElementCreated(_) => {
                    self.layers.rebuild(&self.scene);
                    self.history.safe_push(&self.scene);
                    self.refresh_ui();
                }
                SceneEvent::ObjectMoving(id) | SceneEvent::ObjectScaling(id) => {
                    if self.snap_to_grid {
                        let grid = self.config.grid_size;
                        if let Some(object) = self.scene.get_mut(id) {
                            snap_object_to_grid(object, grid);
                        }
                    }
                    self.refresh_ui();
                }
                SceneEvent::Reordered => {
                    self.layers.rebuild(&self.scene);
                }
                SceneEvent::PathCreated(id) => {
                    log::debug!("Path {} created", id);
                }
                SceneEvent::SelectionCreated(_)
                | SceneEvent::SelectionUpdated(_)
                | SceneEvent::SelectionCleared => self.refresh_ui(),
            }
        }
    }

    /// Settle a command: drain events, rebuild layers and push now. A
    /// pending debounced push is folded into this one.
    fn commit(&mut self) {
        self.process_events();
        self.debounce.cancel();
        self.layers.rebuild(&self.scene);
        self.history.safe_push(&self.scene);
        self.refresh_ui();
    }

    fn after_restore(&mut self) {
        // Snapshot loads are silent apart from selection changes.
        self.process_events();
        self.layers.rebuild(&self.scene);
        self.refresh_ui();
    }

    fn refresh_ui(&mut self) {
        let active = self.scene.active_objects();
        self.ui.selected_layer = active.first().copied();
        let single = match active.as_slice() {
            [id] => self.scene.get(*id),
            _ => None,
        };
        self.ui.dimensions = single.map(|o| (o.scaled_width().round(), o.scaled_height().round()));
        self.ui.text = single.and_then(|o| match &o.shape {
            ObjectKind::Textbox(text) => Some(text.text.clone()),
            _ => None,
        });
    }

    // --- Selection ---

    /// Make the given objects active. Unknown ids are ignored.
    pub fn select(&mut self, ids: impl IntoIterator<Item = ShapeId>) {
        self.scene.set_active(ids);
        self.process_events();
    }

    pub fn clear_selection(&mut self) {
        self.scene.discard_active();
        self.process_events();
    }

    // --- Pointer interaction ---

    /// Drag an object by `delta`. Snaps to the grid when enabled. Call
    /// [`end_interaction`](Self::end_interaction) when the drag finishes.
    /// Locked objects and fully locked axes refuse the drag.
    pub fn move_object(&mut self, id: ShapeId, delta: Vec2) -> bool {
        let Some(object) = self.scene.get_mut(id) else {
            return false;
        };
        let flags = &object.flags;
        if object.is_locked() || (flags.lock_movement_x && flags.lock_movement_y) {
            return false;
        }
        let delta = Vec2::new(
            if flags.lock_movement_x { 0.0 } else { delta.x },
            if flags.lock_movement_y { 0.0 } else { delta.y },
        );
        object.transform.translate(delta);
        self.scene.fire(SceneEvent::ObjectMoving(id));
        self.scene.request_render();
        self.process_events();
        true
    }

    /// Scale an object interactively. Snaps its position when enabled.
    pub fn scale_object(&mut self, id: ShapeId, scale_x: f64, scale_y: f64) -> bool {
        let Some(object) = self.scene.get_mut(id) else {
            return false;
        };
        if object.is_locked() {
            return false;
        }
        object.transform.scale_x = scale_x;
        object.transform.scale_y = scale_y;
        self.scene.fire(SceneEvent::ObjectScaling(id));
        self.scene.request_render();
        self.process_events();
        true
    }

    /// Finish a drag, scale or rotation; records history immediately.
    pub fn end_interaction(&mut self, id: ShapeId) -> bool {
        if !self.scene.contains(id) {
            return false;
        }
        self.scene.fire(SceneEvent::ObjectModified(id));
        self.process_events();
        true
    }

    pub fn snap_to_grid(&self) -> bool {
        self.snap_to_grid
    }

    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        self.snap_to_grid = enabled;
    }

    // --- Layers ---

    pub fn rename_layer(&mut self, id: ShapeId, name: &str) -> bool {
        if !self.layers.rename(&mut self.scene, id, name) {
            return false;
        }
        self.commit();
        true
    }

    pub fn toggle_visibility(&mut self, id: ShapeId) -> bool {
        if !self.layers.toggle_visibility(&mut self.scene, id) {
            return false;
        }
        self.commit();
        true
    }

    pub fn toggle_lock(&mut self, id: ShapeId) -> bool {
        if !self.layers.toggle_lock(&mut self.scene, id) {
            return false;
        }
        self.scene.fire(SceneEvent::ObjectModified(id));
        self.commit();
        true
    }

    // --- Stacking ---

    pub fn bring_forward(&mut self, id: ShapeId) -> bool {
        let moved = self.scene.bring_forward(id);
        self.settle_if(moved)
    }

    pub fn send_backward(&mut self, id: ShapeId) -> bool {
        let moved = self.scene.send_backward(id);
        self.settle_if(moved)
    }

    pub fn bring_to_front(&mut self, id: ShapeId) -> bool {
        let moved = self.scene.bring_to_front(id);
        self.settle_if(moved)
    }

    pub fn send_to_back(&mut self, id: ShapeId) -> bool {
        let moved = self.scene.send_to_back(id);
        self.settle_if(moved)
    }

    fn settle_if(&mut self, changed: bool) -> bool {
        if changed {
            self.commit();
        }
        changed
    }

    // --- Alignment ---

    pub fn align(&mut self, alignment: crate::transform::Alignment) -> bool {
        let changed = crate::transform::align_selection(&mut self.scene, alignment);
        self.settle_if(changed)
    }

    pub fn distribute(&mut self, axis: crate::transform::Axis) -> bool {
        let changed = crate::transform::distribute_selection(&mut self.scene, axis);
        self.settle_if(changed)
    }

    // --- History ---

    /// Collapse history to the current scene.
    pub fn reset_history(&mut self) {
        self.debounce.cancel();
        self.history.reset_history(&self.scene);
    }

    /// Remove every object and start a new history.
    pub fn clear_canvas(&mut self) {
        self.scene.clear();
        self.process_events();
        self.reset_history();
        self.refresh_ui();
    }

    // --- Grid ---

    pub fn grid_visible(&self) -> bool {
        self.grid_visible
    }

    /// Show or hide the helper grid.
    pub fn set_grid_visible(&mut self, visible: bool) {
        self.grid_visible = visible;
        if visible {
            self.draw_grid_lines();
        } else {
            self.clear_grid_lines();
        }
    }

    /// Replace the helper grid with lines covering the current canvas.
    pub fn draw_grid_lines(&mut self) -> usize {
        self.scene.remove_helpers();
        let lines = crate::grid::grid_lines(self.scene.size(), self.config.grid_size);
        let count = lines.len();
        // Helpers are inserted at the bottom, so add back to front reversed.
        for line in lines.into_iter().rev() {
            self.scene.add_helper(line);
        }
        count
    }

    pub fn clear_grid_lines(&mut self) -> usize {
        self.scene.remove_helpers()
    }

    // --- Canvas ---

    /// Resize the canvas. Objects keep their coordinates; a visible grid is
    /// redrawn for the new size.
    pub fn set_canvas_size(&mut self, size: Size) {
        self.scene.set_size(size);
        if self.grid_visible {
            self.draw_grid_lines();
        }
    }

    pub fn apply_preset(&mut self, preset: crate::presets::CanvasPreset) {
        self.set_canvas_size(preset.size());
    }

    /// Zoom that fits the canvas inside a wrapper element.
    pub fn fit_to_wrapper(&mut self, wrapper: Size) -> f64 {
        let scale = Viewport::fit_scale(self.scene.size(), wrapper);
        self.viewport.zoom = scale;
        scale
    }

    // --- Export ---

    /// Export by format name at the configured pixel-density multiplier.
    pub fn export(&self, format: &str, encoder: Option<&dyn ExportEncoder>) -> ExportResult<ExportArtifact> {
        export::export(&self.scene, format, self.config.export_multiplier, encoder)
    }
}
