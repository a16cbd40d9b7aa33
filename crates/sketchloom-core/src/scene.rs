//! The retained scene graph: objects, paint order, background and events.
//!
//! Objects are keyed by id and painted in `z_order` (back to front).
//! Mutations queue [`SceneEvent`]s that the editor drains to keep layers,
//! history and selection-derived UI state in sync.

use crate::selection::Selection;
use crate::shapes::{SceneObject, SerializableColor, ShapeId};
use kurbo::{Rect, Size};
use serde_json::{Value, json};
use std::collections::HashMap;

/// Notifications emitted by scene mutations.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    ObjectAdded(ShapeId),
    ObjectRemoved(ShapeId),
    /// An interaction or property edit finished.
    ObjectModified(ShapeId),
    ObjectMoving(ShapeId),
    ObjectScaling(ShapeId),
    /// Paint order changed.
    Reordered,
    /// A freehand stroke was committed by the drawing brush.
    PathCreated(ShapeId),
    /// An image or video element was inserted.
    CustomElementCreated(ShapeId),
    SelectionCreated(Vec<ShapeId>),
    SelectionUpdated(Vec<ShapeId>),
    SelectionCleared,
}

impl SceneEvent {
    /// Structural events trigger a debounced history push.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            SceneEvent::ObjectAdded(_) | SceneEvent::ObjectRemoved(_)
        )
    }
}

/// The live canvas content.
#[derive(Debug, Clone)]
pub struct Scene {
    objects: HashMap<ShapeId, SceneObject>,
    /// Paint order (back to front), helpers included.
    z_order: Vec<ShapeId>,
    background: SerializableColor,
    size: Size,
    selection: Selection,
    events: Vec<SceneEvent>,
    needs_render: bool,
}

impl Scene {
    pub fn new(size: Size, background: SerializableColor) -> Self {
        Self {
            objects: HashMap::new(),
            z_order: Vec::new(),
            background,
            size,
            selection: Selection::None,
            events: Vec::new(),
            needs_render: false,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Resize the canvas. Objects keep their positions.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
        self.request_render();
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size((0.0, 0.0), self.size)
    }

    pub fn background(&self) -> SerializableColor {
        self.background
    }

    pub fn set_background(&mut self, color: SerializableColor) {
        self.background = color;
        self.request_render();
    }

    /// Add an object on top of the paint order.
    pub fn add(&mut self, object: SceneObject) -> ShapeId {
        let id = object.id();
        let helper = object.helper;
        self.z_order.retain(|&other| other != id);
        self.z_order.push(id);
        self.objects.insert(id, object);
        if !helper {
            self.fire(SceneEvent::ObjectAdded(id));
        }
        self.request_render();
        id
    }

    /// Add an object at a position in the paint order, clamped to the top.
    pub fn insert(&mut self, index: usize, object: SceneObject) -> ShapeId {
        let id = object.id();
        self.z_order.retain(|&other| other != id);
        let index = index.min(self.z_order.len());
        self.z_order.insert(index, id);
        let helper = object.helper;
        self.objects.insert(id, object);
        if !helper {
            self.fire(SceneEvent::ObjectAdded(id));
        }
        self.request_render();
        id
    }

    /// Add a helper object beneath all content. Helpers emit no events.
    pub fn add_helper(&mut self, mut object: SceneObject) -> ShapeId {
        object.helper = true;
        object.flags.selectable = false;
        object.flags.evented = false;
        let id = object.id();
        self.z_order.insert(0, id);
        self.objects.insert(id, object);
        self.request_render();
        id
    }

    /// Remove an object, dropping it from the selection too.
    pub fn remove(&mut self, id: ShapeId) -> Option<SceneObject> {
        let object = self.objects.remove(&id)?;
        self.z_order.retain(|&other| other != id);
        if self.selection.contains(id) {
            let mut selection = self.selection.clone();
            selection.retain(|other| other != id);
            self.set_selection(selection);
        }
        if !object.helper {
            self.fire(SceneEvent::ObjectRemoved(id));
        }
        self.request_render();
        Some(object)
    }

    /// Remove an object without emitting events. Used while a snapshot is
    /// being restored.
    pub(crate) fn discard(&mut self, id: ShapeId) -> Option<SceneObject> {
        let object = self.objects.remove(&id)?;
        self.z_order.retain(|&other| other != id);
        self.selection.retain(|other| other != id);
        self.request_render();
        Some(object)
    }

    /// Remove every helper object.
    pub fn remove_helpers(&mut self) -> usize {
        let helpers: Vec<ShapeId> = self
            .z_order
            .iter()
            .copied()
            .filter(|id| self.objects.get(id).is_some_and(|o| o.helper))
            .collect();
        for id in &helpers {
            self.objects.remove(id);
        }
        self.z_order.retain(|id| !helpers.contains(id));
        if !helpers.is_empty() {
            self.request_render();
        }
        helpers.len()
    }

    pub fn get(&self, id: ShapeId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut SceneObject> {
        self.objects.get_mut(&id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.objects.contains_key(&id)
    }

    /// All objects in paint order, helpers included.
    pub fn objects_ordered(&self) -> impl Iterator<Item = &SceneObject> {
        self.z_order.iter().filter_map(|id| self.objects.get(id))
    }

    /// Content objects (no helpers) in paint order.
    pub fn content(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects_ordered().filter(|o| !o.helper)
    }

    /// Number of content objects.
    pub fn len(&self) -> usize {
        self.content().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position of an object in the full paint order.
    pub fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.z_order.iter().position(|&other| other == id)
    }

    // --- Selection ---

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Ids of the active objects that still exist.
    pub fn active_objects(&self) -> Vec<ShapeId> {
        self.selection
            .ids()
            .into_iter()
            .filter(|id| self.objects.contains_key(id))
            .collect()
    }

    /// Make the given objects the active selection. Unknown ids are ignored.
    pub fn set_active(&mut self, ids: impl IntoIterator<Item = ShapeId>) {
        let ids: Vec<ShapeId> = ids
            .into_iter()
            .filter(|id| self.objects.contains_key(id))
            .collect();
        self.set_selection(Selection::from_ids(ids));
    }

    pub fn discard_active(&mut self) {
        self.set_selection(Selection::None);
    }

    fn set_selection(&mut self, selection: Selection) {
        if selection == self.selection {
            return;
        }
        let was_empty = self.selection.is_empty();
        self.selection = selection;
        let event = if self.selection.is_empty() {
            SceneEvent::SelectionCleared
        } else if was_empty {
            SceneEvent::SelectionCreated(self.selection.ids())
        } else {
            SceneEvent::SelectionUpdated(self.selection.ids())
        };
        self.fire(event);
        self.request_render();
    }

    // --- Stacking ---

    /// Swap an object with its neighbour above. Returns false at the top or
    /// for unknown ids.
    pub fn bring_forward(&mut self, id: ShapeId) -> bool {
        match self.index_of(id) {
            Some(pos) if pos + 1 < self.z_order.len() => {
                self.z_order.swap(pos, pos + 1);
                self.after_reorder(id);
                true
            }
            _ => false,
        }
    }

    /// Swap an object with its neighbour below.
    pub fn send_backward(&mut self, id: ShapeId) -> bool {
        match self.index_of(id) {
            Some(pos) if pos > 0 => {
                self.z_order.swap(pos, pos - 1);
                self.after_reorder(id);
                true
            }
            _ => false,
        }
    }

    /// Move an object to the top of the paint order.
    pub fn bring_to_front(&mut self, id: ShapeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.z_order.retain(|&other| other != id);
        self.z_order.push(id);
        self.after_reorder(id);
        true
    }

    /// Move an object to the bottom of the paint order.
    pub fn send_to_back(&mut self, id: ShapeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.z_order.retain(|&other| other != id);
        self.z_order.insert(0, id);
        self.after_reorder(id);
        true
    }

    fn after_reorder(&mut self, id: ShapeId) {
        self.fire(SceneEvent::Reordered);
        self.set_active([id]);
        self.request_render();
    }

    // --- Events and rendering ---

    pub fn fire(&mut self, event: SceneEvent) {
        self.events.push(event);
    }

    /// Drain queued events in emission order.
    pub fn take_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn request_render(&mut self) {
        self.needs_render = true;
    }

    /// Returns whether a repaint was requested since the last call.
    pub fn take_render_request(&mut self) -> bool {
        std::mem::replace(&mut self.needs_render, false)
    }

    // --- Serialization ---

    /// Serialize the content objects and background.
    ///
    /// Helpers are excluded, so toggling the grid never changes a snapshot.
    pub fn snapshot(&self) -> Value {
        let objects: Vec<Value> = self
            .content()
            .filter_map(|o| match serde_json::to_value(o) {
                Ok(v) => Some(v),
                Err(e) => {
                    log::warn!("Skipping unserializable object {}: {}", o.id(), e);
                    None
                }
            })
            .collect();
        json!({
            "background": self.background.to_hex(),
            "objects": objects,
        })
    }

    /// Replace the content with a snapshot. Helpers are kept.
    ///
    /// Objects that fail to deserialize are dropped with a warning; the rest
    /// of the snapshot still loads. Returns the number of dropped objects.
    /// Emits no object events and clears the selection.
    pub fn load_snapshot(&mut self, snapshot: &Value) -> usize {
        let content: Vec<ShapeId> = self.content().map(|o| o.id()).collect();
        for id in &content {
            self.objects.remove(id);
        }
        self.z_order.retain(|id| !content.contains(id));
        self.discard_active();

        if let Some(bg) = snapshot
            .get("background")
            .and_then(Value::as_str)
            .and_then(SerializableColor::from_hex)
        {
            self.background = bg;
        }

        let mut dropped = 0;
        let entries = snapshot
            .get("objects")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for entry in entries {
            match serde_json::from_value::<SceneObject>(entry.clone()) {
                Ok(object) if !self.objects.contains_key(&object.id()) => {
                    let id = object.id();
                    self.z_order.push(id);
                    self.objects.insert(id, object);
                }
                Ok(object) => {
                    log::warn!("Dropping duplicate object id {} from snapshot", object.id());
                    dropped += 1;
                }
                Err(e) => {
                    log::warn!("Dropping object that failed to load: {}", e);
                    dropped += 1;
                }
            }
        }
        self.request_render();
        dropped
    }

    /// Remove all content objects.
    pub fn clear(&mut self) {
        let ids: Vec<ShapeId> = self.content().map(|o| o.id()).collect();
        for id in ids {
            self.remove(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Transform;
    use crate::shapes::{ObjectKind, ObjectStyle, Rectangle};

    fn scene() -> Scene {
        Scene::new(Size::new(1000.0, 700.0), SerializableColor::white())
    }

    fn rect(x: f64) -> SceneObject {
        SceneObject::new(
            ObjectKind::Rect(Rectangle::new(100.0, 100.0)),
            Transform::at(x, 0.0),
            ObjectStyle::filled(SerializableColor::black()),
        )
    }

    #[test]
    fn test_add_remove_emit_events() {
        let mut scene = scene();
        let id = scene.add(rect(0.0));
        assert_eq!(scene.take_events(), vec![SceneEvent::ObjectAdded(id)]);
        assert!(scene.remove(id).is_some());
        assert_eq!(scene.take_events(), vec![SceneEvent::ObjectRemoved(id)]);
        assert!(scene.remove(id).is_none());
        assert!(scene.take_events().is_empty());
    }

    #[test]
    fn test_helpers_are_hidden() {
        let mut scene = scene();
        let content = scene.add(rect(0.0));
        let helper = scene.add_helper(rect(10.0));
        assert_eq!(scene.index_of(helper), Some(0));
        assert_eq!(scene.len(), 1);

        let snap = scene.snapshot();
        assert_eq!(snap["objects"].as_array().unwrap().len(), 1);
        assert_eq!(scene.remove_helpers(), 1);
        assert!(scene.contains(content));
    }

    #[test]
    fn test_stacking() {
        let mut scene = scene();
        let a = scene.add(rect(0.0));
        let b = scene.add(rect(1.0));
        let c = scene.add(rect(2.0));
        scene.take_events();

        assert!(scene.bring_to_front(a));
        let order: Vec<ShapeId> = scene.content().map(|o| o.id()).collect();
        assert_eq!(order, vec![b, c, a]);
        assert_eq!(scene.selection().single(), Some(a));

        assert!(scene.send_to_back(a));
        assert!(!scene.send_backward(a));
        assert!(scene.bring_forward(a));
        let order: Vec<ShapeId> = scene.content().map(|o| o.id()).collect();
        assert_eq!(order, vec![b, a, c]);
        assert!(!scene.bring_to_front(ShapeId::new_v4()));
    }

    #[test]
    fn test_selection_events() {
        let mut scene = scene();
        let a = scene.add(rect(0.0));
        let b = scene.add(rect(1.0));
        scene.take_events();

        scene.set_active([a]);
        scene.set_active([a, b]);
        scene.remove(b);
        scene.discard_active();
        let events = scene.take_events();
        assert_eq!(
            events,
            vec![
                SceneEvent::SelectionCreated(vec![a]),
                SceneEvent::SelectionUpdated(vec![a, b]),
                SceneEvent::SelectionUpdated(vec![a]),
                SceneEvent::ObjectRemoved(b),
                SceneEvent::SelectionCleared,
            ]
        );
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut scene = scene();
        let a = scene.add(rect(5.0));
        let b = scene.add(rect(50.0));
        scene.set_background(SerializableColor::black());
        let snap = scene.snapshot();

        let mut other = Scene::new(Size::new(10.0, 10.0), SerializableColor::white());
        assert_eq!(other.load_snapshot(&snap), 0);
        let order: Vec<ShapeId> = other.content().map(|o| o.id()).collect();
        assert_eq!(order, vec![a, b]);
        assert_eq!(other.background(), SerializableColor::black());
        assert_eq!(other.snapshot(), snap);
    }

    #[test]
    fn test_load_drops_bad_objects() {
        let mut scene = scene();
        scene.add(rect(0.0));
        let mut snap = scene.snapshot();
        snap["objects"]
            .as_array_mut()
            .unwrap()
            .push(json!({"id": "not-a-uuid", "shape": {"type": "rect"}}));

        let mut other = self::scene();
        assert_eq!(other.load_snapshot(&snap), 1);
        assert_eq!(other.len(), 1);
    }
}
