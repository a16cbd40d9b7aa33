//! Layer list derived from the scene's paint order.

use crate::scene::Scene;
use crate::shapes::{SceneObject, ShapeId};
use serde::{Deserialize, Serialize};

/// UI projection of one scene object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: ShapeId,
    pub name: String,
    /// Serialized type tag of the object ("rect", "textbox", ...).
    #[serde(rename = "type")]
    pub kind: String,
    pub visible: bool,
    pub locked: bool,
}

impl Layer {
    fn from_object(object: &SceneObject, index: usize) -> Self {
        let kind = object.type_name();
        Self {
            id: object.id(),
            name: object
                .name
                .clone()
                .unwrap_or_else(|| format!("{} {}", kind, index)),
            kind: kind.to_string(),
            visible: object.visible,
            locked: object.is_locked(),
        }
    }
}

/// Ordered layer list, bottom to top, mirroring the scene.
#[derive(Debug, Clone, Default)]
pub struct LayerRegistry {
    layers: Vec<Layer>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the list from the scene. Helper objects are skipped and do
    /// not count towards default names.
    pub fn rebuild(&mut self, scene: &Scene) -> &[Layer] {
        self.layers = scene
            .content()
            .enumerate()
            .map(|(i, o)| Layer::from_object(o, i))
            .collect();
        &self.layers
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Layers paired with their live objects. Entries whose object has left
    /// the scene pair with `None`; callers render nothing for them.
    pub fn resolve<'a>(
        &'a self,
        scene: &'a Scene,
    ) -> impl Iterator<Item = (&'a Layer, Option<&'a SceneObject>)> + 'a {
        self.layers.iter().map(move |l| (l, scene.get(l.id)))
    }

    /// Rename both the layer entry and its object.
    ///
    /// Returns false when neither knows the id.
    pub fn rename(&mut self, scene: &mut Scene, id: ShapeId, name: &str) -> bool {
        let mut found = false;
        if let Some(layer) = self.layers.iter_mut().find(|l| l.id == id) {
            layer.name = name.to_string();
            found = true;
        }
        if let Some(object) = scene.get_mut(id) {
            object.name = Some(name.to_string());
            found = true;
        }
        found
    }

    /// Flip an object's visibility and rebuild. No-op for unknown ids.
    pub fn toggle_visibility(&mut self, scene: &mut Scene, id: ShapeId) -> bool {
        let Some(object) = scene.get_mut(id) else {
            return false;
        };
        object.visible = !object.visible;
        scene.request_render();
        self.rebuild(scene);
        true
    }

    /// Lock or unlock an object and rebuild. The toggled object becomes the
    /// active selection. No-op for unknown ids.
    pub fn toggle_lock(&mut self, scene: &mut Scene, id: ShapeId) -> bool {
        let Some(object) = scene.get_mut(id) else {
            return false;
        };
        object.flags.toggle();
        scene.set_active([id]);
        scene.request_render();
        self.rebuild(scene);
        true
    }
}
