//! Active-selection state.

use crate::shapes::ShapeId;
use serde::{Deserialize, Serialize};

/// What is currently selected on the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    None,
    Single(ShapeId),
    /// Two or more objects, in selection order.
    Multiple(Vec<ShapeId>),
}

impl Selection {
    /// Build the selection state for a list of ids. Duplicates are dropped,
    /// keeping the first occurrence.
    pub fn from_ids(ids: impl IntoIterator<Item = ShapeId>) -> Self {
        let mut unique: Vec<ShapeId> = Vec::new();
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        match unique.len() {
            0 => Selection::None,
            1 => Selection::Single(unique[0]),
            _ => Selection::Multiple(unique),
        }
    }

    pub fn ids(&self) -> Vec<ShapeId> {
        match self {
            Selection::None => Vec::new(),
            Selection::Single(id) => vec![*id],
            Selection::Multiple(ids) => ids.clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Selection::None => 0,
            Selection::Single(_) => 1,
            Selection::Multiple(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::None)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        match self {
            Selection::None => false,
            Selection::Single(selected) => *selected == id,
            Selection::Multiple(ids) => ids.contains(&id),
        }
    }

    /// The id of a single selected object.
    pub fn single(&self) -> Option<ShapeId> {
        match self {
            Selection::Single(id) => Some(*id),
            _ => None,
        }
    }

    /// Drop ids that no longer satisfy `keep`, collapsing the state as needed.
    pub fn retain(&mut self, mut keep: impl FnMut(ShapeId) -> bool) {
        let ids: Vec<ShapeId> = self.ids().into_iter().filter(|id| keep(*id)).collect();
        *self = Selection::from_ids(ids);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ids_collapses() {
        let a = ShapeId::new_v4();
        let b = ShapeId::new_v4();
        assert_eq!(Selection::from_ids([]), Selection::None);
        assert_eq!(Selection::from_ids([a]), Selection::Single(a));
        assert_eq!(Selection::from_ids([a, a]), Selection::Single(a));
        assert_eq!(Selection::from_ids([a, b]), Selection::Multiple(vec![a, b]));
    }

    #[test]
    fn test_retain_shrinks_multiple_to_single() {
        let a = ShapeId::new_v4();
        let b = ShapeId::new_v4();
        let mut sel = Selection::from_ids([a, b]);
        sel.retain(|id| id != b);
        assert_eq!(sel, Selection::Single(a));
        sel.retain(|_| false);
        assert!(sel.is_empty());
    }

    #[test]
    fn test_queries() {
        let a = ShapeId::new_v4();
        let b = ShapeId::new_v4();
        let sel = Selection::from_ids([a, b]);
        assert_eq!(sel.len(), 2);
        assert!(sel.contains(b));
        assert_eq!(sel.single(), None);
        assert_eq!(Selection::Single(a).single(), Some(a));
    }
}
