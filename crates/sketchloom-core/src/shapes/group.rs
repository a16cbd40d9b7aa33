//! Group shape for combining multiple objects.

use super::{SceneObject, ShapeTrait};
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// A group of objects manipulated as a single unit.
///
/// Children keep transforms relative to the group's local frame, whose
/// origin is the top-left corner of the group box. Groups can nest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub width: f64,
    pub height: f64,
    pub children: Vec<SceneObject>,
}

impl Group {
    pub fn new(width: f64, height: f64, children: Vec<SceneObject>) -> Self {
        Self {
            width,
            height,
            children,
        }
    }

    pub fn children(&self) -> &[SceneObject] {
        &self.children
    }
}

impl ShapeTrait for Group {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn type_name(&self) -> &'static str {
        "group"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Transform;
    use crate::shapes::{ObjectKind, ObjectStyle, Rectangle};

    #[test]
    fn test_group_box_is_its_size() {
        let child = SceneObject::new(
            ObjectKind::Rect(Rectangle::new(10.0, 10.0)),
            Transform::default(),
            ObjectStyle::default(),
        );
        let group = Group::new(40.0, 25.0, vec![child]);
        assert_eq!(group.size(), Size::new(40.0, 25.0));
        assert_eq!(group.type_name(), "group");
        assert_eq!(group.children().len(), 1);
    }
}
