//! Grouping and ungrouping with coordinate-space reconciliation.

use crate::geometry::{Transform, compose, relative_to};
use crate::scene::Scene;
use crate::shapes::{Group, ObjectKind, ObjectStyle, SceneObject, ShapeId};
use kurbo::Rect;

/// Group the given objects into a single group.
///
/// The group is placed at the union of the members' bounds and takes the
/// paint position of the frontmost member; children keep their paint order
/// and get transforms relative to the group. The group becomes the active
/// selection. Returns `None` when fewer than two of the ids are in the scene.
pub fn group_objects(scene: &mut Scene, ids: &[ShapeId]) -> Option<ShapeId> {
    let members: Vec<ShapeId> = scene
        .content()
        .map(|o| o.id())
        .filter(|id| ids.contains(id))
        .collect();
    if members.len() < 2 {
        return None;
    }

    let mut frontmost = 0;
    let mut bounds: Option<Rect> = None;
    for &id in &members {
        let Some(object) = scene.get(id) else {
            continue;
        };
        let b = object.bounds();
        bounds = Some(bounds.map_or(b, |u| u.union(b)));
        frontmost = frontmost.max(scene.index_of(id).unwrap_or(0));
    }
    let bounds = bounds?;

    let group_transform = Transform::at(bounds.x0, bounds.y0);
    let group_matrix = group_transform.matrix(bounds.size());

    let mut children = Vec::with_capacity(members.len());
    for &id in &members {
        if let Some(mut child) = scene.remove(id) {
            child.transform = relative_to(group_matrix, child.matrix());
            children.push(child);
        }
    }

    let group = SceneObject::new(
        ObjectKind::Group(Group::new(bounds.width(), bounds.height(), children)),
        group_transform,
        ObjectStyle::default(),
    );
    let insert_at = frontmost.saturating_sub(members.len() - 1);
    let group_id = scene.insert(insert_at, group);
    scene.set_active([group_id]);
    log::debug!("Grouped {} objects into {}", members.len(), group_id);
    Some(group_id)
}

/// Group the active selection.
pub fn group_selection(scene: &mut Scene) -> Option<ShapeId> {
    let ids = scene.active_objects();
    group_objects(scene, &ids)
}

/// Dissolve a group, returning its children to the scene.
///
/// Each child's absolute transform is the composition of the group's matrix
/// with the child's local matrix, so nothing moves visually. Children take
/// the group's paint position in their original order and become the active
/// selection. Returns `None` when `id` is not a group in the scene.
pub fn ungroup(scene: &mut Scene, id: ShapeId) -> Option<Vec<ShapeId>> {
    if !scene.get(id)?.is_group() {
        return None;
    }
    let position = scene.index_of(id)?;
    let object = scene.remove(id)?;
    let parent = object.matrix();
    let ObjectKind::Group(group) = object.shape else {
        return None;
    };

    let mut child_ids = Vec::with_capacity(group.children.len());
    for (i, mut child) in group.children.into_iter().enumerate() {
        child.transform = compose(parent, child.matrix());
        child_ids.push(scene.insert(position + i, child));
    }
    scene.set_active(child_ids.iter().copied());
    log::debug!("Ungrouped {} into {} objects", id, child_ids.len());
    Some(child_ids)
}

/// Ungroup the active object when it is a single group.
pub fn ungroup_selection(scene: &mut Scene) -> Option<Vec<ShapeId>> {
    let id = scene.selection().single()?;
    ungroup(scene, id)
}
