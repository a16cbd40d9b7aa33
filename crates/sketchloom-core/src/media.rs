//! Placeholder resolution for externally stored media.
//!
//! A video object's snapshot carries only its id. After a scene load every
//! such placeholder is looked up in the blob store and given a playable
//! source; placeholders whose payload cannot be found are dropped.

use crate::scene::Scene;
use crate::shapes::{ObjectKind, SceneObject, ShapeId};
use crate::storage::BlobStore;

/// Outcome of a placeholder resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaResolution {
    pub resolved: usize,
    pub dropped: Vec<ShapeId>,
}

/// Resolve every unresolved video in the scene, including those nested in
/// groups. Unresolvable videos are removed without emitting scene events.
pub async fn resolve_video_placeholders(scene: &mut Scene, blobs: &dyn BlobStore) -> MediaResolution {
    let mut outcome = MediaResolution::default();
    let ids: Vec<ShapeId> = scene.content().map(|o| o.id()).collect();

    for id in ids {
        let Some(object) = scene.get_mut(id) else {
            continue;
        };
        let keep = if matches!(object.shape, ObjectKind::Video(_) | ObjectKind::Group(_)) {
            resolve_object(object, blobs, &mut outcome).await
        } else {
            true
        };
        if !keep {
            scene.discard(id);
        }
    }

    if outcome.resolved > 0 || !outcome.dropped.is_empty() {
        log::debug!(
            "Resolved {} video placeholder(s), dropped {}",
            outcome.resolved,
            outcome.dropped.len()
        );
        scene.request_render();
    }
    outcome
}

/// Resolve one object in place. Returns false when the object itself must be
/// dropped.
async fn resolve_object(
    object: &mut SceneObject,
    blobs: &dyn BlobStore,
    outcome: &mut MediaResolution,
) -> bool {
    let id = object.id();
    match &mut object.shape {
        ObjectKind::Video(video) => {
            if video.is_resolved() {
                return true;
            }
            match blobs.resolve(&id.to_string()).await {
                Ok(Some(url)) => {
                    video.source = Some(url);
                    outcome.resolved += 1;
                    true
                }
                Ok(None) => {
                    log::warn!("Video {} has no stored media; dropping it", id);
                    outcome.dropped.push(id);
                    false
                }
                Err(e) => {
                    log::warn!("Failed to resolve video {}: {}; dropping it", id, e);
                    outcome.dropped.push(id);
                    false
                }
            }
        }
        ObjectKind::Group(group) => {
            let mut kept = Vec::with_capacity(group.children.len());
            for mut child in std::mem::take(&mut group.children) {
                if Box::pin(resolve_object(&mut child, blobs, outcome)).await {
                    kept.push(child);
                }
            }
            group.children = kept;
            true
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Transform;
    use crate::shapes::{Group, ObjectStyle, Rectangle, SerializableColor, Video};
    use crate::storage::MemoryBlobStore;
    use kurbo::Size;

    fn video() -> SceneObject {
        SceneObject::new(
            ObjectKind::Video(Video::new(None)),
            Transform::at(100.0, 100.0),
            ObjectStyle::default(),
        )
    }

    fn source_of(scene: &Scene, id: ShapeId) -> Option<String> {
        match &scene.get(id)?.shape {
            ObjectKind::Video(v) => v.source.clone(),
            _ => None,
        }
    }

    #[test]
    fn test_resolves_and_drops() {
        let blobs = MemoryBlobStore::new();
        let mut scene = Scene::new(Size::new(100.0, 100.0), SerializableColor::white());
        let stored = scene.add(video());
        let missing = scene.add(video());
        let rect = scene.add(SceneObject::new(
            ObjectKind::Rect(Rectangle::new(1.0, 1.0)),
            Transform::default(),
            ObjectStyle::default(),
        ));
        scene.take_events();
        pollster::block_on(blobs.save(&stored.to_string(), b"vid", "video/mp4")).unwrap();

        let outcome = pollster::block_on(resolve_video_placeholders(&mut scene, &blobs));
        assert_eq!(outcome.resolved, 1);
        assert_eq!(outcome.dropped, vec![missing]);
        assert!(source_of(&scene, stored).is_some());
        assert!(!scene.contains(missing));
        assert!(scene.contains(rect));
        assert!(scene.take_events().is_empty());
    }

    #[test]
    fn test_resolves_inside_groups() {
        let blobs = MemoryBlobStore::new();
        let kept = video();
        let lost = video();
        let kept_id = kept.id();
        pollster::block_on(blobs.save(&kept_id.to_string(), b"vid", "video/mp4")).unwrap();

        let mut scene = Scene::new(Size::new(100.0, 100.0), SerializableColor::white());
        let group = scene.add(SceneObject::new(
            ObjectKind::Group(Group::new(300.0, 200.0, vec![kept, lost])),
            Transform::default(),
            ObjectStyle::default(),
        ));

        let outcome = pollster::block_on(resolve_video_placeholders(&mut scene, &blobs));
        assert_eq!(outcome.resolved, 1);
        assert_eq!(outcome.dropped.len(), 1);
        let ObjectKind::Group(g) = &scene.get(group).unwrap().shape else {
            panic!("expected group");
        };
        assert_eq!(g.children.len(), 1);
        assert_eq!(g.children[0].id(), kept_id);
    }
}
