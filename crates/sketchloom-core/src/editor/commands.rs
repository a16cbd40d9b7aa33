//! Keyboard commands and the history commands they drive.

use super::Editor;
use crate::input::KeyEvent;
use crate::shortcuts::{EditorCommand, command_for};
use crate::shapes::ShapeId;
use crate::transform;
use kurbo::Vec2;

impl Editor {
    /// Handle a key press. Returns the command that ran, or `None` when the
    /// key is unbound, focus is in a text field, or the command had nothing
    /// to act on.
    pub async fn handle_key(&mut self, event: &KeyEvent) -> Option<EditorCommand> {
        let command = command_for(event, self.config.nudge_step, self.config.nudge_step_large)?;
        let ran = match command {
            EditorCommand::Undo => self.undo().await,
            EditorCommand::Redo => self.redo().await,
            EditorCommand::Duplicate => !self.duplicate_selection().await.is_empty(),
            EditorCommand::Delete => self.delete_selection() > 0,
            EditorCommand::Copy => self.copy(),
            EditorCommand::Paste => self.paste().await.is_some(),
            EditorCommand::Nudge(delta) => self.nudge(delta),
            EditorCommand::Group => self.group().is_some(),
            EditorCommand::Ungroup => self.ungroup().is_some(),
        };
        log::debug!("Key {:?} -> {:?} (ran: {})", event.key, command, ran);
        ran.then_some(command)
    }

    /// Step back one snapshot. A pending debounced push is recorded first so
    /// the latest change is never lost.
    pub async fn undo(&mut self) -> bool {
        self.flush();
        let moved = self.history.undo(&mut self.scene, self.blobs.as_ref()).await;
        if moved {
            self.after_restore();
        }
        moved
    }

    pub async fn redo(&mut self) -> bool {
        self.flush();
        let moved = self.history.redo(&mut self.scene, self.blobs.as_ref()).await;
        if moved {
            self.after_restore();
        }
        moved
    }

    /// Clone every active object with fresh ids, offset by the configured
    /// duplicate offset. The clones become the selection.
    pub async fn duplicate_selection(&mut self) -> Vec<ShapeId> {
        let offset = Vec2::new(self.config.duplicate_offset, self.config.duplicate_offset);
        let originals: Vec<_> = self
            .scene
            .active_objects()
            .into_iter()
            .filter_map(|id| self.scene.get(id).cloned())
            .collect();
        if originals.is_empty() {
            return Vec::new();
        }

        let mut clones = Vec::with_capacity(originals.len());
        for mut object in originals {
            let videos = object.regenerate_ids();
            self.copy_media(&videos).await;
            object.transform.translate(offset);
            clones.push(self.scene.add(object));
        }
        self.scene.set_active(clones.iter().copied());
        self.commit();
        clones
    }

    /// Remove every active object. Returns how many were removed.
    pub fn delete_selection(&mut self) -> usize {
        let active = self.scene.active_objects();
        let removed = active
            .into_iter()
            .filter(|&id| self.scene.remove(id).is_some())
            .count();
        if removed == 0 {
            return 0;
        }
        self.scene.discard_active();
        self.commit();
        removed
    }

    /// Copy the single active object to the clipboard.
    pub fn copy(&mut self) -> bool {
        let Some(id) = self.scene.selection().single() else {
            return false;
        };
        self.clipboard = self.scene.get(id).cloned();
        self.clipboard.is_some()
    }

    /// Paste the clipboard at the paste offset from where it was copied.
    /// Pasting twice puts both copies at the same spot.
    pub async fn paste(&mut self) -> Option<ShapeId> {
        let mut object = self.clipboard.clone()?;
        let videos = object.regenerate_ids();
        self.copy_media(&videos).await;
        object
            .transform
            .translate(Vec2::new(self.config.paste_offset, self.config.paste_offset));
        let id = self.scene.add(object);
        self.scene.set_active([id]);
        self.commit();
        Some(id)
    }

    /// Store each video's media under its new id so the copy still resolves
    /// after undo, redo or a reload.
    async fn copy_media(&self, videos: &[(ShapeId, ShapeId)]) {
        for (from, to) in videos {
            match self.blobs.copy(&from.to_string(), &to.to_string()).await {
                Ok(true) => {}
                Ok(false) => log::warn!("No media stored for video {}", from),
                Err(e) => log::warn!("Failed to copy media for video {}: {}", from, e),
            }
        }
    }

    /// Move the active objects. Locked objects stay put.
    pub fn nudge(&mut self, delta: Vec2) -> bool {
        let mut moved = false;
        for id in self.scene.active_objects() {
            if let Some(object) = self.scene.get_mut(id) {
                if object.is_locked() {
                    continue;
                }
                object.transform.translate(delta);
                moved = true;
            }
        }
        if moved {
            self.scene.request_render();
            self.commit();
        }
        moved
    }

    /// Group the active objects. Needs at least two.
    pub fn group(&mut self) -> Option<ShapeId> {
        let id = transform::group_selection(&mut self.scene)?;
        self.commit();
        Some(id)
    }

    /// Dissolve the active group.
    pub fn ungroup(&mut self) -> Option<Vec<ShapeId>> {
        let ids = transform::ungroup_selection(&mut self.scene)?;
        self.commit();
        Some(ids)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EditorConfig;
    use crate::editor::Editor;
    use crate::input::{FocusTarget, KeyEvent, Modifiers};
    use crate::shortcuts::EditorCommand;
    use kurbo::Vec2;

    fn editor() -> Editor {
        let mut editor = Editor::in_memory(EditorConfig::default());
        pollster::block_on(editor.restore());
        editor
    }

    fn press(editor: &mut Editor, combo: &str) -> Option<EditorCommand> {
        let event = KeyEvent::parse(combo).unwrap();
        pollster::block_on(editor.handle_key(&event))
    }

    #[test]
    fn test_undo_flushes_pending_push() {
        let mut editor = editor();
        editor.add_rectangle();
        assert!(editor.has_pending_push());

        assert_eq!(press(&mut editor, "Ctrl+Z"), Some(EditorCommand::Undo));
        assert!(editor.scene().is_empty());
        assert_eq!(press(&mut editor, "Ctrl+Shift+Z"), Some(EditorCommand::Redo));
        assert_eq!(editor.layers().len(), 1);
        assert_eq!(press(&mut editor, "Ctrl+Y"), None);
    }

    #[test]
    fn test_text_focus_suppresses_keys() {
        let mut editor = editor();
        editor.add_rectangle();
        let event = KeyEvent::new("Delete", Modifiers::NONE).with_focus(FocusTarget::TextArea);
        assert_eq!(pollster::block_on(editor.handle_key(&event)), None);
        assert_eq!(editor.layers().len(), 1);
    }

    #[test]
    fn test_duplicate_offsets_clones() {
        let mut editor = editor();
        let a = editor.add_rectangle();
        let b = editor.add_circle();
        editor.select([a, b]);

        let clones = pollster::block_on(editor.duplicate_selection());
        assert_eq!(clones.len(), 2);
        assert_eq!(editor.scene().active_objects(), clones);
        let clone = editor.object(clones[0]).unwrap();
        assert_eq!((clone.x(), clone.y()), (120.0, 120.0));
        assert_eq!(editor.layers().len(), 4);
    }

    #[test]
    fn test_delete_whole_selection() {
        let mut editor = editor();
        let a = editor.add_rectangle();
        let b = editor.add_triangle();
        editor.select([a, b]);
        assert_eq!(press(&mut editor, "Delete"), Some(EditorCommand::Delete));
        assert!(editor.scene().is_empty());
        assert!(editor.scene().selection().is_empty());
        assert_eq!(press(&mut editor, "Delete"), None);
    }

    #[test]
    fn test_copy_paste_same_offset() {
        let mut editor = editor();
        editor.add_rectangle();
        assert!(editor.copy());
        let first = pollster::block_on(editor.paste()).unwrap();
        let second = pollster::block_on(editor.paste()).unwrap();
        assert_ne!(first, second);
        for id in [first, second] {
            let object = editor.object(id).unwrap();
            assert_eq!((object.x(), object.y()), (130.0, 130.0));
        }
    }

    #[test]
    fn test_copy_needs_single_selection() {
        let mut editor = editor();
        let a = editor.add_rectangle();
        let b = editor.add_circle();
        editor.select([a, b]);
        assert!(!editor.copy());
        assert!(pollster::block_on(editor.paste()).is_none());
    }

    #[test]
    fn test_nudge_steps_and_locks() {
        let mut editor = editor();
        let id = editor.add_rectangle();
        assert_eq!(
            press(&mut editor, "ArrowRight"),
            Some(EditorCommand::Nudge(Vec2::new(2.0, 0.0)))
        );
        press(&mut editor, "Shift+ArrowUp");
        let object = editor.object(id).unwrap();
        assert_eq!((object.x(), object.y()), (102.0, 90.0));

        editor.toggle_lock(id);
        assert_eq!(press(&mut editor, "ArrowLeft"), None);
        assert_eq!(editor.object(id).unwrap().x(), 102.0);
    }

    #[test]
    fn test_group_keys() {
        let mut editor = editor();
        let a = editor.add_rectangle();
        let b = editor.add_circle();
        assert_eq!(press(&mut editor, "Ctrl+G"), None);

        editor.select([a, b]);
        assert_eq!(press(&mut editor, "Ctrl+G"), Some(EditorCommand::Group));
        assert_eq!(editor.layers().len(), 1);
        assert_eq!(press(&mut editor, "Ctrl+Shift+G"), Some(EditorCommand::Ungroup));
        assert_eq!(editor.layers().len(), 2);
    }
}
