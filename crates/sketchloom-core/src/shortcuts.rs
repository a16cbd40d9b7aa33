//! Keyboard command table.

use crate::input::KeyEvent;
use kurbo::Vec2;

/// An editing command bound to a key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorCommand {
    Undo,
    Redo,
    Duplicate,
    Delete,
    Copy,
    Paste,
    /// Move the selection by the given offset.
    Nudge(Vec2),
    Group,
    Ungroup,
}

/// Map a key press to a command.
///
/// Returns `None` for unbound keys and for every key while focus is inside
/// a text-entry element. `step` and `large_step` are the arrow-key nudge
/// distances without and with Shift. Only Ctrl counts as the command
/// modifier.
pub fn command_for(event: &KeyEvent, step: f64, large_step: f64) -> Option<EditorCommand> {
    if event.focus.is_text_entry() {
        return None;
    }
    let m = event.modifiers;

    if m.ctrl {
        if event.is_char('z') {
            return Some(if m.shift {
                EditorCommand::Redo
            } else {
                EditorCommand::Undo
            });
        }
        if event.is_char('y') {
            return Some(EditorCommand::Redo);
        }
        if event.is_char('g') {
            return Some(if m.shift {
                EditorCommand::Ungroup
            } else {
                EditorCommand::Group
            });
        }
        if event.is_char('d') {
            return Some(EditorCommand::Duplicate);
        }
        if event.is_char('c') {
            return Some(EditorCommand::Copy);
        }
        if event.is_char('v') {
            return Some(EditorCommand::Paste);
        }
        return None;
    }

    let distance = if m.shift { large_step } else { step };
    match event.key.as_str() {
        "Delete" => Some(EditorCommand::Delete),
        "ArrowLeft" => Some(EditorCommand::Nudge(Vec2::new(-distance, 0.0))),
        "ArrowRight" => Some(EditorCommand::Nudge(Vec2::new(distance, 0.0))),
        "ArrowUp" => Some(EditorCommand::Nudge(Vec2::new(0.0, -distance))),
        "ArrowDown" => Some(EditorCommand::Nudge(Vec2::new(0.0, distance))),
        _ => None,
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, ctrl: bool, shift: bool, description: &'static str) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Z", true, false, "Undo"),
            Shortcut::new("Z", true, true, "Redo"),
            Shortcut::new("Y", true, false, "Redo"),
            Shortcut::new("D", true, false, "Duplicate selection"),
            Shortcut::new("C", true, false, "Copy object"),
            Shortcut::new("V", true, false, "Paste object"),
            Shortcut::new("G", true, false, "Group selected objects"),
            Shortcut::new("G", true, true, "Ungroup selected group"),
            Shortcut::new("Delete", false, false, "Delete selected objects"),
            Shortcut::new("Arrows", false, false, "Nudge selection"),
            Shortcut::new("Arrows", false, true, "Nudge selection further"),
        ]
    }
}
