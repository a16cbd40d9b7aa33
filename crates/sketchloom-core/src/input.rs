//! Keyboard input as delivered by the host page.

use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const CTRL_SHIFT: Self = Self {
        ctrl: true,
        shift: true,
        ..Self::NONE
    };
}

/// Where keyboard focus was when the key went down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FocusTarget {
    #[default]
    Canvas,
    TextInput,
    TextArea,
    ContentEditable,
}

impl FocusTarget {
    /// Whether focus is in an element that edits text itself.
    pub fn is_text_entry(self) -> bool {
        !matches!(self, FocusTarget::Canvas)
    }
}

/// A key press. `key` uses DOM `KeyboardEvent.key` names ("z", "Z",
/// "Delete", "ArrowLeft", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub focus: FocusTarget,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            focus: FocusTarget::Canvas,
        }
    }

    pub fn with_focus(mut self, focus: FocusTarget) -> Self {
        self.focus = focus;
        self
    }

    /// Case-insensitive match against a single-character key.
    pub fn is_char(&self, c: char) -> bool {
        let mut chars = self.key.chars();
        matches!((chars.next(), chars.next()), (Some(k), None) if k.eq_ignore_ascii_case(&c))
    }

    /// Parse a combination such as `"Ctrl+Shift+Z"` or `"ArrowLeft"`.
    pub fn parse(combo: &str) -> Option<Self> {
        let mut modifiers = Modifiers::NONE;
        let mut key = None;
        for part in combo.split('+').map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "shift" => modifiers.shift = true,
                "alt" => modifiers.alt = true,
                "meta" | "cmd" => modifiers.meta = true,
                "" => return None,
                _ => {
                    if key.is_some() {
                        return None;
                    }
                    key = Some(part.to_string());
                }
            }
        }
        key.map(|k| Self::new(k, modifiers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_combo() {
        let event = KeyEvent::parse("Ctrl+Shift+Z").unwrap();
        assert_eq!(event.modifiers, Modifiers::CTRL_SHIFT);
        assert!(event.is_char('z'));

        let event = KeyEvent::parse("ArrowLeft").unwrap();
        assert_eq!(event.key, "ArrowLeft");
        assert_eq!(event.modifiers, Modifiers::NONE);
        assert!(!event.is_char('a'));

        assert!(KeyEvent::parse("Ctrl+").is_none());
        assert!(KeyEvent::parse("Ctrl+A+B").is_none());
    }

    #[test]
    fn test_focus() {
        assert!(!FocusTarget::Canvas.is_text_entry());
        assert!(FocusTarget::ContentEditable.is_text_entry());
        let event = KeyEvent::new("Delete", Modifiers::NONE).with_focus(FocusTarget::TextArea);
        assert!(event.focus.is_text_entry());
    }
}
