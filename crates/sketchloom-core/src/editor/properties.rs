//! Property-panel edits on the selected layer and canvas background.
//!
//! Each edit is a "modified" mutation: it records history immediately.

use super::Editor;
use crate::config::BG_COLOR_KEY;
use crate::scene::SceneEvent;
use crate::shapes::{
    FontStyle, ObjectKind, SceneObject, SerializableColor, TextAlign, TextBlock, TextDecoration,
};

impl Editor {
    /// Apply `edit` to the selected layer's object. The edit returns whether
    /// it applied; nothing is recorded otherwise.
    fn edit_selected(&mut self, edit: impl FnOnce(&mut SceneObject) -> bool) -> bool {
        let Some(id) = self.ui.selected_layer else {
            return false;
        };
        let Some(object) = self.scene.get_mut(id) else {
            return false;
        };
        if !edit(object) {
            return false;
        }
        self.scene.request_render();
        self.scene.fire(SceneEvent::ObjectModified(id));
        self.process_events();
        true
    }

    fn edit_selected_text(&mut self, edit: impl FnOnce(&mut TextBlock)) -> bool {
        self.edit_selected(|object| match &mut object.shape {
            ObjectKind::Textbox(text) => {
                edit(text);
                true
            }
            _ => false,
        })
    }

    /// Fill colour. Shapes get a matching stroke; text only has a fill.
    pub fn set_fill_color(&mut self, color: SerializableColor) -> bool {
        self.edit_selected(|object| {
            object.style.fill = Some(color);
            if !object.is_text() {
                object.style.stroke = Some(color);
            }
            true
        })
    }

    /// Stroke colour. Text has no stroke, so its fill changes instead.
    pub fn set_stroke_color(&mut self, color: SerializableColor) -> bool {
        self.edit_selected(|object| {
            if object.is_text() {
                object.style.fill = Some(color);
            } else {
                object.style.stroke = Some(color);
            }
            true
        })
    }

    /// Opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f64) -> bool {
        self.edit_selected(|object| {
            object.style.set_opacity(opacity);
            true
        })
    }

    /// Corner radius of a rectangle as a percentage of its size.
    pub fn set_corner_radius(&mut self, percent: f64) -> bool {
        self.edit_selected(|object| match &mut object.shape {
            ObjectKind::Rect(rect) => {
                rect.set_corner_fraction(percent / 100.0);
                true
            }
            _ => false,
        })
    }

    pub fn set_text(&mut self, content: &str) -> bool {
        let changed = self.edit_selected_text(|text| text.text = content.to_string());
        if changed {
            self.ui.text = Some(content.to_string());
        }
        changed
    }

    pub fn set_font_family(&mut self, family: &str) -> bool {
        self.edit_selected_text(|text| text.font_family = family.to_string())
    }

    /// Font size in pixels. Non-positive sizes are ignored.
    pub fn set_font_size(&mut self, size: f64) -> bool {
        if size <= 0.0 {
            return false;
        }
        self.edit_selected_text(|text| text.font_size = size)
    }

    pub fn set_font_weight(&mut self, weight: &str) -> bool {
        self.edit_selected_text(|text| text.font_weight = weight.to_string())
    }

    pub fn set_font_style(&mut self, style: FontStyle) -> bool {
        self.edit_selected_text(|text| text.font_style = style)
    }

    /// Underline and line-through are mutually exclusive.
    pub fn set_text_decoration(&mut self, decoration: TextDecoration) -> bool {
        self.edit_selected_text(|text| text.decoration = decoration)
    }

    pub fn set_text_align(&mut self, align: TextAlign) -> bool {
        self.edit_selected_text(|text| text.text_align = align)
    }

    /// Change the canvas background and remember it across sessions.
    pub fn set_bg_color(&mut self, color: SerializableColor) {
        self.scene.set_background(color);
        if let Err(e) = self.history.store().set(BG_COLOR_KEY, &color.to_hex()) {
            log::warn!("Failed to persist background colour: {}", e);
        }
    }
}
