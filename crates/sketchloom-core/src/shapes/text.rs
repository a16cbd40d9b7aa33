//! Text block shape.

use super::ShapeTrait;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Line height as a multiple of the font size.
const LINE_HEIGHT: f64 = 1.16;

/// Rough advance width of one glyph relative to the font size, used until a
/// renderer measures the text.
const CHAR_WIDTH_FACTOR: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Text decoration. Underline and line-through are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
}

impl TextDecoration {
    /// Parse a CSS-style decoration name. Unknown names clear the decoration.
    pub fn parse(s: &str) -> Self {
        match s {
            "underline" => TextDecoration::Underline,
            "line-through" => TextDecoration::LineThrough,
            _ => TextDecoration::None,
        }
    }
}

/// An editable block of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub text: String,
    pub font_size: f64,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// CSS weight keyword or number ("normal", "bold", "600").
    #[serde(default = "default_font_weight")]
    pub font_weight: String,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub decoration: TextDecoration,
    #[serde(default)]
    pub text_align: TextAlign,
    /// Wrapping width; `None` sizes the box to the longest line.
    #[serde(default)]
    pub width: Option<f64>,
}

fn default_font_family() -> String {
    "Inter".to_string()
}

fn default_font_weight() -> String {
    "normal".to_string()
}

impl TextBlock {
    pub const PLACEHOLDER: &'static str = "New Text";

    pub fn new(text: impl Into<String>, font_size: f64) -> Self {
        Self {
            text: text.into(),
            font_size,
            font_family: default_font_family(),
            font_weight: default_font_weight(),
            font_style: FontStyle::Normal,
            decoration: TextDecoration::None,
            text_align: TextAlign::Left,
            width: None,
        }
    }

    /// Whether the text still holds the placeholder inserted on creation.
    pub fn is_placeholder(&self) -> bool {
        self.text == Self::PLACEHOLDER
    }

    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }
}

impl ShapeTrait for TextBlock {
    fn size(&self) -> Size {
        let width = self.width.unwrap_or_else(|| {
            let longest = self
                .text
                .split('\n')
                .map(|l| l.chars().count())
                .max()
                .unwrap_or(0);
            longest as f64 * self.font_size * CHAR_WIDTH_FACTOR
        });
        let height = self.line_count() as f64 * self.font_size * LINE_HEIGHT;
        Size::new(width, height)
    }

    fn type_name(&self) -> &'static str {
        "textbox"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let text = TextBlock::new(TextBlock::PLACEHOLDER, 24.0);
        assert!(text.is_placeholder());
        assert_eq!(text.font_family, "Inter");
        assert_eq!(text.decoration, TextDecoration::None);
    }

    #[test]
    fn test_size_grows_with_lines() {
        let mut text = TextBlock::new("one", 10.0);
        let single = text.size();
        text.text = "one\ntwo".to_string();
        let double = text.size();
        assert!((double.height - 2.0 * single.height).abs() < 1e-9);
        assert_eq!(double.width, single.width);
    }

    #[test]
    fn test_fixed_width() {
        let mut text = TextBlock::new("a long line of text", 20.0);
        text.width = Some(120.0);
        assert_eq!(text.size().width, 120.0);
    }

    #[test]
    fn test_decoration_parse() {
        assert_eq!(TextDecoration::parse("underline"), TextDecoration::Underline);
        assert_eq!(TextDecoration::parse("line-through"), TextDecoration::LineThrough);
        assert_eq!(TextDecoration::parse("overline"), TextDecoration::None);
    }
}
