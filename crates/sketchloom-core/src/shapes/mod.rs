//! Scene object definitions.
//!
//! Every object shares the base fields of [`SceneObject`] (identity, name,
//! transform, visibility, interaction flags and style), so every variant
//! serializes them by construction. Variant-specific geometry lives in
//! [`ObjectKind`].

mod ellipse;
mod freehand;
mod group;
mod image;
mod line;
mod polygon;
mod rectangle;
mod text;
mod triangle;
mod video;

pub use ellipse::Ellipse;
pub use freehand::Freehand;
pub use group::Group;
pub use image::{Image, ImageFormat};
pub use line::Line;
pub use polygon::Polygon;
pub use rectangle::Rectangle;
pub use text::{FontStyle, TextAlign, TextBlock, TextDecoration};
pub use triangle::Triangle;
pub use video::Video;

use crate::geometry::Transform;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for scene objects.
pub type ShapeId = Uuid;

/// Serializable color representation (RGBA8), written as a CSS hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa` or `transparent`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("transparent") {
            return Some(Self::transparent());
        }
        let hex = s.strip_prefix('#')?;
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            3 => {
                let nibble = |i: usize| {
                    let v = u8::from_str_radix(hex.get(i..i + 1)?, 16).ok()?;
                    Some(v * 17)
                };
                Some(Self::new(nibble(0)?, nibble(1)?, nibble(2)?, 255))
            }
            6 => Some(Self::new(byte(0)?, byte(2)?, byte(4)?, 255)),
            8 => Some(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// Lowercase hex form; the alpha byte is only written when not opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for SerializableColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid color: {value}"))
    }
}

impl From<SerializableColor> for String {
    fn from(color: SerializableColor) -> Self {
        color.to_hex()
    }
}

/// Paint properties shared by every object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectStyle {
    /// Fill color (None = no fill).
    #[serde(default)]
    pub fill: Option<SerializableColor>,
    /// Stroke color (None = no stroke).
    #[serde(default)]
    pub stroke: Option<SerializableColor>,
    #[serde(default)]
    pub stroke_width: f64,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl Default for ObjectStyle {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 0.0,
            opacity: 1.0,
        }
    }
}

impl ObjectStyle {
    pub fn filled(color: SerializableColor) -> Self {
        Self {
            fill: Some(color),
            ..Self::default()
        }
    }

    /// Transparent fill with a visible outline.
    pub fn outlined(color: SerializableColor, width: f64) -> Self {
        Self {
            fill: Some(SerializableColor::transparent()),
            stroke: Some(color),
            stroke_width: width,
            opacity: 1.0,
        }
    }

    /// Set the opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }
}

/// Interaction flags. Locking flips all of them together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionFlags {
    pub selectable: bool,
    pub evented: bool,
    pub lock_movement_x: bool,
    pub lock_movement_y: bool,
    pub has_controls: bool,
    pub has_borders: bool,
}

impl Default for InteractionFlags {
    fn default() -> Self {
        Self::unlocked()
    }
}

impl InteractionFlags {
    pub fn unlocked() -> Self {
        Self {
            selectable: true,
            evented: true,
            lock_movement_x: false,
            lock_movement_y: false,
            has_controls: true,
            has_borders: true,
        }
    }

    pub fn locked() -> Self {
        Self {
            selectable: false,
            evented: false,
            lock_movement_x: true,
            lock_movement_y: true,
            has_controls: false,
            has_borders: false,
        }
    }

    /// An object counts as locked once it can no longer be selected.
    pub fn is_locked(&self) -> bool {
        !self.selectable
    }

    /// Flip between the fully locked and fully unlocked flag sets.
    pub fn toggle(&mut self) {
        *self = if self.is_locked() {
            Self::unlocked()
        } else {
            Self::locked()
        };
    }
}

/// Common geometry queries for object variants.
pub trait ShapeTrait {
    /// Intrinsic (unscaled) size of the local geometry.
    fn size(&self) -> Size;

    /// Serialized type tag, also shown in layer names.
    fn type_name(&self) -> &'static str;
}

/// Bounding box of a point list (`Rect::ZERO` when empty).
pub(crate) fn points_bounds(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::ZERO;
    };
    points
        .iter()
        .skip(1)
        .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p))
}

/// Shift points so their bounding box starts at the local origin.
///
/// Returns the offset that was removed, i.e. where the local origin sits in
/// the points' original space.
pub(crate) fn normalize_points(points: &mut [Point]) -> Vec2 {
    let bounds = points_bounds(points);
    let offset = Vec2::new(bounds.x0, bounds.y0);
    for p in points.iter_mut() {
        *p -= offset;
    }
    offset
}

/// Variant-specific data of a scene object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectKind {
    Rect(Rectangle),
    Circle(Ellipse),
    Polygon(Polygon),
    Line(Line),
    Triangle(Triangle),
    Textbox(TextBlock),
    Image(Image),
    Video(Video),
    Group(Group),
    Path(Freehand),
}

impl ObjectKind {
    fn as_shape_trait(&self) -> &dyn ShapeTrait {
        match self {
            ObjectKind::Rect(s) => s,
            ObjectKind::Circle(s) => s,
            ObjectKind::Polygon(s) => s,
            ObjectKind::Line(s) => s,
            ObjectKind::Triangle(s) => s,
            ObjectKind::Textbox(s) => s,
            ObjectKind::Image(s) => s,
            ObjectKind::Video(s) => s,
            ObjectKind::Group(s) => s,
            ObjectKind::Path(s) => s,
        }
    }
}

impl ShapeTrait for ObjectKind {
    fn size(&self) -> Size {
        self.as_shape_trait().size()
    }

    fn type_name(&self) -> &'static str {
        self.as_shape_trait().type_name()
    }
}

/// An object on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub(crate) id: ShapeId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub flags: InteractionFlags,
    #[serde(default)]
    pub style: ObjectStyle,
    /// Internal helper (grid line); never listed, snapshotted or exported.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub helper: bool,
    pub shape: ObjectKind,
}

fn default_visible() -> bool {
    true
}

impl SceneObject {
    /// Create an object with a fresh id.
    pub fn new(shape: ObjectKind, transform: Transform, style: ObjectStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: None,
            transform,
            visible: true,
            flags: InteractionFlags::default(),
            style,
            helper: false,
            shape,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Assign a fresh id to this object and, for groups, to every child.
    /// Returns `(old, new)` for each video, whose media is keyed by id.
    pub fn regenerate_ids(&mut self) -> Vec<(ShapeId, ShapeId)> {
        let mut videos = Vec::new();
        self.regenerate_into(&mut videos);
        videos
    }

    fn regenerate_into(&mut self, videos: &mut Vec<(ShapeId, ShapeId)>) {
        let old = self.id;
        self.id = Uuid::new_v4();
        match &mut self.shape {
            ObjectKind::Video(_) => videos.push((old, self.id)),
            ObjectKind::Group(group) => {
                for child in &mut group.children {
                    child.regenerate_into(videos);
                }
            }
            _ => {}
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.shape.type_name()
    }

    pub fn size(&self) -> Size {
        self.shape.size()
    }

    pub fn is_locked(&self) -> bool {
        self.flags.is_locked()
    }

    pub fn is_group(&self) -> bool {
        matches!(self.shape, ObjectKind::Group(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self.shape, ObjectKind::Textbox(_))
    }

    /// Width after scaling.
    pub fn scaled_width(&self) -> f64 {
        self.transform.scaled_width(self.size())
    }

    /// Height after scaling.
    pub fn scaled_height(&self) -> f64 {
        self.transform.scaled_height(self.size())
    }

    /// Left edge of the unrotated scaled box.
    pub fn x(&self) -> f64 {
        self.transform.x(self.size())
    }

    /// Top edge of the unrotated scaled box.
    pub fn y(&self) -> f64 {
        self.transform.y(self.size())
    }

    pub fn set_x(&mut self, x: f64) {
        let size = self.size();
        self.transform.set_x(size, x);
    }

    pub fn set_y(&mut self, y: f64) {
        let size = self.size();
        self.transform.set_y(size, y);
    }

    /// Local-to-parent matrix.
    pub fn matrix(&self) -> Affine {
        self.transform.matrix(self.size())
    }

    /// Axis-aligned bounds in parent coordinates.
    pub fn bounds(&self) -> Rect {
        self.transform.bounding_box(self.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(
            SerializableColor::from_hex("#075B5E"),
            Some(SerializableColor::new(7, 91, 94, 255))
        );
        assert_eq!(
            SerializableColor::from_hex("#000"),
            Some(SerializableColor::black())
        );
        assert_eq!(
            SerializableColor::from_hex("transparent"),
            Some(SerializableColor::transparent())
        );
        assert_eq!(SerializableColor::from_hex("075B5E"), None);
        assert_eq!(SerializableColor::from_hex("#12345"), None);
    }

    #[test]
    fn test_color_serializes_as_hex() {
        let json = serde_json::to_string(&SerializableColor::new(255, 0, 16, 128)).unwrap();
        assert_eq!(json, "\"#ff001080\"");
        let back: SerializableColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SerializableColor::new(255, 0, 16, 128));
    }

    #[test]
    fn test_lock_toggle_is_reversible() {
        let mut flags = InteractionFlags::default();
        let original = flags;
        flags.toggle();
        assert!(!flags.selectable);
        assert!(!flags.evented);
        assert!(flags.lock_movement_x && flags.lock_movement_y);
        assert!(flags.is_locked());
        flags.toggle();
        assert_eq!(flags, original);
    }

    #[test]
    fn test_opacity_clamped() {
        let mut style = ObjectStyle::default();
        style.set_opacity(1.7);
        assert_eq!(style.opacity, 1.0);
        style.set_opacity(-0.2);
        assert_eq!(style.opacity, 0.0);
    }

    #[test]
    fn test_object_round_trip_preserves_id_and_flags() {
        let mut obj = SceneObject::new(
            ObjectKind::Rect(Rectangle::new(100.0, 50.0)),
            Transform::at(10.0, 20.0),
            ObjectStyle::filled(SerializableColor::black()),
        )
        .with_name("Header");
        obj.flags.toggle();

        let value = serde_json::to_value(&obj).unwrap();
        assert_eq!(value["shape"]["type"], "rect");
        let back: SceneObject = serde_json::from_value(value).unwrap();
        assert_eq!(back, obj);
        assert_eq!(back.id(), obj.id());
    }

    #[test]
    fn test_scaled_size() {
        let mut obj = SceneObject::new(
            ObjectKind::Rect(Rectangle::new(100.0, 50.0)),
            Transform::at(0.0, 0.0),
            ObjectStyle::default(),
        );
        obj.transform.scale_x = 2.0;
        obj.transform.scale_y = -0.5;
        assert_eq!(obj.scaled_width(), 200.0);
        assert_eq!(obj.scaled_height(), 25.0);
    }
}
