//! Object creation. New objects become the active selection.

use super::Editor;
use crate::geometry::Transform;
use crate::scene::SceneEvent;
use crate::shapes::{
    Ellipse, Freehand, Image, Line, ObjectKind, ObjectStyle, Polygon, Rectangle, SceneObject,
    SerializableColor, ShapeId, TextBlock, Triangle, Video,
};
use crate::storage::StorageResult;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

const STAR_SPIKES: usize = 5;
const STAR_OUTER_RADIUS: f64 = 50.0;
const STAR_INNER_RADIUS: f64 = 20.0;
const TEXT_FONT_SIZE: f64 = 24.0;
const OUTLINE_WIDTH: f64 = 2.0;
const LINE_WIDTH: f64 = 2.0;
const BRUSH_WIDTH: f64 = 2.0;

/// Shapes available as outline-only variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlineShape {
    Rect,
    Circle,
    Triangle,
    Star,
}

impl OutlineShape {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rect" | "rectangle" => Some(OutlineShape::Rect),
            "circle" => Some(OutlineShape::Circle),
            "triangle" => Some(OutlineShape::Triangle),
            "star" => Some(OutlineShape::Star),
            _ => None,
        }
    }
}

impl Editor {
    /// Add an object on top and make it the sole active object.
    pub fn add_object(&mut self, object: SceneObject) -> ShapeId {
        let id = self.scene.add(object);
        self.scene.set_active([id]);
        self.process_events();
        id
    }

    fn filled(&self) -> ObjectStyle {
        ObjectStyle::filled(self.config.default_fill)
    }

    /// Filled 100×100 rectangle at (100, 100) with rounded corners.
    pub fn add_rectangle(&mut self) -> ShapeId {
        let rect = Rectangle::rounded(100.0, 100.0, Rectangle::DEFAULT_CORNER_FRACTION);
        let style = self.filled();
        self.add_object(SceneObject::new(
            ObjectKind::Rect(rect),
            Transform::at(100.0, 100.0),
            style,
        ))
    }

    /// Filled five-point star at (100, 100).
    pub fn add_star(&mut self) -> ShapeId {
        let star = Polygon::star(STAR_SPIKES, STAR_OUTER_RADIUS, STAR_INNER_RADIUS);
        let style = self.filled();
        self.add_object(SceneObject::new(
            ObjectKind::Polygon(star),
            Transform::at(100.0, 100.0),
            style,
        ))
    }

    /// Filled circle of radius 50 at (150, 150).
    pub fn add_circle(&mut self) -> ShapeId {
        let style = self.filled();
        self.add_object(SceneObject::new(
            ObjectKind::Circle(Ellipse::circle(50.0)),
            Transform::at(150.0, 150.0),
            style,
        ))
    }

    /// Horizontal line from (50, 100) to (200, 100).
    pub fn add_line(&mut self) -> ShapeId {
        let (line, origin) = Line::between(Point::new(50.0, 100.0), Point::new(200.0, 100.0));
        let style = ObjectStyle {
            stroke: Some(self.config.default_stroke),
            stroke_width: LINE_WIDTH,
            ..ObjectStyle::default()
        };
        self.add_object(SceneObject::new(
            ObjectKind::Line(line),
            Transform::at(origin.x, origin.y),
            style,
        ))
    }

    /// Filled 100×100 triangle at (120, 120).
    pub fn add_triangle(&mut self) -> ShapeId {
        let style = self.filled();
        self.add_object(SceneObject::new(
            ObjectKind::Triangle(Triangle::new(100.0, 100.0)),
            Transform::at(120.0, 120.0),
            style,
        ))
    }

    /// Placeholder text block in black.
    pub fn add_text(&mut self) -> ShapeId {
        self.add_object(SceneObject::new(
            ObjectKind::Textbox(TextBlock::new(TextBlock::PLACEHOLDER, TEXT_FONT_SIZE)),
            Transform::at(100.0, 100.0),
            ObjectStyle::filled(SerializableColor::black()),
        ))
    }

    /// Outline-only shape with a transparent fill at (100, 100).
    pub fn add_empty_shape(&mut self, shape: OutlineShape) -> ShapeId {
        let kind = match shape {
            OutlineShape::Rect => ObjectKind::Rect(Rectangle::new(100.0, 100.0)),
            OutlineShape::Circle => ObjectKind::Circle(Ellipse::circle(50.0)),
            OutlineShape::Triangle => ObjectKind::Triangle(Triangle::new(100.0, 100.0)),
            OutlineShape::Star => {
                ObjectKind::Polygon(Polygon::star(STAR_SPIKES, STAR_OUTER_RADIUS, STAR_INNER_RADIUS))
            }
        };
        let style = ObjectStyle::outlined(self.config.default_stroke, OUTLINE_WIDTH);
        self.add_object(SceneObject::new(kind, Transform::at(100.0, 100.0), style))
    }

    /// Image from a source URL at (100, 100), scaled down to fit the canvas.
    pub fn add_image(&mut self, src: impl Into<String>, natural_size: Size) -> ShapeId {
        let canvas = self.scene.size();
        let image = Image::from_url(src, natural_size.width, natural_size.height)
            .fit_within(canvas.width, canvas.height);
        self.add_custom_element(ObjectKind::Image(image))
    }

    /// Image from uploaded file bytes, embedded as a data URL. Returns `None`
    /// when the bytes are not PNG, JPEG, GIF or WebP.
    pub fn add_image_bytes(&mut self, data: &[u8], natural_size: Size) -> Option<ShapeId> {
        let Some(image) = Image::from_bytes(data, natural_size.width, natural_size.height) else {
            log::warn!("Rejected image upload of {} bytes: unknown format", data.len());
            return None;
        };
        let canvas = self.scene.size();
        let image = image.fit_within(canvas.width, canvas.height);
        Some(self.add_custom_element(ObjectKind::Image(image)))
    }

    /// Store video bytes in the blob store, then add a video frame whose id
    /// is the blob key.
    pub async fn add_video(&mut self, data: &[u8], mime: &str) -> StorageResult<ShapeId> {
        let object = SceneObject::new(
            ObjectKind::Video(Video::new(None)),
            Transform::at(100.0, 100.0),
            ObjectStyle::default(),
        );
        let key = object.id().to_string();
        self.blobs.save(&key, data, mime).await?;
        let source = self.blobs.resolve(&key).await?;

        let mut object = object;
        if let ObjectKind::Video(video) = &mut object.shape {
            video.source = source;
        }
        log::info!("Added video {} ({} bytes)", key, data.len());
        Ok(self.add_custom_object(object))
    }

    fn add_custom_element(&mut self, kind: ObjectKind) -> ShapeId {
        self.add_custom_object(SceneObject::new(
            kind,
            Transform::at(100.0, 100.0),
            ObjectStyle::default(),
        ))
    }

    fn add_custom_object(&mut self, object: SceneObject) -> ShapeId {
        let id = self.scene.add(object);
        self.scene.set_active([id]);
        self.scene.fire(SceneEvent::CustomElementCreated(id));
        self.process_events();
        id
    }

    /// Commit a brush stroke captured in canvas coordinates. The stroke is
    /// named `path N`, N being the number of layers before it. Returns
    /// `None` for strokes with fewer than two points.
    pub fn add_path(&mut self, points: Vec<Point>) -> Option<ShapeId> {
        if points.len() < 2 {
            return None;
        }
        let (path, offset) = Freehand::from_points(points);
        let name = format!("path {}", self.layers.len());
        let style = ObjectStyle {
            stroke: Some(self.config.default_stroke),
            stroke_width: BRUSH_WIDTH,
            ..ObjectStyle::default()
        };
        let object = SceneObject::new(
            ObjectKind::Path(path),
            Transform::at(offset.x, offset.y),
            style,
        )
        .with_name(name);
        let id = self.scene.add(object);
        self.scene.fire(SceneEvent::PathCreated(id));
        self.process_events();
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::shapes::ShapeTrait;

    fn editor() -> Editor {
        Editor::in_memory(EditorConfig::default())
    }

    #[test]
    fn test_factories_select_new_objects() {
        let mut editor = editor();
        let rect = editor.add_rectangle();
        assert_eq!(editor.scene().selection().single(), Some(rect));
        let object = editor.object(rect).unwrap();
        assert_eq!((object.x(), object.y()), (100.0, 100.0));
        let ObjectKind::Rect(r) = &object.shape else {
            panic!("expected rect");
        };
        assert_eq!(r.rx, 10.0);

        let circle = editor.add_circle();
        assert_eq!(editor.scene().selection().single(), Some(circle));
        assert_eq!(editor.object(circle).unwrap().scaled_width(), 100.0);
        assert_eq!(editor.layers().len(), 2);
    }

    #[test]
    fn test_line_and_star() {
        let mut editor = editor();
        let line = editor.add_line();
        let object = editor.object(line).unwrap();
        assert_eq!((object.x(), object.y()), (50.0, 100.0));
        assert_eq!(object.scaled_width(), 150.0);
        assert_eq!(object.style.stroke_width, 2.0);

        let star = editor.add_star();
        let ObjectKind::Polygon(p) = &editor.object(star).unwrap().shape else {
            panic!("expected polygon");
        };
        assert!(p.is_star());
        assert_eq!(p.points.len(), 10);
    }

    #[test]
    fn test_outline_shapes() {
        let mut editor = editor();
        for shape in [
            OutlineShape::Rect,
            OutlineShape::Circle,
            OutlineShape::Triangle,
            OutlineShape::Star,
        ] {
            let id = editor.add_empty_shape(shape);
            let style = &editor.object(id).unwrap().style;
            assert_eq!(style.fill, Some(SerializableColor::transparent()));
            assert_eq!(style.stroke_width, 2.0);
        }
        assert_eq!(OutlineShape::parse("Rectangle"), Some(OutlineShape::Rect));
    }

    #[test]
    fn test_video_is_stored_first() {
        let mut editor = editor();
        pollster::block_on(editor.restore());
        let before = editor.history().len();
        let id = pollster::block_on(editor.add_video(b"frames", "video/mp4")).unwrap();

        let stored = pollster::block_on(editor.blobs().resolve(&id.to_string())).unwrap();
        assert!(stored.is_some());
        let ObjectKind::Video(video) = &editor.object(id).unwrap().shape else {
            panic!("expected video");
        };
        assert!(video.is_resolved());
        assert_eq!(editor.history().len(), before + 1);
    }

    #[test]
    fn test_path_naming() {
        let mut editor = editor();
        editor.add_rectangle();
        let id = editor
            .add_path(vec![Point::new(10.0, 10.0), Point::new(30.0, 50.0)])
            .unwrap();
        let object = editor.object(id).unwrap();
        assert_eq!(object.name.as_deref(), Some("path 1"));
        assert_eq!(object.x(), 10.0);
        assert_eq!(object.shape.size(), Size::new(20.0, 40.0));
        assert!(editor.add_path(vec![Point::ZERO]).is_none());
    }

    #[test]
    fn test_image_fits_canvas() {
        let mut editor = editor();
        let id = editor.add_image("data:image/png;base64,AAAA", Size::new(2000.0, 700.0));
        assert_eq!(editor.object(id).unwrap().scaled_width(), 1000.0);
    }

    #[test]
    fn test_image_upload() {
        let mut editor = editor();
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        let id = editor.add_image_bytes(&png, Size::new(64.0, 32.0)).unwrap();
        let ObjectKind::Image(image) = &editor.object(id).unwrap().shape else {
            panic!("expected image");
        };
        assert!(image.src.starts_with("data:image/png;base64,"));
        assert_eq!(editor.scene().selection().single(), Some(id));

        assert!(editor.add_image_bytes(b"plain text", Size::new(1.0, 1.0)).is_none());
        assert_eq!(editor.layers().len(), 1);
    }
}
