//! Helper grid lines drawn behind the content.

use crate::geometry::Transform;
use crate::shapes::{Line, ObjectKind, ObjectStyle, SceneObject, SerializableColor};
use kurbo::{Point, Size};

/// Stroke colour of grid lines (`#eee`).
pub const GRID_COLOR: SerializableColor = SerializableColor::new(0xee, 0xee, 0xee, 255);

fn grid_line(start: Point, end: Point) -> SceneObject {
    let (line, origin) = Line::between(start, end);
    let mut object = SceneObject::new(
        ObjectKind::Line(line),
        Transform::at(origin.x, origin.y),
        ObjectStyle {
            stroke: Some(GRID_COLOR),
            stroke_width: 1.0,
            ..ObjectStyle::default()
        },
    );
    object.helper = true;
    object
}

/// Vertical then horizontal lines every `spacing` units across the canvas,
/// starting at 0 and including the far edge when it falls on the grid.
/// Returns no lines for a non-positive spacing.
pub fn grid_lines(size: Size, spacing: f64) -> Vec<SceneObject> {
    if spacing <= 0.0 {
        return Vec::new();
    }
    let columns = (size.width / spacing).floor() as usize;
    let rows = (size.height / spacing).floor() as usize;

    let vertical = (0..=columns).map(|i| {
        let x = i as f64 * spacing;
        grid_line(Point::new(x, 0.0), Point::new(x, size.height))
    });
    let horizontal = (0..=rows).map(|i| {
        let y = i as f64 * spacing;
        grid_line(Point::new(0.0, y), Point::new(size.width, y))
    });
    vertical.chain(horizontal).collect()
}
