//! Straight line shape.

use super::ShapeTrait;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// A straight segment. Endpoints are local, with the bounding box starting
/// at the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

impl Line {
    /// Build a line from endpoints in parent space.
    ///
    /// Returns the line and the parent-space position of its local origin.
    pub fn between(start: Point, end: Point) -> (Self, Point) {
        let origin = Point::new(start.x.min(end.x), start.y.min(end.y));
        let offset = origin.to_vec2();
        (
            Self {
                start: start - offset,
                end: end - offset,
            },
            origin,
        )
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).hypot()
    }

    pub fn direction(&self) -> Vec2 {
        self.end - self.start
    }
}

impl ShapeTrait for Line {
    fn size(&self) -> Size {
        let d = self.direction();
        Size::new(d.x.abs(), d.y.abs())
    }

    fn type_name(&self) -> &'static str {
        "line"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_between() {
        let (line, origin) = Line::between(Point::new(200.0, 100.0), Point::new(50.0, 100.0));
        assert_eq!(origin, Point::new(50.0, 100.0));
        assert_eq!(line.start, Point::new(150.0, 0.0));
        assert_eq!(line.end, Point::new(0.0, 0.0));
        assert!((line.length() - 150.0).abs() < f64::EPSILON);
        assert_eq!(line.size(), Size::new(150.0, 0.0));
    }
}
