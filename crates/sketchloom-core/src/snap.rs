//! Grid snapping for moved and scaled objects.

use crate::shapes::SceneObject;
use kurbo::Point;

/// Default grid pitch; [`EditorConfig::grid_size`](crate::EditorConfig::grid_size) overrides it.
pub const GRID_SIZE: f64 = 20.0;

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// Whether the X coordinate changed.
    pub snapped_x: bool,
    /// Whether the Y coordinate changed.
    pub snapped_y: bool,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            snapped_x: false,
            snapped_y: false,
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Round a value to the nearest multiple of `grid_size`.
pub fn quantize(value: f64, grid_size: f64) -> f64 {
    if grid_size <= 0.0 {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> SnapResult {
    if grid_size <= 0.0 {
        return SnapResult::none(point);
    }
    let snapped = Point::new(quantize(point.x, grid_size), quantize(point.y, grid_size));
    SnapResult {
        point: snapped,
        snapped_x: snapped.x != point.x,
        snapped_y: snapped.y != point.y,
    }
}

/// Quantize an object's position to the grid. Size, scale and rotation are
/// untouched. Returns whether the object moved.
pub fn snap_object_to_grid(object: &mut SceneObject, grid_size: f64) -> bool {
    let t = &mut object.transform;
    let result = snap_to_grid(Point::new(t.left, t.top), grid_size);
    t.left = result.point.x;
    t.top = result.point.y;
    result.is_snapped()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Transform;
    use crate::shapes::{ObjectKind, ObjectStyle, Rectangle};

    #[test]
    fn test_snap_to_grid() {
        let result = snap_to_grid(Point::new(23.0, 37.0), GRID_SIZE);
        assert_eq!(result.point, Point::new(20.0, 40.0));
        assert!(result.is_snapped());

        let result = snap_to_grid(Point::new(40.0, 60.0), GRID_SIZE);
        assert!(!result.is_snapped());
    }

    #[test]
    fn test_snap_negative_coordinates() {
        let result = snap_to_grid(Point::new(-23.0, -9.0), GRID_SIZE);
        assert_eq!(result.point, Point::new(-20.0, 0.0));
    }

    #[test]
    fn test_zero_grid_is_identity() {
        let p = Point::new(3.3, 4.4);
        assert_eq!(snap_to_grid(p, 0.0).point, p);
        assert_eq!(quantize(7.0, 0.0), 7.0);
    }

    #[test]
    fn test_snap_object_keeps_size() {
        let mut t = Transform::at(31.0, 49.0);
        t.scale_x = 1.7;
        let mut object = SceneObject::new(
            ObjectKind::Rect(Rectangle::new(55.0, 10.0)),
            t,
            ObjectStyle::default(),
        );
        assert!(snap_object_to_grid(&mut object, GRID_SIZE));
        assert_eq!((object.transform.left, object.transform.top), (40.0, 40.0));
        assert_eq!(object.transform.scale_x, 1.7);
        assert!(!snap_object_to_grid(&mut object, GRID_SIZE));
    }
}
