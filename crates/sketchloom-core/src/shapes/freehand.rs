//! Freehand drawing shape.

use super::{ShapeTrait, normalize_points, points_bounds};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// A brush stroke (series of points relative to the local origin).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Freehand {
    pub points: Vec<Point>,
}

impl Freehand {
    /// Build a stroke from points captured in parent space.
    ///
    /// Returns the stroke and the offset of its local origin in that space.
    pub fn from_points(mut points: Vec<Point>) -> (Self, Vec2) {
        let offset = normalize_points(&mut points);
        (Self { points }, offset)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Simplify the path by removing redundant points.
    pub fn simplify(&mut self, tolerance: f64) {
        if self.points.len() < 3 {
            return;
        }

        // Ramer-Douglas-Peucker algorithm
        self.points = rdp_simplify(&self.points, tolerance);
    }
}

/// Ramer-Douglas-Peucker line simplification.
fn rdp_simplify(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let first = points[0];
    let last = points[points.len() - 1];

    let (max_index, max_dist) = points[1..points.len() - 1]
        .iter()
        .enumerate()
        .map(|(i, p)| (i + 1, perpendicular_distance(*p, first, last)))
        .fold((0, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best });

    if max_dist > tolerance {
        let mut left = rdp_simplify(&points[..=max_index], tolerance);
        let right = rdp_simplify(&points[max_index..], tolerance);
        // Junction point appears in both halves
        left.pop();
        left.extend(right);
        left
    } else {
        vec![first, last]
    }
}

fn perpendicular_distance(point: Point, line_start: Point, line_end: Point) -> f64 {
    let d = line_end - line_start;
    let len = d.hypot();
    if len < f64::EPSILON {
        return (point - line_start).hypot();
    }
    (point - line_start).cross(d).abs() / len
}

impl ShapeTrait for Freehand {
    fn size(&self) -> Size {
        points_bounds(&self.points).size()
    }

    fn type_name(&self) -> &'static str {
        "path"
    }
}
