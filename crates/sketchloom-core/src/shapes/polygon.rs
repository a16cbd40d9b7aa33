//! Closed polygon shape (used for stars).

use super::{ShapeTrait, normalize_points, points_bounds};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A closed polygon whose points are stored relative to the local origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub points: Vec<Point>,
    /// Distinguishes stars from generic polygons in the layer list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_type: Option<String>,
}

impl Polygon {
    /// Build a polygon from points in any space. The points are shifted so
    /// their bounding box starts at the local origin.
    pub fn from_points(mut points: Vec<Point>) -> Self {
        normalize_points(&mut points);
        Self {
            points,
            custom_type: None,
        }
    }

    /// A star with `spikes` outer points, alternating between the outer and
    /// inner radius. The first spike points along the positive x axis.
    pub fn star(spikes: usize, outer_radius: f64, inner_radius: f64) -> Self {
        let spikes = spikes.max(2);
        let step = PI / spikes as f64;
        let points = (0..2 * spikes)
            .map(|i| {
                let radius = if i % 2 == 0 { outer_radius } else { inner_radius };
                let angle = i as f64 * step;
                Point::new(angle.cos() * radius, angle.sin() * radius)
            })
            .collect();
        let mut star = Self::from_points(points);
        star.custom_type = Some("star".to_string());
        star
    }

    pub fn is_star(&self) -> bool {
        self.custom_type.as_deref() == Some("star")
    }
}

impl ShapeTrait for Polygon {
    fn size(&self) -> Size {
        points_bounds(&self.points).size()
    }

    fn type_name(&self) -> &'static str {
        "polygon"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_points() {
        let star = Polygon::star(5, 50.0, 20.0);
        assert_eq!(star.points.len(), 10);
        assert!(star.is_star());
        // First spike lies on the x axis at the outer radius, which is
        // also the rightmost extent.
        let size = star.size();
        assert!((star.points[0].x - size.width).abs() < 1e-9);
    }

    #[test]
    fn test_points_normalized() {
        let poly = Polygon::from_points(vec![
            Point::new(10.0, 20.0),
            Point::new(30.0, 20.0),
            Point::new(20.0, 50.0),
        ]);
        assert_eq!(poly.points[0], Point::new(0.0, 0.0));
        assert_eq!(poly.size(), Size::new(20.0, 30.0));
    }
}
