//! Isosceles triangle shape.

use super::ShapeTrait;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// An isosceles triangle with its apex centered on the top edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub width: f64,
    pub height: f64,
}

impl Triangle {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Vertices in local coordinates: apex, bottom-right, bottom-left.
    pub fn vertices(&self) -> [Point; 3] {
        [
            Point::new(self.width / 2.0, 0.0),
            Point::new(self.width, self.height),
            Point::new(0.0, self.height),
        ]
    }
}

impl ShapeTrait for Triangle {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn type_name(&self) -> &'static str {
        "triangle"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertices() {
        let tri = Triangle::new(100.0, 80.0);
        let [apex, right, left] = tri.vertices();
        assert_eq!(apex, Point::new(50.0, 0.0));
        assert_eq!(right, Point::new(100.0, 80.0));
        assert_eq!(left, Point::new(0.0, 80.0));
    }
}
