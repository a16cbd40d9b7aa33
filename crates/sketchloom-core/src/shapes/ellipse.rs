//! Ellipse shape.

use super::ShapeTrait;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// An ellipse described by its radii. Circles use equal radii.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub rx: f64,
    pub ry: f64,
}

impl Ellipse {
    pub fn new(rx: f64, ry: f64) -> Self {
        Self { rx, ry }
    }

    pub fn circle(radius: f64) -> Self {
        Self::new(radius, radius)
    }

    pub fn is_circle(&self) -> bool {
        (self.rx - self.ry).abs() < f64::EPSILON
    }
}

impl ShapeTrait for Ellipse {
    fn size(&self) -> Size {
        Size::new(self.rx * 2.0, self.ry * 2.0)
    }

    fn type_name(&self) -> &'static str {
        "circle"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_size() {
        let circle = Ellipse::circle(50.0);
        assert!(circle.is_circle());
        assert_eq!(circle.size(), Size::new(100.0, 100.0));
    }

    #[test]
    fn test_ellipse_not_circle() {
        let ellipse = Ellipse::new(30.0, 10.0);
        assert!(!ellipse.is_circle());
        assert_eq!(ellipse.size(), Size::new(60.0, 20.0));
    }
}
