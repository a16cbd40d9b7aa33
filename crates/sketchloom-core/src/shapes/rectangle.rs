//! Rectangle shape.

use super::ShapeTrait;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// A rectangle with optional rounded corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub width: f64,
    pub height: f64,
    /// Horizontal corner radius in local units.
    #[serde(default)]
    pub rx: f64,
    /// Vertical corner radius in local units.
    #[serde(default)]
    pub ry: f64,
}

impl Rectangle {
    /// Default corner radius of new rectangles, as a fraction of their size.
    pub const DEFAULT_CORNER_FRACTION: f64 = 0.1;

    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            rx: 0.0,
            ry: 0.0,
        }
    }

    /// A rectangle whose corners are rounded by a fraction of its size.
    pub fn rounded(width: f64, height: f64, fraction: f64) -> Self {
        let mut rect = Self::new(width, height);
        rect.set_corner_fraction(fraction);
        rect
    }

    /// Set the corner radius as a fraction of the rectangle's size.
    ///
    /// Negative fractions are treated as zero; radii never exceed half a side.
    pub fn set_corner_fraction(&mut self, fraction: f64) {
        let fraction = fraction.clamp(0.0, 0.5);
        self.rx = self.width * fraction;
        self.ry = self.height * fraction;
    }

    /// Corner radius as a percentage of the width (0 when the rectangle is empty).
    pub fn corner_percent(&self) -> f64 {
        if self.width <= 0.0 {
            0.0
        } else {
            (self.rx / self.width * 100.0).round()
        }
    }
}

impl ShapeTrait for Rectangle {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn type_name(&self) -> &'static str {
        "rect"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_creation() {
        let rect = Rectangle::new(100.0, 50.0);
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);
        assert_eq!(rect.rx, 0.0);
    }

    #[test]
    fn test_rounded_corners() {
        let rect = Rectangle::rounded(100.0, 60.0, Rectangle::DEFAULT_CORNER_FRACTION);
        assert!((rect.rx - 10.0).abs() < f64::EPSILON);
        assert!((rect.ry - 6.0).abs() < f64::EPSILON);
        assert_eq!(rect.corner_percent(), 10.0);
    }

    #[test]
    fn test_corner_fraction_clamped() {
        let mut rect = Rectangle::new(40.0, 40.0);
        rect.set_corner_fraction(3.0);
        assert_eq!(rect.rx, 20.0);
        rect.set_corner_fraction(-1.0);
        assert_eq!(rect.rx, 0.0);
    }
}
