//! Viewport zoom for displaying the canvas inside its wrapper element.

use kurbo::{Affine, Point, Size};
use serde::{Deserialize, Serialize};

/// Display zoom of the canvas. Zoom never changes object coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Current zoom level (1.0 = 100%).
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Increment applied by zoom in/out.
    pub step: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            min_zoom: 0.1,
            max_zoom: 2.0,
            step: 0.1,
        }
    }
}

/// Round to two decimals so repeated steps don't accumulate float noise.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl Viewport {
    pub fn new(min_zoom: f64, max_zoom: f64, step: f64) -> Self {
        Self {
            zoom: 1.0,
            min_zoom,
            max_zoom,
            step,
        }
    }

    /// Get the affine transform for rendering.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.zoom)
    }

    /// Convert a point on screen to canvas coordinates.
    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        self.transform().inverse() * screen_point
    }

    /// Set the zoom, clamped to the allowed range and rounded.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = round2(zoom.clamp(self.min_zoom, self.max_zoom));
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.set_zoom(self.zoom + self.step);
        self.zoom
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.set_zoom(self.zoom - self.step);
        self.zoom
    }

    pub fn reset(&mut self) {
        self.zoom = 1.0;
    }

    /// Displayed percentage, e.g. `"110%"`.
    pub fn percent_label(&self) -> String {
        format!("{}%", (self.zoom * 100.0).round() as i64)
    }

    /// Scale that fits a canvas inside a wrapper. Not clamped to the zoom
    /// range; a zero-sized canvas yields 1.
    pub fn fit_scale(canvas: Size, wrapper: Size) -> f64 {
        if canvas.width <= 0.0 || canvas.height <= 0.0 {
            return 1.0;
        }
        (wrapper.width / canvas.width).min(wrapper.height / canvas.height)
    }

    /// Size of the canvas element on screen at the current zoom.
    pub fn display_size(&self, canvas: Size) -> Size {
        Size::new(canvas.width * self.zoom, canvas.height * self.zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_steps_are_clamped_and_rounded() {
        let mut v = Viewport::default();
        for _ in 0..20 {
            v.zoom_in();
        }
        assert_eq!(v.zoom, 2.0);
        for _ in 0..30 {
            v.zoom_out();
        }
        assert_eq!(v.zoom, 0.1);
        v.zoom_in();
        v.zoom_in();
        assert_eq!(v.zoom, 0.3);
        assert_eq!(v.percent_label(), "30%");
        v.reset();
        assert_eq!(v.zoom, 1.0);
    }

    #[test]
    fn test_fit_scale() {
        let scale = Viewport::fit_scale(Size::new(1000.0, 700.0), Size::new(500.0, 700.0));
        assert_eq!(scale, 0.5);
        assert_eq!(Viewport::fit_scale(Size::ZERO, Size::new(10.0, 10.0)), 1.0);
    }

    #[test]
    fn test_screen_to_canvas() {
        let mut v = Viewport::default();
        v.set_zoom(0.5);
        let p = v.screen_to_canvas(Point::new(100.0, 50.0));
        assert!((p.x - 200.0).abs() < 1e-9);
        assert!((p.y - 100.0).abs() < 1e-9);
        assert_eq!(v.display_size(Size::new(1000.0, 700.0)), Size::new(500.0, 350.0));
    }
}
