//! Object transforms and coordinate-space reconciliation.
//!
//! Every scene object carries a [`Transform`] that places its local geometry
//! (a `width × height` box anchored at the local origin) into its parent's
//! coordinate space. Top-level objects are parented to the canvas; group
//! children are parented to their group.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Which point of the local box `left`/`top` refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// `left`/`top` is the top-left corner of the unrotated box.
    #[default]
    TopLeft,
    /// `left`/`top` is the center of the box.
    Center,
}

/// Position, scale, rotation and origin of an object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub left: f64,
    pub top: f64,
    #[serde(default = "unit_scale")]
    pub scale_x: f64,
    #[serde(default = "unit_scale")]
    pub scale_y: f64,
    /// Rotation in degrees, clockwise in screen space.
    #[serde(default)]
    pub angle: f64,
    #[serde(default)]
    pub origin: Origin,
}

fn unit_scale() -> f64 {
    1.0
}

impl Default for Transform {
    fn default() -> Self {
        Self::at(0.0, 0.0)
    }
}

impl Transform {
    /// Unscaled, unrotated transform with its top-left corner at `(left, top)`.
    pub fn at(left: f64, top: f64) -> Self {
        Self {
            left,
            top,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
            origin: Origin::TopLeft,
        }
    }

    /// The matrix mapping local geometry of the given intrinsic size into
    /// parent coordinates.
    pub fn matrix(&self, size: Size) -> Affine {
        let base = Affine::translate((self.left, self.top))
            * Affine::rotate(self.angle.to_radians())
            * Affine::scale_non_uniform(self.scale_x, self.scale_y);
        match self.origin {
            Origin::TopLeft => base,
            Origin::Center => base * Affine::translate((-size.width / 2.0, -size.height / 2.0)),
        }
    }

    /// Decompose an affine matrix into a top-left anchored transform.
    ///
    /// Exact for any composition of translation, rotation and axis scaling.
    /// A skew component (a rotated child inside a non-uniformly scaled
    /// parent) is dropped.
    pub fn from_matrix(matrix: Affine) -> Self {
        let [a, b, c, d, e, f] = matrix.as_coeffs();
        let scale_x = a.hypot(b);
        if scale_x < f64::EPSILON {
            return Self {
                left: e,
                top: f,
                scale_x: 0.0,
                scale_y: c.hypot(d),
                angle: 0.0,
                origin: Origin::TopLeft,
            };
        }
        let angle = b.atan2(a).to_degrees();
        let scale_y = (a * d - b * c) / scale_x;
        Self {
            left: e,
            top: f,
            scale_x,
            scale_y,
            angle: normalize_degrees(angle),
            origin: Origin::TopLeft,
        }
    }

    /// Width after scaling (rotation ignored).
    pub fn scaled_width(&self, size: Size) -> f64 {
        size.width * self.scale_x.abs()
    }

    /// Height after scaling (rotation ignored).
    pub fn scaled_height(&self, size: Size) -> f64 {
        size.height * self.scale_y.abs()
    }

    /// Left edge of the unrotated scaled box.
    pub fn x(&self, size: Size) -> f64 {
        match self.origin {
            Origin::TopLeft => self.left,
            Origin::Center => self.left - self.scaled_width(size) / 2.0,
        }
    }

    /// Top edge of the unrotated scaled box.
    pub fn y(&self, size: Size) -> f64 {
        match self.origin {
            Origin::TopLeft => self.top,
            Origin::Center => self.top - self.scaled_height(size) / 2.0,
        }
    }

    pub fn set_x(&mut self, size: Size, x: f64) {
        self.left = match self.origin {
            Origin::TopLeft => x,
            Origin::Center => x + self.scaled_width(size) / 2.0,
        };
    }

    pub fn set_y(&mut self, size: Size, y: f64) {
        self.top = match self.origin {
            Origin::TopLeft => y,
            Origin::Center => y + self.scaled_height(size) / 2.0,
        };
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.left += delta.x;
        self.top += delta.y;
    }

    /// Axis-aligned bounding box of the transformed local box, in parent
    /// coordinates.
    pub fn bounding_box(&self, size: Size) -> Rect {
        self.matrix(size)
            .transform_rect_bbox(Rect::from_origin_size(Point::ZERO, size))
    }
}

/// Compose a parent's matrix with a child's local matrix and decompose the
/// result into an absolute, top-left anchored transform.
pub fn compose(parent: Affine, child: Affine) -> Transform {
    Transform::from_matrix(parent * child)
}

/// Express an absolute matrix relative to a parent frame.
pub fn relative_to(parent: Affine, absolute: Affine) -> Transform {
    Transform::from_matrix(parent.inverse() * absolute)
}

/// Map an angle into `(-180, 180]`.
fn normalize_degrees(angle: f64) -> f64 {
    let mut a = angle % 360.0;
    if a <= -180.0 {
        a += 360.0;
    } else if a > 180.0 {
        a -= 360.0;
    }
    a
}
