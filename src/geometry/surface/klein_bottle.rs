use std::f64::consts::{PI, TAU};

use crate::error::{GeometryError, Result};
use crate::geometry::ParametricInterval;
use crate::math::{is_positive, Point2, Point3, Vector2};

/// A figure-eight style Klein bottle built from two tube pieces.
///
/// With `t = 1 - domain.x` around the tube and `s = domain.y` along it:
///
/// - for `s < pi` the tube cross-section follows the bulb,
///   `x = 3 cos(s)(1 + sin(s)) + w cos(s) cos(t)`, `y = -(8 sin(s) + w sin(s) cos(t))`
/// - otherwise it is the handle that passes back through the wall,
///   `x = 3 cos(s)(1 + sin(s)) + w cos(t + pi)`, `y = -8 sin(s)`
///
/// where `w = 2 (1 - cos(s) / 2)`, and `z = -w sin(t)` for both pieces.
///
/// The surface is one-sided, so the normal field has to flip somewhere. It
/// flips past `s = 3*pi/2`, see [`invert_normal`](Self::invert_normal).
#[derive(Debug, Clone, PartialEq)]
pub struct KleinBottle {
    scale: f64,
}

impl KleinBottle {
    /// Creates a new Klein bottle.
    ///
    /// # Errors
    ///
    /// Returns an error if the scale is non-positive or not finite.
    pub fn new(scale: f64) -> Result<Self> {
        if !is_positive(scale) {
            return Err(GeometryError::Degenerate(format!(
                "klein bottle scale must be positive, got {scale}"
            ))
            .into());
        }
        Ok(Self { scale })
    }

    /// Returns the uniform scale factor.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Evaluates the bottle at a domain point.
    #[must_use]
    pub fn evaluate(&self, domain: &Point2) -> Point3 {
        let t = 1.0 - domain.x;
        let s = domain.y;
        let width = 2.0 * (1.0 - s.cos() / 2.0);
        let spine = 3.0 * s.cos() * (1.0 + s.sin());

        let (x, y) = if s < PI {
            (
                spine + width * s.cos() * t.cos(),
                -(8.0 * s.sin() + width * s.sin() * t.cos()),
            )
        } else {
            (spine + width * (t + PI).cos(), -8.0 * s.sin())
        };
        let z = -width * t.sin();

        Point3::new(x, y, z) * self.scale
    }

    /// Whether normals at `domain` must be negated to face outward.
    #[must_use]
    pub fn invert_normal(&self, domain: &Point2) -> bool {
        domain.y > 3.0 * PI / 2.0
    }

    #[must_use]
    pub fn default_interval() -> ParametricInterval {
        ParametricInterval::new([20, 20], Vector2::new(TAU, TAU), Vector2::new(15.0, 50.0))
    }
}
