use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::geometry::ParametricInterval;
use crate::math::{is_positive, Point2, Point3, Vector2};

/// A cone standing on the Y axis, centered vertically on the origin.
///
/// `P(u, v) = (r (1 - v) cos(u), h (v - 0.5), -r (1 - v) sin(u))`
///
/// Parameters: `u` = angle around the axis in `[0, 2*pi]`, `v` = height
/// fraction in `[0, 1]` from the base rim to the apex. The apex row
/// (`v = 1`) collapses to a single point.
///
/// Domain-space texture coordinates stretch badly toward the apex, so the
/// cone is textured in object space instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Cone {
    height: f64,
    radius: f64,
}

impl Cone {
    /// Creates a new cone.
    ///
    /// # Errors
    ///
    /// Returns an error if the height or base radius is non-positive or not finite.
    pub fn new(height: f64, radius: f64) -> Result<Self> {
        if !is_positive(height) {
            return Err(
                GeometryError::Degenerate(format!("cone height must be positive, got {height}"))
                    .into(),
            );
        }
        if !is_positive(radius) {
            return Err(
                GeometryError::Degenerate(format!("cone radius must be positive, got {radius}"))
                    .into(),
            );
        }
        Ok(Self { height, radius })
    }

    /// Returns the height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns the base radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Evaluates the cone at a domain point.
    #[must_use]
    pub fn evaluate(&self, domain: &Point2) -> Point3 {
        let (u, v) = (domain.x, domain.y);
        let r = self.radius * (1.0 - v);
        Point3::new(r * u.cos(), self.height * (v - 0.5), -r * u.sin())
    }

    #[must_use]
    pub fn default_interval() -> ParametricInterval {
        ParametricInterval::new([20, 20], Vector2::new(TAU, 1.0), Vector2::new(30.0, 20.0))
    }
}
