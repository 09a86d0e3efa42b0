use std::f64::consts::{PI, TAU};

use crate::error::{GeometryError, Result};
use crate::geometry::ParametricInterval;
use crate::math::{is_positive, Point2, Point3, Vector2};

/// A sphere centered on the origin with the poles on the Y axis.
///
/// `P(u, v) = (r sin(u) cos(v), r cos(u), -r sin(u) sin(v))`
///
/// Parameters: `u` = polar angle in `[0, pi]` (north pole at `u = 0`),
/// `v` = azimuth in `[0, 2*pi]`. Both poles are degenerate rows of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    radius: f64,
}

impl Sphere {
    /// Creates a new sphere.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive or not finite.
    pub fn new(radius: f64) -> Result<Self> {
        if !is_positive(radius) {
            return Err(
                GeometryError::Degenerate(format!("sphere radius must be positive, got {radius}"))
                    .into(),
            );
        }
        Ok(Self { radius })
    }

    /// Returns the radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Evaluates the sphere at a domain point.
    #[must_use]
    pub fn evaluate(&self, domain: &Point2) -> Point3 {
        let (u, v) = (domain.x, domain.y);
        let r = self.radius;
        Point3::new(r * u.sin() * v.cos(), r * u.cos(), -r * u.sin() * v.sin())
    }

    #[must_use]
    pub fn default_interval() -> ParametricInterval {
        ParametricInterval::new([20, 20], Vector2::new(PI, TAU), Vector2::new(20.0, 35.0))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn points_lie_on_sphere() {
        let s = Sphere::new(2.5).unwrap();
        for i in 0..=10_u8 {
            for j in 0..=10_u8 {
                let domain = Point2::new(PI * f64::from(i) / 10.0, TAU * f64::from(j) / 10.0);
                let p = s.evaluate(&domain);
                assert_relative_eq!(p.coords.norm(), 2.5, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn poles_on_y_axis() {
        let s = Sphere::new(1.0).unwrap();
        let north = s.evaluate(&Point2::new(0.0, 1.0));
        let south = s.evaluate(&Point2::new(PI, 1.0));
        assert_relative_eq!(north, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(south, Point3::new(0.0, -1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn invalid_radius() {
        assert!(Sphere::new(0.0).is_err());
        assert!(Sphere::new(f64::INFINITY).is_err());
    }
}
