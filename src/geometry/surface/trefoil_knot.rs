use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::geometry::ParametricInterval;
use crate::math::{is_positive, Point2, Point3, Vector2, Vector3, TOLERANCE};

const A: f64 = 0.5;
const B: f64 = 0.3;
const C: f64 = 0.5;
const TUBE_RADIUS: f64 = 0.15;

/// A tube swept along a trefoil knot.
///
/// The knot curve is `K(s) = (r cos(s), r sin(s), c sin(1.5 s))` with
/// `r = a + b cos(1.5 s)` and `s = 2 (2*pi - u)`. At each point a tangent
/// frame is built from the analytic derivative of `K`, and the circle of
/// radius 0.15 in the plane normal to the curve is parameterized by `v`.
///
/// Parameters: `u, v` in `[0, 2*pi]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrefoilKnot {
    scale: f64,
}

impl TrefoilKnot {
    /// Creates a new trefoil knot.
    ///
    /// # Errors
    ///
    /// Returns an error if the scale is non-positive or not finite.
    pub fn new(scale: f64) -> Result<Self> {
        if !is_positive(scale) {
            return Err(GeometryError::Degenerate(format!(
                "trefoil knot scale must be positive, got {scale}"
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

    /// Evaluates the knot tube at a domain point.
    #[must_use]
    pub fn evaluate(&self, domain: &Point2) -> Point3 {
        let s = (TAU - domain.x) * 2.0;
        let v = domain.y;

        let r = A + B * (1.5 * s).cos();
        let center = Vector3::new(r * s.cos(), r * s.sin(), C * (1.5 * s).sin());

        let derivative = Vector3::new(
            -1.5 * B * (1.5 * s).sin() * s.cos() - r * s.sin(),
            -1.5 * B * (1.5 * s).sin() * s.sin() + r * s.cos(),
            1.5 * C * (1.5 * s).cos(),
        );

        // The derivative never vanishes on this knot, but its XY projection can
        // in principle; fall back to a fixed frame rather than emitting NaNs.
        let q = derivative.try_normalize(TOLERANCE).unwrap_or_else(Vector3::z);
        let side = Vector3::new(q.y, -q.x, 0.0)
            .try_normalize(TOLERANCE)
            .unwrap_or_else(Vector3::x);
        let up = q.cross(&side);

        let offset = (side * v.cos() + up * v.sin()) * TUBE_RADIUS;
        Point3::from((center + offset) * self.scale)
    }

    #[must_use]
    pub fn default_interval() -> ParametricInterval {
        ParametricInterval::new([60, 15], Vector2::new(TAU, TAU), Vector2::new(100.0, 8.0))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn knot_center(u: f64) -> Vector3 {
        let s = (TAU - u) * 2.0;
        let r = A + B * (1.5 * s).cos();
        Vector3::new(r * s.cos(), r * s.sin(), C * (1.5 * s).sin())
    }

    #[test]
    fn tube_keeps_constant_radius() {
        let k = TrefoilKnot::new(1.0).unwrap();
        for &u in &[0.0, 0.4, 1.3, 2.9, 5.0] {
            for &v in &[0.0, 1.0, 2.5, 4.0] {
                let p = k.evaluate(&Point2::new(u, v));
                let distance = (p.coords - knot_center(u)).norm();
                assert_relative_eq!(distance, TUBE_RADIUS, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn closed_in_both_directions() {
        let k = TrefoilKnot::new(2.0).unwrap();
        let a = k.evaluate(&Point2::new(0.0, 0.0));
        let b = k.evaluate(&Point2::new(TAU, 0.0));
        let c = k.evaluate(&Point2::new(0.0, TAU));
        assert_relative_eq!(a, b, epsilon = 1e-9);
        assert_relative_eq!(a, c, epsilon = 1e-9);
    }

    #[test]
    fn scale_is_uniform() {
        let unit = TrefoilKnot::new(1.0).unwrap();
        let doubled = TrefoilKnot::new(2.0).unwrap();
        let d = Point2::new(1.1, 0.3);
        assert_relative_eq!(doubled.evaluate(&d).coords, unit.evaluate(&d).coords * 2.0);
    }

    #[test]
    fn invalid_scale() {
        assert!(TrefoilKnot::new(0.0).is_err());
    }
}
