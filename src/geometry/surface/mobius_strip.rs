use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::geometry::ParametricInterval;
use crate::math::{is_positive, Point2, Point3, Vector2};

const MAJOR_RADIUS: f64 = 1.25;
const SEMI_MINOR: f64 = 0.125;
const SEMI_MAJOR: f64 = 0.5;

/// A thick Möbius strip: an ellipse swept around a circle while it turns
/// through half a revolution.
///
/// For `u` around the circle and `t` around the ellipse, with `phi = u / 2`:
///
/// ```text
/// ex = a cos(t) cos(phi) - b sin(t) sin(phi)
/// ey = a cos(t) sin(phi) + b sin(t) cos(phi)
/// P  = ((R + ex) cos(u), (R + ex) sin(u), ey)
/// ```
///
/// Parameters: `u, t` in `[0, 2*pi]`. Going once around `u` maps the
/// ellipse onto itself rotated by `pi`, so the seam at `u = 0` joins the
/// cross-section to its antipodal points.
#[derive(Debug, Clone, PartialEq)]
pub struct MobiusStrip {
    scale: f64,
}

impl MobiusStrip {
    /// Creates a new Möbius strip.
    ///
    /// # Errors
    ///
    /// Returns an error if the scale is non-positive or not finite.
    pub fn new(scale: f64) -> Result<Self> {
        if !is_positive(scale) {
            return Err(GeometryError::Degenerate(format!(
                "mobius strip scale must be positive, got {scale}"
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

    /// Evaluates the strip at a domain point.
    #[must_use]
    pub fn evaluate(&self, domain: &Point2) -> Point3 {
        let u = domain.x;
        let t = domain.y;
        let phi = u / 2.0;

        let ex = SEMI_MINOR * t.cos() * phi.cos() - SEMI_MAJOR * t.sin() * phi.sin();
        let ey = SEMI_MINOR * t.cos() * phi.sin() + SEMI_MAJOR * t.sin() * phi.cos();

        let ring = MAJOR_RADIUS + ex;
        Point3::new(ring * u.cos(), ring * u.sin(), ey) * self.scale
    }

    #[must_use]
    pub fn default_interval() -> ParametricInterval {
        ParametricInterval::new([40, 20], Vector2::new(TAU, TAU), Vector2::new(40.0, 15.0))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn seam_joins_antipodal_cross_section() {
        let m = MobiusStrip::new(1.0).unwrap();
        for &t in &[0.0, 0.8, 2.0, 3.5] {
            let start = m.evaluate(&Point2::new(0.0, t));
            let end = m.evaluate(&Point2::new(TAU, t + PI));
            assert_relative_eq!(start, end, epsilon = 1e-12);
        }
    }

    #[test]
    fn cross_section_is_ellipse_at_start() {
        let m = MobiusStrip::new(1.0).unwrap();
        let outer = m.evaluate(&Point2::new(0.0, 0.0));
        let top = m.evaluate(&Point2::new(0.0, PI / 2.0));
        assert_relative_eq!(outer, Point3::new(MAJOR_RADIUS + SEMI_MINOR, 0.0, 0.0));
        assert_relative_eq!(top, Point3::new(MAJOR_RADIUS, 0.0, SEMI_MAJOR), epsilon = 1e-12);
    }

    #[test]
    fn invalid_scale() {
        assert!(MobiusStrip::new(0.0).is_err());
    }
}
