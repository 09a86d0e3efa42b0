use crate::error::{GeometryError, Result};
use crate::geometry::ParametricInterval;
use crate::math::{is_positive, Point2, Point3, Vector2};

/// A flat rectangle in the XY plane, centered on the origin.
///
/// `P(u, v) = ((u - 0.5) * width, -(v - 0.5) * height, 0)` over `[0, 1] x [0, 1]`.
/// The v axis runs downward so that `v = 0` is the top edge, matching
/// image-space texture coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Quad {
    width: f64,
    height: f64,
}

impl Quad {
    /// Creates a new quad.
    ///
    /// # Errors
    ///
    /// Returns an error if either side is non-positive or not finite.
    pub fn new(width: f64, height: f64) -> Result<Self> {
        if !is_positive(width) || !is_positive(height) {
            return Err(GeometryError::Degenerate(format!(
                "quad size must be positive, got {width}x{height}"
            ))
            .into());
        }
        Ok(Self { width, height })
    }

    /// Returns the width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Evaluates the quad at a domain point.
    #[must_use]
    pub fn evaluate(&self, domain: &Point2) -> Point3 {
        Point3::new(
            (domain.x - 0.5) * self.width,
            -(domain.y - 0.5) * self.height,
            0.0,
        )
    }

    /// A single cell spanning the unit square.
    #[must_use]
    pub fn default_interval() -> ParametricInterval {
        ParametricInterval::new([2, 2], Vector2::new(1.0, 1.0), Vector2::new(1.0, 1.0))
    }
}
