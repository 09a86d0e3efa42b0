use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::geometry::ParametricInterval;
use crate::math::{is_positive, Point2, Point3, Vector2};

/// A torus centered on the origin, symmetric about the Z axis.
///
/// `P(u, v) = ((R + r cos(v)) cos(u), (R + r cos(v)) sin(u), r sin(v))`
///
/// Parameters: `u, v` in `[0, 2*pi]`. The surface is periodic in both
/// directions; the grid duplicates the seam row and column.
#[derive(Debug, Clone, PartialEq)]
pub struct Torus {
    major_radius: f64,
    minor_radius: f64,
}

impl Torus {
    /// Creates a new torus.
    ///
    /// # Arguments
    ///
    /// * `major_radius` - Distance from the center to the tube center
    /// * `minor_radius` - Tube radius (must be less than the major radius)
    ///
    /// # Errors
    ///
    /// Returns an error if either radius is non-positive or minor >= major.
    pub fn new(major_radius: f64, minor_radius: f64) -> Result<Self> {
        if !is_positive(major_radius) {
            return Err(
                GeometryError::Degenerate("torus major radius must be positive".into()).into(),
            );
        }
        if !is_positive(minor_radius) {
            return Err(
                GeometryError::Degenerate("torus minor radius must be positive".into()).into(),
            );
        }
        if minor_radius >= major_radius {
            return Err(GeometryError::Degenerate(
                "torus minor radius must be less than major radius".into(),
            )
            .into());
        }
        Ok(Self {
            major_radius,
            minor_radius,
        })
    }

    /// Returns the major radius (center to tube center).
    #[must_use]
    pub fn major_radius(&self) -> f64 {
        self.major_radius
    }

    /// Returns the minor radius (tube radius).
    #[must_use]
    pub fn minor_radius(&self) -> f64 {
        self.minor_radius
    }

    /// Evaluates the torus at a domain point.
    #[must_use]
    pub fn evaluate(&self, domain: &Point2) -> Point3 {
        let (u, v) = (domain.x, domain.y);
        let ring = self.major_radius + self.minor_radius * v.cos();
        Point3::new(ring * u.cos(), ring * u.sin(), self.minor_radius * v.sin())
    }

    #[must_use]
    pub fn default_interval() -> ParametricInterval {
        ParametricInterval::new([20, 20], Vector2::new(TAU, TAU), Vector2::new(40.0, 10.0))
    }
}
