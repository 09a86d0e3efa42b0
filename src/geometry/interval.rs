use crate::error::{Result, TessellationError};
use crate::math::{Point2, Vector2};
use crate::tessellation::VertexLayout;

/// Discretization of a surface's rectangular parameter domain.
///
/// The domain spans `[0, upper_bound.x] x [0, upper_bound.y]` and is sampled
/// on a `divisions[0] x divisions[1]` grid of vertices. `texture_count` is the
/// number of times a texture repeats along each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParametricInterval {
    /// Number of grid vertices along u and v.
    pub divisions: [usize; 2],
    /// Maximum parameter values along u and v.
    pub upper_bound: Vector2,
    /// Texture repeats along u and v.
    pub texture_count: Vector2,
}

impl ParametricInterval {
    /// Creates a new interval. Use [`validate`](Self::validate) before tessellating.
    #[must_use]
    pub fn new(divisions: [usize; 2], upper_bound: Vector2, texture_count: Vector2) -> Self {
        Self {
            divisions,
            upper_bound,
            texture_count,
        }
    }

    /// Checks that the interval describes a usable grid.
    ///
    /// # Errors
    ///
    /// Returns [`TessellationError::InvalidConfiguration`] if either division is
    /// below 2, if the grid is too large to address its vertex buffer, or if a
    /// bound or texture count is not finite.
    pub fn validate(&self) -> Result<()> {
        let [m, n] = self.divisions;
        if m < 2 || n < 2 {
            return Err(TessellationError::InvalidConfiguration(format!(
                "divisions must be at least 2x2, got {m}x{n}"
            ))
            .into());
        }
        if m
            .checked_mul(n)
            .and_then(|count| count.checked_mul(VertexLayout::MAX_FLOATS_PER_VERTEX))
            .is_none()
        {
            return Err(TessellationError::InvalidConfiguration(format!(
                "a {m}x{n} grid is too large"
            ))
            .into());
        }
        if !self.upper_bound.iter().all(|b| b.is_finite()) {
            return Err(TessellationError::InvalidConfiguration(format!(
                "upper bound must be finite, got ({}, {})",
                self.upper_bound.x, self.upper_bound.y
            ))
            .into());
        }
        if !self.texture_count.iter().all(|c| c.is_finite()) {
            return Err(TessellationError::InvalidConfiguration(format!(
                "texture count must be finite, got ({}, {})",
                self.texture_count.x, self.texture_count.y
            ))
            .into());
        }
        Ok(())
    }

    /// Number of grid cells along u and v (`divisions - 1`).
    #[must_use]
    pub fn slices(&self) -> [usize; 2] {
        let [m, n] = self.divisions;
        [m.saturating_sub(1), n.saturating_sub(1)]
    }

    /// Total number of grid vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.divisions[0] * self.divisions[1]
    }

    /// Number of cells in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let [su, sv] = self.slices();
        su * sv
    }

    /// Maps (possibly fractional) grid coordinates to a domain point.
    ///
    /// `(i, j) -> (i * upper_bound.x / (m - 1), j * upper_bound.y / (n - 1))`
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compute_domain(&self, i: f64, j: f64) -> Point2 {
        let [su, sv] = self.slices();
        Point2::new(
            i * self.upper_bound.x / su as f64,
            j * self.upper_bound.y / sv as f64,
        )
    }

    /// Domain-mapped texture coordinate for grid vertex `(i, j)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn texture_coordinate(&self, i: usize, j: usize) -> Point2 {
        let [su, sv] = self.slices();
        Point2::new(
            self.texture_count.x * i as f64 / su as f64,
            self.texture_count.y * j as f64 / sv as f64,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{PI, TAU};

    fn interval(m: usize, n: usize) -> ParametricInterval {
        ParametricInterval::new([m, n], Vector2::new(TAU, PI), Vector2::new(2.0, 3.0))
    }

    #[test]
    fn accepts_minimal_grid() {
        assert!(interval(2, 2).validate().is_ok());
    }

    #[test]
    fn rejects_small_divisions() {
        assert!(interval(1, 5).validate().is_err());
        assert!(interval(5, 0).validate().is_err());
    }

    #[test]
    fn rejects_oversized_grids() {
        assert!(interval(usize::MAX / 2 + 1, 4).validate().is_err());
        assert!(interval(4, usize::MAX).validate().is_err());
        let side = 1usize << (usize::BITS / 2);
        assert!(interval(side, side / 8).validate().is_err());
    }

    #[test]
    fn rejects_non_finite_bounds() {
        let mut iv = interval(4, 4);
        iv.upper_bound.x = f64::INFINITY;
        assert!(iv.validate().is_err());

        let mut iv = interval(4, 4);
        iv.texture_count.y = f64::NAN;
        assert!(iv.validate().is_err());
    }

    #[test]
    fn domain_corners() {
        let iv = interval(5, 3);
        let first = iv.compute_domain(0.0, 0.0);
        let last = iv.compute_domain(4.0, 2.0);
        assert_relative_eq!(first.x, 0.0);
        assert_relative_eq!(first.y, 0.0);
        assert_relative_eq!(last.x, TAU);
        assert_relative_eq!(last.y, PI);
    }

    #[test]
    fn fractional_domain() {
        let iv = interval(5, 3);
        let d = iv.compute_domain(0.5, 1.0);
        assert_relative_eq!(d.x, TAU / 8.0);
        assert_relative_eq!(d.y, PI / 2.0);
    }

    #[test]
    fn texture_coordinates_span_repeat_count() {
        let iv = interval(5, 3);
        let tc = iv.texture_coordinate(4, 2);
        assert_relative_eq!(tc.x, 2.0);
        assert_relative_eq!(tc.y, 3.0);
    }

    #[test]
    fn counts() {
        let iv = interval(7, 4);
        assert_eq!(iv.vertex_count(), 28);
        assert_eq!(iv.slices(), [6, 3]);
        assert_eq!(iv.cell_count(), 18);
    }
}
