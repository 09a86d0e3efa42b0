use tracing::{debug, warn};

use crate::error::Result;
use crate::geometry::{ParametricInterval, SurfaceKind, TextureMapping};
use crate::math::{Point2, Vector3, TOLERANCE};

use super::{
    check_index_range, push_vector3, MeshIndex, MeshSource, TessellationParams, VertexFlags,
    VertexLayout,
};

/// A parametric surface together with the grid it is tessellated on.
///
/// Vertices are laid out row by row: `j` (along v) is the outer loop and
/// `i` (along u) the inner one, so vertex `(i, j)` has index `j * m + i`
/// for divisions `(m, n)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParametricSurface {
    kind: SurfaceKind,
    interval: ParametricInterval,
    params: TessellationParams,
}

/// Finite-difference estimate of the local surface frame.
///
/// Either part is `None` where the surface is degenerate.
struct LocalFrame {
    normal: Option<Vector3>,
    tangent: Option<Vector3>,
}

impl ParametricSurface {
    /// Creates a surface using the kind's default interval.
    pub fn new(kind: impl Into<SurfaceKind>) -> Self {
        let kind = kind.into();
        let interval = kind.default_interval();
        Self {
            kind,
            interval,
            params: TessellationParams::default(),
        }
    }

    /// Builder form of [`set_interval`](Self::set_interval).
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is invalid.
    pub fn with_interval(mut self, interval: ParametricInterval) -> Result<Self> {
        self.set_interval(interval)?;
        Ok(self)
    }

    /// Replaces the finite-difference parameters.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration`](crate::error::TessellationError::InvalidConfiguration)
    /// if a parameter is not a finite value in `(0, 1)`.
    pub fn with_params(mut self, params: TessellationParams) -> Result<Self> {
        params.validate()?;
        self.params = params;
        Ok(self)
    }

    /// Validates and installs a new interval.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration`](crate::error::TessellationError::InvalidConfiguration)
    /// if either division is below 2 or a bound is not finite. The previous
    /// interval is kept in that case.
    pub fn set_interval(&mut self, interval: ParametricInterval) -> Result<()> {
        interval.validate()?;
        self.interval = interval;
        Ok(())
    }

    #[must_use]
    pub fn kind(&self) -> &SurfaceKind {
        &self.kind
    }

    #[must_use]
    pub fn interval(&self) -> &ParametricInterval {
        &self.interval
    }

    #[must_use]
    pub fn params(&self) -> &TessellationParams {
        &self.params
    }

    /// Maps (possibly fractional) grid coordinates to a domain point.
    #[must_use]
    pub fn compute_domain(&self, i: f64, j: f64) -> Point2 {
        self.interval.compute_domain(i, j)
    }

    /// Estimates the normal and u-tangent at grid vertex `(i, j)`.
    ///
    /// Boundary vertices are sampled slightly inside the grid since the
    /// surface may be degenerate there. The inversion hook is queried with the
    /// vertex's own domain point, not the nudged one.
    #[allow(clippy::cast_precision_loss)]
    fn local_frame(&self, i: usize, j: usize, domain: &Point2) -> LocalFrame {
        let [m, n] = self.interval.divisions;
        let TessellationParams {
            difference_step: h,
            boundary_nudge: nudge,
        } = self.params;

        let mut s = i as f64;
        let mut t = j as f64;
        if i == 0 {
            s += nudge;
        }
        if i == m - 1 {
            s -= nudge;
        }
        if j == 0 {
            t += nudge;
        }
        if j == n - 1 {
            t -= nudge;
        }

        let p = self.kind.evaluate(&self.compute_domain(s, t));
        let du = self.kind.evaluate(&self.compute_domain(s + h, t)) - p;
        let dv = self.kind.evaluate(&self.compute_domain(s, t + h)) - p;

        let sign = if self.kind.invert_normal(domain) {
            -1.0
        } else {
            1.0
        };
        LocalFrame {
            normal: du.cross(&dv).try_normalize(TOLERANCE).map(|n| n * sign),
            tangent: du.try_normalize(TOLERANCE).map(|t| t * sign),
        }
    }
}

impl MeshSource for ParametricSurface {
    fn vertex_count(&self) -> usize {
        self.interval.vertex_count()
    }

    fn line_index_count(&self) -> usize {
        4 * self.interval.cell_count()
    }

    fn triangle_index_count(&self) -> usize {
        6 * self.interval.cell_count()
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn generate_vertices(&self, flags: VertexFlags) -> Result<Vec<f32>> {
        let layout = VertexLayout::new(flags);
        let [m, n] = self.interval.divisions;
        let needs_frame = flags.intersects(VertexFlags::NORMALS | VertexFlags::TANGENTS);
        let mapping = self.kind.texture_mapping();

        let mut vertices = Vec::with_capacity(self.vertex_count() * layout.floats_per_vertex());
        let mut degenerate = 0usize;

        for j in 0..n {
            for i in 0..m {
                let domain = self.compute_domain(i as f64, j as f64);
                let position = self.kind.evaluate(&domain);
                push_vector3(&mut vertices, &position.coords);

                let frame = if needs_frame {
                    self.local_frame(i, j, &domain)
                } else {
                    LocalFrame {
                        normal: None,
                        tangent: None,
                    }
                };
                let mut attribute = |flag: VertexFlags, value: Option<Vector3>| {
                    if flags.contains(flag) && value.is_none() {
                        degenerate += 1;
                    }
                    value.unwrap_or_else(Vector3::zeros)
                };
                let normal = attribute(VertexFlags::NORMALS, frame.normal);
                let tangent = attribute(VertexFlags::TANGENTS, frame.tangent);

                if flags.contains(VertexFlags::NORMALS) {
                    push_vector3(&mut vertices, &normal);
                }

                if flags.contains(VertexFlags::TEX_COORDS) {
                    let tex = match mapping {
                        TextureMapping::Domain => self.interval.texture_coordinate(i, j),
                        TextureMapping::ObjectSpace => {
                            Point2::new(0.5 * position.x, 0.5 * position.z)
                        }
                    };
                    vertices.extend_from_slice(&[tex.x as f32, tex.y as f32]);
                }

                if flags.contains(VertexFlags::TANGENTS) {
                    push_vector3(&mut vertices, &tangent);
                }
            }
        }

        if degenerate > 0 {
            warn!(
                surface = self.kind.name(),
                degenerate, "degenerate normals or tangents written as zero vectors"
            );
        }
        debug!(
            surface = self.kind.name(),
            vertices = self.vertex_count(),
            floats_per_vertex = layout.floats_per_vertex(),
            "generated vertex buffer"
        );
        Ok(vertices)
    }

    fn generate_line_indices<I: MeshIndex>(&self) -> Result<Vec<I>> {
        check_index_range::<I>(self.vertex_count())?;
        let [m, _] = self.interval.divisions;
        let [su, sv] = self.interval.slices();

        let mut indices = Vec::with_capacity(self.line_index_count());
        for j in 0..sv {
            let row = j * m;
            for i in 0..su {
                let here = row + i;
                indices.extend([here, here + 1, here, here + m].map(I::from_index));
            }
        }

        debug!(surface = self.kind.name(), indices = indices.len(), "generated line indices");
        Ok(indices)
    }

    fn generate_triangle_indices<I: MeshIndex>(&self) -> Result<Vec<I>> {
        check_index_range::<I>(self.vertex_count())?;
        let [m, _] = self.interval.divisions;
        let [su, sv] = self.interval.slices();

        let mut indices = Vec::with_capacity(self.triangle_index_count());
        for j in 0..sv {
            let row = j * m;
            for i in 0..su {
                let a = row + i;
                let b = a + 1;
                let c = a + m;
                let d = b + m;
                indices.extend([a, b, c, b, d, c].map(I::from_index));
            }
        }

        debug!(surface = self.kind.name(), indices = indices.len(), "generated triangle indices");
        Ok(indices)
    }
}
