mod parametric;

pub use parametric::ParametricSurface;

use bitflags::bitflags;

use crate::error::{Result, TessellationError};
use crate::math::Vector3;

bitflags! {
    /// Optional per-vertex attributes to generate alongside positions.
    ///
    /// Positions are always written. The remaining attributes follow in a
    /// fixed order: normal, texture coordinate, tangent.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct VertexFlags: u8 {
        /// Unit surface normal (3 floats).
        const NORMALS = 1 << 0;
        /// Texture coordinate (2 floats).
        const TEX_COORDS = 1 << 1;
        /// Unit tangent along u (3 floats).
        const TANGENTS = 1 << 2;
    }
}

/// Interleaved layout of a vertex buffer, measured in `f32` components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    flags: VertexFlags,
}

impl VertexLayout {
    /// Components of a position.
    pub const POSITION_COMPONENTS: usize = 3;
    /// Components of a normal.
    pub const NORMAL_COMPONENTS: usize = 3;
    /// Components of a texture coordinate.
    pub const TEX_COORD_COMPONENTS: usize = 2;
    /// Components of a tangent.
    pub const TANGENT_COMPONENTS: usize = 3;
    /// Floats per vertex with every attribute enabled.
    pub const MAX_FLOATS_PER_VERTEX: usize = Self::POSITION_COMPONENTS
        + Self::NORMAL_COMPONENTS
        + Self::TEX_COORD_COMPONENTS
        + Self::TANGENT_COMPONENTS;

    #[must_use]
    pub fn new(flags: VertexFlags) -> Self {
        Self { flags }
    }

    #[must_use]
    pub fn flags(&self) -> VertexFlags {
        self.flags
    }

    /// Number of floats per vertex.
    #[must_use]
    pub fn floats_per_vertex(&self) -> usize {
        let mut n = Self::POSITION_COMPONENTS;
        if self.flags.contains(VertexFlags::NORMALS) {
            n += Self::NORMAL_COMPONENTS;
        }
        if self.flags.contains(VertexFlags::TEX_COORDS) {
            n += Self::TEX_COORD_COMPONENTS;
        }
        if self.flags.contains(VertexFlags::TANGENTS) {
            n += Self::TANGENT_COMPONENTS;
        }
        n
    }

    /// Byte stride between consecutive vertices.
    #[must_use]
    pub fn stride_bytes(&self) -> usize {
        self.floats_per_vertex() * std::mem::size_of::<f32>()
    }

    /// Float offset of the normal within a vertex, if present.
    #[must_use]
    pub fn normal_offset(&self) -> Option<usize> {
        self.flags
            .contains(VertexFlags::NORMALS)
            .then_some(Self::POSITION_COMPONENTS)
    }

    /// Float offset of the texture coordinate within a vertex, if present.
    #[must_use]
    pub fn tex_coord_offset(&self) -> Option<usize> {
        self.flags.contains(VertexFlags::TEX_COORDS).then(|| {
            Self::POSITION_COMPONENTS + self.normal_offset().map_or(0, |_| Self::NORMAL_COMPONENTS)
        })
    }

    /// Float offset of the tangent within a vertex, if present.
    #[must_use]
    pub fn tangent_offset(&self) -> Option<usize> {
        self.flags
            .contains(VertexFlags::TANGENTS)
            .then(|| self.floats_per_vertex() - Self::TANGENT_COMPONENTS)
    }
}

/// Parameters of the finite-difference normal and tangent estimation.
///
/// Both values are measured in grid units, i.e. fractions of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TessellationParams {
    /// Forward-difference step.
    pub difference_step: f64,
    /// Inward offset applied on the first and last row and column, where the
    /// surface may be degenerate (poles, apex).
    pub boundary_nudge: f64,
}

impl Default for TessellationParams {
    fn default() -> Self {
        Self {
            difference_step: 0.01,
            boundary_nudge: 0.01,
        }
    }
}

impl TessellationParams {
    /// Checks that both values lie strictly between 0 and 1 grid units.
    ///
    /// # Errors
    ///
    /// Returns [`TessellationError::InvalidConfiguration`] for values that are
    /// not finite, not positive, or not below one grid cell.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("difference step", self.difference_step),
            ("boundary nudge", self.boundary_nudge),
        ] {
            if !(value.is_finite() && value > 0.0 && value < 1.0) {
                return Err(TessellationError::InvalidConfiguration(format!(
                    "{name} must lie in (0, 1) grid units, got {value}"
                ))
                .into());
            }
        }
        Ok(())
    }
}

/// Integer types usable as GPU index buffer elements.
pub trait MeshIndex: Copy + std::fmt::Debug + Send + Sync + 'static {
    /// Largest representable vertex index.
    const MAX_INDEX: usize;

    /// Converts a vertex index already checked against [`Self::MAX_INDEX`].
    fn from_index(index: usize) -> Self;

    /// Widens back to `usize`.
    fn to_index(self) -> usize;
}

impl MeshIndex for u16 {
    const MAX_INDEX: usize = u16::MAX as usize;

    #[allow(clippy::cast_possible_truncation)]
    fn from_index(index: usize) -> Self {
        index as u16
    }

    fn to_index(self) -> usize {
        usize::from(self)
    }
}

impl MeshIndex for u32 {
    const MAX_INDEX: usize = u32::MAX as usize;

    #[allow(clippy::cast_possible_truncation)]
    fn from_index(index: usize) -> Self {
        index as u32
    }

    fn to_index(self) -> usize {
        self as usize
    }
}

/// Fails if some vertex of a `vertex_count`-vertex mesh cannot be addressed by `I`.
///
/// # Errors
///
/// Returns [`TessellationError::IndexRangeExceeded`] on overflow.
pub fn check_index_range<I: MeshIndex>(vertex_count: usize) -> Result<()> {
    if vertex_count > 0 && vertex_count - 1 > I::MAX_INDEX {
        return Err(TessellationError::IndexRangeExceeded {
            vertex_count,
            max_vertices: I::MAX_INDEX.saturating_add(1),
        }
        .into());
    }
    Ok(())
}

/// Vertex and index buffers ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBuffers<I> {
    /// Interleaved vertex attributes, see [`VertexLayout`].
    pub vertices: Vec<f32>,
    /// Triangle list indices.
    pub triangle_indices: Vec<I>,
    /// Line list indices (empty for sources without a wireframe).
    pub line_indices: Vec<I>,
    /// Layout of `vertices`.
    pub layout: VertexLayout,
}

impl<I> MeshBuffers<I> {
    /// Number of vertices in `vertices`.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.layout.floats_per_vertex()
    }

    /// Returns the attributes of vertex `index`.
    #[must_use]
    pub fn vertex(&self, index: usize) -> Option<&[f32]> {
        let stride = self.layout.floats_per_vertex();
        self.vertices.get(index * stride..(index + 1) * stride)
    }
}

/// Anything that can fill a vertex buffer and index buffers.
///
/// Renderers size their GPU buffers from the counts, then fill them with the
/// generated data. Counts and generated buffers always agree.
pub trait MeshSource {
    /// Number of vertices [`generate_vertices`](Self::generate_vertices) writes.
    fn vertex_count(&self) -> usize;

    /// Number of indices [`generate_line_indices`](Self::generate_line_indices) writes.
    fn line_index_count(&self) -> usize;

    /// Number of indices [`generate_triangle_indices`](Self::generate_triangle_indices) writes.
    fn triangle_index_count(&self) -> usize;

    /// Generates the interleaved vertex buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot produce the requested attributes.
    fn generate_vertices(&self, flags: VertexFlags) -> Result<Vec<f32>>;

    /// Generates a line list.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertices cannot be addressed by `I`.
    fn generate_line_indices<I: MeshIndex>(&self) -> Result<Vec<I>>;

    /// Generates a triangle list.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertices cannot be addressed by `I`.
    fn generate_triangle_indices<I: MeshIndex>(&self) -> Result<Vec<I>>;

    /// Generates all buffers at once.
    ///
    /// # Errors
    ///
    /// Propagates any error from the individual generators.
    fn generate_mesh<I: MeshIndex>(&self, flags: VertexFlags) -> Result<MeshBuffers<I>> {
        Ok(MeshBuffers {
            vertices: self.generate_vertices(flags)?,
            triangle_indices: self.generate_triangle_indices()?,
            line_indices: self.generate_line_indices()?,
            layout: VertexLayout::new(flags),
        })
    }
}

/// Appends the three components of `v` to `out` in single precision.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn push_vector3(out: &mut Vec<f32>, v: &Vector3) {
    out.extend_from_slice(&[v.x as f32, v.y as f32, v.z as f32]);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn layout_positions_only() {
        let layout = VertexLayout::new(VertexFlags::empty());
        assert_eq!(layout.floats_per_vertex(), 3);
        assert_eq!(layout.stride_bytes(), 12);
        assert_eq!(layout.normal_offset(), None);
        assert_eq!(layout.tex_coord_offset(), None);
        assert_eq!(layout.tangent_offset(), None);
    }

    #[test]
    fn layout_all_attributes() {
        let layout = VertexLayout::new(VertexFlags::all());
        assert_eq!(layout.floats_per_vertex(), VertexLayout::MAX_FLOATS_PER_VERTEX);
        assert_eq!(layout.floats_per_vertex(), 11);
        assert_eq!(layout.normal_offset(), Some(3));
        assert_eq!(layout.tex_coord_offset(), Some(6));
        assert_eq!(layout.tangent_offset(), Some(8));
    }

    #[test]
    fn layout_skips_missing_attributes() {
        let layout = VertexLayout::new(VertexFlags::TEX_COORDS | VertexFlags::TANGENTS);
        assert_eq!(layout.floats_per_vertex(), 8);
        assert_eq!(layout.tex_coord_offset(), Some(3));
        assert_eq!(layout.tangent_offset(), Some(5));
    }

    #[test]
    fn params_reject_out_of_range_values() {
        assert!(TessellationParams::default().validate().is_ok());
        for bad in [f64::NAN, f64::INFINITY, 0.0, -0.01, 1.0] {
            let step = TessellationParams {
                difference_step: bad,
                ..TessellationParams::default()
            };
            let nudge = TessellationParams {
                boundary_nudge: bad,
                ..TessellationParams::default()
            };
            assert!(step.validate().is_err(), "difference step {bad}");
            assert!(nudge.validate().is_err(), "boundary nudge {bad}");
        }
    }

    #[test]
    fn index_range_u16() {
        assert!(check_index_range::<u16>(0).is_ok());
        assert!(check_index_range::<u16>(65_536).is_ok());
        assert!(check_index_range::<u16>(65_537).is_err());
        assert!(check_index_range::<u32>(65_537).is_ok());
    }

    #[test]
    fn index_conversion() {
        assert_eq!(u16::from_index(65_535), u16::MAX);
        assert_eq!(u32::from_index(70_000).to_index(), 70_000);
    }
}
