use std::io::Write;

use crate::error::{ObjError, Result};
use crate::tessellation::{MeshBuffers, MeshIndex, VertexLayout};

/// Writes a mesh as Wavefront OBJ text.
///
/// Positions become `v` lines, normals `vn` and texture coordinates `vt`,
/// all sharing the vertex numbering, so faces reference them as `a/a/a`,
/// `a//a` or `a/a`. Tangents have no OBJ counterpart and are dropped. Line
/// indices are written as `l` segments.
///
/// # Errors
///
/// Returns [`ObjError::Io`] if writing fails.
pub fn write_obj<W: Write, I: MeshIndex>(
    mut out: W,
    name: &str,
    mesh: &MeshBuffers<I>,
) -> Result<()> {
    write_body(&mut out, name, mesh).map_err(ObjError::from)?;
    Ok(())
}

fn write_body<W: Write, I: MeshIndex>(
    out: &mut W,
    name: &str,
    mesh: &MeshBuffers<I>,
) -> std::io::Result<()> {
    let layout = mesh.layout;
    let normal = layout.normal_offset();
    let tex = layout.tex_coord_offset();

    writeln!(out, "# generated by parasurf")?;
    writeln!(out, "o {name}")?;

    let stride = layout.floats_per_vertex();
    for vertex in mesh.vertices.chunks_exact(stride) {
        writeln!(out, "v {} {} {}", vertex[0], vertex[1], vertex[2])?;
    }
    if let Some(offset) = normal {
        for vertex in mesh.vertices.chunks_exact(stride) {
            let n = &vertex[offset..offset + VertexLayout::NORMAL_COMPONENTS];
            writeln!(out, "vn {} {} {}", n[0], n[1], n[2])?;
        }
    }
    if let Some(offset) = tex {
        for vertex in mesh.vertices.chunks_exact(stride) {
            writeln!(out, "vt {} {}", vertex[offset], vertex[offset + 1])?;
        }
    }

    for triangle in mesh.triangle_indices.chunks_exact(3) {
        write!(out, "f")?;
        for index in triangle {
            let n = index.to_index() + 1;
            match (tex.is_some(), normal.is_some()) {
                (true, true) => write!(out, " {n}/{n}/{n}")?,
                (false, true) => write!(out, " {n}//{n}")?,
                (true, false) => write!(out, " {n}/{n}")?,
                (false, false) => write!(out, " {n}")?,
            }
        }
        writeln!(out)?;
    }

    for segment in mesh.line_indices.chunks_exact(2) {
        writeln!(out, "l {} {}", segment[0].to_index() + 1, segment[1].to_index() + 1)?;
    }
    out.flush()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{Quad, Torus};
    use crate::obj::ObjSurface;
    use crate::tessellation::{MeshSource, ParametricSurface, VertexFlags};

    #[test]
    fn quad_text() {
        let quad = ParametricSurface::new(Quad::new(2.0, 2.0).unwrap());
        let mesh = quad.generate_mesh::<u16>(VertexFlags::empty()).unwrap();
        let mut out = Vec::new();
        write_obj(&mut out, "quad", &mesh).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "# generated by parasurf\no quad\n\
             v -1 1 0\nv 1 1 0\nv -1 -1 0\nv 1 -1 0\n\
             f 1 2 3\nf 2 4 3\n\
             l 1 2\nl 1 3\n"
        );
    }

    #[test]
    fn face_references_follow_attributes() {
        let quad = ParametricSurface::new(Quad::new(1.0, 1.0).unwrap());
        let mesh = quad
            .generate_mesh::<u16>(VertexFlags::NORMALS | VertexFlags::TEX_COORDS)
            .unwrap();
        let mut out = Vec::new();
        write_obj(&mut out, "quad", &mesh).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("f 1/1/1 2/2/2 3/3/3\n"));
        assert_eq!(text.lines().filter(|l| l.starts_with("vn ")).count(), 4);
        assert_eq!(text.lines().filter(|l| l.starts_with("vt ")).count(), 4);
    }

    #[test]
    fn round_trips_through_parser() {
        let torus = ParametricSurface::new(Torus::new(1.0, 0.25).unwrap());
        let mesh = torus.generate_mesh::<u32>(VertexFlags::NORMALS).unwrap();
        let mut out = Vec::new();
        write_obj(&mut out, "torus", &mesh).unwrap();

        let parsed = ObjSurface::parse(&String::from_utf8(out).unwrap()).unwrap();
        assert_eq!(parsed.vertex_count(), torus.vertex_count());
        assert_eq!(parsed.triangle_index_count(), torus.triangle_index_count());
        assert_eq!(
            parsed.generate_triangle_indices::<u32>().unwrap(),
            mesh.triangle_indices
        );
    }
}
