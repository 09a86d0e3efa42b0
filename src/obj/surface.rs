use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, trace};

use crate::error::{ObjError, Result, TessellationError};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::tessellation::{check_index_range, push_vector3, MeshIndex, MeshSource, VertexFlags};

/// A static triangle mesh read from a Wavefront OBJ subset.
///
/// ## Supported commands
///
/// - [x] Geometric vertices (`v x y z [w]`, `w` is ignored)
/// - [x] Triangular faces (`f a b c`, also `a/t/n`, `a//n` and negative
///   relative references; only the position reference is used)
/// - [ ] Everything else (`vn`, `vt`, `o`, `g`, `s`, `usemtl`, ...) is skipped
///
/// The file is parsed once; counts come from the owned data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjSurface {
    positions: Vec<Point3>,
    faces: Vec<[usize; 3]>,
}

impl ObjSurface {
    /// Builds a surface from positions and 0-based triangles.
    ///
    /// # Errors
    ///
    /// Returns [`ObjError::Parse`] if a face references a missing vertex.
    pub fn from_parts(positions: Vec<Point3>, faces: Vec<[usize; 3]>) -> Result<Self> {
        if let Some((n, _)) = faces
            .iter()
            .enumerate()
            .find(|(_, f)| f.iter().any(|&i| i >= positions.len()))
        {
            return Err(ObjError::Parse {
                line: 0,
                message: format!("face {n} references a vertex out of range"),
            }
            .into());
        }
        Ok(Self { positions, faces })
    }

    /// Reads and parses an OBJ file.
    ///
    /// # Errors
    ///
    /// Returns [`ObjError::Io`] if the file cannot be read and
    /// [`ObjError::Parse`] if its contents are malformed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(ObjError::from)?;
        let surface = Self::from_reader(BufReader::new(file))?;
        debug!(
            path = %path.display(),
            vertices = surface.positions.len(),
            faces = surface.faces.len(),
            "loaded obj surface"
        );
        Ok(surface)
    }

    /// Parses OBJ text.
    ///
    /// # Errors
    ///
    /// Returns [`ObjError::Parse`] if the text is malformed.
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes())
    }

    /// Parses OBJ data from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns [`ObjError::Io`] on read failures and [`ObjError::Parse`] if
    /// the data is malformed.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut surface = Self::default();
        for (n, line) in reader.lines().enumerate() {
            let line = line.map_err(ObjError::from)?;
            surface.parse_line(n + 1, &line)?;
        }
        Ok(surface)
    }

    fn parse_line(&mut self, line_num: usize, line: &str) -> Result<()> {
        let line = line.split('#').next().unwrap_or_default().trim();
        let mut tokens = line.split_whitespace();
        let Some(command) = tokens.next() else {
            return Ok(());
        };
        let args: Vec<&str> = tokens.collect();

        match command {
            "v" => {
                if !(3..=4).contains(&args.len()) {
                    return Err(parse_error(
                        line_num,
                        format!("expected 3 or 4 coordinates, found {}", args.len()),
                    ));
                }
                let mut coords = [0.0; 3];
                for (coord, arg) in coords.iter_mut().zip(&args) {
                    *coord = arg.parse::<f64>().map_err(|_| {
                        parse_error(line_num, format!("invalid coordinate `{arg}`"))
                    })?;
                }
                self.positions.push(Point3::from(coords));
            }
            "f" => {
                if args.len() != 3 {
                    return Err(parse_error(
                        line_num,
                        format!(
                            "only triangular faces are supported, found {} vertices",
                            args.len()
                        ),
                    ));
                }
                let mut face = [0usize; 3];
                for (index, arg) in face.iter_mut().zip(&args) {
                    *index = self.resolve_reference(line_num, arg)?;
                }
                self.faces.push(face);
            }
            _ => trace!(line = line_num, command, "skipping unsupported obj command"),
        }
        Ok(())
    }

    /// Converts a `v`, `v/t`, `v//n` or `v/t/n` reference to a 0-based vertex index.
    fn resolve_reference(&self, line_num: usize, arg: &str) -> Result<usize> {
        let vertex = arg.split('/').next().unwrap_or_default();
        let reference: i64 = vertex
            .parse()
            .map_err(|_| parse_error(line_num, format!("invalid vertex reference `{arg}`")))?;
        let count = self.positions.len();

        let index = match reference {
            r if r > 0 => usize::try_from(r - 1).ok(),
            r if r < 0 => usize::try_from(r.unsigned_abs())
                .ok()
                .and_then(|back| count.checked_sub(back)),
            _ => None,
        };

        index.filter(|&i| i < count).ok_or_else(|| {
            parse_error(
                line_num,
                format!("vertex reference {reference} is out of range (1..={count})"),
            )
        })
    }

    /// Vertex positions.
    #[must_use]
    pub fn positions(&self) -> &[Point3] {
        &self.positions
    }

    /// Triangles as 0-based vertex indices.
    #[must_use]
    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// Area-weighted vertex normals.
    ///
    /// Each face adds its unnormalized facet normal `(b - a) x (c - a)` to its
    /// three vertices; the sums are normalized once at the end. Vertices that
    /// belong to no face (or only to degenerate faces) get a zero normal.
    #[must_use]
    pub fn vertex_normals(&self) -> Vec<Vector3> {
        let mut normals = vec![Vector3::zeros(); self.positions.len()];
        for &[a, b, c] in &self.faces {
            let pa = self.positions[a];
            let facet = (self.positions[b] - pa).cross(&(self.positions[c] - pa));
            normals[a] += facet;
            normals[b] += facet;
            normals[c] += facet;
        }
        for n in &mut normals {
            *n = n.try_normalize(TOLERANCE).unwrap_or_else(Vector3::zeros);
        }
        normals
    }
}

fn parse_error(line: usize, message: String) -> crate::error::ParasurfError {
    ObjError::Parse { line, message }.into()
}

impl MeshSource for ObjSurface {
    fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    fn line_index_count(&self) -> usize {
        0
    }

    fn triangle_index_count(&self) -> usize {
        self.faces.len() * 3
    }

    /// Supports positions and normals only.
    fn generate_vertices(&self, flags: VertexFlags) -> Result<Vec<f32>> {
        let unsupported = flags - VertexFlags::NORMALS;
        if !unsupported.is_empty() {
            return Err(TessellationError::InvalidConfiguration(format!(
                "obj surfaces cannot generate {unsupported:?}"
            ))
            .into());
        }

        let normals = flags
            .contains(VertexFlags::NORMALS)
            .then(|| self.vertex_normals());
        let stride = if normals.is_some() { 6 } else { 3 };

        let mut vertices = Vec::with_capacity(self.positions.len() * stride);
        for (index, position) in self.positions.iter().enumerate() {
            push_vector3(&mut vertices, &position.coords);
            if let Some(normals) = &normals {
                push_vector3(&mut vertices, &normals[index]);
            }
        }
        Ok(vertices)
    }

    fn generate_line_indices<I: MeshIndex>(&self) -> Result<Vec<I>> {
        Ok(Vec::new())
    }

    fn generate_triangle_indices<I: MeshIndex>(&self) -> Result<Vec<I>> {
        check_index_range::<I>(self.vertex_count())?;
        Ok(self
            .faces
            .iter()
            .flatten()
            .map(|&i| I::from_index(i))
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ParasurfError;
    use approx::assert_relative_eq;

    const TETRAHEDRON: &str = "\
# a tetrahedron
o tetra
v 0 0 0
v 1 0 0
v 0 1 0
v 0 0 1
vn 0 0 1
f 1 3 2
f 1 2 4
f 1 4 3
f 2 3 4
";

    /// A unit square in the XY plane split into two triangles, plus a
    /// detached triangle facing +X.
    const SQUARE_AND_FLAP: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 5 0 0
v 5 1 0
v 5 0 1
f 1 2 3
f 1 3 4
f 5/1/1 6/2/1 7/3/1
";

    fn normal_at(vertices: &[f32], index: usize) -> Vector3 {
        let v = &vertices[index * 6..index * 6 + 6];
        Vector3::new(f64::from(v[3]), f64::from(v[4]), f64::from(v[5]))
    }

    #[test]
    fn counts_match_lines() {
        let obj = ObjSurface::parse(TETRAHEDRON).unwrap();
        assert_eq!(obj.vertex_count(), 4);
        assert_eq!(obj.triangle_index_count() / 3, 4);
        assert_eq!(obj.line_index_count(), 0);
        assert!(obj.generate_line_indices::<u16>().unwrap().is_empty());
    }

    #[test]
    fn indices_are_zero_based() {
        let obj = ObjSurface::parse(TETRAHEDRON).unwrap();
        let indices = obj.generate_triangle_indices::<u16>().unwrap();
        assert_eq!(indices, vec![0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3]);
    }

    #[test]
    fn positions_without_normals() {
        let obj = ObjSurface::parse(TETRAHEDRON).unwrap();
        let vertices = obj.generate_vertices(VertexFlags::empty()).unwrap();
        assert_eq!(vertices, vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn normals_only_see_incident_faces() {
        let obj = ObjSurface::parse(SQUARE_AND_FLAP).unwrap();
        let vertices = obj.generate_vertices(VertexFlags::NORMALS).unwrap();
        for index in 0..4 {
            assert_relative_eq!(normal_at(&vertices, index), Vector3::z(), epsilon = 1e-6);
        }
        for index in 4..7 {
            assert_relative_eq!(normal_at(&vertices, index), Vector3::x(), epsilon = 1e-6);
        }
    }

    #[test]
    fn normals_are_area_weighted() {
        // A large triangle facing +Z and a small one facing +X share vertex 1.
        let obj = ObjSurface::parse(
            "v 0 0 0\nv 10 0 0\nv 0 10 0\nv 0 1 0\nv 0 0 1\nf 1 2 3\nf 1 4 5\n",
        )
        .unwrap();
        let normals = obj.vertex_normals();
        let shared = normals[0];
        assert_relative_eq!(shared.norm(), 1.0, epsilon = 1e-12);
        assert!(shared.z > shared.x * 50.0);
    }

    #[test]
    fn unreferenced_vertex_gets_zero_normal() {
        let obj = ObjSurface::parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nv 9 9 9\nf 1 2 3\n").unwrap();
        assert_eq!(obj.vertex_normals()[3], Vector3::zeros());
    }

    #[test]
    fn negative_references_count_back() {
        let obj = ObjSurface::parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap();
        assert_eq!(obj.faces(), &[[0, 1, 2]]);
    }

    #[test]
    fn rejects_malformed_coordinates() {
        let err = ObjSurface::parse("v 0 0 0\nv 1 zero 0\n").unwrap_err();
        assert!(matches!(err, ParasurfError::Obj(ObjError::Parse { line: 2, .. })));
    }

    #[test]
    fn rejects_out_of_range_faces() {
        let err = ObjSurface::parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n").unwrap_err();
        assert!(matches!(err, ParasurfError::Obj(ObjError::Parse { line: 4, .. })));
        let err = ObjSurface::parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n").unwrap_err();
        assert!(matches!(err, ParasurfError::Obj(ObjError::Parse { line: 4, .. })));
    }

    #[test]
    fn rejects_quads() {
        let err = ObjSurface::parse("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n").unwrap_err();
        assert!(matches!(err, ParasurfError::Obj(ObjError::Parse { line: 5, .. })));
    }

    #[test]
    fn rejects_unsupported_attributes() {
        let obj = ObjSurface::parse(TETRAHEDRON).unwrap();
        let err = obj.generate_vertices(VertexFlags::TEX_COORDS).unwrap_err();
        assert!(matches!(
            err,
            ParasurfError::Tessellation(TessellationError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn from_parts_validates_faces() {
        let positions = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        assert!(ObjSurface::from_parts(positions.clone(), vec![[0, 1, 2]]).is_err());
        assert!(ObjSurface::from_parts(positions, vec![[0, 1, 1]]).is_ok());
    }

    #[test]
    fn open_reports_missing_file() {
        let err = ObjSurface::open("/definitely/not/here.obj").unwrap_err();
        assert!(matches!(err, ParasurfError::Obj(ObjError::Io(_))));
    }
}
