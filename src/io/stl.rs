use super::IoError;
use crate::float_types::Real;
use crate::mesh::IndexedTriangleMesh;
use nalgebra::{Point3, Vector3};
use std::io::{Cursor, Read, Seek};

impl IndexedTriangleMesh {
    /// Visit each triangle as its three corners and a unit facet normal.
    fn visit_facets(&self, mut visit: impl FnMut(Vector3<Real>, [Point3<Real>; 3])) {
        for tri in self.triangles() {
            let normal = tri
                .face_normal()
                .try_normalize(Real::EPSILON)
                .unwrap_or_else(Vector3::zeros);
            visit(normal, *tri.positions());
        }
    }

    /// Convert this mesh to an **ASCII STL** string with the given `name`.
    ///
    /// ```rust
    /// # use trimesh_clip::mesh::shapes;
    /// let stl = shapes::cube(1.0).to_stl_ascii("my_solid");
    /// assert!(stl.starts_with("solid my_solid"));
    /// assert_eq!(stl.matches("facet normal").count(), 12);
    /// ```
    pub fn to_stl_ascii(&self, name: &str) -> String {
        let mut out = String::new();
        out.push_str(&format!("solid {name}\n"));

        self.visit_facets(|n, corners| {
            out.push_str(&format!(
                "  facet normal {:.6} {:.6} {:.6}\n",
                n.x, n.y, n.z
            ));
            out.push_str("    outer loop\n");
            for p in &corners {
                out.push_str(&format!(
                    "      vertex {:.6} {:.6} {:.6}\n",
                    p.x, p.y, p.z
                ));
            }
            out.push_str("    endloop\n");
            out.push_str("  endfacet\n");
        });

        out.push_str(&format!("endsolid {name}\n"));
        out
    }

    /// Convert this mesh to a **binary STL** byte vector. Binary STL has no
    /// solid name, `_name` is accepted for symmetry with the ASCII writer.
    pub fn to_stl_binary(&self, _name: &str) -> std::io::Result<Vec<u8>> {
        use stl_io::{Normal, Triangle, Vertex, write_stl};

        let mut triangles = Vec::<Triangle>::new();
        self.visit_facets(|n, corners| {
            #[allow(clippy::unnecessary_cast)]
            {
                triangles.push(Triangle {
                    normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                    vertices: corners.map(|p| Vertex::new([p.x as f32, p.y as f32, p.z as f32])),
                });
            }
        });

        let mut cursor = Cursor::new(Vec::new());
        write_stl(&mut cursor, triangles.iter())?;
        Ok(cursor.into_inner())
    }

    /// Read an ASCII or binary STL. Coincident corners are merged by the
    /// reader, so the result is indexed; facet normals are not kept.
    pub fn from_stl<R: Read + Seek>(reader: &mut R) -> Result<Self, IoError> {
        let stl = stl_io::read_stl(reader)?;

        let vertices: Vec<Real> = stl
            .vertices
            .iter()
            .flat_map(|v| [v[0] as Real, v[1] as Real, v[2] as Real])
            .collect();
        let mut indices = Vec::with_capacity(stl.faces.len() * 3);
        for face in &stl.faces {
            for &i in &face.vertices {
                let index = u32::try_from(i).map_err(|_| {
                    IoError::MalformedInput(format!("vertex index {i} does not fit in 32 bits"))
                })?;
                indices.push(index);
            }
        }

        let mesh = IndexedTriangleMesh::new(vertices, indices);
        mesh.validate()?;
        Ok(mesh)
    }

    /// [`Self::from_stl`] over an in-memory buffer.
    pub fn from_stl_bytes(bytes: &[u8]) -> Result<Self, IoError> {
        Self::from_stl(&mut Cursor::new(bytes))
    }
}

#[cfg(test)]
mod tests {
    use crate::mesh::{IndexedTriangleMesh, shapes};

    #[test]
    fn binary_stl_round_trip_merges_corners() {
        let cube = shapes::cube(1.0);
        let bytes = cube.to_stl_binary("cube").expect("in-memory write");
        // 80 byte header, triangle count, 50 bytes per facet
        assert_eq!(bytes.len(), 84 + 12 * 50);

        let read = IndexedTriangleMesh::from_stl_bytes(&bytes).expect("valid stl");
        assert_eq!(read.triangle_count(), 12);
        assert_eq!(read.vertex_count(), 8);
        assert_eq!(read.bounding_box(), cube.bounding_box());
    }

    #[test]
    fn ascii_stl_is_readable() {
        let tet = shapes::tetrahedron(1.0);
        let text = tet.to_stl_ascii("tet");
        let read = IndexedTriangleMesh::from_stl_bytes(text.as_bytes()).expect("valid stl");
        assert_eq!(read.triangle_count(), 4);
        assert_eq!(read.vertex_count(), 4);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(IndexedTriangleMesh::from_stl_bytes(b"solid nope\n  facet banana\n").is_err());
    }
}
