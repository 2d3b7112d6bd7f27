//! Primitive meshes with flat per-face normals and uvs.

use super::IndexedTriangleMesh;
use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

/// Flat-shaded buffers under construction.
#[derive(Default)]
struct FaceBuilder {
    vertices: Vec<Real>,
    normals: Vec<Real>,
    uvs: Vec<Real>,
    indices: Vec<u32>,
}

impl FaceBuilder {
    /// Append a polygon as a triangle fan around its first corner. Every face
    /// gets its own vertices so normals stay flat.
    fn push_face(&mut self, corners: &[Point3<Real>], uvs: &[[Real; 2]]) {
        let base = (self.vertices.len() / 3) as u32;
        let normal = (corners[1] - corners[0])
            .cross(&(corners[2] - corners[0]))
            .try_normalize(Real::EPSILON)
            .unwrap_or_else(Vector3::zeros);
        for (p, uv) in corners.iter().zip(uvs) {
            self.vertices.extend_from_slice(&[p.x, p.y, p.z]);
            self.normals.extend_from_slice(&[normal.x, normal.y, normal.z]);
            self.uvs.extend_from_slice(uv);
        }
        for k in 1..corners.len() as u32 - 1 {
            self.indices.extend_from_slice(&[base, base + k, base + k + 1]);
        }
    }

    fn build(self) -> IndexedTriangleMesh {
        IndexedTriangleMesh::new(self.vertices, self.indices)
            .with_normals(self.normals)
            .with_uvs(self.uvs)
    }
}

const QUAD_UVS: [[Real; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
const TRIANGLE_UVS: [[Real; 2]; 3] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];

/// Axis-aligned box spanning `(0,0,0)` to `(width, length, height)`.
///
/// 24 vertices (4 per face) and 12 triangles, wound counter-clockwise seen
/// from outside. Faces are emitted in the order -X, +X, -Y, +Y, -Z, +Z, each
/// as the triangles `[a, b, c]` and `[a, c, d]` of its quad.
pub fn cuboid(width: Real, length: Real, height: Real) -> IndexedTriangleMesh {
    let p = |x: Real, y: Real, z: Real| Point3::new(x * width, y * length, z * height);
    let faces = [
        [p(0.0, 0.0, 0.0), p(0.0, 0.0, 1.0), p(0.0, 1.0, 1.0), p(0.0, 1.0, 0.0)],
        [p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(1.0, 1.0, 1.0), p(1.0, 0.0, 1.0)],
        [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 0.0, 1.0), p(0.0, 0.0, 1.0)],
        [p(0.0, 1.0, 0.0), p(0.0, 1.0, 1.0), p(1.0, 1.0, 1.0), p(1.0, 1.0, 0.0)],
        [p(0.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(1.0, 1.0, 0.0), p(1.0, 0.0, 0.0)],
        [p(0.0, 0.0, 1.0), p(1.0, 0.0, 1.0), p(1.0, 1.0, 1.0), p(0.0, 1.0, 1.0)],
    ];

    let mut builder = FaceBuilder::default();
    for face in &faces {
        builder.push_face(face, &QUAD_UVS);
    }
    builder.build()
}

pub fn cube(width: Real) -> IndexedTriangleMesh {
    cuboid(width, width, width)
}

/// Regular tetrahedron centered on the origin with its corners at distance
/// `radius`.
pub fn tetrahedron(radius: Real) -> IndexedTriangleMesh {
    let s = radius / (3.0 as Real).sqrt();
    let c = [
        Point3::new(s, s, s),
        Point3::new(s, -s, -s),
        Point3::new(-s, s, -s),
        Point3::new(-s, -s, s),
    ];
    let mut builder = FaceBuilder::default();
    for [a, b, d] in [[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]] {
        builder.push_face(&[c[a], c[b], c[d]], &TRIANGLE_UVS);
    }
    builder.build()
}

/// A single triangle; useful for open-surface clipping.
pub fn triangle(p0: Point3<Real>, p1: Point3<Real>, p2: Point3<Real>) -> IndexedTriangleMesh {
    let mut builder = FaceBuilder::default();
    builder.push_face(&[p0, p1, p2], &TRIANGLE_UVS);
    builder.build()
}
