//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use nalgebra::Point3;
use trimesh_clip::{
    float_types::Real,
    mesh::{IndexedTriangleMesh, UniqueVertexIndex},
};

/// Returns the bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]` of
/// the vertices referenced by `indices`.
pub fn bounding_box(vertices: &[Real], indices: &[u32]) -> [Real; 6] {
    let mut bounds = [
        Real::MAX,
        Real::MAX,
        Real::MAX,
        Real::MIN,
        Real::MIN,
        Real::MIN,
    ];
    for &i in indices {
        let i = i as usize * 3;
        for axis in 0..3 {
            bounds[axis] = bounds[axis].min(vertices[i + axis]);
            bounds[axis + 3] = bounds[axis + 3].max(vertices[i + axis]);
        }
    }
    bounds
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Build an indexed mesh from corner coordinates.
pub fn make_mesh(points: &[[Real; 3]], indices: &[u32]) -> IndexedTriangleMesh {
    IndexedTriangleMesh::new(points.iter().flatten().copied().collect(), indices.to_vec())
}

pub fn point(vertices: &[Real], i: u32) -> Point3<Real> {
    let i = i as usize * 3;
    Point3::new(vertices[i], vertices[i + 1], vertices[i + 2])
}

pub fn triangles(indices: &[u32]) -> Vec<[u32; 3]> {
    indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect()
}

/// Triangles with their corners sorted, for order-insensitive comparisons.
pub fn corner_sets(indices: &[u32]) -> Vec<[u32; 3]> {
    triangles(indices)
        .into_iter()
        .map(|mut tri| {
            tri.sort_unstable();
            tri
        })
        .collect()
}

/// True when some triangle has two corners on the same quantization cell.
pub fn has_degenerate_triangle(vertices: &[Real], indices: &[u32], epsilon: Real) -> bool {
    let ids = UniqueVertexIndex::new(epsilon).index_vertices(vertices);
    triangles(indices).iter().any(|tri| {
        let [a, b, c] = tri.map(|i| ids[i as usize]);
        a == b || b == c || c == a
    })
}

/// Sum of triangle areas.
pub fn surface_area(vertices: &[Real], indices: &[u32]) -> Real {
    triangles(indices)
        .iter()
        .map(|tri| {
            let [p0, p1, p2] = tri.map(|i| point(vertices, i));
            (p1 - p0).cross(&(p2 - p0)).norm() * 0.5
        })
        .sum()
}
