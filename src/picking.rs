//! Ray queries against an indexed triangle mesh: nearest-hit picking and a
//! parity based containment test.

use crate::float_types::Real;
use crate::mesh::{IndexedTriangleMesh, Triangle};
use crate::predicates::{Ray, intersect_ray_box, intersect_triangle};
use nalgebra::{Point3, Vector3};

/// The nearest triangle hit along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// Position of the triangle in the index buffer (index / 3).
    pub triangle: usize,
    /// Distance along the normalized ray.
    pub distance: Real,
    pub point: Point3<Real>,
    pub positions: [Point3<Real>; 3],
}

/// Triangles of the index buffer paired with their position in it; those
/// referencing missing vertices are skipped.
fn indexed_triangles(mesh: &IndexedTriangleMesh) -> impl Iterator<Item = (usize, Triangle)> + '_ {
    let vertex_count = mesh.vertex_count();
    mesh.indices
        .as_deref()
        .unwrap_or(&[])
        .chunks_exact(3)
        .enumerate()
        .filter(move |(_, c)| c.iter().all(|&i| (i as usize) < vertex_count))
        .map(|(t, c)| (t, Triangle::from_buffer(&mesh.vertices, [c[0], c[1], c[2]])))
}

/// Nearest triangle hit by `ray`, with the direction normalized first so the
/// reported distance is metric.
pub fn pick_triangle(mesh: &IndexedTriangleMesh, ray: &Ray) -> Option<PickHit> {
    let direction = ray.direction.try_normalize(Real::EPSILON)?;
    let ray = Ray::new(ray.origin, direction);
    if !intersect_ray_box(&ray, &mesh.bounding_box()) {
        return None;
    }

    let mut nearest: Option<PickHit> = None;
    for (t, tri) in indexed_triangles(mesh) {
        let Some(hit) = intersect_triangle(&ray, tri.positions(), None) else {
            continue;
        };
        if nearest.is_none_or(|n| hit.distance < n.distance) {
            nearest = Some(PickHit {
                triangle: t,
                distance: hit.distance,
                point: hit.point,
                positions: *tri.positions(),
            });
        }
    }
    nearest
}

/// Number of triangles crossed by `ray`.
pub fn ray_crossings(mesh: &IndexedTriangleMesh, ray: &Ray) -> usize {
    indexed_triangles(mesh)
        .filter(|(_, tri)| intersect_triangle(ray, tri.positions(), None).is_some())
        .count()
}

/// Direction of the containment ray. Skewed so it avoids the axes and the
/// face diagonals of axis-aligned boxes.
fn containment_direction() -> Vector3<Real> {
    Vector3::new(1.0, 0.754_877_666, 0.569_840_291).normalize()
}

/// Whether `point` lies inside a closed mesh: an odd number of crossings
/// along a fixed ray.
pub fn contains_point(mesh: &IndexedTriangleMesh, point: &Point3<Real>) -> bool {
    ray_crossings(mesh, &Ray::new(*point, containment_direction())) % 2 == 1
}
