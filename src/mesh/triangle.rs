use crate::aabb::Aabb;
use crate::float_types::Real;
use crate::predicates::{self, Ray};
use crate::transform::Transform;
use nalgebra::{Point3, Vector3};
use std::sync::OnceLock;

/// One triangle of an indexed mesh: its three vertex indices and the
/// positions read from the vertex buffer.
///
/// The face normal and bounding box are derived on first use and cached.
#[derive(Debug, Clone)]
pub struct Triangle {
    pub indices: [u32; 3],
    positions: [Point3<Real>; 3],
    face_normal: OnceLock<Vector3<Real>>,
    bounding_box: OnceLock<Aabb>,
}

impl PartialEq for Triangle {
    fn eq(&self, other: &Self) -> bool {
        self.indices == other.indices && self.positions == other.positions
    }
}

impl Triangle {
    pub fn new(indices: [u32; 3], positions: [Point3<Real>; 3]) -> Self {
        Self {
            indices,
            positions,
            face_normal: OnceLock::new(),
            bounding_box: OnceLock::new(),
        }
    }

    /// Read the three corners from a flat xyz buffer.
    ///
    /// The caller guarantees every index is in range.
    pub fn from_buffer(vertices: &[Real], indices: [u32; 3]) -> Self {
        let at = |i: u32| {
            let i = i as usize * 3;
            Point3::new(vertices[i], vertices[i + 1], vertices[i + 2])
        };
        Self::new(indices, indices.map(at))
    }

    #[inline]
    pub const fn positions(&self) -> &[Point3<Real>; 3] {
        &self.positions
    }

    /// Unnormalized face normal `cross(v1 - v0, v2 - v0)`.
    pub fn face_normal(&self) -> Vector3<Real> {
        *self.face_normal.get_or_init(|| {
            let [p0, p1, p2] = &self.positions;
            (p1 - p0).cross(&(p2 - p0))
        })
    }

    pub fn bounding_box(&self) -> Aabb {
        *self
            .bounding_box
            .get_or_init(|| Aabb::from_points(&self.positions))
    }

    /// Same indices, positions mapped through `transform`. Caches are reset.
    pub fn transformed(&self, transform: &Transform) -> Self {
        Self::new(
            self.indices,
            self.positions.map(|p| transform.transform_point(&p)),
        )
    }

    /// Ray from corner `from` reaching corner `to` at `t = 1`.
    #[inline]
    pub fn edge_ray(&self, from: usize, to: usize) -> Ray {
        Ray::from_points(&self.positions[from], &self.positions[to])
    }

    /// Barycentric weights of a point on the triangle's plane. Undefined for
    /// a degenerate triangle.
    pub fn barycentric_coordinate(&self, point: &Point3<Real>) -> Vector3<Real> {
        let [p0, p1, p2] = &self.positions;
        predicates::barycentric_coordinate(&(p1 - p0), &(p2 - p0), &(point - p0))
    }

    /// True when the unique ids of the corners are not pairwise distinct.
    #[inline]
    pub const fn has_no_area(ids: &[u32; 3]) -> bool {
        ids[0] == ids[1] || ids[1] == ids[2] || ids[2] == ids[0]
    }
}
