use crate::aabb::Aabb;
use crate::boolean::{self, Operator};
use crate::config::ClipConfig;
use crate::errors::BooleanResult;
use crate::float_types::Real;
use crate::mesh::IndexedTriangleMesh;
use crate::transform::Transform;

/// Boolean operations + transformations
///
/// Both operands are taken to share one frame; use [`boolean::operate`] to
/// pass a relative transform instead.
pub trait BooleanOps: Sized {
    fn union(&self, other: &Self) -> BooleanResult<Self>;
    fn difference(&self, other: &Self) -> BooleanResult<Self>;
    fn intersection(&self, other: &Self) -> BooleanResult<Self>;
    fn transform(&self, transform: &Transform) -> Self;
    fn bounding_box(&self) -> Aabb;

    /// Returns a new Self translated by x, y, and z.
    fn translate(&self, x: Real, y: Real, z: Real) -> Self {
        self.transform(&Transform::translation(x, y, z))
    }

    /// Returns a new Self translated so that its bounding-box center is at the origin (0,0,0).
    fn center(&self) -> Self {
        let center = self.bounding_box().center();
        self.translate(-center.x, -center.y, -center.z)
    }

    /// Translates the object so that its bottommost point(s) sit exactly at z=0.
    fn float(&self) -> Self {
        let min_z = self.bounding_box().mins.z;
        self.translate(0.0, 0.0, -min_z)
    }

    /// Rotates by x_degrees, y_degrees, z_degrees
    fn rotate(&self, x_deg: Real, y_deg: Real, z_deg: Real) -> Self {
        self.transform(&Transform::rotation(x_deg, y_deg, z_deg))
    }

    /// Scales by scale_x, scale_y, scale_z
    fn scale(&self, sx: Real, sy: Real, sz: Real) -> Self {
        self.transform(&Transform::scaling(sx, sy, sz))
    }
}

impl IndexedTriangleMesh {
    fn boolean(&self, other: &Self, operator: Operator) -> BooleanResult<Self> {
        boolean::operate(
            self,
            other,
            &Transform::identity(),
            operator,
            &ClipConfig::default(),
        )
        .map(|output| output.mesh)
    }
}

impl BooleanOps for IndexedTriangleMesh {
    fn union(&self, other: &Self) -> BooleanResult<Self> {
        self.boolean(other, Operator::Union)
    }

    fn difference(&self, other: &Self) -> BooleanResult<Self> {
        self.boolean(other, Operator::Difference)
    }

    fn intersection(&self, other: &Self) -> BooleanResult<Self> {
        self.boolean(other, Operator::Intersection)
    }

    fn transform(&self, transform: &Transform) -> Self {
        self.transformed(transform)
    }

    fn bounding_box(&self) -> Aabb {
        IndexedTriangleMesh::bounding_box(self)
    }
}
