//! Immutable 4×4 affine transform used to express one mesh's frame in terms
//! of another's.

use crate::float_types::Real;
use nalgebra::{Matrix3, Matrix4, Point3, Rotation3, Translation3, Vector3};

/// An affine transform stored as a homogeneous 4×4 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Matrix4<Real>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Matrix4<Real>> for Transform {
    fn from(matrix: Matrix4<Real>) -> Self {
        Self::from_matrix(matrix)
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    pub const fn from_matrix(matrix: Matrix4<Real>) -> Self {
        Self { matrix }
    }

    pub fn translation(x: Real, y: Real, z: Real) -> Self {
        Self::from(Translation3::new(x, y, z).to_homogeneous())
    }

    /// Rotation by x, y and z degrees, applied in that order.
    pub fn rotation(x_deg: Real, y_deg: Real, z_deg: Real) -> Self {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), x_deg.to_radians());
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), y_deg.to_radians());
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), z_deg.to_radians());
        Self::from((rz * ry * rx).to_homogeneous())
    }

    pub fn scaling(sx: Real, sy: Real, sz: Real) -> Self {
        Self::from(Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz)))
    }

    /// The homogeneous matrix.
    pub const fn matrix(&self) -> &Matrix4<Real> {
        &self.matrix
    }

    /// `self` followed by `next`.
    #[must_use]
    pub fn then(&self, next: &Transform) -> Self {
        Self::from(next.matrix * self.matrix)
    }

    /// `None` when the matrix is singular.
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(Self::from)
    }

    /// Transform expressing frame `b` in terms of frame `a`, given both
    /// frames' world transforms: `a⁻¹ · b`.
    pub fn relative(a_world: &Transform, b_world: &Transform) -> Option<Self> {
        a_world
            .inverse()
            .map(|a_inverse| Self::from(a_inverse.matrix * b_world.matrix))
    }

    #[inline]
    pub fn transform_point(&self, p: &Point3<Real>) -> Point3<Real> {
        self.matrix.transform_point(p)
    }

    /// Transform a direction; the translation part is ignored.
    #[inline]
    pub fn transform_vector(&self, v: &Vector3<Real>) -> Vector3<Real> {
        self.matrix.transform_vector(v)
    }

    /// Transform a surface normal with the inverse transpose of the linear
    /// part and renormalize it. Zero normals stay zero.
    pub fn transform_normal(&self, n: &Vector3<Real>) -> Vector3<Real> {
        let linear: Matrix3<Real> = self.matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let normal_matrix = linear
            .try_inverse()
            .map(|inverse| inverse.transpose())
            .unwrap_or(linear);
        let transformed = normal_matrix * n;
        transformed.try_normalize(Real::EPSILON).unwrap_or(transformed)
    }

    /// Transform a flat xyz buffer of positions.
    pub fn transform_positions(&self, buffer: &[Real]) -> Vec<Real> {
        buffer
            .chunks_exact(3)
            .flat_map(|c| {
                let p = self.transform_point(&Point3::new(c[0], c[1], c[2]));
                [p.x, p.y, p.z]
            })
            .collect()
    }

    /// Transform a flat xyz buffer of normals.
    pub fn transform_normals(&self, buffer: &[Real]) -> Vec<Real> {
        buffer
            .chunks_exact(3)
            .flat_map(|c| {
                let n = self.transform_normal(&Vector3::new(c[0], c[1], c[2]));
                [n.x, n.y, n.z]
            })
            .collect()
    }
}
