//! `IndexedTriangleMesh`, the flat-buffer mesh shape consumed and produced by
//! the clipping kernel.

use crate::aabb::Aabb;
use crate::errors::ValidationError;
use crate::float_types::Real;
use crate::transform::Transform;
use nalgebra::{Point3, Vector2, Vector3};

/// Primitive mesh constructors
pub mod shapes;

/// Triangle with cached face normal and bounding box
pub mod triangle;

/// Quantized vertex identity
pub mod unique;

pub use triangle::Triangle;
pub use unique::UniqueVertexIndex;

/// A triangle mesh stored as flat buffers.
///
/// - `vertices` holds xyz triples.
/// - `normals`, when present, holds one xyz triple per vertex.
/// - `uvs`, when present, holds one uv pair per vertex.
/// - `indices`, when present, holds three vertex indices per triangle. A mesh
///   without an index buffer is a valid value but cannot be clipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedTriangleMesh {
    pub vertices: Vec<Real>,
    pub normals: Option<Vec<Real>>,
    pub uvs: Option<Vec<Real>>,
    pub indices: Option<Vec<u32>>,
}

impl IndexedTriangleMesh {
    /// Positions plus an index buffer, without attributes.
    pub const fn new(vertices: Vec<Real>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            normals: None,
            uvs: None,
            indices: Some(indices),
        }
    }

    /// Positions only, no index buffer.
    pub const fn from_vertices(vertices: Vec<Real>) -> Self {
        Self {
            vertices,
            normals: None,
            uvs: None,
            indices: None,
        }
    }

    #[must_use]
    pub fn with_normals(mut self, normals: Vec<Real>) -> Self {
        self.normals = Some(normals);
        self
    }

    #[must_use]
    pub fn with_uvs(mut self, uvs: Vec<Real>) -> Self {
        self.uvs = Some(uvs);
        self
    }

    /// Check buffer lengths, index ranges and coordinate finiteness.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.vertices.len() % 3 != 0 {
            return Err(ValidationError::VertexBufferLength(self.vertices.len()));
        }
        if let Some(normals) = &self.normals {
            if normals.len() != self.vertices.len() {
                return Err(ValidationError::NormalBufferLength {
                    expected: self.vertices.len(),
                    actual: normals.len(),
                });
            }
        }
        if let Some(uvs) = &self.uvs {
            let expected = self.vertex_count() * 2;
            if uvs.len() != expected {
                return Err(ValidationError::UvBufferLength {
                    expected,
                    actual: uvs.len(),
                });
            }
        }
        for i in 0..self.vertex_count() {
            let p = self.vertex(i);
            if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
                return Err(ValidationError::InvalidCoordinate(p));
            }
        }
        if let Some(indices) = &self.indices {
            if indices.len() % 3 != 0 {
                return Err(ValidationError::IndexBufferLength(indices.len()));
            }
            let vertex_count = self.vertex_count();
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(ValidationError::IndexOutOfRange {
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Number of whole triangles in the index buffer, 0 without one.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.as_ref().map_or(0, |indices| indices.len() / 3)
    }

    /// Position of vertex `i`. Panics when `i` is out of range.
    #[inline]
    pub fn vertex(&self, i: usize) -> Point3<Real> {
        Point3::new(
            self.vertices[i * 3],
            self.vertices[i * 3 + 1],
            self.vertices[i * 3 + 2],
        )
    }

    /// Normal of vertex `i`, if the mesh carries normals.
    pub fn normal(&self, i: usize) -> Option<Vector3<Real>> {
        self.normals
            .as_ref()
            .and_then(|n| n.get(i * 3..i * 3 + 3))
            .map(|n| Vector3::new(n[0], n[1], n[2]))
    }

    /// Texture coordinate of vertex `i`, if the mesh carries uvs.
    pub fn uv(&self, i: usize) -> Option<Vector2<Real>> {
        self.uvs
            .as_ref()
            .and_then(|uv| uv.get(i * 2..i * 2 + 2))
            .map(|uv| Vector2::new(uv[0], uv[1]))
    }

    /// Iterate over the triangles of the index buffer.
    ///
    /// Triangles referencing vertices outside the vertex buffer are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        let vertex_count = self.vertex_count();
        self.indices
            .as_deref()
            .unwrap_or(&[])
            .chunks_exact(3)
            .filter(move |c| c.iter().all(|&i| (i as usize) < vertex_count))
            .map(|c| Triangle::from_buffer(&self.vertices, [c[0], c[1], c[2]]))
    }

    /// Box around every vertex, referenced or not.
    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(&(0..self.vertex_count()).map(|i| self.vertex(i)).collect::<Vec<_>>())
    }

    /// Copy of the mesh with positions and normals mapped through `transform`.
    pub fn transformed(&self, transform: &Transform) -> Self {
        Self {
            vertices: transform.transform_positions(&self.vertices),
            normals: self.normals.as_ref().map(|n| transform.transform_normals(n)),
            uvs: self.uvs.clone(),
            indices: self.indices.clone(),
        }
    }

    /// Copy with every triangle's winding reversed and normals negated.
    pub fn flipped(&self) -> Self {
        let mut flipped = self.clone();
        if let Some(indices) = &mut flipped.indices {
            for tri in indices.chunks_exact_mut(3) {
                tri.swap(1, 2);
            }
        }
        if let Some(normals) = &mut flipped.normals {
            normals.iter_mut().for_each(|n| *n = -*n);
        }
        flipped
    }
}
