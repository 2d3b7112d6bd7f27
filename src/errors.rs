//! Validation and operation errors

use crate::float_types::Real;
use nalgebra::Point3;

/// All the possible validation issues we might encounter in an indexed triangle mesh
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// (VertexBufferLength) The flat vertex buffer does not hold whole xyz triples
    #[error("(VertexBufferLength) vertex buffer length {0} is not a multiple of 3")]
    VertexBufferLength(usize),
    /// (IndexBufferLength) The index buffer does not hold whole triangles
    #[error("(IndexBufferLength) index buffer length {0} is not a multiple of 3")]
    IndexBufferLength(usize),
    /// (NormalBufferLength) Normals must match the vertex buffer one to one
    #[error("(NormalBufferLength) expected {expected} normal components, found {actual}")]
    NormalBufferLength { expected: usize, actual: usize },
    /// (UvBufferLength) Texture coordinates must hold two components per vertex
    #[error("(UvBufferLength) expected {expected} uv components, found {actual}")]
    UvBufferLength { expected: usize, actual: usize },
    /// (IndexOutOfRange) A triangle references a vertex that does not exist
    #[error("(IndexOutOfRange) index {index} is out of range (vertex count = {vertex_count})")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    /// (InvalidCoordinate) The coordinate has a NaN or infinite
    #[error("(InvalidCoordinate) the coordinate ({0}) has a NaN or infinite")]
    InvalidCoordinate(Point3<Real>),
}

/// Errors reported by the boolean operators.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BooleanError {
    /// One of the two input meshes failed validation.
    #[error("invalid mesh {mesh}: {source}")]
    InvalidMesh {
        /// Which mesh ("A" or "B").
        mesh: &'static str,
        #[source]
        source: ValidationError,
    },
    /// The relative transform has no inverse, so mesh A cannot be expressed in B's frame.
    #[error("the relative transform between the meshes is not invertible")]
    SingularTransform,
}

/// Result type for boolean operations.
pub type BooleanResult<T> = Result<T, BooleanError>;
