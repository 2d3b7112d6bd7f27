//! Union, difference and intersection of two triangle meshes.
//!
//! Each operator clips A against B and B against A with [`split_mesh`], then
//! keeps the outside or inside part of each side. A side the splitter could
//! not classify (no overlap, or no tag derived) is classified as a whole by a
//! parity test against the other mesh.

use crate::config::ClipConfig;
use crate::errors::{BooleanError, BooleanResult};
use crate::float_types::Real;
use crate::mesh::IndexedTriangleMesh;
use crate::picking::contains_point;
use crate::split::{SplitMesh, split_mesh};
use crate::transform::Transform;
use hashbrown::HashMap;
use nalgebra::Point3;
use tracing::debug;

/// Boolean operator applied by [`operate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Everything inside either mesh.
    Union,
    /// A with B carved out.
    Difference,
    /// Only what is inside both meshes.
    Intersection,
}

/// Result of a boolean operation, in A's frame.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanOutput {
    pub mesh: IndexedTriangleMesh,
    /// Either splitter pass stopped on the growth guard.
    pub error: bool,
}

/// One input mesh, clipped and partitioned, in its own frame.
/// `inside` triangles are reversed, matching [`SplitMesh::inside`].
struct Side {
    vertices: Vec<Real>,
    normals: Option<Vec<Real>>,
    uvs: Option<Vec<Real>>,
    outside: Vec<u32>,
    inside: Vec<u32>,
    error: bool,
}

impl Side {
    fn from_split(split: SplitMesh) -> Self {
        Self {
            vertices: split.vertices,
            normals: split.normals,
            uvs: split.uvs,
            outside: split.outside,
            inside: split.inside,
            error: split.error,
        }
    }

    /// Classify the whole mesh by testing one of its triangle centroids
    /// against `other`, given in the same frame.
    fn whole(mesh: &IndexedTriangleMesh, other: &IndexedTriangleMesh) -> Self {
        let indices = mesh.indices.clone().unwrap_or_default();
        let inside = mesh.triangles().next().is_some_and(|tri| {
            let [p0, p1, p2] = tri.positions();
            let centroid = Point3::from((p0.coords + p1.coords + p2.coords) / 3.0);
            contains_point(other, &centroid)
        });

        let (outside, inside) = if inside {
            let reversed = indices
                .chunks_exact(3)
                .flat_map(|c| [c[0], c[2], c[1]])
                .collect();
            (Vec::new(), reversed)
        } else {
            (indices, Vec::new())
        };
        Self {
            vertices: mesh.vertices.clone(),
            normals: mesh.normals.clone(),
            uvs: mesh.uvs.clone(),
            outside,
            inside,
            error: false,
        }
    }

    /// Use the splitter result when it classified anything, else fall back
    /// to a whole-mesh test.
    fn classify(
        split: Option<SplitMesh>,
        mesh: &IndexedTriangleMesh,
        other_in_frame: impl FnOnce() -> IndexedTriangleMesh,
    ) -> Self {
        match split {
            Some(split) if split.has_known_windings() => Self::from_split(split),
            Some(split) => {
                let error = split.error;
                Self {
                    error,
                    ..Self::whole(mesh, &other_in_frame())
                }
            },
            None => Self::whole(mesh, &other_in_frame()),
        }
    }

    fn transformed(self, transform: &Transform) -> Self {
        Self {
            vertices: transform.transform_positions(&self.vertices),
            normals: self.normals.map(|n| transform.transform_normals(&n)),
            ..self
        }
    }
}

/// Copies referenced vertices of several sides into one mesh.
struct Assembler {
    mesh: IndexedTriangleMesh,
    indices: Vec<u32>,
}

impl Assembler {
    fn new(with_normals: bool, with_uvs: bool) -> Self {
        Self {
            mesh: IndexedTriangleMesh {
                vertices: Vec::new(),
                normals: with_normals.then(Vec::new),
                uvs: with_uvs.then(Vec::new),
                indices: None,
            },
            indices: Vec::new(),
        }
    }

    fn append(&mut self, side: &Side, indices: &[u32], negate_normals: bool) {
        let mut remap: HashMap<u32, u32> = HashMap::new();
        for &index in indices {
            let mapped = *remap.entry(index).or_insert_with(|| {
                let new_index = (self.mesh.vertices.len() / 3) as u32;
                let i = index as usize;
                self.mesh
                    .vertices
                    .extend_from_slice(&side.vertices[i * 3..i * 3 + 3]);
                if let (Some(target), Some(source)) = (&mut self.mesh.normals, &side.normals) {
                    let sign = if negate_normals { -1.0 } else { 1.0 };
                    target.extend(source[i * 3..i * 3 + 3].iter().map(|n| n * sign));
                }
                if let (Some(target), Some(source)) = (&mut self.mesh.uvs, &side.uvs) {
                    target.extend_from_slice(&source[i * 2..i * 2 + 2]);
                }
                new_index
            });
            self.indices.push(mapped);
        }
    }

    fn finish(mut self, reverse: bool) -> IndexedTriangleMesh {
        if reverse {
            for tri in self.indices.chunks_exact_mut(3) {
                tri.swap(1, 2);
            }
        }
        self.mesh.indices = Some(self.indices);
        self.mesh
    }
}

/// Run both splitter passes: A against B in A's frame, B against A in B's.
#[cfg(feature = "parallel")]
fn split_both(
    a: &IndexedTriangleMesh,
    b: &IndexedTriangleMesh,
    b_to_a: &Transform,
    a_to_b: &Transform,
    config: &ClipConfig,
) -> (Option<SplitMesh>, Option<SplitMesh>) {
    rayon::join(
        || split_mesh(a, b, b_to_a, config),
        || split_mesh(b, a, a_to_b, config),
    )
}

#[cfg(not(feature = "parallel"))]
fn split_both(
    a: &IndexedTriangleMesh,
    b: &IndexedTriangleMesh,
    b_to_a: &Transform,
    a_to_b: &Transform,
    config: &ClipConfig,
) -> (Option<SplitMesh>, Option<SplitMesh>) {
    (
        split_mesh(a, b, b_to_a, config),
        split_mesh(b, a, a_to_b, config),
    )
}

/// Apply `operator` to meshes A and B, where `b_to_a` maps B into A's frame.
/// The result is expressed in A's frame.
///
/// Union keeps the outside parts of both meshes, difference keeps A's
/// outside part and B's inside part with flipped normals, intersection keeps
/// both inside parts.
///
/// ```
/// use trimesh_clip::boolean::{Operator, operate};
/// use trimesh_clip::config::ClipConfig;
/// use trimesh_clip::mesh::shapes;
/// use trimesh_clip::transform::Transform;
///
/// let a = shapes::cube(1.0);
/// let b = shapes::cube(1.0);
/// let far = Transform::translation(5.0, 0.0, 0.0);
/// let union = operate(&a, &b, &far, Operator::Union, &ClipConfig::default()).unwrap();
/// assert_eq!(union.mesh.triangle_count(), 24);
/// ```
pub fn operate(
    a: &IndexedTriangleMesh,
    b: &IndexedTriangleMesh,
    b_to_a: &Transform,
    operator: Operator,
    config: &ClipConfig,
) -> BooleanResult<BooleanOutput> {
    a.validate()
        .map_err(|source| BooleanError::InvalidMesh { mesh: "A", source })?;
    b.validate()
        .map_err(|source| BooleanError::InvalidMesh { mesh: "B", source })?;
    let a_to_b = b_to_a.inverse().ok_or(BooleanError::SingularTransform)?;

    let (split_a, split_b) = split_both(a, b, b_to_a, &a_to_b, config);
    let side_a = Side::classify(split_a, a, || b.transformed(b_to_a));
    let side_b = Side::classify(split_b, b, || a.transformed(&a_to_b)).transformed(b_to_a);

    let with_normals = side_a.normals.is_some() && side_b.normals.is_some();
    let with_uvs = side_a.uvs.is_some() && side_b.uvs.is_some();
    let mut assembler = Assembler::new(with_normals, with_uvs);
    match operator {
        Operator::Union => {
            assembler.append(&side_a, &side_a.outside, false);
            assembler.append(&side_b, &side_b.outside, false);
        },
        Operator::Difference => {
            assembler.append(&side_a, &side_a.outside, false);
            assembler.append(&side_b, &side_b.inside, true);
        },
        Operator::Intersection => {
            assembler.append(&side_a, &side_a.inside, false);
            assembler.append(&side_b, &side_b.inside, false);
        },
    }
    let mesh = assembler.finish(operator == Operator::Intersection);
    let error = side_a.error || side_b.error;

    debug!(
        ?operator,
        triangles = mesh.triangle_count(),
        vertices = mesh.vertex_count(),
        error,
        "boolean operation"
    );
    Ok(BooleanOutput { mesh, error })
}

pub fn union(
    a: &IndexedTriangleMesh,
    b: &IndexedTriangleMesh,
    b_to_a: &Transform,
    config: &ClipConfig,
) -> BooleanResult<BooleanOutput> {
    operate(a, b, b_to_a, Operator::Union, config)
}

pub fn difference(
    a: &IndexedTriangleMesh,
    b: &IndexedTriangleMesh,
    b_to_a: &Transform,
    config: &ClipConfig,
) -> BooleanResult<BooleanOutput> {
    operate(a, b, b_to_a, Operator::Difference, config)
}

pub fn intersection(
    a: &IndexedTriangleMesh,
    b: &IndexedTriangleMesh,
    b_to_a: &Transform,
    config: &ClipConfig,
) -> BooleanResult<BooleanOutput> {
    operate(a, b, b_to_a, Operator::Intersection, config)
}
