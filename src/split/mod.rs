//! Clip the triangles of one mesh against another.
//!
//! [`split_mesh`] walks mesh A's triangles as a work list. Each triangle is
//! tested against the triangles of mesh B (already moved into A's frame)
//! whose boxes overlap it. A crossing replaces the triangle by a small fan of
//! new triangles that are appended to the work list and processed in turn,
//! so a triangle cut by several B triangles is refined until no crossing is
//! left. Every produced triangle carries a [`Winding`] tag that is later
//! propagated and used to partition the result into outside and inside sets.

use crate::aabb::Aabb;
use crate::config::ClipConfig;
use crate::float_types::Real;
use crate::mesh::{IndexedTriangleMesh, Triangle, UniqueVertexIndex};
use crate::predicates::{interpolate_barycentric, intersect_triangle, intersect_triangles};
use crate::transform::Transform;
use nalgebra::{Point3, Vector2, Vector3};
use tracing::{debug, warn};

pub mod winding;

pub use winding::Winding;

/// Result of clipping mesh A against mesh B, in A's frame.
///
/// The vertex buffers start with A's vertices; new vertices are appended.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitMesh {
    pub vertices: Vec<Real>,
    pub normals: Option<Vec<Real>>,
    pub uvs: Option<Vec<Real>>,
    /// All triangles; those not tagged outside are reversed.
    pub indices: Vec<u32>,
    /// Triangles outside mesh B.
    pub outside: Vec<u32>,
    /// Triangles inside mesh B, reversed.
    pub inside: Vec<u32>,
    /// One tag per triangle of `indices`.
    pub windings: Vec<Winding>,
    /// The growth guard stopped the split early; the result is best effort.
    pub error: bool,
    /// Some tag was derived or some vertex was added.
    pub any_changed: bool,
}

impl SplitMesh {
    /// True when at least one triangle was classified.
    pub fn has_known_windings(&self) -> bool {
        self.windings.iter().any(|w| w.is_known())
    }

    /// The merged mesh with every triangle.
    pub fn to_mesh(&self) -> IndexedTriangleMesh {
        self.mesh_with(self.indices.clone())
    }

    pub fn outside_mesh(&self) -> IndexedTriangleMesh {
        self.mesh_with(self.outside.clone())
    }

    pub fn inside_mesh(&self) -> IndexedTriangleMesh {
        self.mesh_with(self.inside.clone())
    }

    fn mesh_with(&self, indices: Vec<u32>) -> IndexedTriangleMesh {
        IndexedTriangleMesh {
            vertices: self.vertices.clone(),
            normals: self.normals.clone(),
            uvs: self.uvs.clone(),
            indices: Some(indices),
        }
    }
}

/// One B triangle in A's frame with its unique ids.
struct Candidate {
    triangle: Triangle,
    ids: [u32; 3],
}

/// A point where one of the two triangles crosses the other's plane.
#[derive(Clone, Copy)]
struct Crossing {
    /// 0 for the triangle being split, 1 for the candidate.
    source: u8,
    point: Point3<Real>,
    distance: Real,
}

/// Outcome of testing the triangle being split against one candidate.
enum Cut {
    /// The pair does not split the triangle.
    Miss,
    /// The triangle was replaced by new triangles on the work list.
    Split,
    /// Only a tag for the triangle was learned.
    Learned(Winding),
}

/// Growing output buffers and the triangle work list.
struct Splitter {
    config: ClipConfig,
    unique: UniqueVertexIndex,
    vertices: Vec<Real>,
    normals: Option<Vec<Real>>,
    uvs: Option<Vec<Real>>,
    vertex_ids: Vec<u32>,
    work: Vec<[u32; 3]>,
    work_windings: Vec<Winding>,
}

impl Splitter {
    #[inline]
    fn point(&self, i: u32) -> Point3<Real> {
        let i = i as usize * 3;
        Point3::new(self.vertices[i], self.vertices[i + 1], self.vertices[i + 2])
    }

    #[inline]
    fn ids(&self, tri: &[u32; 3]) -> [u32; 3] {
        tri.map(|i| self.vertex_ids[i as usize])
    }

    /// Append a vertex lying on triangle `host`, interpolating the host's
    /// normals and uvs.
    fn add_vertex(&mut self, point: &Point3<Real>, id: u32, host: &[u32; 3]) -> u32 {
        let index = (self.vertices.len() / 3) as u32;
        let weights = Triangle::from_buffer(&self.vertices, *host).barycentric_coordinate(point);

        if let Some(normals) = &mut self.normals {
            let corner = |i: u32| {
                let i = i as usize * 3;
                Vector3::new(normals[i], normals[i + 1], normals[i + 2])
            };
            let n = interpolate_barycentric(&weights, &host.map(corner));
            let n = n.try_normalize(Real::EPSILON).unwrap_or(n);
            normals.extend_from_slice(&[n.x, n.y, n.z]);
        }
        if let Some(uvs) = &mut self.uvs {
            let corner = |i: u32| {
                let i = i as usize * 2;
                Vector2::new(uvs[i], uvs[i + 1])
            };
            let uv = interpolate_barycentric(&weights, &host.map(corner));
            uvs.extend_from_slice(&[uv.x, uv.y]);
        }
        self.vertices.extend_from_slice(&[point.x, point.y, point.z]);
        self.vertex_ids.push(id);
        index
    }

    /// Queue a triangle produced by a cut, tagged from the side its edge
    /// `1 → 2` points to relative to the crossing direction.
    fn push_directed(&mut self, dir: &Vector3<Real>, tri: [u32; 3]) {
        if Triangle::has_no_area(&self.ids(&tri)) {
            return;
        }
        let edge = self.point(tri[2]) - self.point(tri[1]);
        self.work.push(tri);
        self.work_windings.push(Winding::from_direction(dir.dot(&edge)));
    }

    /// Queue a triangle that inherits a known tag.
    fn push_with_winding(&mut self, winding: Winding, tri: [u32; 3]) {
        if Triangle::has_no_area(&self.ids(&tri)) {
            return;
        }
        self.work.push(tri);
        self.work_windings.push(winding);
    }

    /// The 1-shared-vertex case. `shared` is the corner of the split triangle
    /// at the common vertex, `shared_b` the same vertex in the candidate.
    fn split_at_shared_vertex(
        &mut self,
        t1: &Triangle,
        ids1: &[u32; 3],
        t2: &Triangle,
        (shared, shared_b): (usize, usize),
        dir: &Vector3<Real>,
        original: Winding,
    ) -> bool {
        let i = t1.indices;
        let (s, s1, s2) = (i[shared], i[(shared + 1) % 3], i[(shared + 2) % 3]);
        let inside_edge = |distance: Real| distance > 0.0 && distance < 1.0;

        // T1's opposite edge crossing T2
        let ray = t1.edge_ray((shared + 1) % 3, (shared + 2) % 3);
        if let Some(hit) = intersect_triangle(&ray, t2.positions(), Some(1.0))
            .filter(|hit| inside_edge(hit.distance))
        {
            let id = self.unique.vertex_index(&hit.point);
            if !ids1.contains(&id) {
                let n = self.add_vertex(&hit.point, id, &i);
                self.push_directed(dir, [s1, n, s]);
                self.push_directed(dir, [s2, s, n]);
                return true;
            }
        }

        // T2's opposite edge piercing T1
        let ray = t2.edge_ray((shared_b + 1) % 3, (shared_b + 2) % 3);
        if let Some(hit) = intersect_triangle(&ray, t1.positions(), Some(1.0))
            .filter(|hit| inside_edge(hit.distance))
        {
            let id = self.unique.vertex_index(&hit.point);
            if !ids1.contains(&id) {
                let n = self.add_vertex(&hit.point, id, &i);
                self.push_directed(dir, [s1, n, s]);
                self.push_directed(dir, [s2, s, n]);
                self.push_with_winding(original, [s1, s2, n]);
                return true;
            }
        }
        false
    }

    /// The generic case without shared vertices.
    fn split_crossing(
        &mut self,
        t1: &Triangle,
        ids1: &[u32; 3],
        t2: &Triangle,
        dir: &Vector3<Real>,
        original: Winding,
    ) -> Cut {
        let Some(hit) = intersect_triangles(t1.positions(), t2.positions()) else {
            return Cut::Miss;
        };
        let mut crossings = [
            (0, hit.first.to_peak.point),
            (0, hit.first.from_peak.point),
            (1, hit.second.to_peak.point),
            (1, hit.second.from_peak.point),
        ]
        .map(|(source, point)| Crossing {
            source,
            point,
            distance: 0.0,
        });

        let origin = crossings[0].point;
        let direction = crossings[1].point - origin;
        if direction.norm() < self.config.epsilon {
            return Cut::Miss;
        }
        for c in &mut crossings {
            c.distance = (c.point - origin).dot(&direction);
        }
        crossings.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        let [c0, c1, c2, c3] = crossings;

        if c0.source == c1.source || (c0.source == c2.source && c1.distance == c2.distance) {
            return Cut::Miss;
        }

        let u1 = self.unique.vertex_index(&c1.point);
        let u2 = self.unique.vertex_index(&c2.point);
        let peak = hit.first.peak;
        let p = t1.positions();
        if ids1.contains(&u1) && ids1.contains(&u2) {
            if u1 == u2 {
                return Cut::Miss;
            }
            let edge = p[(peak + 2) % 3] - p[(peak + 1) % 3];
            return Cut::Learned(Winding::from_direction(dir.dot(&edge)));
        }

        let i = t1.indices;
        let n1 = self.add_vertex(&c1.point, u1, &i);
        let n2 = self.add_vertex(&c2.point, u2, &i);
        let [o0, o1, o2] = [i[peak], i[(peak + 1) % 3], i[(peak + 2) % 3]];
        let eps = self.config.epsilon;

        if c0.source == 0 && c1.distance - c0.distance > eps {
            self.push_with_winding(original, [o2, o0, n1]);
        }
        self.push_directed(dir, [o0, n2, n1]);
        self.push_directed(dir, [o2, n1, n2]);
        self.push_with_winding(original, [o1, o2, n2]);
        if c3.source == 0 && c3.distance - c2.distance > eps {
            self.push_with_winding(original, [o0, o1, n2]);
        }
        Cut::Split
    }
}

/// Clip mesh A against mesh B, where `b_to_a` maps B's coordinates into A's
/// frame.
///
/// Returns `None`, meaning "keep A unchanged", when either mesh lacks an
/// index buffer, when the bounding boxes of A and transformed B do not
/// overlap, or when no B triangle touches the common box.
///
/// Triangles with fewer than three distinct unique vertex ids are dropped,
/// as are triangles referencing missing vertices. Normals and uvs are carried
/// only when their buffers match A's vertex count.
pub fn split_mesh(
    a: &IndexedTriangleMesh,
    b: &IndexedTriangleMesh,
    b_to_a: &Transform,
    config: &ClipConfig,
) -> Option<SplitMesh> {
    let (a_indices, b_indices) = (a.indices.as_ref()?, b.indices.as_ref()?);

    let a_vertex_count = a.vertex_count();
    let a_vertices = &a.vertices[..a_vertex_count * 3];
    let b_vertices = b_to_a.transform_positions(&b.vertices);

    let a_box = Aabb::from_points(&(0..a_vertex_count).map(|i| a.vertex(i)).collect::<Vec<_>>());
    let b_box = Aabb::from_points(
        &b_vertices
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect::<Vec<_>>(),
    );
    if !a_box.intersects(&b_box) {
        return None;
    }
    let clip_box = a_box.intersection(&b_box);

    let mut unique = UniqueVertexIndex::new(config.vertex_epsilon);
    let vertex_ids = unique.index_vertices(a_vertices);
    let b_ids = unique.index_vertices(&b_vertices);

    let candidates: Vec<Candidate> = b_indices
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .filter(|tri| tri.iter().all(|&i| (i as usize) < b_ids.len()))
        .filter_map(|tri| {
            let ids = tri.map(|i| b_ids[i as usize]);
            if Triangle::has_no_area(&ids) {
                return None;
            }
            let triangle = Triangle::from_buffer(&b_vertices, tri);
            triangle
                .bounding_box()
                .intersects(&clip_box)
                .then_some(Candidate { triangle, ids })
        })
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let work: Vec<[u32; 3]> = a_indices
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .filter(|tri| tri.iter().all(|&i| (i as usize) < a_vertex_count))
        .collect();
    let work_windings = vec![Winding::Unknown; work.len()];

    let mut splitter = Splitter {
        config: *config,
        unique,
        vertices: a_vertices.to_vec(),
        normals: a.normals.clone().filter(|n| n.len() == a_vertex_count * 3),
        uvs: a.uvs.clone().filter(|uv| uv.len() == a_vertex_count * 2),
        vertex_ids,
        work,
        work_windings,
    };

    let limit = config.growth_limit * (a_indices.len() + b_indices.len());
    let mut error = false;
    let mut emitted: Vec<[u32; 3]> = Vec::new();
    let mut emitted_windings: Vec<Winding> = Vec::new();

    let mut next = 0;
    while next < splitter.work.len() {
        if splitter.work.len() * 3 > limit {
            warn!(
                indices = splitter.work.len() * 3,
                limit, "triangle splitting does not converge, returning partial result"
            );
            error = true;
            break;
        }

        let tri = splitter.work[next];
        let original = splitter.work_windings[next];
        let mut winding = original;
        next += 1;

        let ids1 = splitter.ids(&tri);
        if Triangle::has_no_area(&ids1) {
            continue;
        }
        let t1 = Triangle::from_buffer(&splitter.vertices, tri);
        if !t1.bounding_box().intersects(&clip_box) {
            emitted.push(tri);
            emitted_windings.push(winding);
            continue;
        }

        let mut split = false;
        for Candidate {
            triangle: t2,
            ids: ids2,
        } in &candidates
        {
            if !t1.bounding_box().intersects(&t2.bounding_box()) {
                continue;
            }
            let Some(dir) = t2
                .face_normal()
                .cross(&t1.face_normal())
                .try_normalize(Real::EPSILON)
            else {
                continue;
            };

            let mut shared = [(0, 0); 3];
            let mut shared_count = 0;
            for (k, id) in ids1.iter().enumerate() {
                if let Some(j) = ids2.iter().position(|other| other == id) {
                    shared[shared_count] = (k, j);
                    shared_count += 1;
                }
            }

            match shared_count {
                2.. => {
                    let (s0, s1) = (shared[0].0, shared[1].0);
                    let p = t1.positions();
                    let mut edge = p[s1] - p[s0];
                    if (s0, s1) == (0, 2) {
                        edge = -edge;
                    }
                    winding = Winding::from_direction(dir.dot(&edge));
                },
                1 => {
                    if splitter.split_at_shared_vertex(&t1, &ids1, t2, shared[0], &dir, original) {
                        split = true;
                        break;
                    }
                },
                _ => match splitter.split_crossing(&t1, &ids1, t2, &dir, original) {
                    Cut::Split => {
                        split = true;
                        break;
                    },
                    Cut::Learned(learned) => winding = learned,
                    Cut::Miss => {},
                },
            }
        }

        if !split {
            emitted.push(tri);
            emitted_windings.push(winding);
        }
    }

    let emitted_ids: Vec<[u32; 3]> = emitted.iter().map(|tri| splitter.ids(tri)).collect();
    let promoted = winding::propagate_outside(&emitted_ids, &mut emitted_windings);
    let partition = winding::partition(&emitted, &emitted_windings);

    let added_vertices = splitter.vertices.len() / 3 - a_vertex_count;
    let any_changed = emitted_windings.iter().any(|w| w.is_known()) || added_vertices > 0;
    debug!(
        input_triangles = a_indices.len() / 3,
        output_triangles = emitted.len(),
        added_vertices,
        promoted,
        error,
        "split mesh"
    );

    Some(SplitMesh {
        vertices: splitter.vertices,
        normals: splitter.normals,
        uvs: splitter.uvs,
        indices: partition.indices,
        outside: partition.outside,
        inside: partition.inside,
        windings: emitted_windings,
        error,
        any_changed,
    })
}
