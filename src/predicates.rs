//! Stateless geometric predicates: rays, planes, boxes and triangles.
//!
//! Planes carry an unnormalized normal, so ray parameters are exact ratios and
//! an edge used as a ray (`origin = p0`, `direction = p1 - p0`) crosses a plane
//! at a parameter in `0..=1` when the crossing lies on the edge.

use crate::aabb::Aabb;
use crate::float_types::{Real, UNIT_EPSILON};
use crate::transform::Transform;
use nalgebra::{Point3, SVector, Vector3};

/// A half-line `origin + t * direction`, `t ≥ 0`. The direction need not be unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<Real>,
    pub direction: Vector3<Real>,
}

impl Ray {
    pub const fn new(origin: Point3<Real>, direction: Vector3<Real>) -> Self {
        Self { origin, direction }
    }

    /// Ray from `p0` reaching `p1` at `t = 1`.
    pub fn from_points(p0: &Point3<Real>, p1: &Point3<Real>) -> Self {
        Self {
            origin: *p0,
            direction: p1 - p0,
        }
    }

    #[inline]
    pub fn point_at(&self, t: Real) -> Point3<Real> {
        self.origin + self.direction * t
    }

    /// Move the ray into another frame.
    pub fn transformed(&self, transform: &Transform) -> Self {
        Self {
            origin: transform.transform_point(&self.origin),
            direction: transform.transform_vector(&self.direction),
        }
    }
}

/// A plane through `point` with an unnormalized `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: Point3<Real>,
    pub normal: Vector3<Real>,
}

/// Where a ray meets a surface: the ray parameter and the point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub distance: Real,
    pub point: Point3<Real>,
}

/// The two edge crossings that bound the triangle corner isolated on one
/// side of a plane.
///
/// `to_peak` lies on the edge ending at corner `peak`, `from_peak` on the
/// edge starting there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrianglePlaneIntersection {
    pub peak: usize,
    pub to_peak: Intersection,
    pub from_peak: Intersection,
}

/// Crossings of two triangles with each other's planes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleTriangleIntersection {
    pub first: TrianglePlaneIntersection,
    pub second: TrianglePlaneIntersection,
}

pub fn plane_from_triangle(p0: &Point3<Real>, p1: &Point3<Real>, p2: &Point3<Real>) -> Plane {
    Plane {
        point: *p0,
        normal: (p1 - p0).cross(&(p2 - p0)),
    }
}

/// `None` only when the ray is exactly parallel to the plane.
pub fn intersect_ray_plane(ray: &Ray, plane: &Plane) -> Option<Intersection> {
    let denominator = ray.direction.dot(&plane.normal);
    if denominator == 0.0 {
        return None;
    }
    let t = (plane.point - ray.origin).dot(&plane.normal) / denominator;
    Some(Intersection {
        distance: t,
        point: ray.point_at(t),
    })
}

#[inline]
fn same_side(px: &Point3<Real>, p0: &Point3<Real>, a: &Point3<Real>, b: &Point3<Real>) -> bool {
    let ab = b - a;
    ab.cross(&(px - a)).dot(&ab.cross(&(p0 - a))) >= 0.0
}

/// Inclusive point-in-triangle test for a point on the triangle's plane.
///
/// Points exactly on an edge pass for both triangles sharing that edge.
pub fn point_in_triangle(px: &Point3<Real>, tri: &[Point3<Real>; 3]) -> bool {
    same_side(px, &tri[0], &tri[1], &tri[2])
        && same_side(px, &tri[1], &tri[2], &tri[0])
        && same_side(px, &tri[2], &tri[0], &tri[1])
}

/// Ray against triangle. Misses when the ray is parallel to the triangle's
/// plane, the hit lies behind the origin or at/after `max_distance`, or the
/// hit point is outside the triangle.
pub fn intersect_triangle(
    ray: &Ray,
    tri: &[Point3<Real>; 3],
    max_distance: Option<Real>,
) -> Option<Intersection> {
    let hit = intersect_ray_plane(ray, &plane_from_triangle(&tri[0], &tri[1], &tri[2]))?;
    if hit.distance < 0.0 {
        return None;
    }
    if max_distance.is_some_and(|max| max <= hit.distance) {
        return None;
    }
    point_in_triangle(&hit.point, tri).then_some(hit)
}

/// Slab test of an endless ray against a box.
pub fn intersect_ray_box(ray: &Ray, aabb: &Aabb) -> bool {
    let mut t_min = Real::NEG_INFINITY;
    let mut t_max = Real::INFINITY;
    for axis in 0..3 {
        let inverse = 1.0 / ray.direction[axis];
        let t0 = (aabb.mins[axis] - ray.origin[axis]) * inverse;
        let t1 = (aabb.maxs[axis] - ray.origin[axis]) * inverse;
        let (near, far) = if t0 > t1 { (t1, t0) } else { (t0, t1) };
        if t_min > far || near > t_max {
            return false;
        }
        t_min = t_min.max(near);
        t_max = t_max.min(far);
    }
    true
}

/// Intersect the three edges of `tri` with `plane` and pick the pair of
/// crossings that isolates one corner (the peak).
///
/// When all three edges qualify (the plane passes through a corner) the peak
/// is chosen by comparing the spans between the edge parameters.
pub fn intersect_triangle_plane(
    tri: &[Point3<Real>; 3],
    plane: &Plane,
) -> Option<TrianglePlaneIntersection> {
    let on_edge = |from: usize, to: usize| {
        intersect_ray_plane(&Ray::from_points(&tri[from], &tri[to]), plane).filter(|hit| {
            hit.distance >= -UNIT_EPSILON && hit.distance <= 1.0 + UNIT_EPSILON
        })
    };
    let peak = |peak, to_peak, from_peak| TrianglePlaneIntersection {
        peak,
        to_peak,
        from_peak,
    };

    match (on_edge(0, 1), on_edge(1, 2), on_edge(2, 0)) {
        (Some(i0), Some(i1), Some(i2)) => {
            let (d0, d1, d2) = (i0.distance, i1.distance, i2.distance);
            if d0 - d2 > d1 - d0 {
                if d0 - d2 > d2 - d1 {
                    Some(peak(0, i2, i0))
                } else {
                    Some(peak(2, i1, i2))
                }
            } else if d2 - d1 > d1 - d0 {
                Some(peak(2, i1, i2))
            } else {
                Some(peak(1, i0, i1))
            }
        },
        (Some(i0), Some(i1), None) => Some(peak(1, i0, i1)),
        (Some(i0), None, Some(i2)) => Some(peak(0, i2, i0)),
        (None, Some(i1), Some(i2)) => Some(peak(2, i1, i2)),
        _ => None,
    }
}

/// Intersect each triangle with the other's plane; `None` if either misses.
pub fn intersect_triangles(
    first: &[Point3<Real>; 3],
    second: &[Point3<Real>; 3],
) -> Option<TriangleTriangleIntersection> {
    let first_hit = intersect_triangle_plane(
        first,
        &plane_from_triangle(&second[0], &second[1], &second[2]),
    )?;
    let second_hit = intersect_triangle_plane(
        second,
        &plane_from_triangle(&first[0], &first[1], &first[2]),
    )?;
    Some(TriangleTriangleIntersection {
        first: first_hit,
        second: second_hit,
    })
}

/// Barycentric weights of `a + ax` with respect to the triangle spanned by
/// `ab` and `ac`, solving the 2×2 Gram system with Cramer's rule.
///
/// The result is undefined (non-finite) for a degenerate triangle.
pub fn barycentric_coordinate(
    ab: &Vector3<Real>,
    ac: &Vector3<Real>,
    ax: &Vector3<Real>,
) -> Vector3<Real> {
    let d00 = ab.dot(ab);
    let d01 = ab.dot(ac);
    let d11 = ac.dot(ac);
    let d20 = ax.dot(ab);
    let d21 = ax.dot(ac);
    let determinant = d00 * d11 - d01 * d01;
    let by = (d11 * d20 - d01 * d21) / determinant;
    let bz = (d00 * d21 - d01 * d20) / determinant;
    Vector3::new(1.0 - by - bz, by, bz)
}

/// Blend per-corner attributes (normals, uvs) with barycentric weights.
pub fn interpolate_barycentric<const D: usize>(
    weights: &Vector3<Real>,
    values: &[SVector<Real, D>; 3],
) -> SVector<Real, D> {
    values[0] * weights.x + values[1] * weights.y + values[2] * weights.z
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector2;

    fn xy_triangle() -> [Point3<Real>; 3] {
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn parallel_ray_misses_plane() {
        let [p0, p1, p2] = xy_triangle();
        let plane = plane_from_triangle(&p0, &p1, &p2);
        let ray = Ray::new(Point3::new(0.0, 0.0, 1.0), Vector3::x());
        assert!(intersect_ray_plane(&ray, &plane).is_none());
    }

    #[test]
    fn ray_plane_parameter_is_exact_ratio() {
        let [p0, p1, p2] = xy_triangle();
        let plane = plane_from_triangle(&p0, &p1, &p2);
        let ray = Ray::from_points(&Point3::new(0.2, 0.2, 1.0), &Point3::new(0.2, 0.2, -3.0));
        let hit = intersect_ray_plane(&ray, &plane).unwrap();
        assert_relative_eq!(hit.distance, 0.25);
        assert_relative_eq!(hit.point, Point3::new(0.2, 0.2, 0.0));
    }

    #[test]
    fn ray_triangle_respects_bounds() {
        let tri = xy_triangle();
        let down = Ray::new(Point3::new(0.25, 0.25, 1.0), -Vector3::z());
        assert!(intersect_triangle(&down, &tri, None).is_some());
        assert!(intersect_triangle(&down, &tri, Some(1.0)).is_none());
        assert!(intersect_triangle(&down, &tri, Some(1.5)).is_some());

        let up = Ray::new(Point3::new(0.25, 0.25, 1.0), Vector3::z());
        assert!(intersect_triangle(&up, &tri, None).is_none());

        let outside = Ray::new(Point3::new(0.75, 0.75, 1.0), -Vector3::z());
        assert!(intersect_triangle(&outside, &tri, None).is_none());
    }

    #[test]
    fn edge_hits_count_as_inside() {
        let tri = xy_triangle();
        let ray = Ray::new(Point3::new(0.5, 0.0, 1.0), -Vector3::z());
        assert!(intersect_triangle(&ray, &tri, None).is_some());
    }

    #[test]
    fn ray_box_slab_test() {
        let aabb = Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let hit = Ray::new(Point3::new(-1.0, 0.5, 0.5), Vector3::x());
        let miss = Ray::new(Point3::new(-1.0, 2.0, 0.5), Vector3::x());
        let diagonal = Ray::new(Point3::new(-1.0, -1.0, 0.5), Vector3::new(1.0, 1.0, 0.0));
        assert!(intersect_ray_box(&hit, &aabb));
        assert!(!intersect_ray_box(&miss, &aabb));
        assert!(intersect_ray_box(&diagonal, &aabb));
    }

    #[test]
    fn plane_isolates_single_corner() {
        // z = 0 separates corner 0 from the other two
        let tri = [
            Point3::new(0.0, 0.0, -1.0),
            Point3::new(-1.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
        ];
        let plane = Plane {
            point: Point3::origin(),
            normal: Vector3::z(),
        };
        let hit = intersect_triangle_plane(&tri, &plane).unwrap();
        assert_eq!(hit.peak, 0);
        assert_relative_eq!(hit.to_peak.point, Point3::new(0.5, 0.0, 0.0));
        assert_relative_eq!(hit.from_peak.point, Point3::new(-0.5, 0.0, 0.0));
    }

    /// Right triangle in z = 0 cut by a vertical plane through `point`.
    fn corner_cut(point: Point3<Real>, normal: Vector3<Real>) -> TrianglePlaneIntersection {
        let tri = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ];
        intersect_triangle_plane(&tri, &Plane { point, normal }).unwrap()
    }

    #[test]
    fn plane_through_corner_picks_peak_by_span() {
        // through corner 1, crossing edge 2 -> 0 at t = 0.25
        let hit = corner_cut(Point3::new(2.0, 0.0, 0.0), Vector3::new(3.0, 4.0, 0.0));
        assert_eq!(hit.peak, 0);
        assert_relative_eq!(hit.to_peak.point, Point3::new(0.0, 1.5, 0.0));
        assert_relative_eq!(hit.from_peak.point, Point3::new(2.0, 0.0, 0.0));

        // through corner 1, crossing edge 2 -> 0 at t = 0.75
        let hit = corner_cut(Point3::new(2.0, 0.0, 0.0), Vector3::new(1.0, 4.0, 0.0));
        assert_eq!(hit.peak, 2);
        assert_relative_eq!(hit.to_peak.point, Point3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(hit.from_peak.point, Point3::new(0.0, 0.5, 0.0));

        // through corner 0, crossing edge 1 -> 2 at t = 0.25
        let hit = corner_cut(Point3::origin(), Vector3::new(1.0, -3.0, 0.0));
        assert_eq!(hit.peak, 2);
        assert_relative_eq!(hit.to_peak.point, Point3::new(1.5, 0.5, 0.0));
        assert_relative_eq!(hit.from_peak.point, Point3::origin());

        // through corner 0, crossing edge 1 -> 2 at t = 0.75
        let hit = corner_cut(Point3::origin(), Vector3::new(3.0, -1.0, 0.0));
        assert_eq!(hit.peak, 1);
        assert_relative_eq!(hit.to_peak.point, Point3::origin());
        assert_relative_eq!(hit.from_peak.point, Point3::new(0.5, 1.5, 0.0));
    }

    #[test]
    fn equal_spans_do_not_take_priority() {
        // d2 - d1 == d1 - d0
        let hit = corner_cut(Point3::origin(), Vector3::new(1.0, -1.0, 0.0));
        assert_eq!(hit.peak, 1);
        assert_relative_eq!(hit.from_peak.point, Point3::new(1.0, 1.0, 0.0));

        // d0 - d2 == d2 - d1
        let hit = corner_cut(Point3::new(2.0, 0.0, 0.0), Vector3::new(1.0, 2.0, 0.0));
        assert_eq!(hit.peak, 2);
        assert_relative_eq!(hit.from_peak.point, Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn plane_missing_triangle() {
        let tri = xy_triangle();
        let plane = Plane {
            point: Point3::new(0.0, 0.0, 5.0),
            normal: Vector3::new(0.0, 0.3, 1.0),
        };
        assert!(intersect_triangle_plane(&tri, &plane).is_none());
    }

    #[test]
    fn crossing_triangles_intersect_both_ways() {
        let first = [
            Point3::new(0.0, 0.0, -1.0),
            Point3::new(-1.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
        ];
        let second = [
            Point3::new(0.0, 0.5, 0.0),
            Point3::new(-1.0, -1.5, 0.0),
            Point3::new(1.0, -1.5, 0.0),
        ];
        let both = intersect_triangles(&first, &second).unwrap();
        assert_eq!(both.first.peak, 0);
        assert_eq!(both.second.peak, 0);
        assert!(intersect_triangles(&first, &xy_triangle().map(|p| p + Vector3::new(0.0, 5.0, 0.0))).is_none());
    }

    #[test]
    fn barycentric_weights_reconstruct_point() {
        let [a, b, c] = xy_triangle();
        let x = Point3::new(0.25, 0.5, 0.0);
        let w = barycentric_coordinate(&(b - a), &(c - a), &(x - a));
        assert_relative_eq!(w, Vector3::new(0.25, 0.25, 0.5), epsilon = 1e-12);

        let uvs = [Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.0)];
        assert_relative_eq!(interpolate_barycentric(&w, &uvs), Vector2::new(0.25, 0.5), epsilon = 1e-12);
    }
}
