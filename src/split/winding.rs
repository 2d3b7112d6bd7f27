//! Winding tags, outside propagation and the final outside/inside partition.

use crate::float_types::Real;
use hashbrown::HashMap;
use std::collections::VecDeque;

/// Which side of the other mesh a triangle lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i8)]
pub enum Winding {
    Inside = -1,
    #[default]
    Unknown = 0,
    Outside = 1,
}

impl Winding {
    /// Tag from the sign of `dir · edge`: negative is inside, zero or
    /// positive is outside.
    #[inline]
    pub fn from_direction(d: Real) -> Self {
        if d < 0.0 { Self::Inside } else { Self::Outside }
    }

    /// `+1`, `0` or `-1`.
    #[inline]
    pub const fn sign(self) -> i8 {
        self as i8
    }

    #[inline]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// Unordered edge between two unique vertex ids.
#[inline]
fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a < b { (a, b) } else { (b, a) }
}

fn shared_ids(a: &[u32; 3], b: &[u32; 3]) -> usize {
    a.iter().filter(|id| b.contains(id)).count()
}

/// Promote `Unknown` triangles that share exactly two of their three unique
/// ids with an `Outside` triangle to `Outside`, transitively.
///
/// `triangles` holds the unique vertex ids of each triangle. Returns the
/// number of promoted triangles.
pub fn propagate_outside(triangles: &[[u32; 3]], windings: &mut [Winding]) -> usize {
    let mut adjacency: HashMap<(u32, u32), Vec<usize>> = HashMap::new();
    for (t, ids) in triangles.iter().enumerate() {
        for k in 0..3 {
            adjacency
                .entry(edge_key(ids[k], ids[(k + 1) % 3]))
                .or_default()
                .push(t);
        }
    }

    let mut queue: VecDeque<usize> = windings
        .iter()
        .enumerate()
        .filter(|(_, w)| **w == Winding::Outside)
        .map(|(t, _)| t)
        .collect();

    let mut promoted = 0;
    while let Some(t) = queue.pop_front() {
        let ids = &triangles[t];
        for k in 0..3 {
            let Some(neighbors) = adjacency.get(&edge_key(ids[k], ids[(k + 1) % 3])) else {
                continue;
            };
            for &n in neighbors {
                if windings[n] == Winding::Unknown && shared_ids(&triangles[n], ids) == 2 {
                    windings[n] = Winding::Outside;
                    promoted += 1;
                    queue.push_back(n);
                }
            }
        }
    }
    promoted
}

/// Final index buffers after winding resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Every triangle, non-outside ones reversed.
    pub indices: Vec<u32>,
    pub outside: Vec<u32>,
    pub inside: Vec<u32>,
}

/// Reverse every triangle tagged `Inside` or `Unknown` and split the
/// triangles into outside and inside sets.
///
/// When no triangle carries a known tag nothing is reversed and every
/// triangle is reported as outside.
pub fn partition(triangles: &[[u32; 3]], windings: &[Winding]) -> Partition {
    let mut result = Partition::default();
    if !windings.iter().any(|w| w.is_known()) {
        result.indices = triangles.iter().flatten().copied().collect();
        result.outside = result.indices.clone();
        return result;
    }

    for (tri, winding) in triangles.iter().zip(windings) {
        if winding.sign() > 0 {
            result.indices.extend_from_slice(tri);
            result.outside.extend_from_slice(tri);
        } else {
            let reversed = [tri[0], tri[2], tri[1]];
            result.indices.extend_from_slice(&reversed);
            result.inside.extend_from_slice(&reversed);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outside_spreads_across_shared_edges() {
        // a strip of four triangles, only the first is known
        let triangles = [[0, 1, 2], [1, 3, 2], [2, 3, 4], [5, 6, 7]];
        let mut windings = [Winding::Outside, Winding::Unknown, Winding::Unknown, Winding::Unknown];
        let promoted = propagate_outside(&triangles, &mut windings);
        assert_eq!(promoted, 2);
        assert_eq!(
            windings,
            [Winding::Outside, Winding::Outside, Winding::Outside, Winding::Unknown]
        );
    }

    #[test]
    fn inside_blocks_propagation() {
        let triangles = [[0, 1, 2], [1, 3, 2], [2, 3, 4]];
        let mut windings = [Winding::Outside, Winding::Inside, Winding::Unknown];
        assert_eq!(propagate_outside(&triangles, &mut windings), 0);
        assert_eq!(windings[2], Winding::Unknown);
    }

    #[test]
    fn corner_contact_does_not_propagate() {
        let triangles = [[0, 1, 2], [2, 3, 4]];
        let mut windings = [Winding::Outside, Winding::Unknown];
        assert_eq!(propagate_outside(&triangles, &mut windings), 0);
    }

    #[test]
    fn tags_from_direction_sign() {
        assert_eq!(Winding::from_direction(-0.5), Winding::Inside);
        assert_eq!(Winding::from_direction(0.0), Winding::Outside);
        assert_eq!(Winding::Inside.sign(), -1);
        assert_eq!(Winding::default().sign(), 0);
        assert_eq!(Winding::Outside.sign(), 1);
    }

    #[test]
    fn partition_reverses_non_outside() {
        let triangles = [[0, 1, 2], [3, 4, 5], [6, 7, 8]];
        let windings = [Winding::Outside, Winding::Inside, Winding::Unknown];
        let p = partition(&triangles, &windings);
        assert_eq!(p.outside, vec![0, 1, 2]);
        assert_eq!(p.inside, vec![3, 5, 4, 6, 8, 7]);
        assert_eq!(p.indices, vec![0, 1, 2, 3, 5, 4, 6, 8, 7]);
    }

    #[test]
    fn partition_without_tags_keeps_everything_outside() {
        let triangles = [[0, 1, 2], [3, 4, 5]];
        let p = partition(&triangles, &[Winding::Unknown; 2]);
        assert_eq!(p.outside, vec![0, 1, 2, 3, 4, 5]);
        assert!(p.inside.is_empty());
        assert_eq!(p.indices, p.outside);
    }
}
