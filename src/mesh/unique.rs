//! Canonical vertex ids.
//!
//! Two positions receive the same id when they round to the same cell of a
//! grid with spacing `epsilon`. Ids are dense and assigned in first-seen
//! order, so they are only meaningful within one index instance.

use crate::float_types::Real;
use hashbrown::HashMap;
use nalgebra::Point3;

type Cell = i64;

#[derive(Debug, Clone)]
pub struct UniqueVertexIndex {
    epsilon: Real,
    cells: HashMap<Cell, HashMap<Cell, HashMap<Cell, u32>>>,
    next_id: u32,
}

impl UniqueVertexIndex {
    pub fn new(epsilon: Real) -> Self {
        Self {
            epsilon,
            cells: HashMap::new(),
            next_id: 0,
        }
    }

    #[inline]
    fn quantize(&self, c: Real) -> Cell {
        (c / self.epsilon).round() as Cell
    }

    /// Id of `point`, allocating a fresh one for an unseen cell.
    pub fn vertex_index(&mut self, point: &Point3<Real>) -> u32 {
        let (x, y, z) = (
            self.quantize(point.x),
            self.quantize(point.y),
            self.quantize(point.z),
        );
        let next_id = &mut self.next_id;
        *self
            .cells
            .entry(x)
            .or_default()
            .entry(y)
            .or_default()
            .entry(z)
            .or_insert_with(|| {
                let id = *next_id;
                *next_id += 1;
                id
            })
    }

    /// Ids for every xyz triple of a flat vertex buffer.
    pub fn index_vertices(&mut self, vertices: &[Real]) -> Vec<u32> {
        vertices
            .chunks_exact(3)
            .map(|c| self.vertex_index(&Point3::new(c[0], c[1], c[2])))
            .collect()
    }

    /// Number of distinct ids handed out so far.
    pub const fn len(&self) -> usize {
        self.next_id as usize
    }

    pub const fn is_empty(&self) -> bool {
        self.next_id == 0
    }
}
