//! Tolerances and limits for the triangle splitter.
//!
//! Two independent tolerances are in play: `epsilon` bounds crossing spans and
//! corner triangles while splitting, `vertex_epsilon` is the grid size used to
//! recognize coincident vertices.
//!
//! ```
//! use trimesh_clip::config::ClipConfig;
//!
//! let config = ClipConfig::default().with_vertex_epsilon(1e-4);
//! assert_eq!(config.vertex_epsilon, 1e-4);
//! ```

use crate::float_types::{GROWTH_LIMIT, Real, VERTEX_EPSILON, tolerance};

/// Configuration for [`crate::split::split_mesh`] and the boolean operators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipConfig {
    /// Minimum length of a crossing segment and of a corner span.
    pub epsilon: Real,

    /// Quantization grid for unique vertex ids.
    pub vertex_epsilon: Real,

    /// Maximum ratio between the growing index buffer and the combined input
    /// index buffers before the split is abandoned with `error = true`.
    pub growth_limit: usize,
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            epsilon: tolerance(),
            vertex_epsilon: VERTEX_EPSILON,
            growth_limit: GROWTH_LIMIT,
        }
    }
}

impl ClipConfig {
    /// Set the span tolerance.
    #[must_use]
    pub const fn with_epsilon(mut self, epsilon: Real) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the vertex quantization grid.
    #[must_use]
    pub const fn with_vertex_epsilon(mut self, vertex_epsilon: Real) -> Self {
        self.vertex_epsilon = vertex_epsilon;
        self
    }

    /// Set the growth guard factor.
    #[must_use]
    pub const fn with_growth_limit(mut self, growth_limit: usize) -> Self {
        self.growth_limit = growth_limit;
        self
    }
}
