// Our Real scalar type:
#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

use core::str::FromStr;
use std::sync::OnceLock;

/// Span tolerance used by the splitter: crossing segments and corner spans
/// shorter than this are ignored.
pub const DEFAULT_EPSILON: Real = 1e-4;

/// Grid size used to quantize positions into unique vertex ids.
pub const VERTEX_EPSILON: Real = 1e-3;

/// Slack on the 0..1 edge parameter when intersecting a triangle with a plane.
pub const UNIT_EPSILON: Real = 1e-10;

/// The output index buffer may grow to this multiple of the combined input
/// index buffers before the splitter gives up and flags an error.
pub const GROWTH_LIMIT: usize = 10;

/// Lazily-initialized span tolerance used by [`crate::config::ClipConfig::default`].
///  1) **Build-time**: set env var `TRIMESH_CLIP_TOLERANCE` (e.g. `TRIMESH_CLIP_TOLERANCE=1e-5 cargo build`)
///  2) **Runtime**: call [`set_tolerance`] once before using the library
static TOLERANCE_CELL: OnceLock<Real> = OnceLock::new();

/// Returns the current span tolerance.
/// If not set yet, it tries `TRIMESH_CLIP_TOLERANCE` (parsed as the active `Real`) and
/// falls back to [`DEFAULT_EPSILON`].
pub fn tolerance() -> Real {
    *TOLERANCE_CELL.get_or_init(|| {
        if let Some(environment_variable) = option_env!("TRIMESH_CLIP_TOLERANCE") {
            if let Ok(value) = Real::from_str(environment_variable) {
                return value.max(Real::EPSILON);
            }
        }
        DEFAULT_EPSILON
    })
}

/// Set the tolerance programmatically once (subsequent calls are ignored).
pub fn set_tolerance(value: Real) {
    let _ = TOLERANCE_CELL.set(value.max(Real::EPSILON));
}
