//! Boolean operations (*union*, *difference*, *intersection*) on indexed
//! triangle meshes by clipping their triangles directly against each other.
//!
//! The core is [`split::split_mesh`]: mesh A is re-triangulated along its
//! crossings with mesh B, every produced triangle is tagged as lying outside
//! or inside B, and the tags are propagated over shared edges. The
//! [`boolean`] operators run the splitter in both directions and stitch the
//! chosen parts together.
//!
//! ```
//! use trimesh_clip::boolean::{Operator, operate};
//! use trimesh_clip::config::ClipConfig;
//! use trimesh_clip::mesh::shapes;
//! use trimesh_clip::transform::Transform;
//!
//! let a = shapes::cube(1.0);
//! let b = shapes::cube(1.0);
//! let b_to_a = Transform::translation(0.5, 0.5, 0.5);
//! let out = operate(&a, &b, &b_to_a, Operator::Union, &ClipConfig::default()).unwrap();
//! assert!(out.mesh.triangle_count() > 0);
//! ```
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): `.stl` import/export
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon to run both splitter passes of a boolean operation at once

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod aabb;
pub mod boolean;
pub mod config;
pub mod errors;
pub mod float_types;
pub mod io;
pub mod mesh;
pub mod picking;
pub mod predicates;
pub mod split;
pub mod traits;
pub mod transform;

#[cfg(any(
    all(feature = "f64", feature = "f32"),
    not(any(feature = "f64", feature = "f32"))
))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use boolean::{BooleanOutput, Operator, operate};
pub use config::ClipConfig;
pub use errors::{BooleanError, ValidationError};
pub use mesh::IndexedTriangleMesh;
pub use split::{SplitMesh, Winding, split_mesh};
pub use traits::BooleanOps;
pub use transform::Transform;
