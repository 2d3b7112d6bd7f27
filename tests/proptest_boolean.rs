//! Property-based tests for the splitter and the boolean operators.
//!
//! Random placements of one cube against another; only structural invariants
//! are checked since the clipped surfaces depend on tolerances.

mod support;

use proptest::prelude::*;
use support::has_degenerate_triangle;
use trimesh_clip::{
    boolean::{Operator, operate},
    config::ClipConfig,
    float_types::Real,
    mesh::shapes,
    split::split_mesh,
    transform::Transform,
};

// =============================================================================
// Strategies
// =============================================================================

/// A translation that usually makes two unit cubes overlap.
fn arb_offset() -> impl Strategy<Value = [Real; 3]> {
    prop::array::uniform3(-1.5 as Real..1.5)
}

fn arb_operator() -> impl Strategy<Value = Operator> {
    prop_oneof![
        Just(Operator::Union),
        Just(Operator::Difference),
        Just(Operator::Intersection),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn split_buffers_stay_consistent([x, y, z] in arb_offset()) {
        let a = shapes::cube(1.0);
        let b = shapes::cube(1.0);
        let config = ClipConfig::default();
        let Some(split) = split_mesh(&a, &b, &Transform::translation(x, y, z), &config) else {
            return Ok(());
        };

        prop_assert_eq!(split.vertices.len() % 3, 0);
        prop_assert_eq!(split.indices.len(), split.windings.len() * 3);
        prop_assert_eq!(split.outside.len() + split.inside.len(), split.indices.len());
        prop_assert_eq!(split.normals.as_ref().map(Vec::len), Some(split.vertices.len()));
        prop_assert!(split.vertices.len() >= a.vertices.len());
        prop_assert_eq!(&split.vertices[..a.vertices.len()], &a.vertices[..]);

        let vertex_count = (split.vertices.len() / 3) as u32;
        prop_assert!(split.indices.iter().all(|&i| i < vertex_count));
        prop_assert!(!has_degenerate_triangle(
            &split.vertices,
            &split.indices,
            config.vertex_epsilon
        ));
    }

    #[test]
    fn boolean_output_is_a_valid_mesh(
        [x, y, z] in arb_offset(),
        operator in arb_operator(),
    ) {
        let a = shapes::cube(1.0);
        let b = shapes::cube(1.0);
        let out = operate(&a, &b, &Transform::translation(x, y, z), operator, &ClipConfig::default())
            .expect("valid meshes");
        prop_assert!(out.mesh.validate().is_ok());
        prop_assert!(out.mesh.indices.is_some());
    }

    #[test]
    fn boolean_is_deterministic(
        [x, y, z] in arb_offset(),
        operator in arb_operator(),
    ) {
        let a = shapes::cube(1.0);
        let b = shapes::tetrahedron(0.9);
        let t = Transform::translation(x, y, z);
        let config = ClipConfig::default();
        let first = operate(&a, &b, &t, operator, &config).expect("valid meshes");
        let second = operate(&a, &b, &t, operator, &config).expect("valid meshes");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn separated_cubes_are_kept_whole(x in 1.01 as Real..5.0, y in -0.5 as Real..0.5) {
        let a = shapes::cube(1.0);
        let b = shapes::cube(1.0);
        let t = Transform::translation(x, y, 0.0);
        let config = ClipConfig::default();

        let union = operate(&a, &b, &t, Operator::Union, &config).expect("valid meshes");
        prop_assert_eq!(union.mesh.triangle_count(), 24);
        let difference = operate(&a, &b, &t, Operator::Difference, &config).expect("valid meshes");
        prop_assert_eq!(&difference.mesh, &a);
        let intersection = operate(&a, &b, &t, Operator::Intersection, &config).expect("valid meshes");
        prop_assert_eq!(intersection.mesh.triangle_count(), 0);
    }
}
