#![cfg(feature = "stl-io")]

use approx::assert_relative_eq;
use std::fs::File;
use trimesh_clip::{BooleanOps, IndexedTriangleMesh, mesh::shapes};

#[test]
fn mesh_to_stl_ascii() {
    let cube = shapes::cube(2.0);
    let stl_str = cube.to_stl_ascii("test_cube");
    // Basic checks
    assert!(stl_str.contains("solid test_cube"));
    assert!(stl_str.contains("endsolid test_cube"));
    assert_eq!(stl_str.matches("facet normal").count(), 12);
    assert_eq!(stl_str.matches("vertex").count(), 36);
}

#[test]
fn to_stl_and_from_stl_file() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_path = std::env::temp_dir().join("trimesh_clip_cube.stl");

    let cube = shapes::cube(2.0);
    std::fs::write(&tmp_path, cube.to_stl_binary("A cube")?)?;

    let read = IndexedTriangleMesh::from_stl(&mut File::open(&tmp_path)?)?;
    // the 24 flat-shaded corners collapse to the 8 cube corners
    assert_eq!(read.triangle_count(), 12);
    assert_eq!(read.vertex_count(), 8);
    assert!(read.normals.is_none());

    let _ = std::fs::remove_file(&tmp_path);
    Ok(())
}

#[test]
fn boolean_result_survives_stl() -> Result<(), Box<dyn std::error::Error>> {
    let a = shapes::cube(1.0);
    let b = shapes::cube(1.0).translate(0.5, 0.5, 0.5);
    let union = a.union(&b)?;

    let read = IndexedTriangleMesh::from_stl_bytes(&union.to_stl_binary("union")?)?;
    assert_eq!(read.triangle_count(), union.triangle_count());
    assert!(read.vertex_count() <= union.vertex_count());

    let (expected, actual) = (union.bounding_box(), read.bounding_box());
    assert_relative_eq!(actual.mins, expected.mins, epsilon = 1e-6);
    assert_relative_eq!(actual.maxs, expected.maxs, epsilon = 1e-6);
    Ok(())
}

#[test]
fn malformed_stl_is_rejected() {
    let err = IndexedTriangleMesh::from_stl_bytes(b"solid broken\n  facet normal 0 0 1\n");
    assert!(err.is_err());
}
