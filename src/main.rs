// main.rs
//
// Minimal example of each boolean operator of trimesh-clip: two overlapping
// cubes and a cube against a tetrahedron, written to the `stl/` folder.

use std::fs;
use trimesh_clip::boolean::{Operator, operate};
use trimesh_clip::config::ClipConfig;
use trimesh_clip::mesh::{IndexedTriangleMesh, shapes};
use trimesh_clip::transform::Transform;

fn write(name: &str, mesh: &IndexedTriangleMesh) {
    #[cfg(feature = "stl-io")]
    {
        let _ = fs::write(format!("stl/{name}.stl"), mesh.to_stl_ascii(name));
    }
    #[cfg(not(feature = "stl-io"))]
    println!("{name}: {} triangles", mesh.triangle_count());
}

fn main() {
    // Ensure the /stl folder exists
    let _ = fs::create_dir_all("stl");
    let config = ClipConfig::default();

    let cube = shapes::cube(2.0);
    let offset = Transform::translation(1.0, 1.0, 1.0);
    write("cube", &cube);

    for (name, operator) in [
        ("cube_union", Operator::Union),
        ("cube_difference", Operator::Difference),
        ("cube_intersection", Operator::Intersection),
    ] {
        match operate(&cube, &cube, &offset, operator, &config) {
            Ok(output) => {
                if output.error {
                    eprintln!("{name}: splitting stopped early, result is partial");
                }
                write(name, &output.mesh);
            },
            Err(error) => eprintln!("{name}: {error}"),
        }
    }

    // B's frame is rotated and moved relative to A
    let tetrahedron = shapes::tetrahedron(1.5);
    let placement = Transform::rotation(15.0, 30.0, 0.0).then(&Transform::translation(2.0, 1.0, 1.0));
    match operate(&cube, &tetrahedron, &placement, Operator::Difference, &config) {
        Ok(output) => write("cube_minus_tetrahedron", &output.mesh),
        Err(error) => eprintln!("cube_minus_tetrahedron: {error}"),
    }
}
