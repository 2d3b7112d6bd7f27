//! The span tolerance is process wide, so this lives in its own test binary.

use trimesh_clip::{
    config::ClipConfig,
    float_types::{Real, set_tolerance, tolerance},
};

#[test]
fn runtime_tolerance_feeds_the_default_config() {
    set_tolerance(5e-5);
    assert_eq!(tolerance(), 5e-5 as Real);
    assert_eq!(ClipConfig::default().epsilon, 5e-5 as Real);

    // later calls are ignored
    set_tolerance(1.0);
    assert_eq!(tolerance(), 5e-5 as Real);
}
