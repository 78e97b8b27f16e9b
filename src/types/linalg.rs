//! Linear algebra aliases for the robot simulation
//!
//! Every position in the simulator (base, arm, obstacles, objects) is a
//! fixed-size 3-vector. x is the primary locomotion axis.

use nalgebra::Vector3;

// ===== Dimensions =====
pub const AXIS_COUNT: usize = 3;
pub const AXIS_X: usize = 0;
pub const AXIS_Y: usize = 1;
pub const AXIS_Z: usize = 2;

pub type Vec3 = Vector3<f64>;

/// Origin of the simulation frame.
pub fn origin() -> Vec3 {
    Vec3::zeros()
}

/// Build a vector from a `[x, y, z]` triple (the scenario/test notation).
pub fn vec3(coords: [f64; AXIS_COUNT]) -> Vec3 {
    Vec3::new(coords[AXIS_X], coords[AXIS_Y], coords[AXIS_Z])
}

/// Euclidean distance between two points.
pub fn distance(a: &Vec3, b: &Vec3) -> f64 {
    (a - b).norm()
}

/// True when `a` and `b` are closer than `clearance` on every axis
/// (axis-aligned box test, not a sphere).
pub fn within_on_all_axes(a: &Vec3, b: &Vec3, clearance: f64) -> bool {
    (a - b).iter().all(|d| d.abs() < clearance)
}

/// Point `fraction` of the way from `from` to `to`.
pub fn lerp(from: &Vec3, to: &Vec3, fraction: f64) -> Vec3 {
    from + (to - from) * fraction
}
