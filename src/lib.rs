pub mod consts;
pub mod error;

pub mod vector;
pub mod ray;
pub mod coordinate_system;

pub mod color;
pub mod canvas;
pub mod material;
pub mod pattern;

pub mod intersect;
pub mod shape;
pub mod light;
pub mod camera;
pub mod scene;
pub mod parallel;

pub mod description;
pub mod presets;

use crate::consts::FEQ_EPSILON;

/// Approximate float equality, used by the `PartialEq` impls of the value
/// types.
pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}
