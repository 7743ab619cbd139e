//! Planar geometry shared by the board model and the propagation engine.
//!
//! Coordinates are millimetres in board space (y grows downwards, as on the
//! host's canvas) and angles are degrees.

mod pose;
mod transform;

pub use pose::{normalize_angle, rotate_point, rotate_vec, Pose, Vec2};
pub use transform::Transform;
