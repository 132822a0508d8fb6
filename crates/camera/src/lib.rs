//! Camera: yaw/pitch input to an orthonormal basis and a view matrix.
//!
//! # Invariants
//! - `front`, `right`, `up` form a right-handed orthonormal basis derived
//!   only from yaw, pitch and world-up.
//! - Pitch stays within ±89° after `look`; fov stays within [1, 90].
//! - Camera operations never fail.

mod camera;

pub use camera::{Camera, Movement, FOV_MAX, FOV_MIN, PITCH_LIMIT};
pub use surfaces_common::CameraMode;
