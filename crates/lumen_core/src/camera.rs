//! Scene camera description.

use lumen_math::Vec3;
use serde::{Deserialize, Serialize};

/// A look-at pinhole camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Eye position
    pub eye: Vec3,
    /// Point the camera looks at
    pub target: Vec3,
    /// Approximate up direction
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fovy: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fovy: 45.0,
        }
    }
}

impl Camera {
    /// Create a camera looking from `eye` at `target`.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3, fovy: f32) -> Self {
        Self {
            eye,
            target,
            up,
            fovy,
        }
    }
}
