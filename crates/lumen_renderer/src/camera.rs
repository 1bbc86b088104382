//! Pinhole camera for primary ray generation.

use lumen_core::Camera;
use lumen_math::{Ray, Vec3};

/// A [`Camera`] resolved against an image size.
#[derive(Debug, Clone, Copy)]
pub struct PinholeCamera {
    eye: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    tan_half_fovy: f32,
    aspect: f32,
    width: u32,
    height: u32,
}

impl PinholeCamera {
    /// Precompute the view basis for a `width x height` image.
    pub fn new(camera: &Camera, width: u32, height: u32) -> Self {
        let forward = (camera.target - camera.eye).normalize_or_zero();
        let right = forward.cross(camera.up).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();
        let width = width.max(1);
        let height = height.max(1);

        Self {
            eye: camera.eye,
            forward,
            right,
            up,
            tan_half_fovy: (camera.fovy.to_radians() * 0.5).tan(),
            aspect: width as f32 / height as f32,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Primary ray through pixel `(x + dx, y + dy)`.
    ///
    /// Row 0 is the top of the image. The direction is normalized.
    pub fn ray(&self, x: u32, y: u32, dx: f32, dy: f32) -> Ray {
        let sx = 2.0 * (x as f32 + dx) / self.width as f32 - 1.0;
        let sy = 1.0 - 2.0 * (y as f32 + dy) / self.height as f32;

        let direction = self.forward
            + self.up * (self.tan_half_fovy * sy)
            + self.right * (self.tan_half_fovy * self.aspect * sx);

        Ray::new(self.eye, direction.normalize_or_zero())
    }
}
