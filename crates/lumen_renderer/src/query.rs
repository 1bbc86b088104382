//! The read-only scene interface the integrators trace against.

use lumen_core::{Light, SHININESS_SCALE};
use lumen_math::{Ray, Vec3, Vec4};

use crate::shading::Color;

/// Surface record for the nearest hit along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space hit point
    pub position: Vec3,
    /// Unit shading normal
    pub normal: Vec3,
    /// Linear albedo, alpha in `w`
    pub albedo: Vec4,
    /// Specular colour, shininess / 256 in `w`
    pub specular: Vec4,
}

impl RayHit {
    /// Opacity. Low values let light and rays through.
    #[inline]
    pub fn alpha(&self) -> f32 {
        self.albedo.w
    }

    #[inline]
    pub fn diffuse(&self) -> Color {
        self.albedo.truncate()
    }

    #[inline]
    pub fn specular_color(&self) -> Color {
        self.specular.truncate()
    }

    /// Blinn-Phong exponent.
    #[inline]
    pub fn shininess(&self) -> f32 {
        self.specular.w * SHININESS_SCALE
    }
}

/// Scene queries needed by the integrators.
///
/// Implementations are shared across render threads and must not mutate
/// on query.
pub trait SceneQuery: Sync {
    /// Nearest hit along `ray`, or `None` on a miss.
    fn intersect_ray(&self, ray: &Ray) -> Option<RayHit>;

    /// Lights in declaration order.
    fn lights(&self) -> &[Light];

    /// Ambient intensity applied to every hit.
    fn ambient_intensity(&self) -> Color;
}
