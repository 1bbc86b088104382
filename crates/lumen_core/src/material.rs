//! Surface materials.
//!
//! A material is a pair of textures: an albedo map (RGB reflectance plus an
//! alpha channel used as an opacity threshold) and a specular map whose
//! alpha channel packs the Blinn-Phong exponent divided by
//! [`SHININESS_SCALE`].

use std::sync::Arc;

use lumen_math::{Vec2, Vec3, Vec4};

use crate::texture::Texture;

/// Scale between the packed specular alpha and the Blinn-Phong exponent.
pub const SHININESS_SCALE: f32 = 256.0;

/// Display gamma removed from albedo lookups.
pub const ALBEDO_GAMMA: f32 = 2.2;

/// A Blinn-Phong surface description.
#[derive(Clone, Debug)]
pub struct Material {
    /// Material name (for logging)
    pub name: String,

    /// Display-encoded albedo (RGB) and opacity (A)
    pub albedo: Arc<Texture>,

    /// Specular color (RGB) and packed shininess (A)
    pub specular: Arc<Texture>,
}

impl Default for Material {
    fn default() -> Self {
        Self::new("default", Vec4::new(0.8, 0.8, 0.8, 1.0), Vec3::ZERO, 1.0)
    }
}

impl Material {
    /// Create a material from constant values.
    pub fn new(name: impl Into<String>, albedo: Vec4, specular: Vec3, shininess: f32) -> Self {
        Self {
            name: name.into(),
            albedo: Arc::new(Texture::solid(albedo)),
            specular: Arc::new(Texture::solid(specular.extend(shininess / SHININESS_SCALE))),
        }
    }

    /// Create an opaque, purely diffuse material.
    pub fn diffuse(name: impl Into<String>, color: Vec3) -> Self {
        Self::new(name, color.extend(1.0), Vec3::ZERO, 1.0)
    }

    /// Replace the albedo with a texture map.
    pub fn with_albedo_texture(mut self, texture: Arc<Texture>) -> Self {
        self.albedo = texture;
        self
    }

    /// Albedo at `uv`: bilinear lookup, then sRGB to linear via `rgb^2.2`.
    ///
    /// Alpha is passed through untouched.
    pub fn sample_albedo(&self, uv: Vec2) -> Vec4 {
        let albedo = self.albedo.sample(uv);
        albedo.truncate().powf(ALBEDO_GAMMA).extend(albedo.w)
    }

    /// Specular response at `uv` with the packed shininess in `w`.
    pub fn sample_specular(&self, uv: Vec2) -> Vec4 {
        self.specular.sample(uv)
    }
}
