//! Whitted-style recursive ray tracing.
//!
//! Deterministic: direct Blinn-Phong lighting at every hit plus an
//! ambient term, then either a straight continuation through translucent
//! surfaces or a mirror bounce. Written as a loop carrying the accumulated
//! colour and the remaining path weight.

use lumen_core::Light;
use lumen_math::{Ray, Vec3};

use crate::config::WhittedConfig;
use crate::integrator::Integrator;
use crate::query::{RayHit, SceneQuery};
use crate::shading::{blinn_phong, reflect, Color};

/// Trace `ray` with the default Whitted constants.
pub fn ray_trace<S: SceneQuery + ?Sized>(
    scene: &S,
    ray: Ray,
    max_depth: u32,
    enable_shadow: bool,
) -> Color {
    ray_trace_with(scene, ray, max_depth, enable_shadow, &WhittedConfig::default())
}

/// Trace `ray` for at most `max_depth` hits.
///
/// Returns the colour accumulated so far when the ray leaves the scene.
pub fn ray_trace_with<S: SceneQuery + ?Sized>(
    scene: &S,
    mut ray: Ray,
    max_depth: u32,
    enable_shadow: bool,
    config: &WhittedConfig,
) -> Color {
    let mut color = Color::ZERO;
    let mut weight = Color::ONE;

    for _ in 0..max_depth {
        let Some(hit) = scene.intersect_ray(&ray) else {
            break;
        };

        let normal = hit.normal.normalize_or_zero();
        let result = shade(scene, &ray, &hit, normal, enable_shadow, config);

        let alpha = hit.alpha();
        if alpha < config.refraction_alpha_threshold {
            let r = Color::splat(alpha);
            color += weight * r * result;
            weight *= Color::ONE - r;
            ray = Ray::new(hit.position, ray.direction());
        } else {
            let r = hit.specular_color() * config.reflectance_scale;
            color += weight * (Color::ONE - r) * result;
            weight *= r;
            ray = Ray::new(hit.position, reflect(ray.direction(), normal));
        }
    }

    color
}

/// Direct lighting from every light plus ambient.
fn shade<S: SceneQuery + ?Sized>(
    scene: &S,
    ray: &Ray,
    hit: &RayHit,
    normal: Vec3,
    enable_shadow: bool,
    config: &WhittedConfig,
) -> Color {
    let to_eye = -ray.unit_direction();
    let diffuse = hit.diffuse();
    let mut result = Color::ZERO;

    for light in scene.lights() {
        let (to_light, attenuation) = match *light {
            Light::Point { position, .. } => {
                let l = position - hit.position;
                (l, 1.0 / l.length_squared())
            }
            Light::Directional { direction, .. } => (direction, 1.0),
        };

        if enable_shadow && is_shadowed(scene, hit.position, to_light, light, config) {
            continue;
        }

        result += blinn_phong(
            normal,
            to_light.normalize_or_zero(),
            to_eye,
            diffuse,
            hit.specular_color(),
            hit.shininess(),
            light.intensity() * attenuation,
        );
    }

    result + diffuse * scene.ambient_intensity()
}

fn is_shadowed<S: SceneQuery + ?Sized>(
    scene: &S,
    position: Vec3,
    to_light: Vec3,
    light: &Light,
    config: &WhittedConfig,
) -> bool {
    let Some(occluder) = scene.intersect_ray(&Ray::new(position, to_light)) else {
        return false;
    };
    if occluder.alpha() < config.shadow_alpha_threshold {
        return false;
    }

    match *light {
        // Only occluders between the surface and the light count
        Light::Point { position, .. } => (position - occluder.position).dot(to_light) > 0.0,
        Light::Directional { .. } => true,
    }
}

/// [`Integrator`] running [`ray_trace_with`] for each camera ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhittedIntegrator {
    pub config: WhittedConfig,
    pub max_depth: u32,
    pub enable_shadow: bool,
}

impl WhittedIntegrator {
    pub fn new(max_depth: u32, enable_shadow: bool) -> Self {
        Self {
            config: WhittedConfig::default(),
            max_depth,
            enable_shadow,
        }
    }

    pub fn with_config(mut self, config: WhittedConfig) -> Self {
        self.config = config;
        self
    }
}

impl Integrator for WhittedIntegrator {
    fn radiance(&self, scene: &dyn SceneQuery, ray: Ray, _seed: u64) -> Color {
        ray_trace_with(scene, ray, self.max_depth, self.enable_shadow, &self.config)
    }

    fn name(&self) -> &'static str {
        "whitted"
    }
}
