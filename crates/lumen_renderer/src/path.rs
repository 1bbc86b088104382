//! Monte Carlo path tracing with next-event estimation and Russian
//! roulette.
//!
//! At every bounce the path samples each light directly (point lights over
//! a small sphere for soft shadows), adds a scaled ambient term, then picks
//! either a mirror bounce or a cosine-weighted diffuse bounce with
//! probability given by the specular magnitude.

use std::f32::consts::PI;

use lumen_core::Light;
use lumen_math::{Frame, Ray, Vec3};

use crate::config::PathConfig;
use crate::integrator::Integrator;
use crate::query::{RayHit, SceneQuery};
use crate::sampler::SampleRng;
use crate::shading::{blinn_phong, reflect, Color};

/// Trace one path with the default constants.
pub fn path_trace<S: SceneQuery + ?Sized>(scene: &S, ray: Ray, max_depth: u32, seed: u64) -> Color {
    path_trace_with(scene, ray, max_depth, seed, &PathConfig::default())
}

/// Trace one path of at most `max_depth` bounces.
///
/// All randomness comes from a generator seeded with `seed`, so the result
/// is reproducible for a given seed and scene.
pub fn path_trace_with<S: SceneQuery + ?Sized>(
    scene: &S,
    mut ray: Ray,
    max_depth: u32,
    seed: u64,
    config: &PathConfig,
) -> Color {
    let mut rng = SampleRng::new(seed);
    let mut color = Color::ZERO;
    let mut throughput = Color::ONE;

    for depth in 0..max_depth {
        let Some(hit) = scene.intersect_ray(&ray) else {
            break;
        };

        let dir = ray.unit_direction();
        let geometric = hit.normal.normalize_or_zero();
        let normal = if dir.dot(geometric) < 0.0 {
            geometric
        } else {
            -geometric
        };

        for light in scene.lights() {
            color += throughput * sample_light(scene, light, &hit, normal, -dir, config, &mut rng);
        }
        color += throughput * hit.diffuse() * scene.ambient_intensity() * config.ambient_rate;

        let specular = hit.specular_color();
        let specular_weight = specular.length();
        let next_dir = if rng.uniform() < specular_weight && specular_weight > config.specular_threshold {
            throughput *= specular / specular_weight;
            reflect(dir, normal).normalize_or_zero()
        } else {
            let diffuse_probability = (1.0 - specular_weight).max(config.min_diffuse_probability);
            throughput *= hit.diffuse() / diffuse_probability;
            sample_cosine_hemisphere(normal, &mut rng)
        };

        ray = Ray::offset(hit.position, normal, config.ray_epsilon, next_dir);

        if depth > config.roulette_start_depth {
            let survival = throughput.max_element().max(config.roulette_min_probability);
            if rng.uniform() > survival {
                break;
            }
            throughput /= survival;
        }
    }

    color
}

/// Averaged direct lighting from one light.
fn sample_light<S: SceneQuery + ?Sized>(
    scene: &S,
    light: &Light,
    hit: &RayHit,
    normal: Vec3,
    to_eye: Vec3,
    config: &PathConfig,
    rng: &mut SampleRng,
) -> Color {
    let samples = config.light_samples.max(1);
    let mut total = Color::ZERO;

    for _ in 0..samples {
        let (to_light, attenuation, sample_point) = match *light {
            Light::Point { position, .. } => {
                let sample_point = position + uniform_sphere(rng) * config.light_radius;
                let l = sample_point - hit.position;
                (l, 1.0 / l.length_squared(), sample_point)
            }
            Light::Directional { direction, .. } => (
                direction,
                1.0,
                hit.position + direction * config.directional_distance,
            ),
        };
        let to_light = to_light.normalize_or_zero();

        let shadow_ray = Ray::offset(hit.position, normal, config.ray_epsilon, to_light);
        let visible = match scene.intersect_ray(&shadow_ray) {
            None => true,
            Some(occluder) => {
                hit.position.distance(occluder.position) > hit.position.distance(sample_point)
            }
        };

        if visible {
            total += blinn_phong(
                normal,
                to_light,
                to_eye,
                hit.diffuse(),
                hit.specular_color(),
                hit.shininess(),
                light.intensity() * attenuation,
            ) * config.color_rate;
        }
    }

    total / samples as f32
}

/// Uniform direction on the unit sphere.
fn uniform_sphere(rng: &mut SampleRng) -> Vec3 {
    let z = 1.0 - 2.0 * rng.uniform();
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * rng.uniform();
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Cosine-weighted direction on the hemisphere around `normal`.
fn sample_cosine_hemisphere(normal: Vec3, rng: &mut SampleRng) -> Vec3 {
    let phi = 2.0 * PI * rng.uniform();
    let r2 = rng.uniform();
    let cos_theta = r2.sqrt();
    let sin_theta = (1.0 - r2).sqrt();

    Frame::from_normal(normal)
        .to_world(Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta))
        .normalize_or_zero()
}

/// [`Integrator`] running [`path_trace_with`] for each camera ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathIntegrator {
    pub config: PathConfig,
    pub max_depth: u32,
}

impl PathIntegrator {
    pub fn new(max_depth: u32) -> Self {
        Self {
            config: PathConfig::default(),
            max_depth,
        }
    }

    pub fn with_config(mut self, config: PathConfig) -> Self {
        self.config = config;
        self
    }
}

impl Integrator for PathIntegrator {
    fn radiance(&self, scene: &dyn SceneQuery, ray: Ray, seed: u64) -> Color {
        path_trace_with(scene, ray, self.max_depth, seed, &self.config)
    }

    fn name(&self) -> &'static str {
        "path"
    }
}
