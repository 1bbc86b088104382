//! Render configuration.
//!
//! Every field has a default, so a JSON file only needs the values it
//! changes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sampler::MAX_SAMPLES_PER_PIXEL;

/// Errors that can occur when setting up a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render config: {0}")]
    InvalidConfig(String),

    #[error("Failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for render setup.
pub type RenderResult<T> = Result<T, RenderError>;

/// Which light-transport algorithm renders the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegratorKind {
    /// Deterministic recursive ray tracing
    Whitted,
    /// Monte Carlo path tracing
    #[default]
    Path,
}

/// Constants of the Whitted integrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhittedConfig {
    /// Occluders below this alpha don't cast shadows
    pub shadow_alpha_threshold: f32,
    /// Surfaces below this alpha pass the ray straight through
    pub refraction_alpha_threshold: f32,
    /// Scale on the specular colour giving the mirror reflectance
    pub reflectance_scale: f32,
}

impl Default for WhittedConfig {
    fn default() -> Self {
        Self {
            shadow_alpha_threshold: 0.2,
            refraction_alpha_threshold: 0.9,
            reflectance_scale: 0.5,
        }
    }
}

/// Constants of the path integrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Shadow samples per light per bounce
    pub light_samples: u32,
    /// Radius of the sphere point lights are sampled on
    pub light_radius: f32,
    /// Gain on direct lighting
    pub color_rate: f32,
    /// Gain on the ambient term
    pub ambient_rate: f32,
    /// Normal offset for secondary ray origins
    pub ray_epsilon: f32,
    /// Distance of the virtual sample point for directional lights
    pub directional_distance: f32,
    /// Specular weights at or below this always scatter diffusely
    pub specular_threshold: f32,
    /// Russian roulette starts after this bounce index
    pub roulette_start_depth: u32,
    /// Lower bound on the survival probability
    pub roulette_min_probability: f32,
    /// Lower bound on the diffuse branch divisor
    pub min_diffuse_probability: f32,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            light_samples: 8,
            light_radius: 10.0,
            color_rate: 2.5,
            ambient_rate: 4.5,
            ray_epsilon: 1e-4,
            directional_distance: 1000.0,
            specular_threshold: 0.01,
            roulette_start_depth: 3,
            roulette_min_probability: 0.15,
            min_diffuse_probability: 0.01,
        }
    }
}

/// Everything a render session needs besides the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Requested samples per pixel (rounded up to a square grid)
    pub samples_per_pixel: u32,
    /// Maximum bounces per path
    pub max_depth: u32,
    /// Integrator to use
    pub integrator: IntegratorKind,
    /// Shadow rays for the Whitted integrator
    pub enable_shadow: bool,
    /// Base seed mixed into every sample
    pub seed: u64,
    /// Worker threads, 0 for the global rayon pool
    pub threads: usize,
    /// Image rows rendered between cancellation checks
    pub batch_rows: u32,
    /// Gamma applied when quantizing to 8 bit (1.0 writes linear values)
    pub output_gamma: f32,
    pub whitted: WhittedConfig,
    pub path: PathConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            samples_per_pixel: 16,
            max_depth: 5,
            integrator: IntegratorKind::default(),
            enable_shadow: true,
            seed: 0,
            threads: 0,
            batch_rows: 8,
            output_gamma: 1.0,
            whitted: WhittedConfig::default(),
            path: PathConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Parse a (possibly partial) config from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reject configurations that can't produce an image.
    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig(
                "samples_per_pixel must be at least 1".into(),
            ));
        }
        if self.samples_per_pixel > MAX_SAMPLES_PER_PIXEL {
            return Err(RenderError::InvalidConfig(format!(
                "samples_per_pixel must be at most {MAX_SAMPLES_PER_PIXEL}, got {}",
                self.samples_per_pixel
            )));
        }
        if self.max_depth == 0 {
            return Err(RenderError::InvalidConfig("max_depth must be at least 1".into()));
        }
        if self.batch_rows == 0 {
            return Err(RenderError::InvalidConfig("batch_rows must be at least 1".into()));
        }
        if self.path.light_samples == 0 {
            return Err(RenderError::InvalidConfig(
                "path.light_samples must be at least 1".into(),
            ));
        }
        if self.output_gamma <= 0.0 || !self.output_gamma.is_finite() {
            return Err(RenderError::InvalidConfig(format!(
                "output_gamma must be positive, got {}",
                self.output_gamma
            )));
        }
        Ok(())
    }

    /// Total pixel count.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RenderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.path.light_samples, 8);
        assert_eq!(config.path.roulette_min_probability, 0.15);
        assert_eq!(config.whitted.refraction_alpha_threshold, 0.9);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RenderConfig::from_json(
            r#"{ "width": 64, "integrator": "whitted", "path": { "color_rate": 1.0 } }"#,
        )
        .unwrap();

        assert_eq!(config.width, 64);
        assert_eq!(config.height, 400);
        assert_eq!(config.integrator, IntegratorKind::Whitted);
        assert_eq!(config.path.color_rate, 1.0);
        assert_eq!(config.path.ambient_rate, 4.5);
    }

    #[test]
    fn test_validate_rejects_zero_sizes() {
        let mut config = RenderConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(RenderError::InvalidConfig(_))));

        config.width = 8;
        config.samples_per_pixel = 0;
        assert!(config.validate().is_err());

        config.samples_per_pixel = MAX_SAMPLES_PER_PIXEL + 1;
        assert!(config.validate().is_err());
        config.samples_per_pixel = MAX_SAMPLES_PER_PIXEL;
        assert!(config.validate().is_ok());

        config.samples_per_pixel = 1;
        config.max_depth = 0;
        assert!(config.validate().is_err());

        config.max_depth = 1;
        config.output_gamma = 0.0;
        assert!(config.validate().is_err());
    }
}
