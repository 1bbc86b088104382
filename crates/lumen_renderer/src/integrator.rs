//! The integrator seam between the render loop and the transport algorithms.

use lumen_math::Ray;

use crate::config::{IntegratorKind, RenderConfig};
use crate::path::PathIntegrator;
use crate::query::SceneQuery;
use crate::shading::Color;
use crate::whitted::WhittedIntegrator;

/// Estimates the radiance arriving along a camera ray.
///
/// `seed` identifies the sample; deterministic integrators ignore it.
pub trait Integrator: Send + Sync {
    fn radiance(&self, scene: &dyn SceneQuery, ray: Ray, seed: u64) -> Color;

    /// Short name for logging.
    fn name(&self) -> &'static str;
}

/// Build the integrator selected by `config`.
pub fn build_integrator(config: &RenderConfig) -> Box<dyn Integrator> {
    match config.integrator {
        IntegratorKind::Whitted => Box::new(
            WhittedIntegrator::new(config.max_depth, config.enable_shadow)
                .with_config(config.whitted),
        ),
        IntegratorKind::Path => {
            Box::new(PathIntegrator::new(config.max_depth).with_config(config.path))
        }
    }
}
