//! Per-pixel estimation.
//!
//! Each pixel is a stratified average of integrator samples. The estimate
//! depends only on the pixel index and the render settings, never on the
//! order pixels are rendered in.

use lumen_core::Camera;

use crate::camera::PinholeCamera;
use crate::config::RenderConfig;
use crate::image::ImageBuffer;
use crate::integrator::Integrator;
use crate::query::SceneQuery;
use crate::sampler::{derive_seed, StratifiedPattern};
use crate::shading::Color;

/// Render a single pixel with stratified multi-sampling.
///
/// `samples_per_pixel` is rounded up to a square grid of strata and the
/// estimate is divided by the number of samples actually taken.
pub fn render_pixel(
    scene: &dyn SceneQuery,
    camera: &PinholeCamera,
    integrator: &dyn Integrator,
    x: u32,
    y: u32,
    samples_per_pixel: u32,
    base_seed: u64,
) -> Color {
    let pattern = StratifiedPattern::new(samples_per_pixel);
    render_pixel_with(scene, camera, integrator, x, y, &pattern, base_seed)
}

pub(crate) fn render_pixel_with(
    scene: &dyn SceneQuery,
    camera: &PinholeCamera,
    integrator: &dyn Integrator,
    x: u32,
    y: u32,
    pattern: &StratifiedPattern,
    base_seed: u64,
) -> Color {
    let pixel_index = y as u64 * camera.width() as u64 + x as u64;
    let total = pattern.total_samples();

    let mut pixel_color = Color::ZERO;
    for sample in pattern.samples(pixel_index * total as u64) {
        let ray = camera.ray(x, y, sample.offset.x, sample.offset.y);
        let seed = derive_seed(base_seed, pixel_index, sample.index);
        pixel_color += integrator.radiance(scene, ray, seed);
    }

    pixel_color / total as f32
}

/// Render the entire image on the calling thread.
///
/// Produces the same pixels as a completed
/// [`RenderSession`](crate::RenderSession) with the same config.
pub fn render(
    scene: &dyn SceneQuery,
    camera: &Camera,
    integrator: &dyn Integrator,
    config: &RenderConfig,
) -> ImageBuffer {
    let camera = PinholeCamera::new(camera, config.width, config.height);
    let pattern = StratifiedPattern::new(config.samples_per_pixel);
    let mut image = ImageBuffer::new(config.width, config.height);

    for y in 0..config.height {
        for x in 0..config.width {
            let color = render_pixel_with(scene, &camera, integrator, x, y, &pattern, config.seed);
            image.set(x, y, color);
        }
    }

    image
}
