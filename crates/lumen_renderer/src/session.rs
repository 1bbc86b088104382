//! Resumable, cancellable multi-threaded rendering.
//!
//! A [`RenderSession`] walks the image in row-major pixel order, rendering
//! batches of rows in parallel with rayon. Only the contiguous run of
//! finished pixels at the front of a batch is committed, so after a stop
//! the cursor marks exactly how far the image is complete and
//! [`RenderSession::resume_from`] can pick up from there.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use lumen_core::Camera;
use rayon::prelude::*;

use crate::camera::PinholeCamera;
use crate::config::{RenderConfig, RenderResult};
use crate::image::ImageBuffer;
use crate::integrator::Integrator;
use crate::query::SceneQuery;
use crate::renderer::render_pixel_with;
use crate::sampler::StratifiedPattern;

/// How a call to [`RenderSession::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// Every pixel has been rendered
    Completed,
    /// A stop was requested; pixels before `pixel_index` are final
    Stopped { pixel_index: usize },
}

/// Requests cancellation of a running session from any thread.
#[derive(Debug, Clone)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Render state that survives cancellation.
pub struct RenderSession {
    config: RenderConfig,
    pattern: StratifiedPattern,
    image: ImageBuffer,
    cursor: usize,
    stop: Arc<AtomicBool>,
}

impl RenderSession {
    /// Create a session after validating `config`.
    pub fn new(config: RenderConfig) -> RenderResult<Self> {
        config.validate()?;
        Ok(Self {
            pattern: StratifiedPattern::new(config.samples_per_pixel),
            image: ImageBuffer::new(config.width, config.height),
            cursor: 0,
            stop: Arc::new(AtomicBool::new(false)),
            config,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn image(&self) -> &ImageBuffer {
        &self.image
    }

    pub fn into_image(self) -> ImageBuffer {
        self.image
    }

    /// Index of the first pixel not yet rendered.
    pub fn pixel_index(&self) -> usize {
        self.cursor
    }

    pub fn pixel_count(&self) -> usize {
        self.config.pixel_count()
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.pixel_count()
    }

    /// Fraction of pixels rendered, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.cursor as f32 / self.pixel_count() as f32
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            flag: Arc::clone(&self.stop),
        }
    }

    /// Continue from `pixel_index` on the next [`run`](Self::run) and clear
    /// any pending stop request.
    pub fn resume_from(&mut self, pixel_index: usize) {
        self.cursor = pixel_index.min(self.pixel_count());
        self.stop.store(false, Ordering::Relaxed);
    }

    /// Start over with a black image.
    pub fn reset(&mut self) {
        self.image.clear();
        self.cursor = 0;
        self.stop.store(false, Ordering::Relaxed);
    }

    /// Render from the cursor until the image is done or a stop is requested.
    ///
    /// A stop requested before the call returns immediately.
    pub fn run(
        &mut self,
        scene: &dyn SceneQuery,
        camera: &Camera,
        integrator: &dyn Integrator,
    ) -> RenderResult<RenderStatus> {
        let camera = PinholeCamera::new(camera, self.config.width, self.config.height);
        let threads = self.config.threads;

        log::info!(
            "Rendering {}x{} with {} integrator, {} spp ({} taken), depth {}, from pixel {}",
            self.config.width,
            self.config.height,
            integrator.name(),
            self.config.samples_per_pixel,
            self.pattern.total_samples(),
            self.config.max_depth,
            self.cursor
        );

        with_thread_pool(threads, || self.render_batches(scene, &camera, integrator))
    }

    fn render_batches(
        &mut self,
        scene: &dyn SceneQuery,
        camera: &PinholeCamera,
        integrator: &dyn Integrator,
    ) -> RenderStatus {
        let width = self.config.width as usize;
        let total = self.pixel_count();
        let batch = width * self.config.batch_rows as usize;
        let pattern = self.pattern;
        let seed = self.config.seed;
        let stop = Arc::clone(&self.stop);

        let start = Instant::now();
        let first = self.cursor;
        let mut next_report = 10;

        while self.cursor < total {
            if stop.load(Ordering::Relaxed) {
                log::info!("Render stopped at pixel {}/{}", self.cursor, total);
                return RenderStatus::Stopped {
                    pixel_index: self.cursor,
                };
            }

            let end = (self.cursor + batch).min(total);
            let colors: Vec<_> = (self.cursor..end)
                .into_par_iter()
                .map(|index| {
                    if stop.load(Ordering::Relaxed) {
                        return None;
                    }
                    let x = (index % width) as u32;
                    let y = (index / width) as u32;
                    Some(render_pixel_with(scene, camera, integrator, x, y, &pattern, seed))
                })
                .collect();

            let batch_start = self.cursor;
            for color in colors.into_iter().map_while(|c| c) {
                self.image.pixels[self.cursor] = color;
                self.cursor += 1;
            }
            log::debug!("Committed pixels {}..{}", batch_start, self.cursor);

            let percent = self.cursor * 100 / total;
            if percent >= next_report || self.cursor == total {
                let elapsed = start.elapsed().as_secs_f64();
                let done = (self.cursor - first) as f64;
                let remaining = if done > 0.0 {
                    elapsed * (total - self.cursor) as f64 / done
                } else {
                    0.0
                };
                log::info!(
                    "render: {}/{} ({}%) elapsed {:.1}s eta {:.1}s",
                    self.cursor,
                    total,
                    percent,
                    elapsed,
                    remaining
                );
                next_report = (percent / 10 + 1) * 10;
            }
        }

        log::info!("Render completed in {:.2}s", start.elapsed().as_secs_f64());
        RenderStatus::Completed
    }
}

fn with_thread_pool<T: Send>(threads: usize, f: impl FnOnce() -> T + Send) -> RenderResult<T> {
    if threads == 0 {
        Ok(f())
    } else {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
        Ok(pool.install(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderError;
    use crate::shading::Color;
    use crate::RayHit;
    use lumen_core::Light;
    use lumen_math::Ray;

    struct Empty;

    impl SceneQuery for Empty {
        fn intersect_ray(&self, _ray: &Ray) -> Option<RayHit> {
            None
        }

        fn lights(&self) -> &[Light] {
            &[]
        }

        fn ambient_intensity(&self) -> Color {
            Color::ZERO
        }
    }

    /// Colours each pixel by its seed and requests a stop after `stop_after` calls.
    struct StopAfter {
        handle: StopHandle,
        stop_after: usize,
        calls: std::sync::atomic::AtomicUsize,
    }

    impl Integrator for StopAfter {
        fn radiance(&self, _scene: &dyn SceneQuery, ray: Ray, seed: u64) -> Color {
            if self.calls.fetch_add(1, Ordering::Relaxed) + 1 >= self.stop_after {
                self.handle.stop();
            }
            ray.direction + Color::splat((seed >> 48) as f32)
        }

        fn name(&self) -> &'static str {
            "stop-after"
        }
    }

    struct Direction;

    impl Integrator for Direction {
        fn radiance(&self, _scene: &dyn SceneQuery, ray: Ray, seed: u64) -> Color {
            ray.direction + Color::splat((seed >> 48) as f32)
        }

        fn name(&self) -> &'static str {
            "direction"
        }
    }

    fn config() -> RenderConfig {
        RenderConfig {
            width: 8,
            height: 6,
            samples_per_pixel: 4,
            batch_rows: 1,
            threads: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = RenderSession::new(RenderConfig {
            height: 0,
            ..config()
        });
        assert!(matches!(result, Err(RenderError::InvalidConfig(_))));
    }

    #[test]
    fn test_completed_session_matches_sequential_render() {
        let camera = Camera::default();
        let mut session = RenderSession::new(config()).unwrap();
        let status = session.run(&Empty, &camera, &Direction).unwrap();

        assert_eq!(status, RenderStatus::Completed);
        assert!(session.is_complete());
        assert_eq!(session.progress(), 1.0);

        let sequential = crate::render(&Empty, &camera, &Direction, &config());
        assert_eq!(session.image(), &sequential);
    }

    #[test]
    fn test_stop_before_run_returns_immediately() {
        let mut session = RenderSession::new(config()).unwrap();
        session.stop_handle().stop();

        let status = session.run(&Empty, &Camera::default(), &Direction).unwrap();
        assert_eq!(status, RenderStatus::Stopped { pixel_index: 0 });
        assert!(session.image().pixels.iter().all(|c| *c == Color::ZERO));
    }

    #[test]
    fn test_stop_and_resume_reproduces_full_render() {
        let camera = Camera::default();
        let mut session = RenderSession::new(config()).unwrap();
        let integrator = StopAfter {
            handle: session.stop_handle(),
            stop_after: 40,
            calls: Default::default(),
        };

        let status = session.run(&Empty, &camera, &integrator).unwrap();
        let RenderStatus::Stopped { pixel_index } = status else {
            panic!("expected the render to stop, got {status:?}");
        };
        assert!(pixel_index < session.pixel_count());
        assert_eq!(pixel_index, session.pixel_index());

        // Pixels past the cursor are untouched
        assert!(session.image().pixels[pixel_index..]
            .iter()
            .all(|c| *c == Color::ZERO));

        session.resume_from(pixel_index);
        let status = session.run(&Empty, &camera, &Direction).unwrap();
        assert_eq!(status, RenderStatus::Completed);

        let full = crate::render(&Empty, &camera, &Direction, &config());
        assert_eq!(session.image(), &full);
    }

    #[test]
    fn test_reset_clears_progress() {
        let mut session = RenderSession::new(config()).unwrap();
        session.run(&Empty, &Camera::default(), &Direction).unwrap();
        session.reset();

        assert_eq!(session.pixel_index(), 0);
        assert!(!session.stop_handle().is_stopped());
        assert!(session.image().pixels.iter().all(|c| *c == Color::ZERO));
    }

    #[test]
    fn test_resume_index_is_clamped() {
        let mut session = RenderSession::new(config()).unwrap();
        session.resume_from(10_000);
        assert!(session.is_complete());
        let status = session.run(&Empty, &Camera::default(), &Direction).unwrap();
        assert_eq!(status, RenderStatus::Completed);
    }
}
