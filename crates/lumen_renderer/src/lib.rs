//! lumen renderer - CPU light transport
//!
//! Two integrators over a read-only [`SceneQuery`]:
//! - [`ray_trace`]: Whitted-style tracing with hard shadows, mirror
//!   reflection and straight-through transparency
//! - [`path_trace`]: Monte Carlo path tracing with light sampling and
//!   Russian roulette
//!
//! [`RenderSession`] drives either one over an image with rayon, and can
//! be stopped and resumed at any pixel.

mod camera;
mod config;
mod image;
mod integrator;
mod intersect;
mod path;
mod query;
mod renderer;
mod sampler;
mod session;
mod shading;
mod triangle_scene;
mod whitted;

pub use camera::PinholeCamera;
pub use config::{IntegratorKind, PathConfig, RenderConfig, RenderError, RenderResult, WhittedConfig};
pub use image::{color_to_rgba, linear_to_gamma, ImageBuffer};
pub use integrator::{build_integrator, Integrator};
pub use intersect::{intersect_triangle, Intersection, DETERMINANT_EPSILON};
pub use path::{path_trace, path_trace_with, PathIntegrator};
pub use query::{RayHit, SceneQuery};
pub use renderer::{render, render_pixel};
pub use sampler::{
    derive_seed, halton, PixelSample, SampleRng, StratifiedPattern, MAX_SAMPLES_PER_PIXEL,
};
pub use session::{RenderSession, RenderStatus, StopHandle};
pub use shading::{blinn_phong, reflect, Color};
pub use triangle_scene::TriangleScene;
pub use whitted::{ray_trace, ray_trace_with, WhittedIntegrator};

/// Re-export math types from lumen_math
pub use lumen_math::{Interval, Ray, Vec3, Vec4};
