//! Lumen Core - scene description for the lumen ray tracers.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `Model`, `Mesh`, `Material`, `Light`, `Camera`
//! - **Textures**: bilinear, wrap-around lookup with gamma-decoded albedo
//! - **Scene files**: JSON scene descriptions and built-in Cornell boxes
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::SceneDesc;
//!
//! let scene = SceneDesc::load(Path::new("scenes/plane.json"))?;
//! println!("Loaded {} models, {} lights", scene.models.len(), scene.lights.len());
//! ```

pub mod camera;
pub mod cornell;
pub mod desc;
pub mod light;
pub mod material;
pub mod mesh;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use camera::Camera;
pub use cornell::{builtin, cornell_box, cornell_box_with_sphere, BUILTIN_SCENES};
pub use desc::{MaterialDesc, MeshDesc, ModelDesc, SceneDesc, SceneError, SceneResult};
pub use light::Light;
pub use material::{Material, ALBEDO_GAMMA, SHININESS_SCALE};
pub use mesh::{CubeFace, Mesh, MeshError, MeshTriangle};
pub use scene::{Model, Scene};
pub use texture::{Texture, TextureCache, TextureError};
