//! Scene representation consumed by the renderer.
//!
//! The renderer only ever borrows a [`Scene`]; nothing here is mutated
//! while rays are traced.

use std::sync::Arc;

use lumen_math::Vec3;

use crate::camera::Camera;
use crate::light::Light;
use crate::material::Material;
use crate::mesh::Mesh;

/// A mesh paired with the material it is shaded with.
#[derive(Clone, Debug)]
pub struct Model {
    /// Model name (for logging)
    pub name: String,

    /// Shared mesh geometry
    pub mesh: Arc<Mesh>,

    /// Shared material
    pub material: Arc<Material>,
}

impl Model {
    /// Create a new model.
    pub fn new(name: impl Into<String>, mesh: Mesh, material: Material) -> Self {
        Self {
            name: name.into(),
            mesh: Arc::new(mesh),
            material: Arc::new(material),
        }
    }
}

/// A complete scene: geometry, lights, ambient term and camera.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// Scene name (usually from filename)
    pub name: String,

    /// Shaded geometry
    pub models: Vec<Model>,

    /// Lights, in declaration order
    pub lights: Vec<Light>,

    /// Ambient intensity applied uniformly
    pub ambient_intensity: Vec3,

    /// Default viewpoint
    pub camera: Camera,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the camera.
    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    /// Set the ambient intensity.
    pub fn with_ambient(mut self, ambient: Vec3) -> Self {
        self.ambient_intensity = ambient;
        self
    }

    /// Add a model to the scene.
    pub fn add_model(&mut self, model: Model) {
        self.models.push(model);
    }

    /// Add a light to the scene.
    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Get total triangle count across all models.
    pub fn total_triangle_count(&self) -> usize {
        self.models.iter().map(|m| m.mesh.triangle_count()).sum()
    }
}
