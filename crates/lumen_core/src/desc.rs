//! JSON scene files.
//!
//! ```json
//! {
//!   "camera": { "eye": [0, 1, 4], "target": [0, 1, 0], "up": [0, 1, 0], "fovy": 45 },
//!   "ambient": [0.05, 0.05, 0.05],
//!   "lights": [{ "type": "point", "position": [0, 3, 0], "intensity": [8, 8, 8] }],
//!   "models": [
//!     { "name": "floor",
//!       "mesh": { "type": "quad", "corners": [[-2,0,2],[2,0,2],[2,0,-2],[-2,0,-2]] },
//!       "material": { "albedo": [0.8, 0.8, 0.8, 1.0] } },
//!     { "mesh": { "type": "obj", "path": "bunny.obj" },
//!       "material": { "albedo_texture": "bunny.png", "specular": [0.2, 0.2, 0.2], "shininess": 32 } }
//!   ]
//! }
//! ```
//!
//! Relative mesh and texture paths are resolved against the scene file's
//! directory.

use std::path::{Path, PathBuf};

use lumen_math::{Vec3, Vec4};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::Camera;
use crate::light::Light;
use crate::material::Material;
use crate::mesh::{Mesh, MeshError};
use crate::scene::{Model, Scene};
use crate::texture::{TextureCache, TextureError};

/// Errors that can occur while loading a scene file.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to read scene file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Texture(#[from] TextureError),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Top-level scene file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDesc {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub camera: Camera,

    #[serde(default)]
    pub ambient: Vec3,

    #[serde(default)]
    pub lights: Vec<Light>,

    #[serde(default)]
    pub models: Vec<ModelDesc>,
}

/// A mesh plus material entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDesc {
    #[serde(default)]
    pub name: Option<String>,

    pub mesh: MeshDesc,

    #[serde(default)]
    pub material: MaterialDesc,
}

/// Geometry sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MeshDesc {
    Obj {
        path: PathBuf,
    },
    Quad {
        corners: [Vec3; 4],
    },
    Cuboid {
        min: Vec3,
        max: Vec3,
        /// Flip the faces so the box is seen from inside
        #[serde(default)]
        inward: bool,
    },
    Sphere {
        center: Vec3,
        radius: f32,
        #[serde(default = "default_segments")]
        segments: u32,
    },
}

fn default_segments() -> u32 {
    24
}

/// Blinn-Phong material parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDesc {
    /// Display-encoded albedo and opacity
    pub albedo: Vec4,
    /// Optional albedo map replacing `albedo`
    pub albedo_texture: Option<PathBuf>,
    pub specular: Vec3,
    pub shininess: f32,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            albedo: Vec4::new(0.8, 0.8, 0.8, 1.0),
            albedo_texture: None,
            specular: Vec3::ZERO,
            shininess: 32.0,
        }
    }
}

impl SceneDesc {
    /// Parse a scene description from JSON text.
    pub fn from_json(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and build a scene file.
    pub fn load(path: &Path) -> SceneResult<Scene> {
        let json = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut desc = Self::from_json(&json)?;
        if desc.name.is_none() {
            desc.name = path.file_stem().map(|s| s.to_string_lossy().into_owned());
        }

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        desc.build(base_dir)
    }

    /// Build a [`Scene`], resolving relative paths against `base_dir`.
    pub fn build(&self, base_dir: &Path) -> SceneResult<Scene> {
        let mut textures = TextureCache::new();
        let mut scene = Scene::new(self.name.clone().unwrap_or_else(|| "scene".to_string()))
            .with_camera(self.camera)
            .with_ambient(self.ambient);

        for (i, model) in self.models.iter().enumerate() {
            let name = model.name.clone().unwrap_or_else(|| format!("model_{i}"));
            let mesh = model.mesh.build(base_dir)?;
            let material = model.material.build(&name, base_dir, &mut textures)?;
            scene.add_model(Model::new(name, mesh, material));
        }
        scene.lights = self.lights.clone();

        log::info!(
            "Built scene '{}': {} models, {} triangles, {} lights, {} textures",
            scene.name,
            scene.models.len(),
            scene.total_triangle_count(),
            scene.lights.len(),
            textures.len()
        );

        Ok(scene)
    }
}

impl MeshDesc {
    fn build(&self, base_dir: &Path) -> SceneResult<Mesh> {
        let mesh = match self {
            MeshDesc::Obj { path } => Mesh::load_obj(&resolve(base_dir, path))?,
            MeshDesc::Quad { corners } => Mesh::quad(corners[0], corners[1], corners[2], corners[3]),
            MeshDesc::Cuboid { min, max, inward } => {
                let cube = Mesh::cuboid(*min, *max);
                if *inward {
                    cube.flipped()
                } else {
                    cube
                }
            }
            MeshDesc::Sphere {
                center,
                radius,
                segments,
            } => Mesh::uv_sphere(*center, *radius, *segments),
        };
        Ok(mesh)
    }
}

impl MaterialDesc {
    fn build(&self, name: &str, base_dir: &Path, textures: &mut TextureCache) -> SceneResult<Material> {
        let material = Material::new(name, self.albedo, self.specular, self.shininess);
        Ok(match &self.albedo_texture {
            Some(path) => material.with_albedo_texture(textures.load(&resolve(base_dir, path))?),
            None => material,
        })
    }
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::Vec2;

    const SCENE: &str = r#"{
        "name": "plane",
        "camera": { "eye": [0, 1, 4], "target": [0, 1, 0], "up": [0, 1, 0], "fovy": 45 },
        "ambient": [0.1, 0.1, 0.1],
        "lights": [
            { "type": "point", "position": [0, 3, 0], "intensity": [8, 8, 8] },
            { "type": "directional", "direction": [0, 1, 0], "intensity": [1, 1, 1] }
        ],
        "models": [
            { "name": "floor",
              "mesh": { "type": "quad", "corners": [[-2,0,2],[2,0,2],[2,0,-2],[-2,0,-2]] },
              "material": { "albedo": [0.5, 0.5, 0.5, 1.0], "specular": [0.1, 0.1, 0.1], "shininess": 16 } },
            { "mesh": { "type": "cuboid", "min": [-1,-1,-1], "max": [1,1,1], "inward": true } },
            { "mesh": { "type": "sphere", "center": [0,1,0], "radius": 0.5 } }
        ]
    }"#;

    #[test]
    fn test_parse_and_build() {
        let desc = SceneDesc::from_json(SCENE).unwrap();
        assert_eq!(desc.lights.len(), 2);
        assert_eq!(desc.models.len(), 3);

        let scene = desc.build(Path::new(".")).unwrap();
        assert_eq!(scene.name, "plane");
        assert_eq!(scene.camera.fovy, 45.0);
        assert_eq!(scene.ambient_intensity, Vec3::splat(0.1));
        assert_eq!(scene.models[0].name, "floor");
        assert_eq!(scene.models[1].name, "model_1");
        assert_eq!(scene.models[1].mesh.triangle_count(), 12);

        let spec = scene.models[0].material.sample_specular(Vec2::ZERO);
        assert!((spec.w * crate::SHININESS_SCALE - 16.0).abs() < 1e-4);
    }

    #[test]
    fn test_quad_faces_up() {
        let scene = SceneDesc::from_json(SCENE).unwrap().build(Path::new(".")).unwrap();
        for tri in scene.models[0].mesh.triangles() {
            assert!((tri.face_normal() - Vec3::Y).length() < 1e-6);
        }
    }

    #[test]
    fn test_defaults() {
        let desc = SceneDesc::from_json(r#"{ "models": [ { "mesh": { "type": "sphere", "center": [0,0,0], "radius": 1 } } ] }"#)
            .unwrap();
        assert!(desc.lights.is_empty());
        assert_eq!(desc.ambient, Vec3::ZERO);
        assert_eq!(desc.models[0].material.albedo, Vec4::new(0.8, 0.8, 0.8, 1.0));
        assert!(matches!(desc.models[0].mesh, MeshDesc::Sphere { segments: 24, .. }));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(SceneDesc::from_json("{ \"models\": 3 }"), Err(SceneError::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = SceneDesc::load(Path::new("no/such/scene.json"));
        assert!(matches!(result, Err(SceneError::Io { .. })));
    }

    #[test]
    fn test_missing_obj_reports_mesh_error() {
        let desc = SceneDesc::from_json(r#"{ "models": [ { "mesh": { "type": "obj", "path": "missing.obj" } } ] }"#).unwrap();
        assert!(matches!(desc.build(Path::new("/nonexistent")), Err(SceneError::Mesh(_))));
    }
}
