//! Brute-force [`SceneQuery`] over the triangles of a [`Scene`].

use lumen_core::{Light, MeshTriangle, Scene};
use lumen_math::{Interval, Ray};

use crate::intersect::intersect_triangle;
use crate::query::{RayHit, SceneQuery};
use crate::shading::Color;

#[derive(Debug, Clone, Copy)]
struct SceneTriangle {
    triangle: MeshTriangle,
    model: usize,
}

/// Linear-scan intersector over every triangle of a borrowed scene.
pub struct TriangleScene<'a> {
    scene: &'a Scene,
    triangles: Vec<SceneTriangle>,
    ray_t: Interval,
}

impl<'a> TriangleScene<'a> {
    /// Flatten the scene's meshes into a triangle list.
    pub fn new(scene: &'a Scene) -> Self {
        let triangles: Vec<SceneTriangle> = scene
            .models
            .iter()
            .enumerate()
            .flat_map(|(model, m)| {
                m.mesh
                    .triangles()
                    .map(move |triangle| SceneTriangle { triangle, model })
            })
            .collect();

        log::info!(
            "Scene '{}': {} models, {} triangles, {} lights",
            scene.name,
            scene.models.len(),
            triangles.len(),
            scene.lights.len()
        );

        Self {
            scene,
            triangles,
            ray_t: Interval::default(),
        }
    }

    /// Override the accepted hit distance range.
    pub fn with_interval(mut self, ray_t: Interval) -> Self {
        self.ray_t = ray_t;
        self
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn scene(&self) -> &Scene {
        self.scene
    }
}

impl SceneQuery for TriangleScene<'_> {
    fn intersect_ray(&self, ray: &Ray) -> Option<RayHit> {
        let mut ray_t = self.ray_t;
        let mut closest = None;

        for tri in &self.triangles {
            let [p1, p2, p3] = tri.triangle.positions;
            if let Some(hit) = intersect_triangle(ray, p1, p2, p3) {
                if ray_t.surrounds(hit.t) {
                    ray_t = ray_t.with_max(hit.t);
                    closest = Some((hit, tri));
                }
            }
        }

        let (hit, tri) = closest?;
        let [p1, p2, p3] = tri.triangle.positions;
        let w = hit.barycentric();
        let material = &self.scene.models[tri.model].material;
        let uv = tri.triangle.uv_at(hit.u, hit.v);

        Some(RayHit {
            position: p1 * w.x + p2 * w.y + p3 * w.z,
            normal: tri.triangle.normal_at(hit.u, hit.v),
            albedo: material.sample_albedo(uv),
            specular: material.sample_specular(uv),
        })
    }

    fn lights(&self) -> &[Light] {
        &self.scene.lights
    }

    fn ambient_intensity(&self) -> Color {
        self.scene.ambient_intensity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{Material, Mesh, Model};
    use lumen_math::{Vec3, Vec4};

    fn floor_quad(y: f32) -> Mesh {
        // Counter-clockwise seen from above, so the front face points up
        Mesh::quad(
            Vec3::new(-1.0, y, 1.0),
            Vec3::new(1.0, y, 1.0),
            Vec3::new(1.0, y, -1.0),
            Vec3::new(-1.0, y, -1.0),
        )
    }

    fn two_floors() -> Scene {
        let mut scene = Scene::new("floors").with_ambient(Vec3::splat(0.25));
        scene.add_model(Model::new(
            "low",
            floor_quad(0.0),
            Material::diffuse("red", Vec3::new(1.0, 0.0, 0.0)),
        ));
        scene.add_model(Model::new(
            "high",
            floor_quad(1.0),
            Material::new("blue", Vec4::new(0.0, 0.0, 1.0, 0.5), Vec3::splat(0.3), 64.0),
        ));
        scene.add_light(Light::point(Vec3::new(0.0, 5.0, 0.0), Vec3::ONE));
        scene
    }

    #[test]
    fn test_nearest_hit_wins() {
        let scene = two_floors();
        let query = TriangleScene::new(&scene);
        assert_eq!(query.triangle_count(), 4);

        let ray = Ray::new(Vec3::new(0.1, 3.0, 0.2), Vec3::NEG_Y);
        let hit = query.intersect_ray(&ray).unwrap();
        assert!((hit.position - Vec3::new(0.1, 1.0, 0.2)).length() < 1e-5);
        assert!((hit.normal - Vec3::Y).length() < 1e-5);
        assert_eq!(hit.alpha(), 0.5);
        assert!((hit.shininess() - 64.0).abs() < 1e-4);
        assert!((hit.specular_color() - Vec3::splat(0.3)).length() < 1e-6);
    }

    #[test]
    fn test_hit_below_first_floor() {
        let scene = two_floors();
        let query = TriangleScene::new(&scene);

        let ray = Ray::new(Vec3::new(0.1, 0.5, 0.2), Vec3::NEG_Y);
        let hit = query.intersect_ray(&ray).unwrap();
        assert!(hit.position.y.abs() < 1e-5);
        assert_eq!(hit.albedo, Vec4::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_miss_and_back_faces() {
        let scene = two_floors();
        let query = TriangleScene::new(&scene);

        assert!(query.intersect_ray(&Ray::new(Vec3::new(0.0, 3.0, 0.0), Vec3::Y)).is_none());
        // Looking up from below only sees back faces
        assert!(query.intersect_ray(&Ray::new(Vec3::new(0.2, -1.0, 0.1), Vec3::Y)).is_none());
    }

    #[test]
    fn test_hits_at_origin_are_ignored() {
        let scene = two_floors();
        let query = TriangleScene::new(&scene);

        // A ray starting on the upper floor passes to the lower one
        let ray = Ray::new(Vec3::new(0.3, 1.0, 0.3), Vec3::NEG_Y);
        let hit = query.intersect_ray(&ray).unwrap();
        assert!(hit.position.y.abs() < 1e-5);
    }

    #[test]
    fn test_interval_limits_range() {
        let scene = two_floors();
        let query = TriangleScene::new(&scene).with_interval(Interval::new(1e-4, 1.5));

        let ray = Ray::new(Vec3::new(0.2, 3.0, 0.1), Vec3::NEG_Y);
        assert!(query.intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_scene_accessors() {
        let scene = two_floors();
        let query = TriangleScene::new(&scene);
        assert_eq!(query.lights().len(), 1);
        assert_eq!(query.ambient_intensity(), Vec3::splat(0.25));
    }
}
