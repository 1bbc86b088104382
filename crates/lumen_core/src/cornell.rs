//! Built-in Cornell box scenes.
//!
//! Uses the classic 555-unit room, open toward the camera at z = 0. Walls
//! face inward since triangles are single-sided.

use lumen_math::{Vec3, Vec4};

use crate::camera::Camera;
use crate::light::Light;
use crate::material::Material;
use crate::mesh::{CubeFace, Mesh};
use crate::scene::{Model, Scene};

const ROOM_SIZE: f32 = 555.0;

/// Names accepted by [`builtin`].
pub const BUILTIN_SCENES: [&str; 2] = ["cornell", "cornell-sphere"];

/// Look up a built-in scene by name.
pub fn builtin(name: &str) -> Option<Scene> {
    match name {
        "cornell" => Some(cornell_box()),
        "cornell-sphere" => Some(cornell_box_with_sphere()),
        _ => None,
    }
}

/// Cornell box with a mirror-like tall box and a diffuse short box.
pub fn cornell_box() -> Scene {
    let mut scene = empty_room("cornell");

    scene.add_model(Model::new(
        "tall_box",
        Mesh::cuboid(Vec3::new(265.0, 0.0, 295.0), Vec3::new(430.0, 330.0, 460.0)),
        Material::new("mirror", Vec4::new(0.8, 0.8, 0.8, 1.0), Vec3::splat(0.5), 128.0),
    ));
    scene.add_model(Model::new(
        "short_box",
        Mesh::cuboid(Vec3::new(130.0, 0.0, 65.0), Vec3::new(295.0, 165.0, 230.0)),
        Material::diffuse("white", Vec3::splat(0.8)),
    ));

    scene
}

/// Cornell box with the short box replaced by a translucent glossy sphere.
pub fn cornell_box_with_sphere() -> Scene {
    let mut scene = empty_room("cornell-sphere");

    scene.add_model(Model::new(
        "tall_box",
        Mesh::cuboid(Vec3::new(265.0, 0.0, 295.0), Vec3::new(430.0, 330.0, 460.0)),
        Material::new("mirror", Vec4::new(0.8, 0.8, 0.8, 1.0), Vec3::splat(0.5), 128.0),
    ));
    scene.add_model(Model::new(
        "sphere",
        Mesh::uv_sphere(Vec3::new(185.0, 90.0, 170.0), 90.0, 24),
        Material::new("glass", Vec4::new(0.9, 0.9, 1.0, 0.5), Vec3::splat(0.2), 64.0),
    ));

    scene
}

fn empty_room(name: &str) -> Scene {
    let min = Vec3::ZERO;
    let max = Vec3::splat(ROOM_SIZE);
    let wall = |face| Mesh::cuboid_face(min, max, face).flipped();

    let white = Vec3::splat(0.8);
    let mut scene = Scene::new(name)
        .with_camera(Camera::look_at(
            Vec3::new(278.0, 278.0, -760.0),
            Vec3::new(278.0, 278.0, 0.0),
            Vec3::Y,
            40.0,
        ))
        .with_ambient(Vec3::splat(0.05));

    scene.add_model(Model::new("floor", wall(CubeFace::NegY), Material::diffuse("white", white)));
    scene.add_model(Model::new("ceiling", wall(CubeFace::PosY), Material::diffuse("white", white)));
    scene.add_model(Model::new("back", wall(CubeFace::PosZ), Material::diffuse("white", white)));
    // +X is screen-left when looking down +Z
    scene.add_model(Model::new(
        "left",
        wall(CubeFace::PosX),
        Material::diffuse("red", Vec3::new(0.75, 0.1, 0.1)),
    ));
    scene.add_model(Model::new(
        "right",
        wall(CubeFace::NegX),
        Material::diffuse("green", Vec3::new(0.15, 0.6, 0.15)),
    ));

    scene.add_light(Light::point(Vec3::new(278.0, 520.0, 278.0), Vec3::splat(1.5e5)));

    scene
}
