//! Shading math shared by both integrators.

use lumen_math::Vec3;

/// Linear RGB colour.
pub type Color = Vec3;

/// Mirror `d` about `n`: `d - 2n(n·d)`.
#[inline]
pub fn reflect(d: Vec3, n: Vec3) -> Vec3 {
    d - 2.0 * n.dot(d) * n
}

/// Blinn-Phong response to one light.
///
/// `to_light` and `to_eye` are unit vectors pointing away from the surface.
/// `radiance` is the light intensity already scaled by attenuation.
pub fn blinn_phong(
    normal: Vec3,
    to_light: Vec3,
    to_eye: Vec3,
    diffuse: Color,
    specular: Color,
    shininess: f32,
    radiance: Color,
) -> Color {
    let n_dot_l = normal.dot(to_light).max(0.0);
    let half = (to_light + to_eye).normalize_or_zero();
    let n_dot_h = normal.dot(half).max(0.0);

    (diffuse * n_dot_l + specular * n_dot_h.powf(shininess)) * radiance
}
