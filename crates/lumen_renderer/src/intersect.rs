//! Ray-triangle intersection.
//!
//! Uses the Möller-Trumbore algorithm with single-sided culling: only the
//! face whose counter-clockwise winding faces the ray can be hit.

use lumen_math::{Ray, Vec3};

/// Rays whose determinant falls below this are rejected (back faces,
/// grazing rays and degenerate triangles).
pub const DETERMINANT_EPSILON: f32 = 1e-4;

/// Result of a successful ray-triangle test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Signed distance along the normalized ray direction
    pub t: f32,
    /// Barycentric weight of the second vertex
    pub u: f32,
    /// Barycentric weight of the third vertex
    pub v: f32,
}

impl Intersection {
    /// Barycentric weights `(1-u-v, u, v)` of `(p1, p2, p3)`.
    pub fn barycentric(&self) -> Vec3 {
        Vec3::new(1.0 - self.u - self.v, self.u, self.v)
    }
}

/// Möller-Trumbore ray-triangle intersection.
///
/// The ray direction is normalized internally, so `t` is a distance.
/// Hits exactly on an edge (`u = 0`, `v = 0` or `u + v = 1`) are misses.
/// `t` is not range checked; callers pick the interval they accept.
pub fn intersect_triangle(ray: &Ray, p1: Vec3, p2: Vec3, p3: Vec3) -> Option<Intersection> {
    let edge1 = p2 - p1;
    let edge2 = p3 - p1;
    let dir = ray.unit_direction();
    let s = ray.origin() - p1;

    let h = dir.cross(edge2);
    let det = edge1.dot(h);
    if det < DETERMINANT_EPSILON {
        return None;
    }

    let u = s.dot(h) / det;
    if u <= 0.0 || u >= 1.0 {
        return None;
    }

    let q = s.cross(edge1);
    let v = dir.dot(q) / det;
    if v <= 0.0 || v >= 1.0 || u + v >= 1.0 {
        return None;
    }

    // Project the hit offset from the origin onto the ray
    let t = dir.dot(u * edge1 + v * edge2 - s);

    Some(Intersection { t, u, v })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Unit right triangle in the XY plane, front face toward +Z
    const P1: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    const P2: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    const P3: Vec3 = Vec3::new(0.0, 1.0, 0.0);

    fn down_z(x: f32, y: f32) -> Ray {
        Ray::new(Vec3::new(x, y, 1.0), Vec3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn test_interior_hit() {
        let hit = intersect_triangle(&down_z(0.25, 0.25), P1, P2, P3).unwrap();
        assert!((hit.t - 1.0).abs() < 1e-6);
        assert!((hit.u - 0.25).abs() < 1e-6);
        assert!((hit.v - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_barycentrics_reconstruct_hit_point() {
        let p1 = Vec3::new(-1.0, -0.5, -3.0);
        let p2 = Vec3::new(2.0, -1.0, -4.0);
        let p3 = Vec3::new(0.5, 2.0, -3.5);
        let origin = Vec3::new(0.1, 0.2, 1.0);

        for target in [
            Vec3::new(0.3, 0.1, -3.6),
            Vec3::new(0.0, 0.0, -3.3),
            p1 * 0.2 + p2 * 0.3 + p3 * 0.5,
        ] {
            let ray = Ray::new(origin, target - origin);
            let hit = intersect_triangle(&ray, p1, p2, p3).expect("ray should hit");

            assert!(hit.u > 0.0 && hit.u < 1.0);
            assert!(hit.v > 0.0 && hit.v < 1.0);
            assert!(hit.u + hit.v < 1.0);

            let w = hit.barycentric();
            let on_triangle = p1 * w.x + p2 * w.y + p3 * w.z;
            let on_ray = origin + ray.unit_direction() * hit.t;
            assert!((on_triangle - on_ray).length() < 1e-4);
        }
    }

    #[test]
    fn test_unnormalized_direction_gives_distance() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, 2.0), Vec3::new(0.0, 0.0, -10.0));
        let hit = intersect_triangle(&ray, P1, P2, P3).unwrap();
        assert!((hit.t - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_back_face_is_culled() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, -1.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(intersect_triangle(&ray, P1, P2, P3).is_none());

        // Same ray hits once the winding is reversed
        assert!(intersect_triangle(&ray, P1, P3, P2).is_some());
    }

    #[test]
    fn test_parallel_ray_misses() {
        let ray = Ray::new(Vec3::new(-1.0, 0.25, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(intersect_triangle(&ray, P1, P2, P3).is_none());
    }

    #[test]
    fn test_degenerate_triangle_misses() {
        let ray = down_z(0.25, 0.0);
        assert!(intersect_triangle(&ray, P1, P2, Vec3::new(2.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_edges_are_misses() {
        // v = 0 edge (p1-p2)
        assert!(intersect_triangle(&down_z(0.5, 0.0), P1, P2, P3).is_none());
        // u = 0 edge (p1-p3)
        assert!(intersect_triangle(&down_z(0.0, 0.5), P1, P2, P3).is_none());
        // u + v = 1 edge (p2-p3)
        assert!(intersect_triangle(&down_z(0.5, 0.5), P1, P2, P3).is_none());
        // vertex
        assert!(intersect_triangle(&down_z(0.0, 0.0), P1, P2, P3).is_none());
    }

    #[test]
    fn test_outside_misses() {
        assert!(intersect_triangle(&down_z(0.8, 0.8), P1, P2, P3).is_none());
        assert!(intersect_triangle(&down_z(-0.1, 0.5), P1, P2, P3).is_none());
    }

    #[test]
    fn test_triangle_behind_origin_reports_negative_t() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, -1.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = intersect_triangle(&ray, P1, P2, P3).unwrap();
        assert!((hit.t + 1.0).abs() < 1e-6);
    }
}
