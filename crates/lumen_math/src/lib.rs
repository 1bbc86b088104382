// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod frame;
mod interval;
mod ray;

pub use frame::Frame;
pub use interval::Interval;
pub use ray::Ray;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec4_truncate_keeps_rgb() {
        let rgba = Vec4::new(0.1, 0.2, 0.3, 0.4);
        assert_eq!(rgba.truncate(), Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(rgba.w, 0.4);
    }
}
