use crate::Vec3;

/// Orthonormal shading frame around a surface normal.
///
/// The tangent is derived from +Y, falling back to +X when the normal is
/// nearly parallel to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub tangent: Vec3,
    pub bitangent: Vec3,
    pub normal: Vec3,
}

/// Below this cross-product length the +Y up-vector is considered parallel.
const PARALLEL_THRESHOLD: f32 = 0.1;

impl Frame {
    /// Build a frame from a unit normal.
    pub fn from_normal(normal: Vec3) -> Self {
        let mut tangent = normal.cross(Vec3::Y);
        if tangent.length() < PARALLEL_THRESHOLD {
            tangent = normal.cross(Vec3::X);
        }
        let tangent = tangent.normalize();
        let bitangent = normal.cross(tangent);

        Self {
            tangent,
            bitangent,
            normal,
        }
    }

    /// Transform a direction from frame-local (x, y, z=normal) to world space.
    #[inline]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.tangent * local.x + self.bitangent * local.y + self.normal * local.z
    }
}
