use crate::Vec3;

/// A ray in 3D space with an origin and a direction.
///
/// The direction is not required to be normalized. Code that measures
/// distances along the ray (triangle intersection, shadow tests) normalizes
/// it internally via [`Ray::unit_direction`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Create a ray whose origin is pushed `epsilon` along `normal`.
    ///
    /// Used for shadow and continuation rays so they don't re-hit the
    /// surface they start on.
    #[inline]
    pub fn offset(origin: Vec3, normal: Vec3, epsilon: f32, direction: Vec3) -> Self {
        Self::new(origin + normal * epsilon, direction)
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the normalized direction (zero for a degenerate ray).
    #[inline]
    pub fn unit_direction(&self) -> Vec3 {
        self.direction.normalize_or_zero()
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
        }
    }
}
