//! Light sources.

use lumen_math::Vec3;
use serde::{Deserialize, Serialize};

/// A light in the scene.
///
/// Point lights fall off with the inverse square of distance. Directional
/// lights store the direction from the surface *toward* the light and do
/// not attenuate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Light {
    Point { position: Vec3, intensity: Vec3 },
    Directional { direction: Vec3, intensity: Vec3 },
}

impl Light {
    /// Create a point light.
    pub fn point(position: Vec3, intensity: Vec3) -> Self {
        Light::Point {
            position,
            intensity,
        }
    }

    /// Create a directional light shining from `direction`.
    pub fn directional(direction: Vec3, intensity: Vec3) -> Self {
        Light::Directional {
            direction,
            intensity,
        }
    }

    /// RGB intensity of the light.
    pub fn intensity(&self) -> Vec3 {
        match *self {
            Light::Point { intensity, .. } | Light::Directional { intensity, .. } => intensity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_intensity() {
        let point = Light::point(Vec3::Y, Vec3::splat(2.0));
        let sun = Light::directional(Vec3::Y, Vec3::new(1.0, 0.9, 0.8));

        assert_eq!(point.intensity(), Vec3::splat(2.0));
        assert_eq!(sun.intensity(), Vec3::new(1.0, 0.9, 0.8));
    }

    #[test]
    fn test_light_json_tagging() {
        let json = r#"[
            { "type": "point", "position": [0.0, 5.0, 0.0], "intensity": [10.0, 10.0, 10.0] },
            { "type": "directional", "direction": [0.0, 1.0, 0.0], "intensity": [1.0, 1.0, 1.0] }
        ]"#;

        let lights: Vec<Light> = serde_json::from_str(json).unwrap();
        assert_eq!(lights.len(), 2);
        assert!(matches!(lights[0], Light::Point { position, .. } if position == Vec3::new(0.0, 5.0, 0.0)));
        assert!(matches!(lights[1], Light::Directional { .. }));
    }
}
