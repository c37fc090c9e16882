//! Phong reflection model (ambient + diffuse + specular)

use crate::math::{Color3, Vec3};
use serde::{Deserialize, Serialize};

/// Immutable lighting configuration for a scene.
///
/// Passed explicitly to the rasterizer instead of living in globals, so
/// lighting can be evaluated in isolation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SceneLighting {
    pub light: Vec3,
    pub eye: Vec3,

    pub fill_color: Color3,
    pub outline_color: Color3,
    pub normal_color: Color3,

    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: f32,
}

impl Default for SceneLighting {
    fn default() -> Self {
        Self {
            light: Vec3::new(200.0, 200.0, 350.0),
            eye: Vec3::new(0.0, 0.0, 600.0),
            fill_color: Color3::WHITE,
            outline_color: Color3::new(1.0, 0.2, 0.5),
            normal_color: Color3::new(0.0, 1.0, 0.0),
            ambient: 0.35,
            diffuse: 0.45,
            specular: 0.3,
            shininess: 30.0,
        }
    }
}

impl SceneLighting {
    /// Evaluate the reflection model at a unit surface normal.
    ///
    /// The diffuse dot is not clamped at zero: surfaces facing away from
    /// the light subtract color. Channels are left unclamped here; the
    /// single clamp happens at pixel write.
    pub fn phong(&self, normal: Vec3) -> Color3 {
        let mut color = Color3::BLACK;

        color = color + self.fill_color * self.ambient;

        let light_dir = self.light.normalize();
        let diffuse_component = normal.dot(light_dir);
        color = color + self.fill_color * (diffuse_component * self.diffuse);

        let reflection = normal * 2.0 * self.light.dot(normal) - self.light;
        let specular_component = reflection.normalize().dot(self.eye.normalize());
        color = color + self.fill_color * (self.specular * specular_component.powf(self.shininess));

        color
    }
}
