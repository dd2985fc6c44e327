//! Scene lighting passed explicitly to materials at render time.

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// The kind of a light source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LightKind {
    /// Omnidirectional light from a point.
    #[default]
    Point,
    /// Parallel rays along `direction`.
    Directional,
}

impl LightKind {
    /// Value uploaded as `u_light_type`.
    #[must_use]
    pub fn shader_index(self) -> i32 {
        match self {
            LightKind::Point => 0,
            LightKind::Directional => 1,
        }
    }
}

/// A single light contributing one additive pass to lit materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Light {
    /// Light name, used by the editor.
    pub name: String,
    /// Light kind.
    pub kind: LightKind,
    /// World-space position (point lights).
    pub position: Vec3,
    /// World-space direction (directional lights).
    pub direction: Vec3,
    /// Light color (RGBA).
    pub color: Vec4,
    /// Scalar intensity.
    pub intensity: f32,
    /// Specular exponent.
    pub shininess: f32,
}

impl Light {
    /// Creates a white point light.
    pub fn point(name: impl Into<String>, position: Vec3, intensity: f32) -> Self {
        Self {
            name: name.into(),
            kind: LightKind::Point,
            position,
            direction: Vec3::NEG_Y,
            color: Vec4::ONE,
            intensity,
            shininess: 20.0,
        }
    }

    /// Creates a white directional light.
    pub fn directional(name: impl Into<String>, direction: Vec3, intensity: f32) -> Self {
        Self {
            name: name.into(),
            kind: LightKind::Directional,
            position: Vec3::ZERO,
            direction: direction.normalize_or_zero(),
            color: Vec4::ONE,
            intensity,
            shininess: 20.0,
        }
    }

    /// Sets the color.
    #[must_use]
    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    /// Sets the specular exponent.
    #[must_use]
    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }
}

/// Ordered light list plus the scene ambient term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingContext {
    lights: Vec<Light>,
    /// Ambient light applied once per lit draw.
    pub ambient_light: Vec3,
    /// Background color seen behind translucent volumes.
    pub background_color: Vec3,
}

impl Default for LightingContext {
    fn default() -> Self {
        Self {
            lights: Vec::new(),
            ambient_light: Vec3::splat(0.1),
            background_color: Vec3::ZERO,
        }
    }
}

impl LightingContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context with the given ambient light and no lights.
    pub fn with_ambient(ambient_light: Vec3) -> Self {
        Self {
            ambient_light,
            ..Self::default()
        }
    }

    /// Appends a light.
    pub fn add_light(&mut self, light: Light) -> &mut Self {
        self.lights.push(light);
        self
    }

    /// Removes the first light with the given name.
    pub fn remove_light(&mut self, name: &str) -> Option<Light> {
        let idx = self.lights.iter().position(|l| l.name == name)?;
        Some(self.lights.remove(idx))
    }

    /// Returns the lights in pass order.
    #[must_use]
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Returns a light for editing.
    pub fn light_mut(&mut self, name: &str) -> Option<&mut Light> {
        self.lights.iter_mut().find(|l| l.name == name)
    }

    /// Returns the number of lights.
    #[must_use]
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Applies a scene adjustment requested by a material.
    pub fn apply(&mut self, adjustment: SceneAdjustment) {
        match adjustment {
            SceneAdjustment::SetAmbientLight(ambient) => {
                log::debug!("ambient light adjusted to {ambient:?}");
                self.ambient_light = ambient;
            }
        }
    }
}

/// A change to scene-wide state suggested by a material edit.
///
/// Materials never mutate the scene themselves; the editor decides whether
/// to apply the suggestion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneAdjustment {
    /// Replace the scene ambient light.
    SetAmbientLight(Vec3),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_list_order() {
        let mut lighting = LightingContext::new();
        lighting
            .add_light(Light::point("key", Vec3::Y, 1.0))
            .add_light(Light::directional("sun", Vec3::new(0.0, -2.0, 0.0), 0.5));
        assert_eq!(lighting.light_count(), 2);
        assert_eq!(lighting.lights()[0].name, "key");
        assert_eq!(lighting.lights()[1].direction, Vec3::NEG_Y);

        let removed = lighting.remove_light("key").unwrap();
        assert_eq!(removed.kind, LightKind::Point);
        assert_eq!(lighting.lights()[0].name, "sun");
        assert!(lighting.remove_light("key").is_none());
    }

    #[test]
    fn test_apply_adjustment() {
        let mut lighting = LightingContext::with_ambient(Vec3::ONE);
        lighting.apply(SceneAdjustment::SetAmbientLight(Vec3::ZERO));
        assert_eq!(lighting.ambient_light, Vec3::ZERO);
    }
}
