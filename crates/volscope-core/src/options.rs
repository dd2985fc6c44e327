//! Configuration options for volscope.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Global configuration options for volscope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Edge length of the dense volume produced from a grid.
    pub voxel_resolution: u32,

    /// Splat radius in voxels (0 = no bleed).
    pub bleed_radius: f32,

    /// Texel type used when uploading density volumes.
    pub texel_type: TexelType,

    /// Whether to build a mip chain for density textures.
    pub generate_mipmaps: bool,

    /// Scene ambient light.
    pub ambient_light: Vec3,

    /// Background color.
    pub background_color: Vec3,

    /// Ambient light suggested when a volume switches to emissive shading.
    pub emission_ambient_light: Vec3,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            voxel_resolution: 128,
            bleed_radius: 0.0,
            texel_type: TexelType::U8,
            generate_mipmaps: false,
            ambient_light: Vec3::splat(0.1),
            background_color: Vec3::ZERO,
            emission_ambient_light: Vec3::ZERO,
        }
    }
}

impl Options {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the voxel resolution.
    pub fn with_voxel_resolution(mut self, resolution: u32) -> Self {
        self.voxel_resolution = resolution;
        self
    }

    /// Sets the bleed radius.
    pub fn with_bleed_radius(mut self, radius: f32) -> Self {
        self.bleed_radius = radius;
        self
    }

    /// Sets the texel type.
    pub fn with_texel_type(mut self, texel_type: TexelType) -> Self {
        self.texel_type = texel_type;
        self
    }

    /// Enables or disables mipmap generation.
    pub fn with_mipmaps(mut self, generate: bool) -> Self {
        self.generate_mipmaps = generate;
        self
    }

    /// Sets the ambient light.
    pub fn with_ambient_light(mut self, ambient: Vec3) -> Self {
        self.ambient_light = ambient;
        self
    }

    /// Parses options from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let options = Self::from_json_str(&text)?;
        log::info!("loaded options from {}", path.as_ref().display());
        Ok(options)
    }

    /// Saves options to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

/// Scalar type of uploaded density texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TexelType {
    /// 8-bit normalized (the dense volume is stored as-is).
    #[default]
    U8,
    /// 16-bit float, value / 255.
    F16,
    /// 32-bit float, value / 255.
    F32,
}

impl TexelType {
    /// Bytes per texel.
    #[must_use]
    pub fn size_bytes(self) -> u32 {
        match self {
            TexelType::U8 => 1,
            TexelType::F16 => 2,
            TexelType::F32 => 4,
        }
    }
}
