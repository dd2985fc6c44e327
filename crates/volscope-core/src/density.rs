//! Density providers for the ray-marched volume material.
//!
//! A [`DensityField`] selects where the ray marcher reads density from and
//! yields the matching [`DensityParameters`]. Switching the source never
//! touches the voxelized textures; only loading a new asset replaces them.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Opaque handle to a texture created through the texture upload seam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u32);

/// Where the ray marcher obtains density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DensitySource {
    /// A single scalar everywhere inside the volume.
    #[default]
    Constant,
    /// Procedural noise evaluated in the shader.
    Noise,
    /// A voxelized grid uploaded as a 3D texture.
    GridTexture,
}

impl DensitySource {
    /// All sources in shader index order.
    pub const ALL: [DensitySource; 3] = [
        DensitySource::Constant,
        DensitySource::Noise,
        DensitySource::GridTexture,
    ];

    /// Value uploaded as `u_density_source`.
    #[must_use]
    pub fn shader_index(self) -> i32 {
        match self {
            DensitySource::Constant => 0,
            DensitySource::Noise => 1,
            DensitySource::GridTexture => 2,
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            DensitySource::Constant => "Constant",
            DensitySource::Noise => "Noise",
            DensitySource::GridTexture => "Grid",
        }
    }
}

/// Parameters of the procedural noise source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseParams {
    /// Spatial frequency multiplier.
    pub scale: f32,
    /// Number of octaves.
    pub detail: u32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            scale: 2.0,
            detail: 4,
        }
    }
}

/// Everything the shader needs to evaluate density for the active source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DensityParameters {
    /// Uniform density.
    Constant {
        /// Density multiplier.
        density_scale: f32,
    },
    /// Procedural noise density.
    Noise {
        /// Density multiplier.
        density_scale: f32,
        /// Noise parameters.
        noise: NoiseParams,
    },
    /// Density sampled from a voxelized grid texture.
    GridTexture {
        /// Density multiplier.
        density_scale: f32,
        /// The bound density texture.
        texture: TextureHandle,
        /// Mesh-local AABB minimum, mapped to UV 0.
        box_min: Vec3,
        /// Mesh-local AABB maximum, mapped to UV 1.
        box_max: Vec3,
    },
}

impl DensityParameters {
    /// The source these parameters describe.
    #[must_use]
    pub fn source(&self) -> DensitySource {
        match self {
            DensityParameters::Constant { .. } => DensitySource::Constant,
            DensityParameters::Noise { .. } => DensitySource::Noise,
            DensityParameters::GridTexture { .. } => DensitySource::GridTexture,
        }
    }
}

/// Density source selection plus the per-source state.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityField {
    source: DensitySource,
    density_scale: f32,
    noise: NoiseParams,
    textures: Vec<TextureHandle>,
    active_texture: usize,
    box_min: Vec3,
    box_max: Vec3,
}

impl Default for DensityField {
    fn default() -> Self {
        Self {
            source: DensitySource::Constant,
            density_scale: 1.0,
            noise: NoiseParams::default(),
            textures: Vec::new(),
            active_texture: 0,
            box_min: Vec3::splat(-1.0),
            box_max: Vec3::splat(1.0),
        }
    }
}

impl DensityField {
    /// Creates a constant-density field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the selected source.
    #[must_use]
    pub fn source(&self) -> DensitySource {
        self.source
    }

    /// Selects a source. Existing textures are kept.
    pub fn set_source(&mut self, source: DensitySource) -> &mut Self {
        self.source = source;
        self
    }

    /// Returns the source actually used: a grid source without a texture
    /// falls back to constant density.
    #[must_use]
    pub fn effective_source(&self) -> DensitySource {
        match self.source {
            DensitySource::GridTexture if self.active_texture().is_none() => {
                DensitySource::Constant
            }
            source => source,
        }
    }

    /// Returns the density multiplier.
    #[must_use]
    pub fn density_scale(&self) -> f32 {
        self.density_scale
    }

    /// Sets the density multiplier.
    pub fn set_density_scale(&mut self, scale: f32) -> &mut Self {
        self.density_scale = scale;
        self
    }

    /// Returns the noise parameters.
    #[must_use]
    pub fn noise(&self) -> NoiseParams {
        self.noise
    }

    /// Sets the noise parameters.
    pub fn set_noise(&mut self, noise: NoiseParams) -> &mut Self {
        self.noise = noise;
        self
    }

    /// Replaces the grid textures, one per grid of the loaded asset.
    ///
    /// The last texture becomes active.
    pub fn set_textures(&mut self, textures: Vec<TextureHandle>) -> &mut Self {
        self.active_texture = textures.len().saturating_sub(1);
        self.textures = textures;
        self
    }

    /// Removes all grid textures.
    pub fn clear_textures(&mut self) -> &mut Self {
        self.textures.clear();
        self.active_texture = 0;
        self
    }

    /// Returns all grid textures.
    #[must_use]
    pub fn textures(&self) -> &[TextureHandle] {
        &self.textures
    }

    /// Returns the texture sampled by the grid source, if any.
    #[must_use]
    pub fn active_texture(&self) -> Option<TextureHandle> {
        self.textures.get(self.active_texture).copied()
    }

    /// Returns the index of the active texture.
    #[must_use]
    pub fn active_texture_index(&self) -> usize {
        self.active_texture
    }

    /// Selects which grid texture is sampled. Returns false if out of range.
    pub fn select_texture(&mut self, index: usize) -> bool {
        if index < self.textures.len() {
            self.active_texture = index;
            true
        } else {
            false
        }
    }

    /// Sets the mesh-local AABB used for texture lookup.
    pub fn set_bounds(&mut self, box_min: Vec3, box_max: Vec3) -> &mut Self {
        self.box_min = box_min;
        self.box_max = box_max;
        self
    }

    /// Returns the mesh-local AABB.
    #[must_use]
    pub fn bounds(&self) -> (Vec3, Vec3) {
        (self.box_min, self.box_max)
    }

    /// Maps a mesh-local position into texture UVW space.
    ///
    /// Degenerate axes map to 0.
    #[must_use]
    pub fn texture_uv(&self, position: Vec3) -> Vec3 {
        let extent = self.box_max - self.box_min;
        let rel = position - self.box_min;
        Vec3::new(
            if extent.x == 0.0 { 0.0 } else { rel.x / extent.x },
            if extent.y == 0.0 { 0.0 } else { rel.y / extent.y },
            if extent.z == 0.0 { 0.0 } else { rel.z / extent.z },
        )
    }

    /// Returns the shader parameters for the effective source.
    #[must_use]
    pub fn parameters(&self) -> DensityParameters {
        let density_scale = self.density_scale;
        match (self.effective_source(), self.active_texture()) {
            (DensitySource::Noise, _) => DensityParameters::Noise {
                density_scale,
                noise: self.noise,
            },
            (DensitySource::GridTexture, Some(texture)) => DensityParameters::GridTexture {
                density_scale,
                texture,
                box_min: self.box_min,
                box_max: self.box_max,
            },
            _ => DensityParameters::Constant { density_scale },
        }
    }
}
