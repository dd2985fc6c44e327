//! Shader program registry and the fixed uniform name contract.

use std::collections::HashMap;

/// Handle to a registered shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderHandle(pub u32);

/// Vertex stage shared by every built-in program.
pub const BASIC_VS: &str = "res/shaders/basic.vs";
/// Unlit single-color fragment stage.
pub const FLAT_FS: &str = "res/shaders/flat.fs";
/// Lit fragment stage used by the multi-pass standard material.
pub const BASIC_FS: &str = "res/shaders/basic.fs";
/// Fragment stage that visualizes normals.
pub const NORMAL_FS: &str = "res/shaders/normal.fs";
/// Ray-marching fragment stage.
pub const VOLUME_FS: &str = "res/shaders/volume.fs";

/// Uniform names shared with the shader programs.
pub mod uniforms {
    pub const VIEWPROJECTION: &str = "u_viewprojection";
    pub const CAMERA_POSITION: &str = "u_camera_position";
    pub const LOCAL_CAMERA_POSITION: &str = "u_localcamera_position";
    pub const MODEL: &str = "u_model";
    pub const COLOR: &str = "u_color";
    pub const TEXTURE: &str = "u_texture";
    pub const AMBIENT_LIGHT: &str = "u_ambient_light";
    pub const BACKGROUND: &str = "u_background";

    pub const LIGHT_INTENSITY: &str = "u_light_intensity";
    pub const LIGHT_SHININESS: &str = "u_light_shininess";
    pub const LIGHT_COLOR: &str = "u_light_color";
    pub const LIGHT_POSITION: &str = "u_light_position";
    pub const LIGHT_DIRECTION: &str = "u_light_direction";
    pub const LIGHT_TYPE: &str = "u_light_type";

    pub const BOX_MIN: &str = "u_box_min";
    pub const BOX_MAX: &str = "u_box_max";
    pub const ABSORPTION_COEFFICIENT: &str = "u_absorption_coefficient";
    pub const STEP_LENGTH: &str = "u_step_length";
    pub const NOISE_SCALE: &str = "u_noise_scale";
    pub const NOISE_DETAIL: &str = "u_noise_detail";
    pub const VOLUME_TYPE: &str = "u_volume_type";
    pub const SHADER_TYPE: &str = "u_shader_type";
    pub const EMISSION_COLOR: &str = "u_emission_color";
    pub const EMISSION_INTENSITY: &str = "u_emission_intensity";
    pub const DENSITY_SCALE: &str = "u_density_scale";
    pub const DENSITY_SOURCE: &str = "u_density_source";
    pub const DENSITY_TEXTURE: &str = "u_density_texture";
    pub const SCATTER_COEFFICIENT: &str = "u_scatter_coefficient";
    pub const G_VALUE: &str = "u_g_value";
    pub const NUM_STEPS: &str = "u_num_steps";
}

/// A vertex/fragment stage pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderProgram {
    /// Vertex stage source path.
    pub vertex: String,
    /// Fragment stage source path.
    pub fragment: String,
}

/// Registry handing out one handle per distinct stage pair.
#[derive(Debug, Clone, Default)]
pub struct ShaderLibrary {
    programs: Vec<ShaderProgram>,
    lookup: HashMap<ShaderProgram, ShaderHandle>,
}

impl ShaderLibrary {
    /// Creates an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a library with the built-in flat, lit, normal and volume programs.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut library = Self::new();
        for fragment in [FLAT_FS, BASIC_FS, NORMAL_FS, VOLUME_FS] {
            library.register(BASIC_VS, fragment);
        }
        library
    }

    /// Registers a program, returning the existing handle if already present.
    pub fn register(&mut self, vertex: &str, fragment: &str) -> ShaderHandle {
        let program = ShaderProgram {
            vertex: vertex.to_string(),
            fragment: fragment.to_string(),
        };
        if let Some(&handle) = self.lookup.get(&program) {
            return handle;
        }
        let handle = ShaderHandle(self.programs.len() as u32);
        self.programs.push(program.clone());
        self.lookup.insert(program, handle);
        handle
    }

    /// Looks up a program by its stage pair.
    #[must_use]
    pub fn get(&self, vertex: &str, fragment: &str) -> Option<ShaderHandle> {
        let found = self
            .lookup
            .get(&ShaderProgram {
                vertex: vertex.to_string(),
                fragment: fragment.to_string(),
            })
            .copied();
        if found.is_none() {
            log::warn!("shader '{vertex}' + '{fragment}' is not registered");
        }
        found
    }

    /// Returns the program behind a handle.
    #[must_use]
    pub fn program(&self, handle: ShaderHandle) -> Option<&ShaderProgram> {
        self.programs.get(handle.0 as usize)
    }

    /// Returns true if the handle was issued by this library.
    #[must_use]
    pub fn contains(&self, handle: ShaderHandle) -> bool {
        (handle.0 as usize) < self.programs.len()
    }

    /// Iterates over all programs with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (ShaderHandle, &ShaderProgram)> {
        self.programs
            .iter()
            .enumerate()
            .map(|(i, p)| (ShaderHandle(i as u32), p))
    }

    /// Returns the number of registered programs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    /// Returns true if no programs are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let mut library = ShaderLibrary::new();
        let a = library.register(BASIC_VS, FLAT_FS);
        let b = library.register(BASIC_VS, FLAT_FS);
        let c = library.register(BASIC_VS, VOLUME_FS);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(library.len(), 2);
        assert_eq!(library.program(c).unwrap().fragment, VOLUME_FS);
    }

    #[test]
    fn test_defaults() {
        let library = ShaderLibrary::with_defaults();
        assert_eq!(library.len(), 4);
        assert!(library.get(BASIC_VS, NORMAL_FS).is_some());
        assert!(library.get(BASIC_VS, "res/shaders/missing.fs").is_none());
        assert!(!library.contains(ShaderHandle(4)));
        assert_eq!(library.iter().count(), 4);
    }
}
