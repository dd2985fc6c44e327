//! Headless render device that records what materials ask of the backend.
//!
//! Useful for integration tests, batch voxelization without a GPU, and
//! inspecting the pass structure of a frame.

use std::collections::{HashMap, HashSet};

use volscope_core::TextureHandle;

use crate::device::{RasterState, RenderDevice, UniformValue};
use crate::error::RenderResult;
use crate::mesh::Mesh;
use crate::shader::{ShaderHandle, ShaderLibrary};
use crate::texture::{Texture3dDescriptor, TextureUpload};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// A program was bound.
    EnableShader(ShaderHandle),
    /// The bound program was released.
    DisableShader,
    /// A uniform was set.
    SetUniform(String, UniformValue),
    /// The raster state changed.
    SetRasterState(RasterState),
    /// A mesh was drawn.
    Draw(usize),
}

/// Snapshot of the pipeline state at a draw call.
#[derive(Debug, Clone)]
pub struct DrawRecord {
    /// Name of the drawn mesh.
    pub mesh: String,
    /// Program bound during the draw.
    pub shader: Option<ShaderHandle>,
    /// Raster state during the draw.
    pub state: RasterState,
    /// Uniforms set on the program since it was bound.
    pub uniforms: HashMap<String, UniformValue>,
}

impl DrawRecord {
    /// Returns a uniform value captured at this draw.
    #[must_use]
    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniforms.get(name).copied()
    }
}

/// A texture created through the recorder.
#[derive(Debug, Clone)]
pub struct RecordedTexture {
    /// Descriptor used to create it.
    pub descriptor: Texture3dDescriptor,
    /// Uploaded texel bytes (base level first).
    pub data: Vec<u8>,
}

/// Render device that records calls instead of talking to a GPU.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    shaders: HashSet<ShaderHandle>,
    bound: Option<ShaderHandle>,
    state: RasterState,
    uniforms: HashMap<String, UniformValue>,
    commands: Vec<DrawCommand>,
    draws: Vec<DrawRecord>,
    textures: Vec<RecordedTexture>,
}

impl FrameRecorder {
    /// Creates a recorder that resolves the programs registered in `library`.
    #[must_use]
    pub fn new(library: &ShaderLibrary) -> Self {
        Self {
            shaders: library.iter().map(|(handle, _)| handle).collect(),
            ..Self::default()
        }
    }

    /// Returns every recorded command in order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Returns the draw snapshots in order.
    #[must_use]
    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    /// Returns the number of draw calls.
    #[must_use]
    pub fn draw_count(&self) -> usize {
        self.draws.len()
    }

    /// Returns the currently bound program.
    #[must_use]
    pub fn bound_shader(&self) -> Option<ShaderHandle> {
        self.bound
    }

    /// Returns the last value set for a uniform.
    #[must_use]
    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniforms.get(name).copied()
    }

    /// Returns the textures created so far.
    #[must_use]
    pub fn textures(&self) -> &[RecordedTexture] {
        &self.textures
    }

    /// Returns a created texture.
    #[must_use]
    pub fn texture(&self, handle: TextureHandle) -> Option<&RecordedTexture> {
        self.textures.get(handle.0 as usize)
    }

    /// Forgets recorded commands and draws, keeping state and textures.
    pub fn clear_frame(&mut self) {
        self.commands.clear();
        self.draws.clear();
    }
}

impl RenderDevice for FrameRecorder {
    fn enable_shader(&mut self, shader: ShaderHandle) -> bool {
        if !self.shaders.contains(&shader) {
            log::trace!("shader {shader:?} does not resolve, skipping draw");
            return false;
        }
        self.bound = Some(shader);
        self.uniforms.clear();
        self.commands.push(DrawCommand::EnableShader(shader));
        true
    }

    fn disable_shader(&mut self) {
        self.bound = None;
        self.commands.push(DrawCommand::DisableShader);
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.uniforms.insert(name.to_string(), value);
        self.commands
            .push(DrawCommand::SetUniform(name.to_string(), value));
    }

    fn raster_state(&self) -> RasterState {
        self.state
    }

    fn set_raster_state(&mut self, state: RasterState) {
        self.state = state;
        self.commands.push(DrawCommand::SetRasterState(state));
    }

    fn draw_mesh(&mut self, mesh: &Mesh) {
        self.commands.push(DrawCommand::Draw(self.draws.len()));
        self.draws.push(DrawRecord {
            mesh: mesh.name().to_string(),
            shader: self.bound,
            state: self.state,
            uniforms: self.uniforms.clone(),
        });
    }
}

impl TextureUpload for FrameRecorder {
    fn create_3d(
        &mut self,
        descriptor: &Texture3dDescriptor,
        levels: &[Vec<u8>],
    ) -> RenderResult<TextureHandle> {
        descriptor.validate(levels)?;
        let handle = TextureHandle(self.textures.len() as u32);
        self.textures.push(RecordedTexture {
            descriptor: descriptor.clone(),
            data: levels.first().cloned().unwrap_or_default(),
        });
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{BASIC_VS, FLAT_FS};

    #[test]
    fn test_unknown_shader_does_not_bind() {
        let mut recorder = FrameRecorder::new(&ShaderLibrary::new());
        assert!(!recorder.enable_shader(ShaderHandle(0)));
        assert_eq!(recorder.bound_shader(), None);
        assert!(recorder.commands().is_empty());
    }

    #[test]
    fn test_draw_snapshot() {
        let mut library = ShaderLibrary::new();
        let flat = library.register(BASIC_VS, FLAT_FS);
        let mut recorder = FrameRecorder::new(&library);

        assert!(recorder.enable_shader(flat));
        recorder.set_uniform("u_color", UniformValue::Float(1.0));
        recorder.draw_mesh(&Mesh::cube("cube", 1.0));
        recorder.disable_shader();

        assert_eq!(recorder.draw_count(), 1);
        let draw = &recorder.draws()[0];
        assert_eq!(draw.mesh, "cube");
        assert_eq!(draw.shader, Some(flat));
        assert_eq!(draw.uniform("u_color"), Some(UniformValue::Float(1.0)));
        assert_eq!(recorder.commands().len(), 4);

        recorder.clear_frame();
        assert_eq!(recorder.draw_count(), 0);
    }
}
