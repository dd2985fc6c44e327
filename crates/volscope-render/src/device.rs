//! The narrow seam between materials and the graphics backend.
//!
//! Materials only talk to a [`RenderDevice`]: bind a shader, set named
//! uniforms, adjust raster state and issue draws. Shader compilation and
//! buffer upload live behind the device.

use std::ops::{Deref, DerefMut};

use glam::{Mat4, Vec3, Vec4};
use volscope_core::TextureHandle;

use crate::mesh::Mesh;
use crate::shader::ShaderHandle;

/// Polygon rasterization mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    /// Filled triangles.
    #[default]
    Fill,
    /// Triangle edges only.
    Line,
}

/// Color blending applied to a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// `(SRC_ALPHA, ONE_MINUS_SRC_ALPHA)`.
    #[default]
    Alpha,
    /// `(SRC_ALPHA, ONE)`: each pass adds onto the previous ones.
    Additive,
}

/// Depth test comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthCompare {
    /// Pass if closer.
    #[default]
    Less,
    /// Pass if closer or equal, so repeated passes over the same surface survive.
    LessEqual,
}

/// Fixed-function state that materials may change for the duration of a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterState {
    /// Polygon fill mode.
    pub fill_mode: FillMode,
    /// Back-face culling.
    pub cull_faces: bool,
    /// Blend function.
    pub blend: BlendMode,
    /// Depth comparison.
    pub depth_compare: DepthCompare,
}

impl Default for RasterState {
    fn default() -> Self {
        Self {
            fill_mode: FillMode::Fill,
            cull_faces: true,
            blend: BlendMode::Alpha,
            depth_compare: DepthCompare::Less,
        }
    }
}

/// A value assigned to a named shader uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// `int` uniform.
    Int(i32),
    /// `float` uniform.
    Float(f32),
    /// `vec3` uniform.
    Vec3(Vec3),
    /// `vec4` uniform.
    Vec4(Vec4),
    /// `mat4` uniform.
    Mat4(Mat4),
    /// Sampler bound to a texture.
    Texture(TextureHandle),
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        UniformValue::Int(v)
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self {
        UniformValue::Vec4(v)
    }
}

impl From<Mat4> for UniformValue {
    fn from(v: Mat4) -> Self {
        UniformValue::Mat4(v)
    }
}

impl From<TextureHandle> for UniformValue {
    fn from(v: TextureHandle) -> Self {
        UniformValue::Texture(v)
    }
}

/// Backend operations used by materials during a draw.
pub trait RenderDevice {
    /// Binds a shader program. Returns false if the handle does not resolve
    /// to a usable program, in which case nothing is bound.
    fn enable_shader(&mut self, shader: ShaderHandle) -> bool;

    /// Unbinds the current shader program.
    fn disable_shader(&mut self);

    /// Sets a uniform on the bound program.
    fn set_uniform(&mut self, name: &str, value: UniformValue);

    /// Returns the current raster state.
    fn raster_state(&self) -> RasterState;

    /// Replaces the raster state.
    fn set_raster_state(&mut self, state: RasterState);

    /// Draws the mesh as triangles with the bound program.
    fn draw_mesh(&mut self, mesh: &Mesh);
}

/// Helper to set a uniform from anything convertible to [`UniformValue`].
pub fn set_uniform<D, V>(device: &mut D, name: &str, value: V)
where
    D: RenderDevice + ?Sized,
    V: Into<UniformValue>,
{
    device.set_uniform(name, value.into());
}

/// Raster state change that is undone when the scope ends.
pub struct RasterScope<'a, D: RenderDevice + ?Sized> {
    device: &'a mut D,
    saved: RasterState,
}

impl<'a, D: RenderDevice + ?Sized> RasterScope<'a, D> {
    /// Saves the current state and applies `update` to it.
    pub fn new(device: &'a mut D, update: impl FnOnce(&mut RasterState)) -> Self {
        let saved = device.raster_state();
        let mut state = saved;
        update(&mut state);
        if state != saved {
            device.set_raster_state(state);
        }
        Self { device, saved }
    }

    /// Modifies the scoped state further.
    pub fn update(&mut self, update: impl FnOnce(&mut RasterState)) {
        let mut state = self.device.raster_state();
        update(&mut state);
        self.device.set_raster_state(state);
    }

    /// The state that will be restored.
    #[must_use]
    pub fn saved(&self) -> RasterState {
        self.saved
    }
}

impl<D: RenderDevice + ?Sized> Deref for RasterScope<'_, D> {
    type Target = D;

    fn deref(&self) -> &D {
        self.device
    }
}

impl<D: RenderDevice + ?Sized> DerefMut for RasterScope<'_, D> {
    fn deref_mut(&mut self) -> &mut D {
        self.device
    }
}

impl<D: RenderDevice + ?Sized> Drop for RasterScope<'_, D> {
    fn drop(&mut self) {
        if self.device.raster_state() != self.saved {
            self.device.set_raster_state(self.saved);
        }
    }
}
