//! Material system for mesh and volume rendering.
//!
//! A [`Material`] is one of a fixed set of variants. Each variant knows which
//! shader program it draws with, which uniforms it uploads and how many
//! passes it issues. Lit materials read scene lights from an explicit
//! [`LightingContext`]; nothing is looked up globally.
//!
//! A draw with no mesh or with a shader that does not resolve is skipped
//! without touching the device.

use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use volscope_core::{
    DensityField, DensityParameters, LightingContext, Options, SceneAdjustment, TextureHandle,
};

use crate::camera::Camera;
use crate::device::{set_uniform, BlendMode, DepthCompare, FillMode, RasterScope, RenderDevice};
use crate::lights::{upload_light, upload_neutral_light};
use crate::mesh::Mesh;
use crate::shader::{uniforms, ShaderHandle, ShaderLibrary, BASIC_FS, BASIC_VS, FLAT_FS, NORMAL_FS, VOLUME_FS};

/// How the ray marcher integrates density along a ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VolumeType {
    /// Constant density, integrated analytically.
    #[default]
    Homogeneous,
    /// Density varies along the ray and is ray marched.
    Heterogeneous,
}

impl VolumeType {
    /// All volume types in shader index order.
    pub const ALL: [VolumeType; 2] = [VolumeType::Homogeneous, VolumeType::Heterogeneous];

    /// Value uploaded as `u_volume_type`.
    #[must_use]
    pub fn shader_index(self) -> i32 {
        match self {
            VolumeType::Homogeneous => 0,
            VolumeType::Heterogeneous => 1,
        }
    }
}

/// Which radiative terms the volume shader evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShaderVariant {
    /// Absorption only.
    #[default]
    Absorption,
    /// Absorption plus emission.
    AbsorptionEmission,
}

impl ShaderVariant {
    /// All variants in shader index order.
    pub const ALL: [ShaderVariant; 2] = [ShaderVariant::Absorption, ShaderVariant::AbsorptionEmission];

    /// Value uploaded as `u_shader_type`.
    #[must_use]
    pub fn shader_index(self) -> i32 {
        match self {
            ShaderVariant::Absorption => 0,
            ShaderVariant::AbsorptionEmission => 1,
        }
    }
}

/// Uploads the per-draw view and model uniforms shared by all materials.
fn upload_view_uniforms(device: &mut dyn RenderDevice, camera: &Camera, model: Mat4) {
    set_uniform(device, uniforms::VIEWPROJECTION, camera.view_projection_matrix());
    set_uniform(device, uniforms::CAMERA_POSITION, camera.position);
    set_uniform(device, uniforms::MODEL, model);
}

/// Unlit single-color material.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatMaterial {
    /// Surface color.
    pub color: Vec4,
    shader: Option<ShaderHandle>,
}

impl FlatMaterial {
    /// Creates a flat material using the library's flat program.
    #[must_use]
    pub fn new(library: &ShaderLibrary, color: Vec4) -> Self {
        Self {
            color,
            shader: library.get(BASIC_VS, FLAT_FS),
        }
    }

    /// Returns the program this material draws with.
    #[must_use]
    pub fn shader(&self) -> Option<ShaderHandle> {
        self.shader
    }

    fn upload_uniforms(&self, device: &mut dyn RenderDevice, camera: &Camera, model: Mat4) {
        upload_view_uniforms(device, camera, model);
        set_uniform(device, uniforms::COLOR, self.color);
    }

    fn render(&self, mesh: Option<&Mesh>, model: Mat4, camera: &Camera, device: &mut dyn RenderDevice) {
        let (Some(mesh), Some(shader)) = (mesh, self.shader) else {
            return;
        };
        if !device.enable_shader(shader) {
            return;
        }
        self.upload_uniforms(device, camera, model);
        device.draw_mesh(mesh);
        device.disable_shader();
    }

    fn render_wireframe(
        &self,
        mesh: Option<&Mesh>,
        model: Mat4,
        camera: &Camera,
        device: &mut dyn RenderDevice,
    ) {
        let (Some(mesh), Some(shader)) = (mesh, self.shader) else {
            return;
        };
        if !device.enable_shader(shader) {
            return;
        }
        {
            let mut scope = RasterScope::new(&mut *device, |state| {
                state.fill_mode = FillMode::Line;
                state.cull_faces = false;
            });
            self.upload_uniforms(&mut *scope, camera, model);
            scope.draw_mesh(mesh);
        }
        device.disable_shader();
    }
}

/// Lit opaque material accumulating one additive pass per light.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardMaterial {
    /// Surface color.
    pub color: Vec4,
    /// Optional diffuse texture, bound as `u_texture`.
    pub texture: Option<TextureHandle>,
    show_normals: bool,
    base_shader: Option<ShaderHandle>,
    normal_shader: Option<ShaderHandle>,
}

impl StandardMaterial {
    /// Creates a standard material using the library's lit and normal programs.
    #[must_use]
    pub fn new(library: &ShaderLibrary, color: Vec4) -> Self {
        Self {
            color,
            texture: None,
            show_normals: false,
            base_shader: library.get(BASIC_VS, BASIC_FS),
            normal_shader: library.get(BASIC_VS, NORMAL_FS),
        }
    }

    /// Returns whether normals are visualized instead of lighting.
    #[must_use]
    pub fn show_normals(&self) -> bool {
        self.show_normals
    }

    /// Switches between the lit and the normal-visualizing program.
    pub fn set_show_normals(&mut self, show: bool) {
        self.show_normals = show;
    }

    /// Returns the program this material currently draws with.
    #[must_use]
    pub fn shader(&self) -> Option<ShaderHandle> {
        if self.show_normals {
            self.normal_shader
        } else {
            self.base_shader
        }
    }

    fn upload_uniforms(&self, device: &mut dyn RenderDevice, camera: &Camera, model: Mat4) {
        upload_view_uniforms(device, camera, model);
        set_uniform(device, uniforms::COLOR, self.color);
        if let Some(texture) = self.texture {
            set_uniform(device, uniforms::TEXTURE, texture);
        }
    }

    /// Draws `max(1, lights)` passes.
    ///
    /// The first pass carries the ambient term and the first light (or
    /// neutral light uniforms when there are none) under the current raster
    /// state. Every further light is drawn with ambient zeroed, additive
    /// blending and a `<=` depth test, and the raster state is restored
    /// once the passes are done.
    fn render(
        &self,
        mesh: Option<&Mesh>,
        model: Mat4,
        camera: &Camera,
        lighting: &LightingContext,
        device: &mut dyn RenderDevice,
    ) {
        let (Some(mesh), Some(shader)) = (mesh, self.shader()) else {
            return;
        };
        if !device.enable_shader(shader) {
            return;
        }

        let lights = lighting.lights();
        self.upload_uniforms(device, camera, model);
        set_uniform(device, uniforms::AMBIENT_LIGHT, lighting.ambient_light);
        match lights.first() {
            Some(light) => upload_light(device, light),
            None => upload_neutral_light(device),
        }
        device.draw_mesh(mesh);

        if lights.len() > 1 {
            let mut scope = RasterScope::new(&mut *device, |state| {
                state.blend = BlendMode::Additive;
                state.depth_compare = DepthCompare::LessEqual;
            });
            for light in &lights[1..] {
                self.upload_uniforms(&mut *scope, camera, model);
                set_uniform(&mut *scope, uniforms::AMBIENT_LIGHT, Vec3::ZERO);
                upload_light(&mut *scope, light);
                scope.draw_mesh(mesh);
            }
        }

        device.disable_shader();
    }
}

/// Ray-marched volume material.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeMaterial {
    /// Base color.
    pub color: Vec4,
    /// Integration mode.
    pub volume_type: VolumeType,
    /// Absorption coefficient.
    pub absorption_coefficient: f32,
    /// Ray-march step length in mesh-local units.
    pub step_length: f32,
    /// Emission color.
    pub emission_color: Vec4,
    /// Emission intensity.
    pub emission_intensity: f32,
    /// Scattering coefficient.
    pub scatter_coefficient: f32,
    /// Henyey-Greenstein asymmetry parameter.
    pub g_value: f32,
    /// Upper bound on ray-march steps.
    pub num_steps: i32,
    /// Ambient light suggested when switching to emissive shading.
    pub emission_ambient_light: Vec3,
    shader_variant: ShaderVariant,
    density: DensityField,
    shader: Option<ShaderHandle>,
}

impl VolumeMaterial {
    /// Creates a volume material using the library's volume program.
    #[must_use]
    pub fn new(library: &ShaderLibrary, color: Vec4) -> Self {
        Self {
            color,
            volume_type: VolumeType::Homogeneous,
            absorption_coefficient: 1.0,
            step_length: 0.04,
            emission_color: Vec4::ONE,
            emission_intensity: 0.1,
            scatter_coefficient: 0.0,
            g_value: 0.0,
            num_steps: 128,
            emission_ambient_light: Vec3::ZERO,
            shader_variant: ShaderVariant::Absorption,
            density: DensityField::new(),
            shader: library.get(BASIC_VS, VOLUME_FS),
        }
    }

    /// Creates a volume material taking scene defaults from `options`.
    #[must_use]
    pub fn from_options(library: &ShaderLibrary, options: &Options) -> Self {
        Self {
            emission_ambient_light: options.emission_ambient_light,
            ..Self::new(library, Vec4::ONE)
        }
    }

    /// Returns the program this material draws with.
    #[must_use]
    pub fn shader(&self) -> Option<ShaderHandle> {
        self.shader
    }

    /// Returns the density field.
    #[must_use]
    pub fn density(&self) -> &DensityField {
        &self.density
    }

    /// Returns the density field for editing.
    pub fn density_mut(&mut self) -> &mut DensityField {
        &mut self.density
    }

    /// Returns the mesh-local box the ray marcher is bounded by.
    #[must_use]
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.density.bounds()
    }

    /// Returns the shader variant.
    #[must_use]
    pub fn shader_variant(&self) -> ShaderVariant {
        self.shader_variant
    }

    /// Changes the shader variant.
    ///
    /// Emission is invisible under homogeneous integration, so switching to
    /// [`ShaderVariant::AbsorptionEmission`] also selects
    /// [`VolumeType::Heterogeneous`] and suggests an ambient light change for
    /// the caller to apply.
    pub fn set_shader_variant(&mut self, variant: ShaderVariant) -> Option<SceneAdjustment> {
        if variant == self.shader_variant {
            return None;
        }
        self.shader_variant = variant;
        match variant {
            ShaderVariant::AbsorptionEmission => {
                self.volume_type = VolumeType::Heterogeneous;
                Some(SceneAdjustment::SetAmbientLight(self.emission_ambient_light))
            }
            ShaderVariant::Absorption => None,
        }
    }

    fn upload_uniforms(
        &self,
        device: &mut dyn RenderDevice,
        camera: &Camera,
        model: Mat4,
        lighting: &LightingContext,
    ) {
        let (box_min, box_max) = self.density.bounds();
        upload_view_uniforms(device, camera, model);
        set_uniform(device, uniforms::LOCAL_CAMERA_POSITION, camera.local_position(model));
        set_uniform(device, uniforms::BOX_MIN, box_min);
        set_uniform(device, uniforms::BOX_MAX, box_max);

        set_uniform(device, uniforms::COLOR, self.color);
        set_uniform(device, uniforms::ABSORPTION_COEFFICIENT, self.absorption_coefficient);
        set_uniform(device, uniforms::AMBIENT_LIGHT, lighting.ambient_light);
        set_uniform(device, uniforms::BACKGROUND, lighting.background_color);
        set_uniform(device, uniforms::STEP_LENGTH, self.step_length);
        set_uniform(device, uniforms::VOLUME_TYPE, self.volume_type.shader_index());
        set_uniform(device, uniforms::SHADER_TYPE, self.shader_variant.shader_index());
        set_uniform(device, uniforms::EMISSION_COLOR, self.emission_color);
        set_uniform(device, uniforms::EMISSION_INTENSITY, self.emission_intensity);
        set_uniform(device, uniforms::SCATTER_COEFFICIENT, self.scatter_coefficient);
        set_uniform(device, uniforms::G_VALUE, self.g_value);
        set_uniform(device, uniforms::NUM_STEPS, self.num_steps);

        let noise = self.density.noise();
        set_uniform(device, uniforms::NOISE_SCALE, noise.scale);
        set_uniform(device, uniforms::NOISE_DETAIL, noise.detail as i32);

        let parameters = self.density.parameters();
        set_uniform(device, uniforms::DENSITY_SOURCE, parameters.source().shader_index());
        match parameters {
            DensityParameters::Constant { density_scale }
            | DensityParameters::Noise { density_scale, .. } => {
                set_uniform(device, uniforms::DENSITY_SCALE, density_scale);
            }
            DensityParameters::GridTexture {
                density_scale,
                texture,
                ..
            } => {
                set_uniform(device, uniforms::DENSITY_SCALE, density_scale);
                set_uniform(device, uniforms::DENSITY_TEXTURE, texture);
            }
        }
    }

    /// Single pass. The box bounds follow the drawn mesh so a mesh shared by
    /// differently scaled nodes still maps to the right texture space.
    fn render(
        &mut self,
        mesh: Option<&Mesh>,
        model: Mat4,
        camera: &Camera,
        lighting: &LightingContext,
        device: &mut dyn RenderDevice,
    ) {
        let (Some(mesh), Some(shader)) = (mesh, self.shader) else {
            return;
        };
        if !device.enable_shader(shader) {
            return;
        }
        self.density.set_bounds(mesh.aabb_min(), mesh.aabb_max());
        self.upload_uniforms(device, camera, model, lighting);
        device.draw_mesh(mesh);
        device.disable_shader();
    }
}

/// A material attached to a scene node.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Unlit single color.
    Flat(FlatMaterial),
    /// Unlit single color drawn as edges.
    Wireframe(FlatMaterial),
    /// Lit, one pass per light.
    Standard(StandardMaterial),
    /// Ray-marched volume.
    Volume(VolumeMaterial),
}

impl Material {
    /// Creates a flat material.
    #[must_use]
    pub fn flat(library: &ShaderLibrary, color: Vec4) -> Self {
        Material::Flat(FlatMaterial::new(library, color))
    }

    /// Creates a white wireframe material.
    #[must_use]
    pub fn wireframe(library: &ShaderLibrary) -> Self {
        Material::Wireframe(FlatMaterial::new(library, Vec4::ONE))
    }

    /// Creates a standard lit material.
    #[must_use]
    pub fn standard(library: &ShaderLibrary, color: Vec4) -> Self {
        Material::Standard(StandardMaterial::new(library, color))
    }

    /// Creates a volume material.
    #[must_use]
    pub fn volume(library: &ShaderLibrary, options: &Options) -> Self {
        Material::Volume(VolumeMaterial::from_options(library, options))
    }

    /// Display name of the variant.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Material::Flat(_) => "Flat",
            Material::Wireframe(_) => "Wireframe",
            Material::Standard(_) => "Standard",
            Material::Volume(_) => "Volume",
        }
    }

    /// Returns the base color.
    #[must_use]
    pub fn color(&self) -> Vec4 {
        match self {
            Material::Flat(m) | Material::Wireframe(m) => m.color,
            Material::Standard(m) => m.color,
            Material::Volume(m) => m.color,
        }
    }

    /// Sets the base color.
    pub fn set_color(&mut self, color: Vec4) {
        match self {
            Material::Flat(m) | Material::Wireframe(m) => m.color = color,
            Material::Standard(m) => m.color = color,
            Material::Volume(m) => m.color = color,
        }
    }

    /// Returns the program the next draw would bind.
    #[must_use]
    pub fn shader(&self) -> Option<ShaderHandle> {
        match self {
            Material::Flat(m) | Material::Wireframe(m) => m.shader(),
            Material::Standard(m) => m.shader(),
            Material::Volume(m) => m.shader(),
        }
    }

    /// Returns the volume material, if this is one.
    #[must_use]
    pub fn as_volume(&self) -> Option<&VolumeMaterial> {
        match self {
            Material::Volume(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the volume material for editing, if this is one.
    pub fn as_volume_mut(&mut self) -> Option<&mut VolumeMaterial> {
        match self {
            Material::Volume(m) => Some(m),
            _ => None,
        }
    }

    /// Draws `mesh` with this material.
    pub fn render(
        &mut self,
        mesh: Option<&Mesh>,
        model: Mat4,
        camera: &Camera,
        lighting: &LightingContext,
        device: &mut dyn RenderDevice,
    ) {
        match self {
            Material::Flat(m) => m.render(mesh, model, camera, device),
            Material::Wireframe(m) => m.render_wireframe(mesh, model, camera, device),
            Material::Standard(m) => m.render(mesh, model, camera, lighting, device),
            Material::Volume(m) => m.render(mesh, model, camera, lighting, device),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{RasterState, UniformValue};
    use crate::recorder::{DrawCommand, FrameRecorder};
    use volscope_core::{DensitySource, Light};

    fn setup() -> (ShaderLibrary, FrameRecorder) {
        let library = ShaderLibrary::with_defaults();
        let recorder = FrameRecorder::new(&library);
        (library, recorder)
    }

    fn lights(count: usize) -> LightingContext {
        let mut lighting = LightingContext::with_ambient(Vec3::splat(0.2));
        for i in 0..count {
            lighting.add_light(Light::point(format!("light{i}"), Vec3::new(i as f32, 2.0, 0.0), 1.0));
        }
        lighting
    }

    #[test]
    fn test_kind_names() {
        let library = ShaderLibrary::with_defaults();
        let names: Vec<_> = [
            Material::flat(&library, Vec4::ONE),
            Material::wireframe(&library),
            Material::standard(&library, Vec4::ONE),
            Material::volume(&library, &Options::default()),
        ]
        .iter()
        .map(Material::kind_name)
        .collect();
        assert_eq!(names, ["Flat", "Wireframe", "Standard", "Volume"]);
    }

    #[test]
    fn test_flat_single_pass() {
        let (library, mut device) = setup();
        let mut material = Material::flat(&library, Vec4::new(1.0, 0.0, 0.0, 1.0));
        let mesh = Mesh::cube("cube", 1.0);
        material.render(Some(&mesh), Mat4::IDENTITY, &Camera::default(), &lights(0), &mut device);

        assert_eq!(device.draw_count(), 1);
        let draw = &device.draws()[0];
        assert_eq!(draw.shader, library.get(BASIC_VS, FLAT_FS));
        assert_eq!(draw.uniform(uniforms::COLOR), Some(UniformValue::Vec4(Vec4::new(1.0, 0.0, 0.0, 1.0))));
        assert!(draw.uniform(uniforms::VIEWPROJECTION).is_some());
        assert_eq!(device.bound_shader(), None);
    }

    #[test]
    fn test_wireframe_scopes_raster_state() {
        let (library, mut device) = setup();
        let mut material = Material::wireframe(&library);
        let mesh = Mesh::cube("cube", 1.0);
        material.render(Some(&mesh), Mat4::IDENTITY, &Camera::default(), &lights(0), &mut device);

        let draw = &device.draws()[0];
        assert_eq!(draw.state.fill_mode, FillMode::Line);
        assert!(!draw.state.cull_faces);
        assert_eq!(device.raster_state(), RasterState::default());
        assert_eq!(device.commands().last(), Some(&DrawCommand::DisableShader));
    }

    #[test]
    fn test_standard_pass_structure() {
        let (library, mut device) = setup();
        let mut material = Material::standard(&library, Vec4::ONE);
        let mesh = Mesh::cube("cube", 1.0);
        material.render(Some(&mesh), Mat4::IDENTITY, &Camera::default(), &lights(3), &mut device);

        let draws = device.draws();
        assert_eq!(draws.len(), 3);
        assert_eq!(draws[0].state, RasterState::default());
        assert_eq!(draws[0].uniform(uniforms::AMBIENT_LIGHT), Some(UniformValue::Vec3(Vec3::splat(0.2))));
        for draw in &draws[1..] {
            assert_eq!(draw.state.blend, BlendMode::Additive);
            assert_eq!(draw.state.depth_compare, DepthCompare::LessEqual);
            assert_eq!(draw.uniform(uniforms::AMBIENT_LIGHT), Some(UniformValue::Vec3(Vec3::ZERO)));
        }
        assert_eq!(draws[2].uniform(uniforms::LIGHT_POSITION), Some(UniformValue::Vec3(Vec3::new(2.0, 2.0, 0.0))));
        assert_eq!(device.raster_state(), RasterState::default());
    }

    #[test]
    fn test_standard_without_lights_uses_neutral_light() {
        let (library, mut device) = setup();
        let mut material = Material::standard(&library, Vec4::ONE);
        let mesh = Mesh::cube("cube", 1.0);
        material.render(Some(&mesh), Mat4::IDENTITY, &Camera::default(), &lights(0), &mut device);

        assert_eq!(device.draw_count(), 1);
        let draw = &device.draws()[0];
        assert_eq!(draw.uniform(uniforms::LIGHT_COLOR), Some(UniformValue::Vec4(Vec4::ZERO)));
        assert_eq!(draw.uniform(uniforms::LIGHT_INTENSITY), Some(UniformValue::Float(1.0)));
    }

    #[test]
    fn test_standard_show_normals_switches_program() {
        let library = ShaderLibrary::with_defaults();
        let mut material = StandardMaterial::new(&library, Vec4::ONE);
        assert_eq!(material.shader(), library.get(BASIC_VS, BASIC_FS));
        material.set_show_normals(true);
        assert_eq!(material.shader(), library.get(BASIC_VS, NORMAL_FS));
    }

    #[test]
    fn test_missing_mesh_or_shader_is_noop() {
        let (library, mut device) = setup();
        let mut material = Material::standard(&library, Vec4::ONE);
        material.render(None, Mat4::IDENTITY, &Camera::default(), &lights(2), &mut device);
        assert!(device.commands().is_empty());

        let mut orphan = Material::volume(&ShaderLibrary::new(), &Options::default());
        let mesh = Mesh::cube("cube", 1.0);
        orphan.render(Some(&mesh), Mat4::IDENTITY, &Camera::default(), &lights(0), &mut device);
        assert!(device.commands().is_empty());
    }

    #[test]
    fn test_volume_refreshes_bounds_from_mesh() {
        let (library, mut device) = setup();
        let mut material = Material::volume(&library, &Options::default());
        let mesh = Mesh::cube("cube", 2.5);
        material.render(Some(&mesh), Mat4::IDENTITY, &Camera::default(), &lights(1), &mut device);

        let volume = material.as_volume().unwrap();
        assert_eq!(volume.bounds(), (Vec3::splat(-2.5), Vec3::splat(2.5)));
        let draw = &device.draws()[0];
        assert_eq!(draw.uniform(uniforms::BOX_MAX), Some(UniformValue::Vec3(Vec3::splat(2.5))));
        assert_eq!(draw.uniform(uniforms::DENSITY_SOURCE), Some(UniformValue::Int(0)));
        assert!(draw.uniform(uniforms::DENSITY_TEXTURE).is_none());
        assert_eq!(device.draw_count(), 1);
    }

    #[test]
    fn test_volume_grid_texture_uniforms() {
        let (library, mut device) = setup();
        let mut material = VolumeMaterial::new(&library, Vec4::ONE);
        material
            .density_mut()
            .set_source(DensitySource::GridTexture)
            .set_textures(vec![TextureHandle(4), TextureHandle(7)]);
        let mesh = Mesh::cube("cube", 1.0);
        material.render(Some(&mesh), Mat4::IDENTITY, &Camera::default(), &lights(0), &mut device);

        let draw = &device.draws()[0];
        assert_eq!(draw.uniform(uniforms::DENSITY_SOURCE), Some(UniformValue::Int(2)));
        assert_eq!(draw.uniform(uniforms::DENSITY_TEXTURE), Some(UniformValue::Texture(TextureHandle(7))));
    }

    #[test]
    fn test_emission_variant_suggests_adjustment() {
        let library = ShaderLibrary::with_defaults();
        let options = Options {
            emission_ambient_light: Vec3::splat(0.5),
            ..Options::default()
        };
        let mut material = VolumeMaterial::from_options(&library, &options);
        assert_eq!(material.volume_type, VolumeType::Homogeneous);

        let adjustment = material.set_shader_variant(ShaderVariant::AbsorptionEmission);
        assert_eq!(adjustment, Some(SceneAdjustment::SetAmbientLight(Vec3::splat(0.5))));
        assert_eq!(material.volume_type, VolumeType::Heterogeneous);
        assert_eq!(material.set_shader_variant(ShaderVariant::AbsorptionEmission), None);
        assert_eq!(material.set_shader_variant(ShaderVariant::Absorption), None);
    }
}
