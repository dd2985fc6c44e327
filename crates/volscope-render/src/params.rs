//! Editable material parameters.
//!
//! An editor lists a material's [`ParamDescriptor`]s, shows a widget per
//! entry and writes values back through [`Material::set_param`]. Numeric
//! values are clamped to the descriptor range, the same way a slider would.

use std::ops::RangeInclusive;

use glam::Vec4;
use volscope_core::{DensitySource, NoiseParams, SceneAdjustment};

use crate::error::{RenderError, RenderResult};
use crate::materials::{Material, ShaderVariant, StandardMaterial, VolumeMaterial, VolumeType};

/// Widget type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Float slider.
    Float,
    /// Integer slider.
    Int,
    /// Checkbox.
    Bool,
    /// Color picker.
    Color,
    /// Combo box over the listed options.
    Choice(&'static [&'static str]),
}

/// One editable parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDescriptor {
    /// Key passed to [`Material::get_param`] and [`Material::set_param`].
    pub name: &'static str,
    /// Label shown by the editor.
    pub label: &'static str,
    /// Widget type.
    pub kind: ParamKind,
    /// Slider range for numeric parameters.
    pub range: Option<RangeInclusive<f32>>,
}

impl ParamDescriptor {
    const fn new(name: &'static str, label: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            label,
            kind,
            range: None,
        }
    }

    fn with_range(mut self, min: f32, max: f32) -> Self {
        self.range = Some(min..=max);
        self
    }

    fn clamp(&self, value: f32) -> f32 {
        match &self.range {
            Some(range) if value.is_finite() => value.clamp(*range.start(), *range.end()),
            Some(range) => *range.start(),
            None => value,
        }
    }
}

/// A parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    /// Float value.
    Float(f32),
    /// Integer value.
    Int(i32),
    /// Boolean value.
    Bool(bool),
    /// RGBA color.
    Color(Vec4),
    /// Index into a choice list.
    Choice(usize),
}

impl ParamValue {
    fn as_float(self, name: &str) -> RenderResult<f32> {
        match self {
            ParamValue::Float(v) => Ok(v),
            _ => Err(mismatch(name, "a float")),
        }
    }

    fn as_int(self, name: &str) -> RenderResult<i32> {
        match self {
            ParamValue::Int(v) => Ok(v),
            _ => Err(mismatch(name, "an integer")),
        }
    }

    fn as_bool(self, name: &str) -> RenderResult<bool> {
        match self {
            ParamValue::Bool(v) => Ok(v),
            _ => Err(mismatch(name, "a boolean")),
        }
    }

    fn as_color(self, name: &str) -> RenderResult<Vec4> {
        match self {
            ParamValue::Color(v) => Ok(v),
            _ => Err(mismatch(name, "a color")),
        }
    }

    fn as_choice(self, name: &str, options: usize) -> RenderResult<usize> {
        match self {
            ParamValue::Choice(v) if v < options => Ok(v),
            _ => Err(mismatch(name, "a valid choice index")),
        }
    }
}

fn mismatch(name: &str, expected: &'static str) -> RenderError {
    RenderError::ParameterTypeMismatch {
        name: name.to_string(),
        expected,
    }
}

fn unknown(name: &str) -> RenderError {
    RenderError::UnknownParameter(name.to_string())
}

const VOLUME_TYPES: &[&str] = &["Homogeneous", "Heterogeneous"];
const SHADER_VARIANTS: &[&str] = &["Absorption", "Absorption + Emission"];
const DENSITY_SOURCES: &[&str] = &["Constant", "Noise", "Grid"];

fn color_param() -> ParamDescriptor {
    ParamDescriptor::new("color", "Color", ParamKind::Color)
}

fn volume_params() -> Vec<ParamDescriptor> {
    vec![
        ParamDescriptor::new("volume_type", "Mode", ParamKind::Choice(VOLUME_TYPES)),
        ParamDescriptor::new("shader_variant", "Shader", ParamKind::Choice(SHADER_VARIANTS)),
        ParamDescriptor::new("density_source", "Density", ParamKind::Choice(DENSITY_SOURCES)),
        ParamDescriptor::new("absorption_coefficient", "Absorption Coefficient", ParamKind::Float)
            .with_range(0.0, 2.0),
        ParamDescriptor::new("step_length", "Step Length", ParamKind::Float).with_range(0.001, 1.0),
        ParamDescriptor::new("noise_scale", "Noise Scale", ParamKind::Float).with_range(1.0, 10.0),
        ParamDescriptor::new("noise_detail", "Noise Detail", ParamKind::Int).with_range(1.0, 8.0),
        ParamDescriptor::new("density_scale", "Density Scale", ParamKind::Float).with_range(0.0, 10.0),
        ParamDescriptor::new("emission_color", "Emissive Color", ParamKind::Color),
        ParamDescriptor::new("emission_intensity", "Emissive Intensity", ParamKind::Float)
            .with_range(0.1, 1.0),
        ParamDescriptor::new("scatter_coefficient", "Scatter Coefficient", ParamKind::Float)
            .with_range(0.0, 2.0),
        ParamDescriptor::new("g_value", "Anisotropy", ParamKind::Float).with_range(-1.0, 1.0),
        ParamDescriptor::new("num_steps", "Max Steps", ParamKind::Int).with_range(1.0, 1024.0),
    ]
}

fn find(params: &[ParamDescriptor], name: &str) -> RenderResult<ParamDescriptor> {
    params
        .iter()
        .find(|p| p.name == name)
        .cloned()
        .ok_or_else(|| unknown(name))
}

impl StandardMaterial {
    fn params(&self) -> Vec<ParamDescriptor> {
        let mut params = vec![ParamDescriptor::new("show_normals", "Show Normals", ParamKind::Bool)];
        // Color has no visible effect while normals are shown.
        if !self.show_normals() {
            params.push(color_param());
        }
        params
    }
}

impl VolumeMaterial {
    fn get_param(&self, name: &str) -> RenderResult<ParamValue> {
        let density = self.density();
        Ok(match name {
            "color" => ParamValue::Color(self.color),
            "volume_type" => ParamValue::Choice(self.volume_type.shader_index() as usize),
            "shader_variant" => ParamValue::Choice(self.shader_variant().shader_index() as usize),
            "density_source" => ParamValue::Choice(density.source().shader_index() as usize),
            "absorption_coefficient" => ParamValue::Float(self.absorption_coefficient),
            "step_length" => ParamValue::Float(self.step_length),
            "noise_scale" => ParamValue::Float(density.noise().scale),
            "noise_detail" => ParamValue::Int(density.noise().detail as i32),
            "density_scale" => ParamValue::Float(density.density_scale()),
            "emission_color" => ParamValue::Color(self.emission_color),
            "emission_intensity" => ParamValue::Float(self.emission_intensity),
            "scatter_coefficient" => ParamValue::Float(self.scatter_coefficient),
            "g_value" => ParamValue::Float(self.g_value),
            "num_steps" => ParamValue::Int(self.num_steps),
            _ => return Err(unknown(name)),
        })
    }

    fn set_param(&mut self, name: &str, value: ParamValue) -> RenderResult<Option<SceneAdjustment>> {
        if name == "color" {
            self.color = value.as_color(name)?;
            return Ok(None);
        }
        let desc = find(&volume_params(), name)?;
        let float = |value: ParamValue| value.as_float(name).map(|v| desc.clamp(v));
        let int = |value: ParamValue| value.as_int(name).map(|v| desc.clamp(v as f32).round() as i32);

        match name {
            "volume_type" => {
                self.volume_type = VolumeType::ALL[value.as_choice(name, VolumeType::ALL.len())?];
            }
            "shader_variant" => {
                let variant = ShaderVariant::ALL[value.as_choice(name, ShaderVariant::ALL.len())?];
                return Ok(self.set_shader_variant(variant));
            }
            "density_source" => {
                let source = DensitySource::ALL[value.as_choice(name, DensitySource::ALL.len())?];
                self.density_mut().set_source(source);
            }
            "absorption_coefficient" => self.absorption_coefficient = float(value)?,
            "step_length" => self.step_length = float(value)?,
            "noise_scale" => {
                let noise = NoiseParams {
                    scale: float(value)?,
                    ..self.density().noise()
                };
                self.density_mut().set_noise(noise);
            }
            "noise_detail" => {
                let noise = NoiseParams {
                    detail: int(value)? as u32,
                    ..self.density().noise()
                };
                self.density_mut().set_noise(noise);
            }
            "density_scale" => {
                let scale = float(value)?;
                self.density_mut().set_density_scale(scale);
            }
            "emission_color" => self.emission_color = value.as_color(name)?,
            "emission_intensity" => self.emission_intensity = float(value)?,
            "scatter_coefficient" => self.scatter_coefficient = float(value)?,
            "g_value" => self.g_value = float(value)?,
            "num_steps" => self.num_steps = int(value)?,
            _ => return Err(unknown(name)),
        }
        Ok(None)
    }
}

impl Material {
    /// Lists the parameters an editor should expose for this material.
    #[must_use]
    pub fn params(&self) -> Vec<ParamDescriptor> {
        match self {
            Material::Flat(_) | Material::Wireframe(_) => vec![color_param()],
            Material::Standard(m) => m.params(),
            Material::Volume(_) => volume_params(),
        }
    }

    /// Reads a parameter.
    pub fn get_param(&self, name: &str) -> RenderResult<ParamValue> {
        match (self, name) {
            (Material::Standard(m), "show_normals") => Ok(ParamValue::Bool(m.show_normals())),
            (Material::Volume(m), _) => m.get_param(name),
            (_, "color") => Ok(ParamValue::Color(self.color())),
            _ => Err(unknown(name)),
        }
    }

    /// Writes a parameter, clamping numeric values to the descriptor range.
    ///
    /// Returns the scene adjustment the edit suggests, if any. The material
    /// never applies it itself.
    pub fn set_param(&mut self, name: &str, value: ParamValue) -> RenderResult<Option<SceneAdjustment>> {
        match (self, name) {
            (Material::Standard(m), "show_normals") => {
                m.set_show_normals(value.as_bool(name)?);
                Ok(None)
            }
            (Material::Volume(m), _) => m.set_param(name, value),
            (material, "color") => {
                material.set_color(value.as_color(name)?);
                Ok(None)
            }
            _ => Err(unknown(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::ShaderLibrary;
    use glam::Vec3;
    use volscope_core::Options;

    #[test]
    fn test_volume_sliders_clamp() {
        let mut material = Material::volume(&ShaderLibrary::with_defaults(), &Options::default());
        material.set_param("absorption_coefficient", ParamValue::Float(5.0)).unwrap();
        material.set_param("step_length", ParamValue::Float(0.0)).unwrap();
        material.set_param("noise_detail", ParamValue::Int(20)).unwrap();
        material.set_param("density_scale", ParamValue::Float(f32::NAN)).unwrap();

        assert_eq!(material.get_param("absorption_coefficient").unwrap(), ParamValue::Float(2.0));
        assert_eq!(material.get_param("step_length").unwrap(), ParamValue::Float(0.001));
        assert_eq!(material.get_param("noise_detail").unwrap(), ParamValue::Int(8));
        assert_eq!(material.get_param("density_scale").unwrap(), ParamValue::Float(0.0));
    }

    #[test]
    fn test_shader_variant_param_returns_adjustment() {
        let options = Options {
            emission_ambient_light: Vec3::splat(0.3),
            ..Options::default()
        };
        let mut material = Material::volume(&ShaderLibrary::with_defaults(), &options);
        let adjustment = material.set_param("shader_variant", ParamValue::Choice(1)).unwrap();
        assert_eq!(adjustment, Some(SceneAdjustment::SetAmbientLight(Vec3::splat(0.3))));
        assert_eq!(material.get_param("volume_type").unwrap(), ParamValue::Choice(1));
    }

    #[test]
    fn test_density_source_choice() {
        let mut material = Material::volume(&ShaderLibrary::with_defaults(), &Options::default());
        material.set_param("density_source", ParamValue::Choice(1)).unwrap();
        assert_eq!(
            material.as_volume().unwrap().density().source(),
            DensitySource::Noise
        );
        assert!(matches!(
            material.set_param("density_source", ParamValue::Choice(3)),
            Err(RenderError::ParameterTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_standard_params_follow_show_normals() {
        let mut material = Material::standard(&ShaderLibrary::with_defaults(), Vec4::ONE);
        assert_eq!(material.params().len(), 2);
        material.set_param("show_normals", ParamValue::Bool(true)).unwrap();
        let names: Vec<_> = material.params().iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["show_normals"]);
    }

    #[test]
    fn test_errors() {
        let mut material = Material::flat(&ShaderLibrary::with_defaults(), Vec4::ONE);
        assert!(matches!(
            material.set_param("step_length", ParamValue::Float(0.1)),
            Err(RenderError::UnknownParameter(_))
        ));
        assert!(matches!(
            material.set_param("color", ParamValue::Float(0.1)),
            Err(RenderError::ParameterTypeMismatch { .. })
        ));
        material.set_param("color", ParamValue::Color(Vec4::ZERO)).unwrap();
        assert_eq!(material.color(), Vec4::ZERO);
    }
}
