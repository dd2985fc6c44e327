//! Per-pass light uniform upload for lit materials.

use glam::Vec4;
use volscope_core::Light;

use crate::device::{set_uniform, RenderDevice};
use crate::shader::uniforms;

/// Uploads one light's uniforms for an additive lighting pass.
///
/// Positions and directions are in world space.
pub fn upload_light<D: RenderDevice + ?Sized>(device: &mut D, light: &Light) {
    set_uniform(device, uniforms::LIGHT_TYPE, light.kind.shader_index());
    set_uniform(device, uniforms::LIGHT_POSITION, light.position);
    set_uniform(device, uniforms::LIGHT_DIRECTION, light.direction);
    set_uniform(device, uniforms::LIGHT_INTENSITY, light.intensity);
    set_uniform(device, uniforms::LIGHT_SHININESS, light.shininess);
    set_uniform(device, uniforms::LIGHT_COLOR, light.color);
}

/// Uploads light uniforms that make the lighting term vanish, used when the
/// scene has no lights and only the ambient pass runs.
pub fn upload_neutral_light<D: RenderDevice + ?Sized>(device: &mut D) {
    set_uniform(device, uniforms::LIGHT_INTENSITY, 1.0_f32);
    set_uniform(device, uniforms::LIGHT_SHININESS, 1.0_f32);
    set_uniform(device, uniforms::LIGHT_COLOR, Vec4::ZERO);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::UniformValue;
    use crate::recorder::FrameRecorder;
    use crate::shader::ShaderLibrary;
    use glam::Vec3;

    #[test]
    fn test_neutral_light() {
        let mut device = FrameRecorder::new(&ShaderLibrary::new());
        upload_neutral_light(&mut device);
        assert_eq!(device.uniform(uniforms::LIGHT_INTENSITY), Some(UniformValue::Float(1.0)));
        assert_eq!(device.uniform(uniforms::LIGHT_SHININESS), Some(UniformValue::Float(1.0)));
        assert_eq!(device.uniform(uniforms::LIGHT_COLOR), Some(UniformValue::Vec4(Vec4::ZERO)));
    }

    #[test]
    fn test_upload_light() {
        let mut device = FrameRecorder::new(&ShaderLibrary::new());
        let light = Light::directional("sun", Vec3::NEG_Y, 0.8).with_shininess(8.0);
        upload_light(&mut device, &light);
        assert_eq!(device.uniform(uniforms::LIGHT_TYPE), Some(UniformValue::Int(1)));
        assert_eq!(device.uniform(uniforms::LIGHT_INTENSITY), Some(UniformValue::Float(0.8)));
        assert_eq!(device.uniform(uniforms::LIGHT_SHININESS), Some(UniformValue::Float(8.0)));
        assert_eq!(device.uniform(uniforms::LIGHT_DIRECTION), Some(UniformValue::Vec3(Vec3::NEG_Y)));
    }
}
