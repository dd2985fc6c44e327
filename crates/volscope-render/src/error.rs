//! Rendering error types.

use thiserror::Error;

/// Errors that can occur while preparing rendering resources.
///
/// Draw calls themselves never fail; missing resources make them no-ops.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Texture creation failed.
    #[error("texture creation failed: {0}")]
    TextureCreationFailed(String),

    /// Texel data does not match the texture descriptor.
    #[error("texture data size mismatch: expected {expected} bytes, got {actual}")]
    TextureSizeMismatch { expected: usize, actual: usize },

    /// The material has no parameter with this name.
    #[error("unknown material parameter '{0}'")]
    UnknownParameter(String),

    /// The value type does not match the parameter.
    #[error("parameter '{name}' expects {expected}")]
    ParameterTypeMismatch {
        name: String,
        expected: &'static str,
    },
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
