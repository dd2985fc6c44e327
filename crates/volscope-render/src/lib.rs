//! Rendering layer for volscope.
//!
//! This crate turns scene state into backend calls:
//! - The [`RenderDevice`] seam (shader binding, named uniforms, raster state, draws)
//! - The closed [`Material`] set with multi-pass lighting and ray-marched volumes
//! - Density texture preparation and wgpu upload
//! - A headless [`FrameRecorder`] device and voxel slice export

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Texture extents and choice indices are small
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

pub mod camera;
pub mod device;
pub mod error;
pub mod lights;
pub mod materials;
pub mod mesh;
pub mod params;
pub mod recorder;
pub mod shader;
pub mod slice;
pub mod texture;

pub use camera::{Camera, ProjectionMode};
pub use device::{
    BlendMode, DepthCompare, FillMode, RasterScope, RasterState, RenderDevice, UniformValue,
};
pub use error::{RenderError, RenderResult};
pub use materials::{
    FlatMaterial, Material, ShaderVariant, StandardMaterial, VolumeMaterial, VolumeType,
};
pub use mesh::Mesh;
pub use params::{ParamDescriptor, ParamKind, ParamValue};
pub use recorder::{DrawCommand, DrawRecord, FrameRecorder, RecordedTexture};
pub use shader::{ShaderHandle, ShaderLibrary, ShaderProgram};
pub use slice::{save_volume_slice, volume_slice, SliceExportError};
pub use texture::{
    create_volume_sampler, upload_volume, Texture3dDescriptor, TextureUpload,
    VolumeTextureStore, WgpuTextureUploader,
};
