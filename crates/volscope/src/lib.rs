//! volscope: a Rust-native core for a volume scene editor.
//!
//! Sparse volumetric grids are voxelized into dense 3D density textures and
//! drawn through a small set of materials, including a ray-marched volume
//! material and a lit material that accumulates one pass per light.
//!
//! # Quick Start
//!
//! ```no_run
//! use volscope::*;
//!
//! fn main() -> std::result::Result<(), LoadError> {
//!     init_logging();
//!
//!     // A grid with one dense blob in the middle
//!     let mut grid = SparseGrid::new(GridTransform::IDENTITY, 0.0)
//!         .with_world_bounds(Vec3::ZERO, Vec3::splat(8.0));
//!     grid.set_value(IVec3::splat(4), 1.0);
//!     let mut asset = GridAsset::new();
//!     asset.push("density", grid);
//!
//!     // A scene with one volume node
//!     let options = Options::default().with_voxel_resolution(32);
//!     let mut scene = Scene::new(options.clone());
//!     let mut device = FrameRecorder::new(scene.library());
//!     let node = scene.add_volume_node();
//!     if let Some(material) = node.material_mut().and_then(Material::as_volume_mut) {
//!         load_volume_asset(material, &asset, &mut device, &options)?;
//!     }
//!
//!     scene.render(&Camera::default(), &mut device);
//!     Ok(())
//! }
//! ```
//!
//! # Crates
//!
//! - `volscope-core`: grids, the voxelizer, density fields, lighting and options
//! - `volscope-render`: the render device seam, materials and texture upload

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod job;
mod scene;
mod volume_asset;

// Re-export core types
pub use volscope_core::{
    CancelToken, DenseGrid, DenseVolume, DensityField, DensityParameters, DensitySource,
    GridAsset, GridSource, GridTransform, Light, LightKind, LightingContext, NamedGrid,
    NoiseParams, Options, Result, SceneAdjustment, SparseGrid, SplatKernel, TexelType,
    TextureHandle, VolscopeError, Voxelizer, IVec3, Mat4, UVec3, Vec3, Vec4,
};

// Re-export render types
pub use volscope_render::{
    save_volume_slice, upload_volume, Camera, FlatMaterial, FrameRecorder, Material, Mesh,
    ParamDescriptor, ParamKind, ParamValue, RenderDevice, RenderError, RenderResult,
    ShaderLibrary, ShaderVariant, StandardMaterial, TextureUpload, VolumeMaterial, VolumeType,
};

pub use job::VoxelizeJob;
pub use scene::{NodeKind, Scene, SceneNode, VOLUME_PROXY_HALF_EXTENT};
pub use volume_asset::{install_volumes, load_volume_asset, LoadError};

/// Initializes logging through `env_logger`.
///
/// Safe to call more than once; later calls are ignored. The level is read
/// from `RUST_LOG`.
pub fn init_logging() {
    if env_logger::try_init().is_ok() {
        log::info!("volscope {} logging initialized", env!("CARGO_PKG_VERSION"));
    }
}
