//! Core abstractions for volscope.
//!
//! This crate provides the renderer-agnostic half of the volume editor:
//! - [`GridSource`] for sparse volumetric grids and their index-space transforms
//! - [`Voxelizer`] that resamples a grid into a dense [`DenseVolume`]
//! - [`DensityField`] selecting how the ray marcher obtains density
//! - [`LightingContext`] holding the scene lights and ambient term
//! - Configuration options and error types

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Voxel indices are bounded by the resolution and fit comfortably in f32/i64
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

pub mod density;
pub mod error;
pub mod grid;
pub mod lighting;
pub mod options;
pub mod voxelize;

pub use density::{DensityField, DensityParameters, DensitySource, NoiseParams, TextureHandle};
pub use error::{Result, VolscopeError};
pub use grid::{DenseGrid, GridAsset, GridSource, GridTransform, NamedGrid, SparseGrid};
pub use lighting::{Light, LightKind, LightingContext, SceneAdjustment};
pub use options::{Options, TexelType};
pub use voxelize::{
    CancelToken, DenseVolume, SplatAccumulator, SplatKernel, Voxelizer, MAX_RESOLUTION,
};

// Re-export glam types for convenience
pub use glam::{IVec3, Mat4, UVec3, Vec3, Vec4};
