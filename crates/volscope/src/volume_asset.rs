//! Loading grid assets into volume materials.
//!
//! Every grid of an asset is voxelized and uploaded as its own density
//! texture. The material keeps all of them and samples the active one,
//! which defaults to the last grid.

use volscope_core::{
    DenseVolume, DensitySource, GridAsset, Options, TextureHandle, VolscopeError, Voxelizer,
};
use volscope_render::{texture::upload_volume, RenderError, TextureUpload, VolumeMaterial};

/// Error type for volume asset loading.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("voxelization failed: {0}")]
    Voxelize(#[from] VolscopeError),

    #[error("texture upload failed: {0}")]
    Upload(#[from] RenderError),

    #[error("asset has {grids} grids but {volumes} volumes were provided")]
    VolumeCountMismatch { grids: usize, volumes: usize },
}

/// Voxelizes every grid of `asset` and binds the resulting textures to
/// `material`.
///
/// An empty asset leaves the material without textures and switches it to
/// constant density. Returns the number of textures bound.
pub fn load_volume_asset<U: TextureUpload + ?Sized>(
    material: &mut VolumeMaterial,
    asset: &GridAsset,
    uploader: &mut U,
    options: &Options,
) -> Result<usize, LoadError> {
    if asset.is_empty() {
        log::warn!("grid asset has no grids, falling back to constant density");
        material
            .density_mut()
            .clear_textures()
            .set_source(DensitySource::Constant);
        return Ok(0);
    }
    let voxelizer = Voxelizer::from_options(options)?;
    let volumes = voxelizer.voxelize_asset(asset)?;
    install_volumes(material, asset, &volumes, uploader, options)
}

/// Uploads already voxelized volumes, one per grid of `asset`, and binds
/// them to `material`.
///
/// This is the render-thread half of a background load.
pub fn install_volumes<U: TextureUpload + ?Sized>(
    material: &mut VolumeMaterial,
    asset: &GridAsset,
    volumes: &[DenseVolume],
    uploader: &mut U,
    options: &Options,
) -> Result<usize, LoadError> {
    if volumes.len() != asset.grid_count() {
        return Err(LoadError::VolumeCountMismatch {
            grids: asset.grid_count(),
            volumes: volumes.len(),
        });
    }
    if volumes.is_empty() {
        log::warn!("no volumes to install, falling back to constant density");
        material
            .density_mut()
            .clear_textures()
            .set_source(DensitySource::Constant);
        return Ok(0);
    }

    let textures = asset
        .grids()
        .iter()
        .zip(volumes)
        .map(|(grid, volume)| upload_volume(uploader, &grid.name, volume, options))
        .collect::<Result<Vec<TextureHandle>, RenderError>>()?;
    let count = textures.len();
    material
        .density_mut()
        .set_textures(textures)
        .set_source(DensitySource::GridTexture);
    log::info!(
        "loaded {count} density textures at {}^3, active grid '{}'",
        options.voxel_resolution,
        asset.grids().last().map_or("", |g| g.name.as_str())
    );
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use volscope_core::{GridTransform, SparseGrid};
    use volscope_render::{FrameRecorder, ShaderLibrary};

    #[test]
    fn test_volume_count_must_match() {
        let library = ShaderLibrary::with_defaults();
        let mut recorder = FrameRecorder::new(&library);
        let mut material = VolumeMaterial::new(&library, glam::Vec4::ONE);
        let mut asset = GridAsset::new();
        asset.push("density", SparseGrid::new(GridTransform::IDENTITY, 0.0));

        let err = install_volumes(&mut material, &asset, &[], &mut recorder, &Options::default())
            .unwrap_err();
        assert!(matches!(
            err,
            LoadError::VolumeCountMismatch {
                grids: 1,
                volumes: 0
            }
        ));
    }
}
