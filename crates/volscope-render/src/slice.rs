//! Export of single voxel slices as grayscale images.

use std::path::Path;

use image::GrayImage;
use volscope_core::DenseVolume;

/// Returns the z-slice of a volume as a grayscale image.
///
/// Image row `y` holds voxel row `y`, so the image origin is the volume's
/// minimum corner.
pub fn volume_slice(volume: &DenseVolume, z: u32) -> Result<GrayImage, SliceExportError> {
    let r = volume.resolution();
    if z >= r {
        return Err(SliceExportError::SliceOutOfRange { z, resolution: r });
    }
    let plane = (r as usize) * (r as usize);
    let start = z as usize * plane;
    let pixels = volume.data()[start..start + plane].to_vec();
    GrayImage::from_raw(r, r, pixels).ok_or(SliceExportError::InvalidImageData)
}

/// Saves the z-slice of a volume to an image file.
///
/// # Arguments
/// * `path` - Output filename (supports .png)
/// * `volume` - Voxelized volume
/// * `z` - Slice index along the z axis
pub fn save_volume_slice(
    path: impl AsRef<Path>,
    volume: &DenseVolume,
    z: u32,
) -> Result<(), SliceExportError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if extension != "png" {
        return Err(SliceExportError::UnsupportedFormat(extension));
    }

    let image = volume_slice(volume, z)?;
    image.save_with_format(path, image::ImageFormat::Png)?;
    log::info!("saved slice z={z} to {}", path.display());
    Ok(())
}

/// Error type for slice export.
#[derive(Debug, thiserror::Error)]
pub enum SliceExportError {
    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Slice {z} is outside a volume of resolution {resolution}")]
    SliceOutOfRange { z: u32, resolution: u32 },

    #[error("Invalid image data")]
    InvalidImageData,
}
