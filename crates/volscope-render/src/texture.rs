//! 3D density texture preparation and upload.
//!
//! Voxelized volumes are single-channel. [`Texture3dDescriptor`] describes the
//! texture, the free functions convert voxels into texels and build the mip
//! chain, and [`TextureUpload`] is the seam a backend implements to create
//! the texture. [`WgpuTextureUploader`] is the GPU implementation.

use glam::UVec3;
use volscope_core::{DenseVolume, Options, TexelType, TextureHandle};

use crate::error::{RenderError, RenderResult};

/// Describes a single-channel 3D texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture3dDescriptor {
    /// Debug label.
    pub label: String,
    /// Base level width.
    pub width: u32,
    /// Base level height.
    pub height: u32,
    /// Base level depth.
    pub depth: u32,
    /// Storage type of one texel.
    pub texel_type: TexelType,
    /// Whether the texture carries a full mip chain.
    pub generate_mipmaps: bool,
}

impl Texture3dDescriptor {
    /// Describes a texture holding a voxelized volume.
    #[must_use]
    pub fn for_volume(label: impl Into<String>, volume: &DenseVolume, options: &Options) -> Self {
        let r = volume.resolution();
        Self {
            label: label.into(),
            width: r,
            height: r,
            depth: r,
            texel_type: options.texel_type,
            generate_mipmaps: options.generate_mipmaps,
        }
    }

    /// Returns the base level extent.
    #[must_use]
    pub fn extent(&self) -> UVec3 {
        UVec3::new(self.width, self.height, self.depth)
    }

    /// Returns the wgpu format matching the texel type.
    #[must_use]
    pub fn format(&self) -> wgpu::TextureFormat {
        match self.texel_type {
            TexelType::U8 => wgpu::TextureFormat::R8Unorm,
            TexelType::F16 => wgpu::TextureFormat::R16Float,
            TexelType::F32 => wgpu::TextureFormat::R32Float,
        }
    }

    /// Returns the number of mip levels, 1 when mipmaps are disabled.
    #[must_use]
    pub fn mip_level_count(&self) -> u32 {
        if self.generate_mipmaps {
            mip_level_count(self.extent())
        } else {
            1
        }
    }

    /// Returns the extent of a mip level.
    #[must_use]
    pub fn level_extent(&self, level: u32) -> UVec3 {
        level_extent(self.extent(), level)
    }

    /// Returns the byte length of a mip level.
    #[must_use]
    pub fn expected_len(&self, level: u32) -> usize {
        let e = self.level_extent(level);
        e.x as usize * e.y as usize * e.z as usize * self.texel_type.size_bytes() as usize
    }

    /// Checks that `levels` holds exactly one correctly sized buffer per mip level.
    pub fn validate(&self, levels: &[Vec<u8>]) -> RenderResult<()> {
        let count = self.mip_level_count() as usize;
        if levels.len() != count {
            return Err(RenderError::TextureCreationFailed(format!(
                "'{}' expects {count} mip levels, got {}",
                self.label,
                levels.len()
            )));
        }
        for (level, data) in levels.iter().enumerate() {
            let expected = self.expected_len(level as u32);
            if data.len() != expected {
                return Err(RenderError::TextureSizeMismatch {
                    expected,
                    actual: data.len(),
                });
            }
        }
        Ok(())
    }
}

/// Backend capable of creating 3D textures.
pub trait TextureUpload {
    /// Creates a texture from one texel buffer per mip level, base level first.
    fn create_3d(
        &mut self,
        descriptor: &Texture3dDescriptor,
        levels: &[Vec<u8>],
    ) -> RenderResult<TextureHandle>;
}

/// Number of levels in a full mip chain for `extent`.
#[must_use]
pub fn mip_level_count(extent: UVec3) -> u32 {
    let largest = extent.max_element().max(1);
    u32::BITS - largest.leading_zeros()
}

fn level_extent(extent: UVec3, level: u32) -> UVec3 {
    UVec3::new(
        (extent.x >> level).max(1),
        (extent.y >> level).max(1),
        (extent.z >> level).max(1),
    )
}

/// Converts 8-bit voxels into texel bytes of the requested type.
///
/// Float texels hold the normalized value `v / 255`.
#[must_use]
pub fn volume_texels(voxels: &[u8], texel_type: TexelType) -> Vec<u8> {
    match texel_type {
        TexelType::U8 => voxels.to_vec(),
        TexelType::F16 => {
            let texels: Vec<u16> = voxels
                .iter()
                .map(|&v| half::f16::from_f32(f32::from(v) / 255.0).to_bits())
                .collect();
            bytemuck::cast_slice(&texels).to_vec()
        }
        TexelType::F32 => {
            let texels: Vec<f32> = voxels.iter().map(|&v| f32::from(v) / 255.0).collect();
            bytemuck::cast_slice(&texels).to_vec()
        }
    }
}

/// Builds `levels` 8-bit mip levels, base level first, with a 2x2x2 box filter.
///
/// Odd extents clamp the filter footprint at the upper edge.
#[must_use]
pub fn build_mip_chain(base: &[u8], extent: UVec3, levels: u32) -> Vec<Vec<u8>> {
    let mut chain = vec![base.to_vec()];
    let mut src_extent = extent;
    for level in 1..levels {
        let dst_extent = level_extent(extent, level);
        let Some(src) = chain.last() else { break };
        let dst = downsample(src, src_extent, dst_extent);
        chain.push(dst);
        src_extent = dst_extent;
    }
    chain
}

fn downsample(src: &[u8], src_extent: UVec3, dst_extent: UVec3) -> Vec<u8> {
    let sx = src_extent.x as usize;
    let sy = src_extent.y as usize;
    let mut dst = Vec::with_capacity((dst_extent.x * dst_extent.y * dst_extent.z) as usize);
    for z in 0..dst_extent.z {
        for y in 0..dst_extent.y {
            for x in 0..dst_extent.x {
                let mut sum = 0u32;
                for dz in 0..2 {
                    for dy in 0..2 {
                        for dx in 0..2 {
                            let ix = (2 * x + dx).min(src_extent.x - 1) as usize;
                            let iy = (2 * y + dy).min(src_extent.y - 1) as usize;
                            let iz = (2 * z + dz).min(src_extent.z - 1) as usize;
                            sum += u32::from(src[ix + iy * sx + iz * sx * sy]);
                        }
                    }
                }
                dst.push(((sum + 4) / 8) as u8);
            }
        }
    }
    dst
}

/// Prepares and uploads a voxelized volume as a density texture.
pub fn upload_volume<U: TextureUpload + ?Sized>(
    uploader: &mut U,
    label: &str,
    volume: &DenseVolume,
    options: &Options,
) -> RenderResult<TextureHandle> {
    let descriptor = Texture3dDescriptor::for_volume(label, volume, options);
    let levels: Vec<Vec<u8>> =
        build_mip_chain(volume.data(), descriptor.extent(), descriptor.mip_level_count())
            .iter()
            .map(|level| volume_texels(level, descriptor.texel_type))
            .collect();
    let handle = uploader.create_3d(&descriptor, &levels)?;
    log::debug!(
        "uploaded density texture '{label}' ({}^3, {:?}, {} levels) as {handle:?}",
        volume.resolution(),
        descriptor.texel_type,
        levels.len()
    );
    Ok(handle)
}

/// GPU textures created by [`WgpuTextureUploader`], indexed by handle.
#[derive(Default)]
pub struct VolumeTextureStore {
    textures: Vec<(wgpu::Texture, wgpu::TextureView)>,
}

impl VolumeTextureStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the view for a texture handle.
    #[must_use]
    pub fn view(&self, handle: TextureHandle) -> Option<&wgpu::TextureView> {
        self.textures.get(handle.0 as usize).map(|(_, view)| view)
    }

    /// Returns the texture for a handle.
    #[must_use]
    pub fn texture(&self, handle: TextureHandle) -> Option<&wgpu::Texture> {
        self.textures.get(handle.0 as usize).map(|(texture, _)| texture)
    }

    /// Returns the number of stored textures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Returns true if no textures are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

/// Uploads density textures through a wgpu device and queue.
pub struct WgpuTextureUploader<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    store: &'a mut VolumeTextureStore,
}

impl<'a> WgpuTextureUploader<'a> {
    /// Creates an uploader writing into `store`.
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        store: &'a mut VolumeTextureStore,
    ) -> Self {
        Self {
            device,
            queue,
            store,
        }
    }
}

impl TextureUpload for WgpuTextureUploader<'_> {
    fn create_3d(
        &mut self,
        descriptor: &Texture3dDescriptor,
        levels: &[Vec<u8>],
    ) -> RenderResult<TextureHandle> {
        descriptor.validate(levels)?;
        let limit = self.device.limits().max_texture_dimension_3d;
        if descriptor.extent().max_element() > limit {
            return Err(RenderError::TextureCreationFailed(format!(
                "'{}' exceeds the 3D texture limit of {limit}",
                descriptor.label
            )));
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&descriptor.label),
            size: wgpu::Extent3d {
                width: descriptor.width,
                height: descriptor.height,
                depth_or_array_layers: descriptor.depth,
            },
            mip_level_count: descriptor.mip_level_count(),
            sample_count: 1,
            dimension: wgpu::TextureDimension::D3,
            format: descriptor.format(),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let texel_size = descriptor.texel_type.size_bytes();
        for (level, data) in levels.iter().enumerate() {
            let extent = descriptor.level_extent(level as u32);
            self.queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                data,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(extent.x * texel_size),
                    rows_per_image: Some(extent.y),
                },
                wgpu::Extent3d {
                    width: extent.x,
                    height: extent.y,
                    depth_or_array_layers: extent.z,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(&descriptor.label),
            dimension: Some(wgpu::TextureViewDimension::D3),
            ..Default::default()
        });
        let handle = TextureHandle(self.store.textures.len() as u32);
        self.store.textures.push((texture, view));
        Ok(handle)
    }
}

/// Creates a trilinear clamp-to-edge sampler for density textures.
pub fn create_volume_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Volume Density Sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::FrameRecorder;
    use crate::shader::ShaderLibrary;

    fn volume_with(resolution: u32, value: u8) -> DenseVolume {
        let r = resolution as usize;
        DenseVolume::from_data(resolution, vec![value; r * r * r]).unwrap()
    }

    #[test]
    fn test_formats() {
        let volume = DenseVolume::new(4).unwrap();
        let mut options = Options::default();
        assert_eq!(
            Texture3dDescriptor::for_volume("v", &volume, &options).format(),
            wgpu::TextureFormat::R8Unorm
        );
        options.texel_type = TexelType::F16;
        assert_eq!(
            Texture3dDescriptor::for_volume("v", &volume, &options).format(),
            wgpu::TextureFormat::R16Float
        );
        options.texel_type = TexelType::F32;
        let desc = Texture3dDescriptor::for_volume("v", &volume, &options);
        assert_eq!(desc.format(), wgpu::TextureFormat::R32Float);
        assert_eq!(desc.expected_len(0), 4 * 4 * 4 * 4);
    }

    #[test]
    fn test_mip_level_count() {
        assert_eq!(mip_level_count(UVec3::splat(1)), 1);
        assert_eq!(mip_level_count(UVec3::splat(8)), 4);
        assert_eq!(mip_level_count(UVec3::new(5, 2, 1)), 3);
    }

    #[test]
    fn test_texel_conversion() {
        let f16 = volume_texels(&[0, 255], TexelType::F16);
        assert_eq!(f16.len(), 4);
        let bits: &[u16] = bytemuck::cast_slice(&f16);
        assert_eq!(half::f16::from_bits(bits[1]).to_f32(), 1.0);

        let f32s = volume_texels(&[51], TexelType::F32);
        let values: &[f32] = bytemuck::cast_slice(&f32s);
        assert!((values[0] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_mip_chain_box_filter() {
        let mut base = vec![0u8; 8];
        base[0] = 80;
        let chain = build_mip_chain(&base, UVec3::splat(2), 2);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[1], vec![10]);

        let uniform = volume_with(5, 200);
        let chain = build_mip_chain(uniform.data(), UVec3::splat(5), 3);
        assert_eq!(chain[1].len(), 8);
        assert_eq!(chain[2].len(), 1);
        assert!(chain.iter().flatten().all(|&v| v == 200));
    }

    #[test]
    fn test_upload_volume_validates_levels() {
        let mut recorder = FrameRecorder::new(&ShaderLibrary::new());
        let volume = volume_with(4, 10);
        let options = Options::default().with_mipmaps(true);
        let handle = upload_volume(&mut recorder, "density", &volume, &options).unwrap();
        assert_eq!(handle, TextureHandle(0));
        let texture = recorder.texture(handle).unwrap();
        assert_eq!(texture.descriptor.mip_level_count(), 3);
        assert_eq!(texture.data, volume.data());

        let desc = Texture3dDescriptor::for_volume("bad", &volume, &Options::default());
        let err = recorder.create_3d(&desc, &[vec![0; 3]]).unwrap_err();
        assert!(matches!(err, RenderError::TextureSizeMismatch { expected: 64, actual: 3 }));
    }
}
