//! Conversion of sparse grids into dense, quantized 3D density volumes.
//!
//! The voxelizer lays a regular `R x R x R` lattice over the grid's world
//! bounding box, samples the grid at every lattice cell center (in the grid's
//! index space), and splats each sample into the dense volume with a radial
//! falloff. Accumulation saturates at 255 per voxel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use glam::{UVec3, Vec3};

use crate::error::{Result, VolscopeError};
use crate::grid::{GridAsset, GridSource};
use crate::options::Options;

/// Maximum value stored in a voxel.
pub const VOXEL_MAX: u8 = u8::MAX;

/// Largest supported lattice resolution, the minimum 3D texture extent
/// wgpu guarantees (`max_texture_dimension_3d`).
pub const MAX_RESOLUTION: u32 = 2048;

/// Shared flag used to cooperatively cancel a running voxelization.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token in the non-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A dense cube of 8-bit density values, x fastest then y then z.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseVolume {
    resolution: u32,
    data: Vec<u8>,
}

impl DenseVolume {
    /// Allocates a zero-filled volume of `resolution^3` voxels.
    pub fn new(resolution: u32) -> Result<Self> {
        let len = Self::voxel_count(resolution).ok_or(VolscopeError::InvalidResolution(resolution))?;
        Ok(Self {
            resolution,
            data: vec![0; len],
        })
    }

    /// Wraps existing voxel data, x fastest then y then z.
    pub fn from_data(resolution: u32, data: Vec<u8>) -> Result<Self> {
        let len = Self::voxel_count(resolution).ok_or(VolscopeError::InvalidResolution(resolution))?;
        if data.len() != len {
            return Err(VolscopeError::SizeMismatch {
                expected: len,
                actual: data.len(),
            });
        }
        Ok(Self { resolution, data })
    }

    fn voxel_count(resolution: u32) -> Option<usize> {
        if resolution == 0 || resolution > MAX_RESOLUTION {
            return None;
        }
        let r = resolution as usize;
        r.checked_mul(r)?.checked_mul(r)
    }

    /// Returns the edge length in voxels.
    #[must_use]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Returns the dimensions as a vector.
    #[must_use]
    pub fn dims(&self) -> UVec3 {
        UVec3::splat(self.resolution)
    }

    /// Returns the raw voxel data.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the volume and returns its voxel data.
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Returns the linear index of a voxel, or `None` outside `[0, R)^3`.
    #[must_use]
    pub fn linear_index(&self, x: i64, y: i64, z: i64) -> Option<usize> {
        linear_index(self.resolution, x, y, z)
    }

    /// Returns the value of a voxel, or 0 outside the volume.
    #[must_use]
    pub fn get(&self, x: u32, y: u32, z: u32) -> u8 {
        self.linear_index(i64::from(x), i64::from(y), i64::from(z))
            .map_or(0, |i| self.data[i])
    }

    /// Returns the number of non-zero voxels.
    #[must_use]
    pub fn non_zero_count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Returns the largest voxel value.
    #[must_use]
    pub fn max_value(&self) -> u8 {
        self.data.iter().copied().max().unwrap_or(0)
    }
}

fn linear_index(resolution: u32, x: i64, y: i64, z: i64) -> Option<usize> {
    let r = i64::from(resolution);
    if !(0..r).contains(&x) || !(0..r).contains(&y) || !(0..r).contains(&z) {
        return None;
    }
    Some((x + y * r + z * r * r) as usize)
}

/// Unquantized splat target.
///
/// Contributions are summed in full precision and each voxel is capped at
/// [`VOXEL_MAX`] after every contribution, so small contributions add up
/// instead of rounding away. The sum is quantized once by
/// [`SplatAccumulator::into_volume`].
#[derive(Debug, Clone, PartialEq)]
pub struct SplatAccumulator {
    resolution: u32,
    values: Vec<f32>,
}

impl SplatAccumulator {
    /// Allocates a zero-filled accumulator of `resolution^3` voxels.
    pub fn new(resolution: u32) -> Result<Self> {
        let len = DenseVolume::voxel_count(resolution)
            .ok_or(VolscopeError::InvalidResolution(resolution))?;
        Ok(Self {
            resolution,
            values: vec![0.0; len],
        })
    }

    /// Returns the edge length in voxels.
    #[must_use]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Adds a contribution to a voxel, saturating at [`VOXEL_MAX`].
    ///
    /// Coordinates outside the volume are skipped. Negative and non-finite
    /// contributions add nothing. Returns whether a voxel was addressed.
    pub fn accumulate(&mut self, x: i64, y: i64, z: i64, contribution: f32) -> bool {
        let Some(i) = linear_index(self.resolution, x, y, z) else {
            return false;
        };
        if contribution.is_finite() && contribution > 0.0 {
            self.values[i] = (self.values[i] + contribution).min(f32::from(VOXEL_MAX));
        }
        true
    }

    /// Returns the accumulated value of a voxel, or 0 outside the volume.
    #[must_use]
    pub fn value(&self, x: i64, y: i64, z: i64) -> f32 {
        linear_index(self.resolution, x, y, z).map_or(0.0, |i| self.values[i])
    }

    /// Quantizes every voxel into a dense volume.
    pub fn into_volume(self) -> Result<DenseVolume> {
        let data = self.values.into_iter().map(quantize).collect();
        DenseVolume::from_data(self.resolution, data)
    }
}

/// Rounds a contribution into `[0, 255]`, mapping non-finite values to 0.
#[must_use]
pub fn quantize(value: f32) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.clamp(0.0, f32::from(VOXEL_MAX)).round() as u8
}

/// Radial splat filter used to bleed samples into neighbouring voxels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplatKernel {
    radius: f32,
}

impl SplatKernel {
    /// Creates a kernel with the given bleed radius in voxels.
    pub fn new(radius: f32) -> Result<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(VolscopeError::InvalidBleedRadius(radius));
        }
        Ok(Self { radius })
    }

    /// A kernel that writes each sample to its own voxel only.
    pub const POINT: Self = Self { radius: 0.0 };

    /// Returns the bleed radius.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Half-width of the cube of voxels a sample can reach.
    #[must_use]
    pub fn reach(&self) -> i64 {
        self.radius.ceil() as i64
    }

    /// Falloff weight at `distance` voxels from the sample.
    #[must_use]
    pub fn weight(&self, distance: f32) -> f32 {
        if self.radius == 0.0 {
            return if distance == 0.0 { 1.0 } else { 0.0 };
        }
        (1.0 - distance / self.radius).max(0.0)
    }

    /// Voxel offsets with a positive weight, center first.
    fn taps(&self) -> Vec<([i64; 3], f32)> {
        let reach = self.reach();
        let mut taps = vec![([0, 0, 0], 1.0)];
        for dz in -reach..=reach {
            for dy in -reach..=reach {
                for dx in -reach..=reach {
                    if dx == 0 && dy == 0 && dz == 0 {
                        continue;
                    }
                    let distance = ((dx * dx + dy * dy + dz * dz) as f32).sqrt();
                    let w = self.weight(distance);
                    if w > 0.0 {
                        taps.push(([dx, dy, dz], w));
                    }
                }
            }
        }
        taps
    }
}

impl Default for SplatKernel {
    fn default() -> Self {
        Self::POINT
    }
}

/// Placement of the sampling lattice in world and grid index space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lattice {
    /// World position of cell `(0, 0, 0)`'s center.
    pub world_origin: Vec3,
    /// World-space size of one cell.
    pub world_step: Vec3,
    /// Index-space position of cell `(0, 0, 0)`'s center.
    pub index_origin: Vec3,
    /// Index-space displacement for one step along each lattice axis.
    pub index_axes: [Vec3; 3],
}

impl Lattice {
    /// Fits a lattice of `resolution` cells per axis over the grid's bounding box.
    pub fn fit(grid: &dyn GridSource, resolution: u32) -> Self {
        let (min, max) = grid.bounding_box();
        let size = max - min;
        let center = min + size * 0.5;
        let world_step = size / resolution as f32;
        let world_origin = center - size * 0.5 + world_step * 0.5;

        let transform = grid.transform();
        Self {
            world_origin,
            world_step,
            index_origin: transform.apply_inverse(world_origin),
            index_axes: [
                transform.apply_inverse_vector(Vec3::new(world_step.x, 0.0, 0.0)),
                transform.apply_inverse_vector(Vec3::new(0.0, world_step.y, 0.0)),
                transform.apply_inverse_vector(Vec3::new(0.0, 0.0, world_step.z)),
            ],
        }
    }

    /// World-space center of a cell.
    #[must_use]
    pub fn world_point(&self, x: u32, y: u32, z: u32) -> Vec3 {
        self.world_origin + self.world_step * Vec3::new(x as f32, y as f32, z as f32)
    }

    /// Index-space center of a cell, computed directly so no error accumulates.
    #[must_use]
    pub fn index_point(&self, x: u32, y: u32, z: u32) -> Vec3 {
        self.index_origin
            + self.index_axes[0] * x as f32
            + self.index_axes[1] * y as f32
            + self.index_axes[2] * z as f32
    }
}

/// Resamples grids into dense volumes at a fixed resolution.
#[derive(Debug, Clone)]
pub struct Voxelizer {
    resolution: u32,
    kernel: SplatKernel,
    cancel: Option<CancelToken>,
}

impl Voxelizer {
    /// Creates a voxelizer with the given lattice resolution and bleed radius.
    ///
    /// The resolution must lie in `1..=MAX_RESOLUTION`.
    pub fn new(resolution: u32, bleed_radius: f32) -> Result<Self> {
        DenseVolume::voxel_count(resolution).ok_or(VolscopeError::InvalidResolution(resolution))?;
        Ok(Self {
            resolution,
            kernel: SplatKernel::new(bleed_radius)?,
            cancel: None,
        })
    }

    /// Creates a voxelizer from the resolution and radius in `options`.
    pub fn from_options(options: &Options) -> Result<Self> {
        Self::new(options.voxel_resolution, options.bleed_radius)
    }

    /// Attaches a cancel token checked between lattice rows.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Returns the lattice resolution.
    #[must_use]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Returns the splat kernel.
    #[must_use]
    pub fn kernel(&self) -> SplatKernel {
        self.kernel
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(VolscopeError::Cancelled),
            _ => Ok(()),
        }
    }

    /// Samples the grid at every lattice cell, x fastest.
    ///
    /// Non-finite samples are replaced by zero.
    pub fn sample(&self, grid: &dyn GridSource) -> Result<Vec<f32>> {
        let lattice = Lattice::fit(grid, self.resolution);
        let r = self.resolution;
        let mut samples = Vec::with_capacity(r as usize * r as usize * r as usize);
        for z in 0..r {
            for y in 0..r {
                self.check_cancelled()?;
                for x in 0..r {
                    let value = grid.value_at_index(lattice.index_point(x, y, z));
                    samples.push(if value.is_finite() { value } else { 0.0 });
                }
            }
        }
        Ok(samples)
    }

    /// Voxelizes a single grid into a dense volume.
    pub fn voxelize(&self, grid: &dyn GridSource) -> Result<DenseVolume> {
        let started = Instant::now();
        let samples = self.sample(grid)?;
        let mut splats = SplatAccumulator::new(self.resolution)?;
        let taps = self.kernel.taps();
        let r = i64::from(self.resolution);

        for z in 0..r {
            for y in 0..r {
                self.check_cancelled()?;
                for x in 0..r {
                    let value = samples[(x + y * r + z * r * r) as usize];
                    if value <= 0.0 {
                        continue;
                    }
                    let intensity = value * f32::from(VOXEL_MAX);
                    for &([dx, dy, dz], weight) in &taps {
                        splats.accumulate(x + dx, y + dy, z + dz, intensity * weight);
                    }
                }
            }
        }
        let volume = splats.into_volume()?;

        log::debug!(
            "voxelized grid at {}^3 (radius {}): {} non-zero voxels in {:?}",
            self.resolution,
            self.kernel.radius(),
            volume.non_zero_count(),
            started.elapsed()
        );
        Ok(volume)
    }

    /// Voxelizes every grid of an asset independently, in load order.
    pub fn voxelize_asset(&self, asset: &GridAsset) -> Result<Vec<DenseVolume>> {
        asset
            .grids()
            .iter()
            .map(|named| {
                log::debug!("voxelizing grid '{}'", named.name);
                self.voxelize(named.grid.as_ref())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{DenseGrid, GridTransform, SparseGrid};
    use glam::IVec3;
    use proptest::prelude::*;

    fn single_voxel_grid(extent: f32, key: IVec3, value: f32) -> SparseGrid {
        let mut grid = SparseGrid::new(GridTransform::IDENTITY, 0.0)
            .with_world_bounds(Vec3::ZERO, Vec3::splat(extent));
        grid.set_value(key, value);
        grid
    }

    #[test]
    fn test_quantize() {
        assert_eq!(quantize(-3.0), 0);
        assert_eq!(quantize(127.5), 128);
        assert_eq!(quantize(1000.0), 255);
        assert_eq!(quantize(f32::NAN), 0);
        assert_eq!(quantize(f32::INFINITY), 0);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            Voxelizer::new(0, 0.0),
            Err(VolscopeError::InvalidResolution(0))
        ));
        assert!(matches!(
            Voxelizer::new(8, -1.0),
            Err(VolscopeError::InvalidBleedRadius(_))
        ));
        assert!(Voxelizer::new(8, f32::NAN).is_err());
        assert!(Voxelizer::new(MAX_RESOLUTION, 0.0).is_ok());
        assert!(matches!(
            Voxelizer::new(2_000_000, 0.0),
            Err(VolscopeError::InvalidResolution(2_000_000))
        ));
        assert!(DenseVolume::new(MAX_RESOLUTION + 1).is_err());
    }

    #[test]
    fn test_from_data_checks_length() {
        let volume = DenseVolume::from_data(2, vec![7; 8]).unwrap();
        assert_eq!(volume.get(1, 1, 1), 7);
        assert!(matches!(
            DenseVolume::from_data(2, vec![0; 7]),
            Err(VolscopeError::SizeMismatch { expected: 8, actual: 7 })
        ));
    }

    #[test]
    fn test_contributions_sum_before_rounding() {
        let mut splats = SplatAccumulator::new(2).unwrap();
        splats.accumulate(0, 0, 0, 0.5);
        splats.accumulate(0, 0, 0, 0.5);
        for _ in 0..3 {
            splats.accumulate(1, 0, 0, 0.3);
        }
        splats.accumulate(0, 1, 0, 0.3);
        let volume = splats.into_volume().unwrap();
        assert_eq!(volume.get(0, 0, 0), 1);
        assert_eq!(volume.get(1, 0, 0), 1);
        assert_eq!(volume.get(0, 1, 0), 0);
    }

    #[test]
    fn test_low_density_fog_survives_bleed() {
        let grid = DenseGrid::from_fn(UVec3::splat(16), GridTransform::IDENTITY, |_| 0.0015);
        let unfiltered = Voxelizer::new(16, 0.0).unwrap().voxelize(&grid).unwrap();
        assert_eq!(unfiltered.non_zero_count(), 0);

        let voxelizer = Voxelizer::new(16, 3.0).unwrap();
        let volume = voxelizer.voxelize(&grid).unwrap();
        let per_sample = 0.0015 * 255.0;
        let expected: f32 = voxelizer
            .kernel()
            .taps()
            .iter()
            .map(|&(_, w)| per_sample * w)
            .sum();
        assert!(expected > 10.0);
        assert_eq!(volume.get(8, 8, 8), quantize(expected));
    }

    #[test]
    fn test_kernel_weights() {
        let k = SplatKernel::new(2.0).unwrap();
        assert_eq!(k.reach(), 2);
        assert_eq!(k.weight(0.0), 1.0);
        assert!((k.weight(1.0) - 0.5).abs() < 1e-6);
        assert_eq!(k.weight(2.0), 0.0);
        assert_eq!(k.weight(5.0), 0.0);

        assert_eq!(SplatKernel::POINT.taps().len(), 1);
        assert_eq!(SplatKernel::new(0.5).unwrap().taps().len(), 1);
    }

    #[test]
    fn test_single_center_sample_radius_zero() {
        let grid = single_voxel_grid(8.0, IVec3::splat(4), 0.6);
        let volume = Voxelizer::new(8, 0.0).unwrap().voxelize(&grid).unwrap();

        assert_eq!(volume.non_zero_count(), 1);
        assert_eq!(volume.get(4, 4, 4), quantize(0.6 * 255.0));
    }

    #[test]
    fn test_radius_two_splat_falloff() {
        let grid = single_voxel_grid(16.0, IVec3::splat(4), 1.0);
        let volume = Voxelizer::new(16, 2.0).unwrap().voxelize(&grid).unwrap();

        let center = volume.get(4, 4, 4);
        assert_eq!(center, 255);
        for (x, y, z) in [(3, 4, 4), (5, 4, 4), (4, 3, 4), (4, 5, 4), (4, 4, 3), (4, 4, 5)] {
            let v = volume.get(x, y, z);
            assert!(v > 0 && v < center, "neighbor ({x},{y},{z}) = {v}");
        }
        assert_eq!(volume.get(6, 4, 4), 0);
        assert_eq!(volume.get(4, 4, 7), 0);
        assert_eq!(volume.get(0, 0, 0), 0);
    }

    #[test]
    fn test_splat_saturates() {
        let mut grid = SparseGrid::new(GridTransform::IDENTITY, 0.0)
            .with_world_bounds(Vec3::ZERO, Vec3::splat(8.0));
        for x in 2..6 {
            grid.set_value(IVec3::new(x, 4, 4), 1.0);
        }
        let volume = Voxelizer::new(8, 3.0).unwrap().voxelize(&grid).unwrap();
        assert_eq!(volume.get(3, 4, 4), 255);
        assert_eq!(volume.max_value(), 255);
    }

    #[test]
    fn test_radius_zero_matches_nearest_sample() {
        let transform = GridTransform::from_voxel_size(0.5, Vec3::new(-1.0, 0.25, 2.0)).unwrap();
        let grid = DenseGrid::from_fn(UVec3::splat(8), transform, |p| {
            ((p.x * 7 + p.y * 3 + p.z * 5) % 11) as f32 / 10.0
        });
        for resolution in [8, 16, 32] {
            let voxelizer = Voxelizer::new(resolution, 0.0).unwrap();
            let lattice = Lattice::fit(&grid, resolution);
            let volume = voxelizer.voxelize(&grid).unwrap();
            for z in 0..resolution {
                for y in 0..resolution {
                    for x in 0..resolution {
                        let expected = quantize(grid.value_at(lattice.world_point(x, y, z)) * 255.0);
                        assert_eq!(volume.get(x, y, z), expected, "cell ({x},{y},{z}) @ {resolution}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_non_finite_samples_are_zero() {
        let grid = DenseGrid::from_fn(UVec3::splat(4), GridTransform::IDENTITY, |p| {
            if p.x == 1 { f32::NAN } else if p.x == 2 { f32::INFINITY } else { 0.5 }
        });
        let volume = Voxelizer::new(4, 1.5).unwrap().voxelize(&grid).unwrap();
        assert!(volume.get(0, 0, 0) >= quantize(0.5 * 255.0));
        let volume = Voxelizer::new(4, 0.0).unwrap().voxelize(&grid).unwrap();
        assert_eq!(volume.get(1, 0, 0), 0);
        assert_eq!(volume.get(2, 0, 0), 0);
        assert_eq!(volume.get(0, 0, 0), quantize(0.5 * 255.0));
    }

    #[test]
    fn test_cancelled_voxelization() {
        let token = CancelToken::new();
        token.cancel();
        let voxelizer = Voxelizer::new(8, 0.0).unwrap().with_cancel_token(token);
        let grid = single_voxel_grid(8.0, IVec3::ZERO, 1.0);
        assert!(matches!(voxelizer.voxelize(&grid), Err(VolscopeError::Cancelled)));
    }

    #[test]
    fn test_asset_yields_one_volume_per_grid() {
        let mut asset = GridAsset::new();
        asset.push("a", single_voxel_grid(4.0, IVec3::ZERO, 1.0));
        asset.push("b", single_voxel_grid(4.0, IVec3::splat(3), 1.0));
        let volumes = Voxelizer::new(4, 0.0).unwrap().voxelize_asset(&asset).unwrap();
        assert_eq!(volumes.len(), 2);
        assert_eq!(volumes[0].get(0, 0, 0), 255);
        assert_eq!(volumes[1].get(3, 3, 3), 255);
        assert_eq!(volumes[1].get(0, 0, 0), 0);

        assert!(Voxelizer::new(4, 0.0)
            .unwrap()
            .voxelize_asset(&GridAsset::new())
            .unwrap()
            .is_empty());
    }

    fn arb_grid() -> impl Strategy<Value = SparseGrid> {
        (
            1.0f32..20.0,
            prop::collection::vec(((-2i32..22, -2i32..22, -2i32..22), -1.0f32..3.0), 0..24),
        )
            .prop_map(|(extent, voxels)| {
                let mut grid = SparseGrid::new(GridTransform::IDENTITY, 0.0)
                    .with_world_bounds(Vec3::ZERO, Vec3::splat(extent));
                for ((x, y, z), v) in voxels {
                    grid.set_value(IVec3::new(x, y, z), v);
                }
                grid
            })
    }

    proptest! {
        #[test]
        fn prop_accumulation_saturates_monotonically(
            contributions in prop::collection::vec(-50.0f32..400.0, 1..40)
        ) {
            let mut splats = SplatAccumulator::new(2).unwrap();
            let mut previous = 0.0f32;
            for c in contributions {
                prop_assert!(splats.accumulate(1, 1, 1, c));
                let current = splats.value(1, 1, 1);
                prop_assert!(current >= previous);
                prop_assert!(current <= f32::from(VOXEL_MAX));
                previous = current;
            }
            prop_assert_eq!(splats.into_volume().unwrap().get(1, 1, 1), quantize(previous));
        }

        #[test]
        fn prop_out_of_range_writes_are_skipped(
            resolution in 1u32..6,
            x in -8i64..14, y in -8i64..14, z in -8i64..14,
        ) {
            let mut splats = SplatAccumulator::new(resolution).unwrap();
            let r = i64::from(resolution);
            let inside = (0..r).contains(&x) && (0..r).contains(&y) && (0..r).contains(&z);
            prop_assert_eq!(splats.accumulate(x, y, z, 255.0), inside);
            prop_assert_eq!(splats.into_volume().unwrap().non_zero_count(), usize::from(inside));
        }

        #[test]
        fn prop_voxelize_stays_in_bounds(
            grid in arb_grid(),
            resolution in 1u32..12,
            radius in 0.0f32..4.0,
        ) {
            let voxelizer = Voxelizer::new(resolution, radius).unwrap();
            let volume = voxelizer.voxelize(&grid).unwrap();
            let r = i64::from(resolution);
            prop_assert_eq!(volume.data().len(), (r * r * r) as usize);

            // Every lit voxel lies within the kernel reach of a positive sample.
            let samples = voxelizer.sample(&grid).unwrap();
            let reach = voxelizer.kernel().reach();
            let mut reachable = vec![false; samples.len()];
            for (i, &value) in samples.iter().enumerate() {
                if value <= 0.0 {
                    continue;
                }
                let (x, y, z) = (i as i64 % r, i as i64 / r % r, i as i64 / (r * r));
                for dz in -reach..=reach {
                    for dy in -reach..=reach {
                        for dx in -reach..=reach {
                            if let Some(j) = volume.linear_index(x + dx, y + dy, z + dz) {
                                reachable[j] = true;
                            }
                        }
                    }
                }
            }
            for (i, &v) in volume.data().iter().enumerate() {
                prop_assert!(v == 0 || reachable[i], "voxel {} = {} has no sample in reach", i, v);
            }
        }

        #[test]
        fn prop_voxelize_is_idempotent(
            grid in arb_grid(),
            resolution in 1u32..10,
            radius in 0.0f32..3.0,
        ) {
            let voxelizer = Voxelizer::new(resolution, radius).unwrap();
            let first = voxelizer.voxelize(&grid).unwrap();
            let second = voxelizer.voxelize(&grid).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
