//! Sparse volumetric grids and their index-space transforms.
//!
//! A grid stores scalar density in its own integer *index space*. The
//! [`GridTransform`] maps index space to world space; voxel `i` covers the
//! half-open index range `[i, i + 1)` on each axis.

use std::collections::HashMap;
use std::sync::Arc;

use glam::{IVec3, Mat4, UVec3, Vec3};

use crate::error::{Result, VolscopeError};

/// Affine map between grid index space and world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridTransform {
    index_to_world: Mat4,
    world_to_index: Mat4,
}

impl GridTransform {
    /// The identity transform: one world unit per voxel, origin at zero.
    pub const IDENTITY: Self = Self {
        index_to_world: Mat4::IDENTITY,
        world_to_index: Mat4::IDENTITY,
    };

    /// Creates a transform from an index-to-world matrix.
    ///
    /// Fails if the matrix is not invertible.
    pub fn from_matrix(index_to_world: Mat4) -> Result<Self> {
        let det = index_to_world.determinant();
        if !det.is_finite() || det.abs() <= f32::EPSILON {
            return Err(VolscopeError::SingularTransform);
        }
        Ok(Self {
            index_to_world,
            world_to_index: index_to_world.inverse(),
        })
    }

    /// Creates a uniform-scale transform with the given voxel size and world origin.
    pub fn from_voxel_size(voxel_size: f32, origin: Vec3) -> Result<Self> {
        Self::from_matrix(
            Mat4::from_translation(origin) * Mat4::from_scale(Vec3::splat(voxel_size)),
        )
    }

    /// Maps an index-space point to world space.
    #[must_use]
    pub fn apply(&self, index: Vec3) -> Vec3 {
        self.index_to_world.transform_point3(index)
    }

    /// Maps a world-space point to index space.
    #[must_use]
    pub fn apply_inverse(&self, world: Vec3) -> Vec3 {
        self.world_to_index.transform_point3(world)
    }

    /// Maps a world-space displacement to an index-space displacement.
    #[must_use]
    pub fn apply_inverse_vector(&self, world: Vec3) -> Vec3 {
        self.world_to_index.transform_vector3(world)
    }

    /// Returns the index-to-world matrix.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        self.index_to_world
    }

    /// Returns the world-space bounds of an index-space box, accounting for rotation.
    #[must_use]
    pub fn world_bounds_of(&self, index_min: Vec3, index_max: Vec3) -> (Vec3, Vec3) {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for corner in 0..8u32 {
            let p = Vec3::new(
                if corner & 1 == 0 { index_min.x } else { index_max.x },
                if corner & 2 == 0 { index_min.y } else { index_max.y },
                if corner & 4 == 0 { index_min.z } else { index_max.z },
            );
            let w = self.apply(p);
            min = min.min(w);
            max = max.max(w);
        }
        (min, max)
    }
}

impl Default for GridTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A sparse scalar grid that can be sampled for density.
///
/// Implementors only need to provide the index-space accessor; world-space
/// lookups are derived through the transform.
pub trait GridSource: Send + Sync {
    /// Returns the world-space bounding box `(min, max)`.
    fn bounding_box(&self) -> (Vec3, Vec3);

    /// Returns the index-space transform of this grid.
    fn transform(&self) -> &GridTransform;

    /// Samples the grid at an index-space point.
    fn value_at_index(&self, index: Vec3) -> f32;

    /// Maps a world-space point into this grid's index space.
    fn world_to_index(&self, world: Vec3) -> Vec3 {
        self.transform().apply_inverse(world)
    }

    /// Maps an index-space point into world space.
    fn index_to_world(&self, index: Vec3) -> Vec3 {
        self.transform().apply(index)
    }

    /// Samples the grid at a world-space point.
    fn value_at(&self, world: Vec3) -> f32 {
        self.value_at_index(self.world_to_index(world))
    }
}

/// Converts a continuous index-space point to the voxel containing it.
fn voxel_key(index: Vec3) -> Option<IVec3> {
    if !index.is_finite() {
        return None;
    }
    let floored = index.floor();
    if floored.abs().max_element() >= i32::MAX as f32 {
        return None;
    }
    Some(floored.as_ivec3())
}

/// A hash-map backed sparse grid with a background value.
#[derive(Debug, Clone)]
pub struct SparseGrid {
    transform: GridTransform,
    background: f32,
    voxels: HashMap<IVec3, f32>,
    world_bounds: Option<(Vec3, Vec3)>,
}

impl SparseGrid {
    /// Creates an empty sparse grid.
    pub fn new(transform: GridTransform, background: f32) -> Self {
        Self {
            transform,
            background,
            voxels: HashMap::new(),
            world_bounds: None,
        }
    }

    /// Overrides the bounding box that would otherwise be derived from active voxels.
    #[must_use]
    pub fn with_world_bounds(mut self, min: Vec3, max: Vec3) -> Self {
        self.world_bounds = Some((min.min(max), min.max(max)));
        self
    }

    /// Sets the value of an active voxel.
    pub fn set_value(&mut self, key: IVec3, value: f32) -> &mut Self {
        self.voxels.insert(key, value);
        self
    }

    /// Returns the stored value of a voxel, or the background.
    #[must_use]
    pub fn value(&self, key: IVec3) -> f32 {
        self.voxels.get(&key).copied().unwrap_or(self.background)
    }

    /// Returns the background value.
    #[must_use]
    pub fn background(&self) -> f32 {
        self.background
    }

    /// Returns the number of active voxels.
    #[must_use]
    pub fn active_voxel_count(&self) -> usize {
        self.voxels.len()
    }

    /// Returns the inclusive index bounds of the active voxels.
    #[must_use]
    pub fn active_index_bounds(&self) -> Option<(IVec3, IVec3)> {
        let mut keys = self.voxels.keys();
        let first = *keys.next()?;
        Some(keys.fold((first, first), |(lo, hi), &k| (lo.min(k), hi.max(k))))
    }
}

impl GridSource for SparseGrid {
    fn bounding_box(&self) -> (Vec3, Vec3) {
        if let Some(bounds) = self.world_bounds {
            return bounds;
        }
        match self.active_index_bounds() {
            Some((lo, hi)) => self
                .transform
                .world_bounds_of(lo.as_vec3(), (hi + IVec3::ONE).as_vec3()),
            None => {
                let origin = self.transform.apply(Vec3::ZERO);
                (origin, origin)
            }
        }
    }

    fn transform(&self) -> &GridTransform {
        &self.transform
    }

    fn value_at_index(&self, index: Vec3) -> f32 {
        voxel_key(index).map_or(self.background, |key| self.value(key))
    }
}

/// A fully populated regular grid (x fastest, then y, then z).
#[derive(Debug, Clone)]
pub struct DenseGrid {
    transform: GridTransform,
    dims: UVec3,
    values: Vec<f32>,
}

impl DenseGrid {
    /// Creates a dense grid, checking that `values` matches `dims`.
    pub fn new(dims: UVec3, values: Vec<f32>, transform: GridTransform) -> Result<Self> {
        let expected = dims.x as usize * dims.y as usize * dims.z as usize;
        if values.len() != expected {
            return Err(VolscopeError::SizeMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            transform,
            dims,
            values,
        })
    }

    /// Creates a dense grid by evaluating `f` at every voxel index.
    pub fn from_fn(dims: UVec3, transform: GridTransform, mut f: impl FnMut(UVec3) -> f32) -> Self {
        let mut values = Vec::with_capacity(dims.x as usize * dims.y as usize * dims.z as usize);
        for k in 0..dims.z {
            for j in 0..dims.y {
                for i in 0..dims.x {
                    values.push(f(UVec3::new(i, j, k)));
                }
            }
        }
        Self {
            transform,
            dims,
            values,
        }
    }

    /// Returns the grid dimensions.
    #[must_use]
    pub fn dims(&self) -> UVec3 {
        self.dims
    }

    /// Returns the raw values.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

impl GridSource for DenseGrid {
    fn bounding_box(&self) -> (Vec3, Vec3) {
        self.transform
            .world_bounds_of(Vec3::ZERO, self.dims.as_vec3())
    }

    fn transform(&self) -> &GridTransform {
        &self.transform
    }

    fn value_at_index(&self, index: Vec3) -> f32 {
        let Some(key) = voxel_key(index) else {
            return 0.0;
        };
        if key.min_element() < 0 {
            return 0.0;
        }
        let key = key.as_uvec3();
        if key.x >= self.dims.x || key.y >= self.dims.y || key.z >= self.dims.z {
            return 0.0;
        }
        let idx = key.x as usize
            + key.y as usize * self.dims.x as usize
            + key.z as usize * self.dims.x as usize * self.dims.y as usize;
        self.values[idx]
    }
}

/// A grid together with the name it was loaded under.
#[derive(Clone)]
pub struct NamedGrid {
    /// Grid name within its asset.
    pub name: String,
    /// The grid data, shared so it can be voxelized off the render thread.
    pub grid: Arc<dyn GridSource>,
}

impl std::fmt::Debug for NamedGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedGrid")
            .field("name", &self.name)
            .field("bounding_box", &self.grid.bounding_box())
            .finish()
    }
}

/// An ordered collection of grids loaded from one asset.
#[derive(Debug, Clone, Default)]
pub struct GridAsset {
    grids: Vec<NamedGrid>,
}

impl GridAsset {
    /// Creates an empty asset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a grid.
    pub fn push(&mut self, name: impl Into<String>, grid: impl GridSource + 'static) -> &mut Self {
        self.grids.push(NamedGrid {
            name: name.into(),
            grid: Arc::new(grid),
        });
        self
    }

    /// Returns the number of grids.
    #[must_use]
    pub fn grid_count(&self) -> usize {
        self.grids.len()
    }

    /// Returns true if the asset has no grids.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    /// Returns all grids in load order.
    #[must_use]
    pub fn grids(&self) -> &[NamedGrid] {
        &self.grids
    }

    /// Looks up a grid by name.
    pub fn get(&self, name: &str) -> Result<&NamedGrid> {
        self.grids
            .iter()
            .find(|g| g.name == name)
            .ok_or_else(|| VolscopeError::GridNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_round_trip() {
        let t = GridTransform::from_voxel_size(0.5, Vec3::new(1.0, 2.0, 3.0)).unwrap();
        let index = Vec3::new(4.0, 6.0, 8.0);
        let world = t.apply(index);
        assert!((world - Vec3::new(3.0, 5.0, 7.0)).length() < 1e-6);
        assert!((t.apply_inverse(world) - index).length() < 1e-5);
        assert!((t.apply_inverse_vector(Vec3::ONE) - Vec3::splat(2.0)).length() < 1e-5);
    }

    #[test]
    fn test_singular_transform_rejected() {
        assert!(matches!(
            GridTransform::from_matrix(Mat4::ZERO),
            Err(VolscopeError::SingularTransform)
        ));
    }

    #[test]
    fn test_sparse_grid_lookup() {
        let mut grid = SparseGrid::new(GridTransform::IDENTITY, 0.0);
        grid.set_value(IVec3::new(1, 2, 3), 0.75);

        assert_eq!(grid.value_at_index(Vec3::new(1.2, 2.9, 3.0)), 0.75);
        assert_eq!(grid.value_at_index(Vec3::new(0.9, 2.5, 3.5)), 0.0);
        assert_eq!(grid.value_at(Vec3::new(1.5, 2.5, 3.5)), 0.75);
        assert_eq!(grid.value_at_index(Vec3::new(f32::NAN, 0.0, 0.0)), 0.0);
    }

    #[test]
    fn test_sparse_grid_bounds() {
        let mut grid = SparseGrid::new(GridTransform::from_voxel_size(2.0, Vec3::ZERO).unwrap(), 0.0);
        grid.set_value(IVec3::new(0, 0, 0), 1.0);
        grid.set_value(IVec3::new(2, 1, 0), 1.0);
        let (min, max) = grid.bounding_box();
        assert_eq!(min, Vec3::ZERO);
        assert_eq!(max, Vec3::new(6.0, 4.0, 2.0));

        let grid = grid.with_world_bounds(Vec3::splat(1.0), Vec3::splat(-1.0));
        assert_eq!(grid.bounding_box(), (Vec3::splat(-1.0), Vec3::splat(1.0)));
    }

    #[test]
    fn test_dense_grid() {
        let grid = DenseGrid::from_fn(UVec3::new(2, 2, 2), GridTransform::IDENTITY, |p| {
            (p.x + 2 * p.y + 4 * p.z) as f32
        });
        assert_eq!(grid.value_at_index(Vec3::new(1.5, 0.5, 1.5)), 5.0);
        assert_eq!(grid.value_at_index(Vec3::new(2.5, 0.5, 0.5)), 0.0);
        assert_eq!(grid.value_at_index(Vec3::new(-0.5, 0.5, 0.5)), 0.0);
        assert_eq!(grid.bounding_box(), (Vec3::ZERO, Vec3::splat(2.0)));

        assert!(matches!(
            DenseGrid::new(UVec3::new(2, 2, 2), vec![0.0; 7], GridTransform::IDENTITY),
            Err(VolscopeError::SizeMismatch { expected: 8, actual: 7 })
        ));
    }

    #[test]
    fn test_grid_asset() {
        let mut asset = GridAsset::new();
        assert!(asset.is_empty());
        asset.push("density", SparseGrid::new(GridTransform::IDENTITY, 0.0));
        asset.push("temperature", SparseGrid::new(GridTransform::IDENTITY, 0.0));
        assert_eq!(asset.grid_count(), 2);
        assert_eq!(asset.get("temperature").unwrap().name, "temperature");
        assert!(matches!(asset.get("smoke"), Err(VolscopeError::GridNotFound(_))));
    }
}
