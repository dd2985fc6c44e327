//! Triangle meshes drawn by materials.
//!
//! Only the CPU-side description lives here; the device owns any GPU copy.

use glam::Vec3;

/// An indexed triangle mesh with a cached local-space bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    name: String,
    positions: Vec<Vec3>,
    indices: Vec<u32>,
    aabb_min: Vec3,
    aabb_max: Vec3,
}

impl Mesh {
    /// Creates a mesh and computes its bounding box.
    pub fn new(name: impl Into<String>, positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let (aabb_min, aabb_max) = compute_aabb(&positions);
        Self {
            name: name.into(),
            positions,
            indices,
            aabb_min,
            aabb_max,
        }
    }

    /// Creates an axis-aligned cube centered at the origin.
    pub fn cube(name: impl Into<String>, half_extent: f32) -> Self {
        let h = half_extent;
        let positions = vec![
            Vec3::new(-h, -h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(h, h, h),
            Vec3::new(-h, h, h),
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 2, 1, 0, 3, 2, // -z
            4, 5, 6, 4, 6, 7, // +z
            0, 1, 5, 0, 5, 4, // -y
            3, 6, 2, 3, 7, 6, // +y
            0, 4, 7, 0, 7, 3, // -x
            1, 2, 6, 1, 6, 5, // +x
        ];
        Self::new(name, positions, indices)
    }

    /// Returns the mesh name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the vertex positions.
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Returns the triangle indices.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Returns the number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns the local-space bounding box minimum.
    #[must_use]
    pub fn aabb_min(&self) -> Vec3 {
        self.aabb_min
    }

    /// Returns the local-space bounding box maximum.
    #[must_use]
    pub fn aabb_max(&self) -> Vec3 {
        self.aabb_max
    }

    /// Replaces the vertex positions and refreshes the bounding box.
    pub fn set_positions(&mut self, positions: Vec<Vec3>) {
        let (min, max) = compute_aabb(&positions);
        self.positions = positions;
        self.aabb_min = min;
        self.aabb_max = max;
    }
}

fn compute_aabb(positions: &[Vec3]) -> (Vec3, Vec3) {
    if positions.is_empty() {
        return (Vec3::ZERO, Vec3::ZERO);
    }
    positions.iter().fold(
        (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
        |(min, max), &p| (min.min(p), max.max(p)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube() {
        let cube = Mesh::cube("cube", 0.5);
        assert_eq!(cube.positions().len(), 8);
        assert_eq!(cube.triangle_count(), 12);
        assert_eq!(cube.aabb_min(), Vec3::splat(-0.5));
        assert_eq!(cube.aabb_max(), Vec3::splat(0.5));
    }

    #[test]
    fn test_set_positions_refreshes_bounds() {
        let mut mesh = Mesh::new("empty", Vec::new(), Vec::new());
        assert_eq!(mesh.aabb_min(), Vec3::ZERO);
        mesh.set_positions(vec![Vec3::new(1.0, -2.0, 0.0), Vec3::new(-1.0, 3.0, 4.0)]);
        assert_eq!(mesh.aabb_min(), Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(mesh.aabb_max(), Vec3::new(1.0, 3.0, 4.0));
    }
}
