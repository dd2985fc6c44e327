#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
//! Demo showing grid voxelization and volume rendering in volscope.
//!
//! Demonstrates:
//! - Building a dense and a sparse grid asset
//! - Voxelizing on a worker thread and uploading on the caller
//! - Rendering a volume node and a lit mesh with two lights
//! - Exporting a slice of the voxelized density
//!
//! Runs headless: draws go to a recording device and the summary is logged.

use std::sync::Arc;

use volscope::{
    install_volumes, save_volume_slice, Camera, DenseGrid, DensitySource, FrameRecorder, GridAsset,
    GridTransform, IVec3, Light, Material, Mesh, Options, ParamValue, Scene, SceneNode,
    SparseGrid, UVec3, Vec3, Vec4, Voxelizer, VoxelizeJob,
};

fn main() {
    volscope::init_logging();

    let options = Options::default()
        .with_voxel_resolution(64)
        .with_bleed_radius(1.5);

    // --- Grid 1: soft sphere sampled on a dense 32^3 grid ---
    let n = 32u32;
    let transform = GridTransform::from_voxel_size(2.0 / n as f32, Vec3::splat(-1.0))
        .expect("Failed to create grid transform");
    let sphere = DenseGrid::from_fn(UVec3::splat(n), transform, |p| {
        let q = (p.as_vec3() + 0.5) / n as f32 * 2.0 - 1.0;
        (1.0 - q.length()).clamp(0.0, 1.0)
    });

    // --- Grid 2: a few sparse hot spots ---
    let mut sparse = SparseGrid::new(GridTransform::IDENTITY, 0.0)
        .with_world_bounds(Vec3::ZERO, Vec3::splat(16.0));
    for i in 0..4 {
        sparse.set_value(IVec3::new(4 + i * 2, 8, 8), 0.25 * (i + 1) as f32);
    }

    let mut asset = GridAsset::new();
    asset.push("sphere", sphere).push("hot spots", sparse);
    let asset = Arc::new(asset);

    // Voxelize in the background
    let voxelizer = Voxelizer::from_options(&options).expect("Invalid voxelizer options");
    let job = VoxelizeJob::spawn(Arc::clone(&asset), voxelizer);

    // Build the scene meanwhile
    let mut scene = Scene::new(options.clone());
    scene
        .lighting
        .add_light(Light::point("key", Vec3::new(2.0, 3.0, 2.0), 1.0))
        .add_light(Light::directional("fill", Vec3::new(-1.0, -1.0, 0.0), 0.4));
    let library = scene.library().clone();
    scene.add_node(
        SceneNode::new(Some("ground"))
            .with_mesh(Arc::new(Mesh::cube("ground", 2.0)))
            .with_material(Material::standard(&library, Vec4::new(0.6, 0.6, 0.6, 1.0))),
    );
    let volume_name = scene.add_volume_node().name.clone();

    let volumes = job.join().expect("Voxelization failed");
    for (grid, volume) in asset.grids().iter().zip(&volumes) {
        log::info!(
            "grid '{}': {} non-zero voxels, peak {}",
            grid.name,
            volume.non_zero_count(),
            volume.max_value()
        );
    }

    let mut device = FrameRecorder::new(&library);
    if let Some(material) = scene
        .node_mut(&volume_name)
        .and_then(SceneNode::material_mut)
        .and_then(Material::as_volume_mut)
    {
        install_volumes(material, &asset, &volumes, &mut device, &options)
            .expect("Failed to upload density textures");
        material.density_mut().select_texture(0);
    }

    // Switch to emissive shading the way an editor would
    scene
        .set_material_param(&volume_name, "shader_variant", ParamValue::Choice(1))
        .expect("Failed to set shader variant");
    scene
        .set_material_param(&volume_name, "step_length", ParamValue::Float(0.02))
        .expect("Failed to set step length");

    let mut camera = Camera::default();
    camera.look_at_box(Vec3::splat(-2.0), Vec3::splat(2.0));
    scene.show_wireframe = true;
    scene.render(&camera, &mut device);

    for draw in device.draws() {
        log::info!("draw '{}' with {:?} {:?}", draw.mesh, draw.shader, draw.state);
    }
    let source = scene
        .node(&volume_name)
        .and_then(SceneNode::material)
        .and_then(Material::as_volume)
        .map(|m| m.density().effective_source());
    assert_eq!(source, Some(DensitySource::GridTexture));

    let slice_path = std::env::temp_dir().join("volscope_sphere_slice.png");
    save_volume_slice(&slice_path, &volumes[0], options.voxel_resolution / 2)
        .expect("Failed to save slice");
    println!(
        "{} draws recorded, slice written to {}",
        device.draw_count(),
        slice_path.display()
    );
}
