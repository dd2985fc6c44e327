//! Scene nodes and the scene they live in.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use glam::{Mat4, Vec3};
use volscope_core::{LightingContext, Options, SceneAdjustment};
use volscope_render::{
    Camera, Material, Mesh, ParamValue, RenderDevice, RenderError, RenderResult, ShaderLibrary,
};

static NODE_ID: AtomicU32 = AtomicU32::new(0);
static VOLUME_NODE_ID: AtomicU32 = AtomicU32::new(0);

/// Half extent of the proxy cube drawn for volume nodes.
pub const VOLUME_PROXY_HALF_EXTENT: f32 = 1.0;

/// What a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A mesh with an arbitrary material.
    Base,
    /// A proxy cube drawn with a volume material.
    Volume,
}

/// A drawable entry of the scene.
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Unique display name.
    pub name: String,
    /// Local-to-world transform.
    pub model: Mat4,
    /// Whether the node is drawn.
    pub visible: bool,
    kind: NodeKind,
    mesh: Option<Arc<Mesh>>,
    material: Option<Material>,
}

impl SceneNode {
    /// Creates an empty node. Without a name, `Node{n}` is generated.
    pub fn new(name: Option<&str>) -> Self {
        let name = name.map_or_else(
            || format!("Node{}", NODE_ID.fetch_add(1, Ordering::Relaxed)),
            str::to_string,
        );
        Self {
            name,
            model: Mat4::IDENTITY,
            visible: true,
            kind: NodeKind::Base,
            mesh: None,
            material: None,
        }
    }

    /// Creates a volume node: a unit proxy cube with a volume material.
    pub fn volume(library: &ShaderLibrary, options: &Options) -> Self {
        let name = format!("VolumeNode{}", VOLUME_NODE_ID.fetch_add(1, Ordering::Relaxed));
        let mesh = Mesh::cube(format!("{name} proxy"), VOLUME_PROXY_HALF_EXTENT);
        Self {
            name,
            model: Mat4::IDENTITY,
            visible: true,
            kind: NodeKind::Volume,
            mesh: Some(Arc::new(mesh)),
            material: Some(Material::volume(library, options)),
        }
    }

    /// Sets the mesh.
    #[must_use]
    pub fn with_mesh(mut self, mesh: Arc<Mesh>) -> Self {
        self.mesh = Some(mesh);
        self
    }

    /// Sets the material.
    #[must_use]
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    /// Sets the model transform.
    #[must_use]
    pub fn with_model(mut self, model: Mat4) -> Self {
        self.model = model;
        self
    }

    /// Returns the node kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the mesh.
    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_deref()
    }

    /// Replaces the mesh.
    pub fn set_mesh(&mut self, mesh: Option<Arc<Mesh>>) {
        self.mesh = mesh;
    }

    /// Returns the material.
    pub fn material(&self) -> Option<&Material> {
        self.material.as_ref()
    }

    /// Returns the material for editing.
    pub fn material_mut(&mut self) -> Option<&mut Material> {
        self.material.as_mut()
    }

    /// Replaces the material.
    pub fn set_material(&mut self, material: Option<Material>) {
        self.material = material;
    }

    /// Returns the world-space bounding box of the mesh.
    pub fn world_bounds(&self) -> Option<(Vec3, Vec3)> {
        let mesh = self.mesh.as_deref()?;
        let (min, max) = (mesh.aabb_min(), mesh.aabb_max());
        let mut lo = Vec3::splat(f32::MAX);
        let mut hi = Vec3::splat(f32::MIN);
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { min.x } else { max.x },
                if i & 2 == 0 { min.y } else { max.y },
                if i & 4 == 0 { min.z } else { max.z },
            );
            let p = self.model.transform_point3(corner);
            lo = lo.min(p);
            hi = hi.max(p);
        }
        Some((lo, hi))
    }

    /// Draws the node with its material when visible.
    pub fn render(
        &mut self,
        camera: &Camera,
        lighting: &LightingContext,
        device: &mut dyn RenderDevice,
    ) {
        if !self.visible {
            return;
        }
        if let Some(material) = self.material.as_mut() {
            material.render(self.mesh.as_deref(), self.model, camera, lighting, device);
        }
    }

    /// Draws the node's mesh with a temporary wireframe material.
    pub fn render_wireframe(
        &self,
        library: &ShaderLibrary,
        camera: &Camera,
        lighting: &LightingContext,
        device: &mut dyn RenderDevice,
    ) {
        let mut wireframe = Material::wireframe(library);
        wireframe.render(self.mesh.as_deref(), self.model, camera, lighting, device);
    }
}

/// The node list plus the lighting and options shared by every node.
#[derive(Debug)]
pub struct Scene {
    nodes: Vec<SceneNode>,
    /// Lights and ambient term passed to every draw.
    pub lighting: LightingContext,
    /// Whether node meshes are overlaid as wireframes.
    pub show_wireframe: bool,
    options: Options,
    library: ShaderLibrary,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Scene {
    /// Creates an empty scene with the built-in shader programs.
    pub fn new(options: Options) -> Self {
        Self::with_library(options, ShaderLibrary::with_defaults())
    }

    /// Creates an empty scene resolving shaders through `library`.
    pub fn with_library(options: Options, library: ShaderLibrary) -> Self {
        let mut lighting = LightingContext::with_ambient(options.ambient_light);
        lighting.background_color = options.background_color;
        Self {
            nodes: Vec::new(),
            lighting,
            show_wireframe: false,
            options,
            library,
        }
    }

    /// Returns the options the scene was created with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns the shader library.
    pub fn library(&self) -> &ShaderLibrary {
        &self.library
    }

    /// Adds a node and returns it.
    pub fn add_node(&mut self, node: SceneNode) -> &mut SceneNode {
        log::debug!(
            "adding node '{}' with {} material",
            node.name,
            node.material().map_or("no", Material::kind_name)
        );
        self.nodes.push(node);
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    /// Adds a new volume node and returns it.
    pub fn add_volume_node(&mut self) -> &mut SceneNode {
        let node = SceneNode::volume(&self.library, &self.options);
        self.add_node(node)
    }

    /// Removes a node by name.
    pub fn remove_node(&mut self, name: &str) -> Option<SceneNode> {
        let idx = self.nodes.iter().position(|n| n.name == name)?;
        Some(self.nodes.remove(idx))
    }

    /// Returns all nodes in draw order.
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    /// Finds a node by name.
    pub fn node(&self, name: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Finds a node by name for editing.
    pub fn node_mut(&mut self, name: &str) -> Option<&mut SceneNode> {
        self.nodes.iter_mut().find(|n| n.name == name)
    }

    /// Applies a scene adjustment suggested by a material edit.
    pub fn apply_adjustment(&mut self, adjustment: SceneAdjustment) {
        self.lighting.apply(adjustment);
    }

    /// Edits a material parameter of a node, applying any suggested scene
    /// adjustment.
    pub fn set_material_param(
        &mut self,
        node: &str,
        name: &str,
        value: ParamValue,
    ) -> RenderResult<()> {
        let material = self
            .nodes
            .iter_mut()
            .find(|n| n.name == node)
            .and_then(SceneNode::material_mut)
            .ok_or_else(|| RenderError::UnknownParameter(format!("{node}.{name}")))?;
        if let Some(adjustment) = material.set_param(name, value)? {
            self.apply_adjustment(adjustment);
        }
        Ok(())
    }

    /// Draws every node in order, followed by wireframe overlays if enabled.
    pub fn render(&mut self, camera: &Camera, device: &mut dyn RenderDevice) {
        for node in &mut self.nodes {
            node.render(camera, &self.lighting, device);
        }
        if self.show_wireframe {
            for node in &self.nodes {
                node.render_wireframe(&self.library, camera, &self.lighting, device);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_names() {
        let a = SceneNode::new(None);
        let b = SceneNode::new(None);
        assert!(a.name.starts_with("Node"));
        assert_ne!(a.name, b.name);
        assert_eq!(SceneNode::new(Some("custom")).name, "custom");

        let volume = SceneNode::volume(&ShaderLibrary::with_defaults(), &Options::default());
        assert!(volume.name.starts_with("VolumeNode"));
        assert_eq!(volume.kind(), NodeKind::Volume);
        assert_eq!(volume.mesh().unwrap().triangle_count(), 12);
        assert!(volume.material().unwrap().as_volume().is_some());
    }

    #[test]
    fn test_world_bounds() {
        let node = SceneNode::new(Some("box"))
            .with_mesh(Arc::new(Mesh::cube("cube", 1.0)))
            .with_model(Mat4::from_translation(Vec3::X) * Mat4::from_scale(Vec3::splat(2.0)));
        let (min, max) = node.world_bounds().unwrap();
        assert!((min - Vec3::new(-1.0, -2.0, -2.0)).length() < 1e-5);
        assert!((max - Vec3::new(3.0, 2.0, 2.0)).length() < 1e-5);
        assert!(SceneNode::new(None).world_bounds().is_none());
    }

    #[test]
    fn test_scene_lighting_from_options() {
        let options = Options::default().with_ambient_light(Vec3::splat(0.4));
        let mut scene = Scene::new(options);
        assert_eq!(scene.lighting.ambient_light, Vec3::splat(0.4));

        scene.apply_adjustment(SceneAdjustment::SetAmbientLight(Vec3::ONE));
        assert_eq!(scene.lighting.ambient_light, Vec3::ONE);
    }

    #[test]
    fn test_node_lookup() {
        let mut scene = Scene::default();
        let name = scene.add_volume_node().name.clone();
        scene.add_node(SceneNode::new(Some("plain")));
        assert_eq!(scene.nodes().len(), 2);
        assert!(scene.node(&name).is_some());
        assert!(scene.node_mut("plain").is_some());
        assert!(scene.remove_node("plain").is_some());
        assert!(scene.node("plain").is_none());
        assert!(scene
            .set_material_param("missing", "color", ParamValue::Bool(true))
            .is_err());
    }
}
