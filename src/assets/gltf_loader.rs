use std::path::{Path, PathBuf};

use anyhow::Context;
use glam::{Quat, Vec3};
use log::debug;
use tokio::runtime::Handle;

use crate::assets::provider::{AssetProvider, PendingAsset, SceneAsset};
use crate::catalog::AssetDescriptor;
use crate::math::{bounds, AABB};
use crate::scene_graph::{Mesh, Object3D, ObjectId, Scene, Transform};

/// Loads catalog assets from glTF/GLB files under `root`, one blocking task
/// per file on the given runtime.
pub struct GltfProvider {
    root: PathBuf,
    runtime: Handle,
}

impl GltfProvider {
    pub fn new(root: impl Into<PathBuf>, runtime: Handle) -> Self {
        Self {
            root: root.into(),
            runtime,
        }
    }
}

impl AssetProvider for GltfProvider {
    fn load(&mut self, descriptor: &'static AssetDescriptor) -> PendingAsset {
        let (sender, pending) = PendingAsset::channel();
        let path = self.root.join(descriptor.source);

        self.runtime.spawn_blocking(move || {
            let result = load_gltf(&path, descriptor.name);
            // The cache may have been dropped in the meantime
            let _ = sender.send(result);
        });

        pending
    }
}

pub fn load_gltf(path: &Path, name: &str) -> anyhow::Result<SceneAsset> {
    let gltf = gltf::Gltf::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    scene_from_document(&gltf, name)
        .with_context(|| format!("Failed to convert {}", path.display()))
}

/// Converts the default scene of `document` (or its first scene) into a
/// `SceneAsset` whose root is called `name`.
pub fn scene_from_document(document: &gltf::Document, name: &str) -> anyhow::Result<SceneAsset> {
    let gltf_scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .context("No scenes in gltf")?;

    let mut scene = Scene::new();
    for node in gltf_scene.nodes() {
        spawn_gltf_node(&mut scene, &node, None);
    }

    debug!("Converted {} into {} objects", name, scene.len());
    Ok(SceneAsset::wrap(name, scene))
}

fn spawn_gltf_node(scene: &mut Scene, node: &gltf::Node, parent: Option<ObjectId>) -> ObjectId {
    let node_name = node.name().unwrap_or("Unnamed").to_string();
    let (translation, rotation, scale) = node.transform().decomposed();

    let mut object = Object3D::named(node_name.clone()).with_transform(Transform::from_trs(
        translation.into(),
        Quat::from_array(rotation),
        scale.into(),
    ));

    if let Some(mesh) = node.mesh() {
        let mesh_bounds = bounds::union_all(mesh.primitives().filter_map(|primitive| {
            // bounding_box() reads the POSITION accessor's min/max
            primitive.get(&gltf::Semantic::Positions)?;
            let bounding_box = primitive.bounding_box();
            Some(AABB::new(
                Vec3::from(bounding_box.min),
                Vec3::from(bounding_box.max),
            ))
        }));

        if let Some(mesh_bounds) = mesh_bounds {
            let mesh_name = mesh
                .name()
                .map(String::from)
                .unwrap_or_else(|| format!("{} (Mesh)", node_name));
            object = object.with_mesh(Mesh::new(mesh_name, mesh_bounds));
        }
    }

    let object_id = scene.add_object(object);

    if let Some(parent_id) = parent {
        scene.set_object_parent(object_id, Some(parent_id));
    }

    for child in node.children() {
        spawn_gltf_node(scene, &child, Some(object_id));
    }

    object_id
}
