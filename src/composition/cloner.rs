use glam::{Mat4, Vec3};
use log::debug;

use crate::assets::AssetCache;
use crate::catalog::AssetDescriptor;
use crate::scene_graph::{Object3D, ObjectId, Scene, Transform};

pub const ASSEMBLY_ROOT_NAME: &str = "assembly";

/// A private deep copy of one cached asset, placed in the assembly scene.
pub struct VisibleInstance {
    pub descriptor: &'static AssetDescriptor,
    /// Root of the copied subtree inside `Assembly::scene`.
    pub root: ObjectId,
    /// The root's pose as copied, before any animation.
    pub base: Transform,
    /// Center of the asset's own extent, in the root's frame.
    pub pivot: Vec3,
}

impl VisibleInstance {
    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }
}

/// The scene the host renders: a single root with one instance per visible
/// catalog entry below it, in catalog order.
pub struct Assembly {
    pub scene: Scene,
    pub root: ObjectId,
    pub instances: Vec<VisibleInstance>,
}

impl Assembly {
    pub fn empty() -> Self {
        let mut scene = Scene::new();
        let root = scene.add_object(Object3D::named(ASSEMBLY_ROOT_NAME));
        Self {
            scene,
            root,
            instances: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn instance(&self, name: &str) -> Option<&VisibleInstance> {
        self.instances
            .iter()
            .find(|instance| instance.name() == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.instances.iter().map(VisibleInstance::name).collect()
    }
}

impl Default for Assembly {
    fn default() -> Self {
        Self::empty()
    }
}

/// Rebuilds the assembly whenever the selected set changes.
///
/// Every rebuild starts from an empty scene and copies each selected asset out
/// of the cache again, so no state from an earlier copy survives a hide/show
/// cycle.
#[derive(Default)]
pub struct InstanceCloner {
    selected: Option<Vec<&'static str>>,
    rebuilds: u64,
}

impl InstanceCloner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the assembly has been rebuilt.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Returns true if `assembly` was rebuilt.
    pub fn sync(
        &mut self,
        selection: &[&'static AssetDescriptor],
        cache: &AssetCache,
        assembly: &mut Assembly,
    ) -> bool {
        let names: Vec<&'static str> = selection.iter().map(|descriptor| descriptor.name).collect();
        if self.selected.as_ref() == Some(&names) {
            return false;
        }

        *assembly = Self::build(selection, cache);
        self.rebuilds += 1;
        debug!(
            "Rebuilt assembly #{} with {} instances: {:?}",
            self.rebuilds,
            assembly.len(),
            names
        );
        self.selected = Some(names);
        true
    }

    fn build(selection: &[&'static AssetDescriptor], cache: &AssetCache) -> Assembly {
        let mut assembly = Assembly::empty();

        for &descriptor in selection {
            let Some((source, source_root)) = cache
                .get(descriptor.name)
                .and_then(|asset| asset.scene_root())
            else {
                continue;
            };
            let Some(root) = assembly
                .scene
                .copy_subtree(source, source_root, Some(assembly.root))
            else {
                continue;
            };

            let base = source
                .get_object_transform(source_root)
                .cloned()
                .unwrap_or_default();
            let pivot = source
                .subtree_bounds(source_root, Mat4::IDENTITY)
                .map(|bounds| bounds.center())
                .unwrap_or(Vec3::ZERO);

            assembly.instances.push(VisibleInstance {
                descriptor,
                root,
                base,
                pivot,
            });
        }

        assembly
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryProvider;
    use crate::catalog::{self, CATALOG};
    use crate::math::AABB;
    use crate::scene_graph::Mesh;

    fn boxed(name: &str, offset: Vec3) -> Scene {
        let mut scene = Scene::new();
        scene.add_object(
            Object3D::named(format!("{}_body", name))
                .with_transform(Transform::from_translation(offset))
                .with_mesh(Mesh::new(name, AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0)))),
        );
        scene
    }

    fn cache() -> AssetCache {
        let mut provider = MemoryProvider::new()
            .with("DUCT", boxed("DUCT", Vec3::ZERO))
            .with("FAN1", boxed("FAN1", Vec3::new(4.0, 0.0, 0.0)));
        AssetCache::preload(&CATALOG, &mut provider)
    }

    fn select(names: &[&str]) -> Vec<&'static AssetDescriptor> {
        names.iter().filter_map(|name| catalog::find(name)).collect()
    }

    #[test]
    fn test_sync_copies_selected_assets() {
        let cache = cache();
        let mut cloner = InstanceCloner::new();
        let mut assembly = Assembly::empty();

        assert!(cloner.sync(&select(&["DUCT", "FAN1"]), &cache, &mut assembly));
        assert_eq!(assembly.names(), vec!["DUCT", "FAN1"]);

        let fan = assembly.instance("FAN1").unwrap();
        assert_eq!(fan.pivot, Vec3::new(4.0, 0.0, 0.0));
        let root = assembly.scene.get_object(fan.root).unwrap();
        assert_eq!(root.parent_id, Some(assembly.root));
        assert_eq!(root.name, "FAN1");
    }

    #[test]
    fn test_sync_is_idempotent_for_same_selection() {
        let cache = cache();
        let mut cloner = InstanceCloner::new();
        let mut assembly = Assembly::empty();

        assert!(cloner.sync(&select(&["DUCT"]), &cache, &mut assembly));
        assert!(!cloner.sync(&select(&["DUCT"]), &cache, &mut assembly));
        assert!(cloner.sync(&select(&[]), &cache, &mut assembly));
        assert!(assembly.is_empty());
        assert_eq!(cloner.rebuilds(), 2);
    }

    #[test]
    fn test_copies_do_not_touch_cache() {
        let cache = cache();
        let mut cloner = InstanceCloner::new();
        let mut assembly = Assembly::empty();
        cloner.sync(&select(&["FAN1"]), &cache, &mut assembly);

        let body = assembly.scene.get_object_by_name("FAN1_body").unwrap();
        assembly
            .scene
            .set_object_translation(body, Vec3::new(-50.0, 0.0, 0.0));

        let (source, _) = cache.get("FAN1").unwrap().scene_root().unwrap();
        let source_body = source.get_object_by_name("FAN1_body").unwrap();
        assert_eq!(
            source.get_object_transform(source_body).unwrap().translation(),
            Vec3::new(4.0, 0.0, 0.0)
        );

        // A rebuild starts again from the cached pose
        cloner.sync(&select(&[]), &cache, &mut assembly);
        cloner.sync(&select(&["FAN1"]), &cache, &mut assembly);
        let body = assembly.scene.get_object_by_name("FAN1_body").unwrap();
        assert_eq!(
            assembly.scene.get_object_transform(body).unwrap().translation(),
            Vec3::new(4.0, 0.0, 0.0)
        );
    }
}
