use std::collections::HashMap;

use anyhow::anyhow;
use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::catalog::AssetDescriptor;
use crate::scene_graph::{Object3D, ObjectId, Scene};

/// A decoded asset: its own scene plus the single root every node hangs from.
pub struct SceneAsset {
    pub scene: Scene,
    pub root: ObjectId,
}

impl SceneAsset {
    /// Parents every current root of `scene` under a new root called `name`.
    pub fn wrap(name: &str, mut scene: Scene) -> Self {
        let top_level = scene.root_objects();
        let root = scene.add_object(Object3D::named(name));
        for object_id in top_level {
            scene.set_object_parent(object_id, Some(root));
        }
        Self { scene, root }
    }
}

pub type LoadResult = anyhow::Result<SceneAsset>;

/// Receiving end of one asset load. Polled without blocking; the sending end
/// may complete on any thread.
pub struct PendingAsset {
    receiver: oneshot::Receiver<LoadResult>,
}

impl PendingAsset {
    pub fn channel() -> (oneshot::Sender<LoadResult>, Self) {
        let (sender, receiver) = oneshot::channel();
        (sender, Self { receiver })
    }

    /// An already finished load.
    pub fn ready(result: LoadResult) -> Self {
        let (sender, pending) = Self::channel();
        // The receiver is alive, send cannot fail
        let _ = sender.send(result);
        pending
    }

    /// `None` while the load is still running.
    pub fn try_take(&mut self) -> Option<LoadResult> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(anyhow!(
                "asset loader dropped the request without answering"
            ))),
        }
    }
}

/// Starts loading catalog assets. Called at most once per descriptor.
pub trait AssetProvider {
    fn load(&mut self, descriptor: &'static AssetDescriptor) -> PendingAsset;
}

impl<F> AssetProvider for F
where
    F: FnMut(&'static AssetDescriptor) -> PendingAsset,
{
    fn load(&mut self, descriptor: &'static AssetDescriptor) -> PendingAsset {
        self(descriptor)
    }
}

/// Serves prebuilt scenes by catalog name. Names without a scene fail to load.
#[derive(Default)]
pub struct MemoryProvider {
    assets: HashMap<String, Scene>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, scene: Scene) {
        self.assets.insert(name.to_string(), scene);
    }

    pub fn with(mut self, name: &str, scene: Scene) -> Self {
        self.insert(name, scene);
        self
    }
}

impl AssetProvider for MemoryProvider {
    fn load(&mut self, descriptor: &'static AssetDescriptor) -> PendingAsset {
        let result = self
            .assets
            .remove(descriptor.name)
            .map(|scene| SceneAsset::wrap(descriptor.name, scene))
            .ok_or_else(|| anyhow!("no scene registered for {}", descriptor.source));
        PendingAsset::ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn test_wrap_collects_top_level_objects() {
        let mut scene = Scene::new();
        let a = scene.add_object(Object3D::named("a"));
        scene.add_child(a, Object3D::named("a_child"));
        scene.add_object(Object3D::named("b"));

        let asset = SceneAsset::wrap("DUCT", scene);
        assert_eq!(asset.scene.root_objects(), vec![asset.root]);
        let root = asset.scene.get_object(asset.root).unwrap();
        assert_eq!(root.name, "DUCT");
        assert_eq!(root.child_ids.len(), 2);
    }

    #[test]
    fn test_pending_channel() {
        let (sender, mut pending) = PendingAsset::channel();
        assert!(pending.try_take().is_none());
        let _ = sender.send(Ok(SceneAsset::wrap("x", Scene::new())));
        assert!(pending.try_take().unwrap().is_ok());
    }

    #[test]
    fn test_dropped_sender_is_a_failure() {
        let (sender, mut pending) = PendingAsset::channel();
        drop(sender);
        assert!(pending.try_take().unwrap().is_err());
    }

    #[test]
    fn test_memory_provider_missing_name_fails() {
        let mut provider = MemoryProvider::new().with("DUCT", Scene::new());
        let duct = catalog::find("DUCT").unwrap();
        let fan = catalog::find("FAN1").unwrap();

        assert!(provider.load(duct).try_take().unwrap().is_ok());
        assert!(provider.load(fan).try_take().unwrap().is_err());
        // Served once
        assert!(provider.load(duct).try_take().unwrap().is_err());
    }
}
