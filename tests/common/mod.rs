#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use glam::Vec3;
use tokio::sync::oneshot;

use hvac_viewer::assets::{LoadResult, MemoryProvider, PendingAsset, SceneAsset};
use hvac_viewer::catalog::{self, AssetDescriptor};
use hvac_viewer::config::ViewerConfig;
use hvac_viewer::math::AABB;
use hvac_viewer::scene_graph::{Mesh, Object3D, Scene, Transform};
use hvac_viewer::HvacViewer;

pub const FRAME: Duration = Duration::from_millis(16);

pub type Senders = Rc<RefCell<HashMap<&'static str, oneshot::Sender<LoadResult>>>>;

/// A box-shaped stand-in for one catalog entry, laid out along X in catalog
/// order. Instrumented entries get their anchor node, rotatable ones a blade.
pub fn synthetic_asset(descriptor: &AssetDescriptor) -> Scene {
    let index = catalog::position(descriptor.name).unwrap_or(0) as f32;
    let mut scene = Scene::new();

    let body = scene.add_object(
        Object3D::named(format!("{}_body", descriptor.name))
            .with_transform(Transform::from_translation(Vec3::new(index * 2.0, 0.0, 0.0)))
            .with_mesh(Mesh::new(
                descriptor.name,
                AABB::new(Vec3::splat(-0.75), Vec3::splat(0.75)),
            )),
    );

    if let Some(readout) = descriptor.readout() {
        scene.add_child(
            body,
            Object3D::named(readout.node)
                .with_transform(Transform::from_translation(Vec3::new(0.0, 1.0, 0.0))),
        );
    }

    if descriptor.is_rotatable() {
        scene.add_child(
            body,
            Object3D::named("blade")
                .with_transform(Transform::from_translation(Vec3::new(0.0, 0.5, 0.0)))
                .with_mesh(Mesh::new(
                    "blade",
                    AABB::new(Vec3::new(-0.1, -0.5, -0.5), Vec3::new(0.1, 0.5, 0.5)),
                )),
        );
    }

    scene
}

/// Serves a synthetic scene for every catalog entry except `missing`.
pub fn provider_without(missing: &[&str]) -> MemoryProvider {
    let mut provider = MemoryProvider::new();
    for descriptor in catalog::catalog() {
        if !missing.contains(&descriptor.name) {
            provider.insert(descriptor.name, synthetic_asset(descriptor));
        }
    }
    provider
}

pub fn full_provider() -> MemoryProvider {
    provider_without(&[])
}

pub fn viewer() -> HvacViewer {
    HvacViewer::new(ViewerConfig::default(), &mut full_provider())
}

/// A viewer whose loads finish only when the test answers them through the
/// returned map of senders.
pub fn deferred_viewer() -> (HvacViewer, Senders) {
    let senders = Senders::default();
    let stash = senders.clone();
    let mut provider = move |descriptor: &'static AssetDescriptor| {
        let (sender, pending) = PendingAsset::channel();
        stash.borrow_mut().insert(descriptor.name, sender);
        pending
    };
    let viewer = HvacViewer::new(ViewerConfig::default(), &mut provider);
    (viewer, senders)
}

pub fn complete(senders: &Senders, name: &'static str) {
    let descriptor = catalog::find(name).unwrap();
    let sender = senders.borrow_mut().remove(name).unwrap();
    let scene = synthetic_asset(descriptor);
    let _ = sender.send(Ok(SceneAsset::wrap(name, scene)));
}

pub fn fail(senders: &Senders, name: &'static str) {
    // Dropping the sender reads as a failed load
    senders.borrow_mut().remove(name);
}
