use glam::Vec3;

use crate::camera::Camera;
use crate::composition::annotations::{AnnotationEntry, TelemetryRow};
use crate::composition::cloner::Assembly;
use crate::config::{LightingConfig, ViewerConfig};
use crate::scene_graph::{ObjectId, Scene};

/// A screen-facing label box anchored at a point of the assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub target: &'static str,
    /// Anchor in the assembly root's frame, before centering.
    pub position: Vec3,
    /// Anchor after the centering offset, as the host renders it.
    pub world_position: Vec3,
    pub rows: Vec<TelemetryRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawItem {
    Grid { size: f32, divisions: u32 },
    Axes { length: f32 },
    Instance { name: &'static str, root: ObjectId },
    Overlay(Overlay),
}

/// Everything the host draws for one tick, in draw order.
pub struct Frame<'a> {
    pub scene: &'a Scene,
    pub items: Vec<DrawItem>,
    pub camera: &'a Camera,
    pub lighting: &'a LightingConfig,
}

impl<'a> Frame<'a> {
    pub fn instances(&self) -> impl Iterator<Item = (&'static str, ObjectId)> + '_ {
        self.items.iter().filter_map(|item| match *item {
            DrawItem::Instance { name, root } => Some((name, root)),
            _ => None,
        })
    }

    pub fn overlays(&self) -> impl Iterator<Item = &Overlay> + '_ {
        self.items.iter().filter_map(|item| match item {
            DrawItem::Overlay(overlay) => Some(overlay),
            _ => None,
        })
    }

    pub fn instance_count(&self) -> usize {
        self.instances().count()
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays().count()
    }

    pub fn overlay(&self, target: &str) -> Option<&Overlay> {
        self.overlays().find(|overlay| overlay.target == target)
    }
}

/// Lays out grid, axes, every instance and then the overlays of visible
/// instrumented instances.
pub fn assemble<'a>(
    config: &'a ViewerConfig,
    assembly: &'a Assembly,
    annotations: &[AnnotationEntry],
) -> Frame<'a> {
    let mut items = vec![
        DrawItem::Grid {
            size: config.grid.size,
            divisions: config.grid.divisions,
        },
        DrawItem::Axes {
            length: config.axes_length,
        },
    ];

    items.extend(assembly.instances.iter().map(|instance| DrawItem::Instance {
        name: instance.name(),
        root: instance.root,
    }));

    let centering = assembly
        .scene
        .get_object_transform(assembly.root)
        .map(|transform| transform.local_matrix())
        .unwrap_or_default();

    items.extend(annotations.iter().filter_map(|entry| {
        let instance = assembly.instance(entry.target)?;
        let position = instance
            .base
            .local_matrix()
            .transform_point3(entry.local_position);
        Some(DrawItem::Overlay(Overlay {
            target: entry.target,
            position,
            world_position: centering.transform_point3(position),
            rows: entry.payload.clone(),
        }))
    }));

    Frame {
        scene: &assembly.scene,
        items,
        camera: &config.camera,
        lighting: &config.lighting,
    }
}
