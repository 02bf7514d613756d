use glam::Vec3;
use log::{debug, warn};

use crate::assets::{AssetCache, LoadState};
use crate::catalog::{self, Readings};
use crate::composition::cloner::Assembly;
use crate::scene_graph::{ObjectId, Scene};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryRow {
    pub label: String,
    pub value: String,
}

impl TelemetryRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A label anchored inside an instrumented asset.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationEntry {
    pub target: &'static str,
    /// Anchor sub-node origin in the frame of the asset's root.
    pub local_position: Vec3,
    pub payload: Vec<TelemetryRow>,
}

/// Rows shown for `readings`. Fan rates read zero unless the fans spin.
pub fn telemetry(readings: &Readings, fan_animation: bool) -> Vec<TelemetryRow> {
    match *readings {
        Readings::Rotor {
            rated_rpm,
            rated_airflow,
        } => {
            let (status, rpm, airflow) = if fan_animation {
                ("Running", rated_rpm, rated_airflow)
            } else {
                ("Stopped", 0.0, 0.0)
            };
            vec![
                TelemetryRow::new("Status", status),
                TelemetryRow::new("Speed", format!("{:.0} rpm", rpm)),
                TelemetryRow::new("Airflow", format!("{:.0} m³/h", airflow)),
            ]
        }
        Readings::Fixed(rows) => rows
            .iter()
            .map(|&(label, value)| TelemetryRow::new(label, value))
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RefreshKey {
    readiness: Vec<Option<LoadState>>,
    fan_animation: bool,
}

/// Resolves annotation anchors for the instrumented catalog entries.
///
/// Entries are rebuilt only when an instrumented asset changes load state or
/// the fan flag flips. Anchors are looked up in the rendered copy when the
/// asset is on screen, otherwise in the cached asset; both agree below the
/// asset root because no stage moves inner nodes.
#[derive(Debug, Default)]
pub struct AnnotationLocator {
    key: Option<RefreshKey>,
    entries: Vec<AnnotationEntry>,
}

impl AnnotationLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[AnnotationEntry] {
        &self.entries
    }

    pub fn entry(&self, name: &str) -> Option<&AnnotationEntry> {
        self.entries.iter().find(|entry| entry.target == name)
    }

    /// Returns true if the entries were rebuilt.
    pub fn refresh(&mut self, cache: &AssetCache, assembly: &Assembly, fan_animation: bool) -> bool {
        let key = RefreshKey {
            readiness: catalog::instrumented()
                .map(|descriptor| cache.load_state(descriptor.name))
                .collect(),
            fan_animation,
        };
        if self.key.as_ref() == Some(&key) {
            return false;
        }

        self.entries = catalog::instrumented()
            .filter_map(|descriptor| {
                let readout = descriptor.readout()?;
                let (scene, root) = Self::anchor_source(descriptor.name, cache, assembly)?;

                let Some(node) = scene.find_descendant_by_name(root, readout.node) else {
                    warn!(
                        "{} has no node named {}, skipping its annotation",
                        descriptor.name, readout.node
                    );
                    return None;
                };

                Some(AnnotationEntry {
                    target: descriptor.name,
                    local_position: scene.relative_position(root, node)?,
                    payload: telemetry(&readout.readings, fan_animation),
                })
            })
            .collect();

        debug!(
            "Resolved {} annotations (fan animation {})",
            self.entries.len(),
            fan_animation
        );
        self.key = Some(key);
        true
    }

    fn anchor_source<'a>(
        name: &str,
        cache: &'a AssetCache,
        assembly: &'a Assembly,
    ) -> Option<(&'a Scene, ObjectId)> {
        match assembly.instance(name) {
            Some(instance) => Some((&assembly.scene, instance.root)),
            None => cache.get(name)?.scene_root(),
        }
    }
}
