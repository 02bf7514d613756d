use glam::Vec3;
use log::info;

use crate::composition::cloner::Assembly;
use crate::math::{bounds, AABB};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CenterState {
    pub last_center: Vec3,
    pub has_centered: bool,
}

/// Union of every instance's extent in assembly space, using each instance's
/// base pose so a spinning fan does not move the box.
pub fn assembly_bounds(assembly: &Assembly) -> Option<AABB> {
    bounds::union_all(assembly.instances.iter().filter_map(|instance| {
        assembly
            .scene
            .subtree_bounds(instance.root, instance.base.local_matrix())
    }))
}

/// Centers the assembly on the origin the first time anything is shown, and
/// never again.
///
/// Later visibility changes keep the same offset so the orbit target does not
/// jump while parts are toggled.
#[derive(Debug, Default)]
pub struct BoundingCenter {
    state: CenterState,
}

impl BoundingCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CenterState {
        self.state
    }

    /// Returns the center if this call latched it. `on_center` runs at most
    /// once over the lifetime of `self`.
    pub fn apply(&mut self, assembly: &mut Assembly, on_center: &mut dyn FnMut(Vec3)) -> Option<Vec3> {
        if self.state.has_centered {
            // Rebuilt assemblies get the latched offset back
            let offset = -self.state.last_center;
            let current = assembly
                .scene
                .get_object_transform(assembly.root)
                .map(|transform| transform.translation());
            if current != Some(offset) {
                assembly.scene.set_object_translation(assembly.root, offset);
            }
            return None;
        }

        if assembly.is_empty() {
            return None;
        }

        let center = assembly_bounds(assembly)?.center();
        assembly.scene.set_object_translation(assembly.root, -center);
        self.state = CenterState {
            last_center: center,
            has_centered: true,
        };
        info!("Centered assembly on {:?}", center);
        on_center(center);

        Some(center)
    }
}
