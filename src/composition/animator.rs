use std::f64::consts::TAU;
use std::time::Duration;

use glam::{Quat, Vec3};

use crate::catalog::{self, AssetDescriptor, Rotor};
use crate::composition::cloner::{Assembly, VisibleInstance};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Stopped,
    Spinning,
}

/// Angle accumulator for one rotatable catalog entry. Outlives the instance
/// copies, so a hidden fan resumes from where it stopped.
#[derive(Debug, Clone)]
pub struct RotationState {
    pub descriptor: &'static AssetDescriptor,
    pub rotor: Rotor,
    /// Radians, never wrapped. Kept in `f64` so it keeps growing over long runs.
    pub angle: f64,
    pub phase: Phase,
}

impl RotationState {
    fn new(descriptor: &'static AssetDescriptor, rotor: Rotor) -> Self {
        Self {
            descriptor,
            rotor,
            angle: 0.0,
            phase: Phase::Stopped,
        }
    }

    /// Root translation and rotation for the current angle: the base pose, spun
    /// about the rotor axis through the asset's pivot. The spin is applied in
    /// the parent frame, so the base scale is kept as is on every axis.
    fn pose(&self, instance: &VisibleInstance) -> (Vec3, Quat) {
        let base = &instance.base;
        let axis = base.rotation() * self.rotor.axis.try_normalize().unwrap_or(Vec3::X);
        let spin = Quat::from_axis_angle(axis, self.angle.rem_euclid(TAU) as f32);
        let pivot = base.local_matrix().transform_point3(instance.pivot);

        let translation = pivot + spin * (base.translation() - pivot);
        (translation, (spin * base.rotation()).normalize())
    }
}

pub struct FanAnimator {
    states: Vec<RotationState>,
}

impl FanAnimator {
    pub fn new() -> Self {
        let states = catalog::rotatable()
            .filter_map(|descriptor| {
                let rotor = *descriptor.rotor()?;
                Some(RotationState::new(descriptor, rotor))
            })
            .collect();
        Self { states }
    }

    pub fn states(&self) -> &[RotationState] {
        &self.states
    }

    fn state(&self, name: &str) -> Option<&RotationState> {
        self.states.iter().find(|state| state.descriptor.name == name)
    }

    pub fn angle(&self, name: &str) -> Option<f64> {
        self.state(name).map(|state| state.angle)
    }

    pub fn phase(&self, name: &str) -> Option<Phase> {
        self.state(name).map(|state| state.phase)
    }

    /// Advances every spinning fan by `elapsed` and poses its copy.
    ///
    /// `recomposed` must be set on the tick the assembly was rebuilt, so fresh
    /// copies pick up the retained angle even when nothing is spinning.
    pub fn tick(
        &mut self,
        elapsed: Duration,
        fan_animation: bool,
        assembly: &mut Assembly,
        recomposed: bool,
    ) {
        let dt = elapsed.as_secs_f64();

        for state in &mut self.states {
            let instance = assembly
                .instances
                .iter()
                .find(|instance| instance.name() == state.descriptor.name);

            state.phase = match (fan_animation, instance.is_some()) {
                (true, true) => Phase::Spinning,
                _ => Phase::Stopped,
            };

            let Some(instance) = instance else {
                continue;
            };

            if state.phase == Phase::Spinning {
                state.angle += dt * f64::from(state.rotor.angular_speed);
            } else if !recomposed {
                continue;
            }

            let (translation, rotation) = state.pose(instance);
            let (root, scale) = (instance.root, instance.base.scale());
            assembly
                .scene
                .set_object_transform(root, translation, rotation, scale);
        }
    }
}

impl Default for FanAnimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetCache, MemoryProvider};
    use crate::catalog::CATALOG;
    use crate::composition::cloner::InstanceCloner;
    use crate::math::AABB;
    use crate::scene_graph::{Mesh, Object3D, Scene, Transform};

    const FRAME: Duration = Duration::from_millis(16);

    fn fan_scene() -> Scene {
        let mut scene = Scene::new();
        let extent = AABB::new(Vec3::new(0.0, 1.0, 1.0), Vec3::new(2.0, 3.0, 3.0));
        scene.add_object(Object3D::named("blades").with_mesh(Mesh::new("blades", extent)));
        scene
    }

    fn visible(names: &[&str]) -> (AssetCache, InstanceCloner, Assembly) {
        let mut provider = MemoryProvider::new()
            .with("FAN1", fan_scene())
            .with("FAN2", fan_scene())
            .with("DUCT", Scene::new());
        let cache = AssetCache::preload(&CATALOG, &mut provider);
        let mut cloner = InstanceCloner::new();
        let mut assembly = Assembly::empty();
        let selection: Vec<_> = names.iter().filter_map(|name| catalog::find(name)).collect();
        cloner.sync(&selection, &cache, &mut assembly);
        (cache, cloner, assembly)
    }

    #[test]
    fn test_one_state_per_rotatable_entry() {
        let animator = FanAnimator::new();
        let names: Vec<_> = animator.states().iter().map(|s| s.descriptor.name).collect();
        assert_eq!(names, vec!["FAN1", "FAN2"]);
        assert_eq!(animator.phase("FAN1"), Some(Phase::Stopped));
        assert_eq!(animator.angle("DUCT"), None);
    }

    #[test]
    fn test_spins_only_when_enabled_and_visible() {
        let (_, _, mut assembly) = visible(&["FAN1", "DUCT"]);
        let mut animator = FanAnimator::new();

        animator.tick(FRAME, false, &mut assembly, true);
        assert_eq!(animator.angle("FAN1"), Some(0.0));

        animator.tick(Duration::from_millis(500), true, &mut assembly, false);
        assert_eq!(animator.phase("FAN1"), Some(Phase::Spinning));
        assert_eq!(animator.phase("FAN2"), Some(Phase::Stopped));
        assert!((animator.angle("FAN1").unwrap() - 1.0).abs() < 1e-5);
        assert_eq!(animator.angle("FAN2"), Some(0.0));
    }

    #[test]
    fn test_fans_have_their_own_speed() {
        let (_, _, mut assembly) = visible(&["FAN1", "FAN2"]);
        let mut animator = FanAnimator::new();
        animator.tick(Duration::from_secs(1), true, &mut assembly, true);
        assert!((animator.angle("FAN1").unwrap() - 2.0).abs() < 1e-5);
        assert!((animator.angle("FAN2").unwrap() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotates_about_pivot() {
        let (_, _, mut assembly) = visible(&["FAN1"]);
        let mut animator = FanAnimator::new();
        // Half a turn at 2 rad/s
        animator.tick(
            Duration::from_secs_f32(std::f32::consts::FRAC_PI_2),
            true,
            &mut assembly,
            false,
        );

        let fan = assembly.instance("FAN1").unwrap();
        let transform = assembly.scene.get_object_transform(fan.root).unwrap();
        let pivot = Vec3::new(1.0, 2.0, 2.0);
        assert_eq!(fan.pivot, pivot);
        // The pivot stays put, so the bounds do not drift
        let moved = transform.local_matrix().transform_point3(pivot);
        assert!(moved.abs_diff_eq(pivot, 1e-4));
        let corner = transform.local_matrix().transform_point3(Vec3::new(0.0, 1.0, 1.0));
        assert!(corner.abs_diff_eq(Vec3::new(0.0, 3.0, 3.0), 1e-4));
    }

    #[test]
    fn test_angle_survives_rebuild() {
        let (cache, mut cloner, mut assembly) = visible(&["FAN1"]);
        let mut animator = FanAnimator::new();
        animator.tick(Duration::from_millis(250), true, &mut assembly, true);
        let before = animator.angle("FAN1").unwrap();

        let none: Vec<&'static AssetDescriptor> = Vec::new();
        let recomposed = cloner.sync(&none, &cache, &mut assembly);
        animator.tick(FRAME, true, &mut assembly, recomposed);
        assert_eq!(animator.phase("FAN1"), Some(Phase::Stopped));
        assert_eq!(animator.angle("FAN1"), Some(before));

        let fan = vec![catalog::find("FAN1").unwrap()];
        let recomposed = cloner.sync(&fan, &cache, &mut assembly);
        animator.tick(FRAME, false, &mut assembly, recomposed);
        let root = assembly.instance("FAN1").unwrap().root;
        let rotation = assembly.scene.get_object_transform(root).unwrap().rotation();
        let expected = Quat::from_rotation_x(before as f32) * Vec3::Y;
        assert!((rotation * Vec3::Y).abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_keeps_advancing_after_days_of_spinning() {
        let (_, _, mut assembly) = visible(&["FAN1"]);
        let mut animator = FanAnimator::new();
        animator.tick(Duration::from_secs(12 * 24 * 3600), true, &mut assembly, true);
        let before = animator.angle("FAN1").unwrap();

        let step = Duration::from_secs_f64(1.0 / 60.0);
        let mut last = before;
        for _ in 0..60 {
            animator.tick(step, true, &mut assembly, false);
            let angle = animator.angle("FAN1").unwrap();
            assert!(angle > last);
            last = angle;
        }
        assert!((last - before - 2.0).abs() < 1e-5, "advanced {}", last - before);
    }

    #[test]
    fn test_spin_keeps_non_uniform_base_scale() {
        let descriptor = catalog::find("FAN1").unwrap();
        let stretch = Vec3::new(1.0, 4.0, 1.0);
        let base = Transform::from_trs(Vec3::new(0.0, 0.0, 5.0), Quat::IDENTITY, stretch);
        let pivot = Vec3::new(0.0, 0.5, 0.0);

        let mut assembly = Assembly::empty();
        let root = assembly
            .scene
            .add_child(assembly.root, Object3D::named("FAN1").with_transform(base.clone()));
        assembly.instances.push(VisibleInstance {
            descriptor,
            root,
            base: base.clone(),
            pivot,
        });

        let mut animator = FanAnimator::new();
        animator.tick(Duration::from_millis(400), true, &mut assembly, false);

        let posed = assembly.scene.get_object_transform(root).unwrap();
        assert_eq!(posed.scale(), stretch);
        // The pivot does not move, whatever the stretch
        let anchored = posed.local_matrix().transform_point3(pivot);
        assert!(anchored.abs_diff_eq(base.local_matrix().transform_point3(pivot), 1e-4));
        assert!(!posed.rotation().abs_diff_eq(Quat::IDENTITY, 1e-3));
    }
}
