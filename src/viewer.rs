use std::time::Duration;

use glam::Vec3;
use log::debug;

use crate::assets::{AssetCache, AssetProvider};
use crate::catalog;
use crate::composition::{
    assembler, select_visible, AnnotationLocator, Assembly, BoundingCenter, CenterState,
    FanAnimator, Frame, InstanceCloner,
};
use crate::config::ViewerConfig;
use crate::visibility::VisibilityState;

type CenterCallback = Box<dyn FnMut(Vec3)>;

/// The scene-composition core. Owns the asset cache and every per-stage
/// state; the host feeds it inputs once per rendered frame.
pub struct HvacViewer {
    config: ViewerConfig,
    cache: AssetCache,
    cloner: InstanceCloner,
    assembly: Assembly,
    centering: BoundingCenter,
    annotations: AnnotationLocator,
    animator: FanAnimator,
    on_center_change: Option<CenterCallback>,
    frames: u64,
}

impl HvacViewer {
    /// Starts loading every catalog asset through `provider`.
    pub fn new(config: ViewerConfig, provider: &mut dyn AssetProvider) -> Self {
        let cache = AssetCache::preload(catalog::catalog(), provider);
        Self {
            config,
            cache,
            cloner: InstanceCloner::new(),
            assembly: Assembly::empty(),
            centering: BoundingCenter::new(),
            annotations: AnnotationLocator::new(),
            animator: FanAnimator::new(),
            on_center_change: None,
            frames: 0,
        }
    }

    /// Called once, with the assembly center, the first time anything is
    /// shown.
    pub fn on_center_change(mut self, callback: impl FnMut(Vec3) + 'static) -> Self {
        self.on_center_change = Some(Box::new(callback));
        self
    }

    /// Runs one frame: selection, cloning, centering, annotation, animation
    /// and finally layout of the frame handed to the host.
    pub fn tick(
        &mut self,
        visibility: &VisibilityState,
        fan_animation: bool,
        elapsed: Duration,
    ) -> Frame<'_> {
        self.assembly.scene.early_update();
        self.cache.poll();

        let selection = select_visible(catalog::catalog(), visibility, &self.cache);
        let recomposed = self
            .cloner
            .sync(&selection, &self.cache, &mut self.assembly);

        let callback = &mut self.on_center_change;
        self.centering.apply(&mut self.assembly, &mut |center| {
            if let Some(callback) = callback.as_mut() {
                callback(center);
            }
        });

        if self
            .annotations
            .refresh(&self.cache, &self.assembly, fan_animation)
        {
            debug!(
                "Frame {}: {} annotations",
                self.frames,
                self.annotations.entries().len()
            );
        }
        self.animator
            .tick(elapsed, fan_animation, &mut self.assembly, recomposed);

        self.assembly.scene.late_update();
        self.frames += 1;

        assembler::assemble(&self.config, &self.assembly, self.annotations.entries())
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn cache(&self) -> &AssetCache {
        &self.cache
    }

    pub fn assembly(&self) -> &Assembly {
        &self.assembly
    }

    pub fn center_state(&self) -> CenterState {
        self.centering.state()
    }

    pub fn annotations(&self) -> &AnnotationLocator {
        &self.annotations
    }

    pub fn animator(&self) -> &FanAnimator {
        &self.animator
    }

    pub fn rebuilds(&self) -> u64 {
        self.cloner.rebuilds()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
