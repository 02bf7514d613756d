use log::{info, warn};

use crate::assets::provider::{AssetProvider, PendingAsset, SceneAsset};
use crate::catalog::AssetDescriptor;
use crate::scene_graph::{ObjectId, Scene};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadState {
    Pending,
    Ready,
    Failed,
}

/// One catalog entry's asset. Lives as long as the cache; once `Ready` its
/// scene is shared read-only with every consumer.
pub struct LoadedAsset {
    pub descriptor: &'static AssetDescriptor,
    state: LoadState,
    content: Option<SceneAsset>,
    error: Option<String>,
}

impl LoadedAsset {
    fn pending(descriptor: &'static AssetDescriptor) -> Self {
        Self {
            descriptor,
            state: LoadState::Pending,
            content: None,
            error: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == LoadState::Ready
    }

    pub fn scene_root(&self) -> Option<(&Scene, ObjectId)> {
        self.content.as_ref().map(|asset| (&asset.scene, asset.root))
    }

    /// Why the load failed, if it did.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

struct CacheEntry {
    asset: LoadedAsset,
    pending: Option<PendingAsset>,
}

/// Loads every catalog asset once and reports readiness per name.
///
/// Loading starts at construction. Call [`AssetCache::poll`] once per frame to
/// pick up finished loads; it never blocks.
pub struct AssetCache {
    entries: Vec<CacheEntry>,
}

impl AssetCache {
    pub fn preload(
        catalog: &'static [AssetDescriptor],
        provider: &mut dyn AssetProvider,
    ) -> Self {
        let entries = catalog
            .iter()
            .map(|descriptor| CacheEntry {
                asset: LoadedAsset::pending(descriptor),
                pending: Some(provider.load(descriptor)),
            })
            .collect();

        let mut cache = Self { entries };
        cache.poll();
        cache
    }

    /// Moves finished loads to `Ready` or `Failed`. Returns how many entries
    /// changed state.
    pub fn poll(&mut self) -> usize {
        let mut settled = 0;

        for entry in &mut self.entries {
            let Some(pending) = entry.pending.as_mut() else {
                continue;
            };
            let Some(result) = pending.try_take() else {
                continue;
            };
            entry.pending = None;
            settled += 1;

            match result {
                Ok(content) => {
                    info!(
                        "Loaded {} ({} objects)",
                        entry.asset.name(),
                        content.scene.len()
                    );
                    entry.asset.content = Some(content);
                    entry.asset.state = LoadState::Ready;
                }
                Err(e) => {
                    warn!("Failed to load {}: {:#}", entry.asset.name(), e);
                    entry.asset.error = Some(format!("{:#}", e));
                    entry.asset.state = LoadState::Failed;
                }
            }
        }

        settled
    }

    pub fn get(&self, name: &str) -> Option<&LoadedAsset> {
        self.entries
            .iter()
            .map(|entry| &entry.asset)
            .find(|asset| asset.name() == name)
    }

    pub fn load_state(&self, name: &str) -> Option<LoadState> {
        self.get(name).map(LoadedAsset::state)
    }

    pub fn is_ready(&self, name: &str) -> bool {
        self.get(name).is_some_and(LoadedAsset::is_ready)
    }

    pub fn assets(&self) -> impl Iterator<Item = &LoadedAsset> {
        self.entries.iter().map(|entry| &entry.asset)
    }

    /// True once no load is outstanding.
    pub fn is_settled(&self) -> bool {
        self.entries.iter().all(|entry| entry.pending.is_none())
    }
}
