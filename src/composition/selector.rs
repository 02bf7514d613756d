use crate::assets::AssetCache;
use crate::catalog::AssetDescriptor;
use crate::visibility::VisibilityState;

/// Catalog entries that are both switched on and loaded, in catalog order.
///
/// Entries still loading are skipped for now and picked up on a later tick;
/// failed ones never qualify.
pub fn select_visible(
    catalog: &'static [AssetDescriptor],
    visibility: &VisibilityState,
    cache: &AssetCache,
) -> Vec<&'static AssetDescriptor> {
    catalog
        .iter()
        .filter(|descriptor| visibility.is_visible(descriptor.name))
        .filter(|descriptor| cache.is_ready(descriptor.name))
        .collect()
}
