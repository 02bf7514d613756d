//! Loading and caching of catalog assets.
//!
//! - `provider` is the seam to whatever decodes asset files
//! - `cache` holds one `LoadedAsset` per catalog entry and tracks readiness
//! - `gltf_loader` is the provider used by the host binary

pub mod cache;
pub mod gltf_loader;
pub mod provider;

pub use cache::{AssetCache, LoadState, LoadedAsset};
pub use gltf_loader::GltfProvider;
pub use provider::{AssetProvider, LoadResult, MemoryProvider, PendingAsset, SceneAsset};
