use std::path::PathBuf;

use glam::Vec3;

use crate::camera::Camera;

pub const ASSET_ROOT_ENV: &str = "HVAC_ASSET_ROOT";

#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub size: f32,
    pub divisions: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 10.0,
            divisions: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightingConfig {
    pub ambient_intensity: f32,
    pub directional_position: Vec3,
    pub directional_intensity: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_intensity: 0.4,
            directional_position: Vec3::new(10.0, 10.0, 5.0),
            directional_intensity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Directory the catalog's asset locators are relative to.
    pub asset_root: PathBuf,
    pub grid: GridConfig,
    pub axes_length: f32,
    pub camera: Camera,
    pub lighting: LightingConfig,
}

impl ViewerConfig {
    /// Defaults, with the asset root taken from `HVAC_ASSET_ROOT` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(root) = std::env::var_os(ASSET_ROOT_ENV) {
            config.asset_root = PathBuf::from(root);
        }
        config
    }

    pub fn with_asset_root(mut self, asset_root: impl Into<PathBuf>) -> Self {
        self.asset_root = asset_root.into();
        self
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("models"),
            grid: GridConfig::default(),
            axes_length: 2.0,
            camera: Camera::default(),
            lighting: LightingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.asset_root, PathBuf::from("models"));
        assert_eq!(config.grid, GridConfig { size: 10.0, divisions: 10 });
        assert_eq!(config.lighting.ambient_intensity, 0.4);
        assert_eq!(config.lighting.directional_position, Vec3::new(10.0, 10.0, 5.0));
    }

    #[test]
    fn test_with_asset_root() {
        let config = ViewerConfig::default().with_asset_root("/srv/ahu");
        assert_eq!(config.asset_root, PathBuf::from("/srv/ahu"));
        assert_eq!(config.axes_length, 2.0);
    }
}
