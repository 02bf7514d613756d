use std::collections::HashMap;

use crate::catalog::AssetDescriptor;

/// Which catalog entries the operator wants shown. Names without an entry
/// count as hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityState {
    shown: HashMap<String, bool>,
}

impl VisibilityState {
    /// Every entry of `catalog` shown, the state the part list starts in.
    pub fn all_visible(catalog: &[AssetDescriptor]) -> Self {
        Self {
            shown: catalog
                .iter()
                .map(|descriptor| (descriptor.name.to_string(), true))
                .collect(),
        }
    }

    pub fn is_visible(&self, name: &str) -> bool {
        self.shown.get(name).copied().unwrap_or(false)
    }

    pub fn set(&mut self, name: &str, visible: bool) {
        self.shown.insert(name.to_string(), visible);
    }

    /// Flips one checkbox. Returns the new value.
    pub fn toggle(&mut self, name: &str) -> bool {
        let visible = !self.is_visible(name);
        self.set(name, visible);
        visible
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for VisibilityState {
    fn from_iter<T: IntoIterator<Item = (S, bool)>>(iter: T) -> Self {
        Self {
            shown: iter
                .into_iter()
                .map(|(name, visible)| (name.into(), visible))
                .collect(),
        }
    }
}
