use crate::math::AABB;

/// Geometry attached to an object. Only the extent is kept; vertex data stays
/// with whoever renders the asset.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub bounds: AABB,
}

impl Mesh {
    pub fn new(name: impl Into<String>, bounds: AABB) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }
}
