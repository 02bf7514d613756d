pub mod mesh;
pub mod object3d;
pub mod scene;
pub mod transform;

// Re-export main types for convenience
pub use mesh::Mesh;
pub use object3d::{Object3D, ObjectId};
pub use scene::Scene;
pub use transform::Transform;
