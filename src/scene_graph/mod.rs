pub mod object3d;
pub mod renderer;
pub mod scene;
pub mod transform;

// Re-export main types for convenience
pub use object3d::{Object3D, ObjectId};
pub use renderer::{RendererId, RendererKind};
pub use scene::Scene;
