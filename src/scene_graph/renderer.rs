use std::fmt;

use id_arena::Id;

use crate::scene_graph::object3d::ObjectId;

pub type RendererId = Id<Renderer>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RendererKind {
    Mesh,
    SkinnedMesh,
}

impl RendererKind {
    pub const ALL: [RendererKind; 2] = [RendererKind::Mesh, RendererKind::SkinnedMesh];
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RendererKind::Mesh => write!(f, "mesh"),
            RendererKind::SkinnedMesh => write!(f, "skinned mesh"),
        }
    }
}

/// A mesh-drawing component attached to a single node.
pub struct Renderer {
    pub kind: RendererKind,
    pub object_id: ObjectId,
    /// Node whose position is used to sample probes instead of the renderer's own.
    pub probe_anchor: Option<ObjectId>,
}

impl Renderer {
    pub fn new(kind: RendererKind, object_id: ObjectId) -> Self {
        Self {
            kind,
            object_id,
            probe_anchor: None,
        }
    }
}
