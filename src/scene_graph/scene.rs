use glam::{Mat4, Quat};
use id_arena::Arena;

use crate::scene_graph::object3d::{Object3D, ObjectId};
use crate::scene_graph::renderer::{Renderer, RendererId, RendererKind};

pub struct Scene {
    pub objects: Arena<Object3D>,
    pub renderers: Arena<Renderer>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Arena::new(),
            renderers: Arena::new(),
        }
    }

    pub fn add_object(&mut self, object: Object3D) -> ObjectId {
        self.objects.alloc(object)
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    pub fn get_object_mut(&mut self, id: ObjectId) -> Option<&mut Object3D> {
        self.objects.get_mut(id)
    }

    pub fn get_object_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }

    /// Looks up a direct child of `parent_id` by name.
    #[allow(dead_code)]
    pub fn find_child_by_name(&self, parent_id: ObjectId, name: &str) -> Option<ObjectId> {
        self.get_object(parent_id)?
            .child_ids
            .iter()
            .copied()
            .find(|&id| self.object_name(id) == name)
    }

    /// Name of a node, or an empty string for a handle that does not resolve.
    pub fn object_name(&self, id: ObjectId) -> &str {
        self.get_object(id)
            .map(|object| object.name.as_str())
            .unwrap_or("")
    }

    /// Attaches a renderer component to an object, replacing any previous one.
    pub fn add_renderer(&mut self, object_id: ObjectId, kind: RendererKind) -> Option<RendererId> {
        self.get_object(object_id)?;
        let renderer_id = self.renderers.alloc(Renderer::new(kind, object_id));
        if let Some(object) = self.get_object_mut(object_id) {
            object.renderer_id = Some(renderer_id);
        }

        Some(renderer_id)
    }

    pub fn get_renderer(&self, id: RendererId) -> Option<&Renderer> {
        self.renderers.get(id)
    }

    pub fn get_renderer_mut(&mut self, id: RendererId) -> Option<&mut Renderer> {
        self.renderers.get_mut(id)
    }

    /// Collects renderers of `kind` on `root_id` and all of its descendants, in
    /// depth-first pre-order.
    pub fn renderers_in_hierarchy(&self, root_id: ObjectId, kind: RendererKind) -> Vec<RendererId> {
        let mut found = Vec::new();
        let mut stack = vec![root_id];

        while let Some(object_id) = stack.pop() {
            let Some(object) = self.get_object(object_id) else {
                continue;
            };

            let renderer = object
                .renderer_id
                .and_then(|id| self.get_renderer(id).map(|renderer| (id, renderer)));
            if let Some((renderer_id, renderer)) = renderer {
                if renderer.kind == kind {
                    found.push(renderer_id);
                }
            }

            stack.extend(object.child_ids.iter().rev().copied());
        }

        found
    }

    /// Sets the parent of an object and updates child relationships
    pub fn set_object_parent(&mut self, child_id: ObjectId, new_parent_id: Option<ObjectId>) {
        // Remove from old parent's children list
        if let Some(child) = self.objects.get(child_id) {
            if let Some(old_parent_id) = child.parent_id {
                if let Some(old_parent) = self.objects.get_mut(old_parent_id) {
                    old_parent.child_ids.retain(|&id| id != child_id);
                }
            }
        }

        // Set new parent and add to new parent's children list
        if let Some(child) = self.objects.get_mut(child_id) {
            child.parent_id = new_parent_id;

            if let Some(new_parent_id) = new_parent_id {
                if let Some(new_parent) = self.objects.get_mut(new_parent_id) {
                    new_parent.child_ids.push(child_id);
                }
            }
        }
    }

    /// Composes local matrices from the root of the hierarchy down to `object_id`.
    #[allow(dead_code)]
    pub fn world_matrix(&self, object_id: ObjectId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = self.get_object(object_id);

        while let Some(object) = current {
            matrix = object.transform.local_matrix() * matrix;
            current = object.parent_id.and_then(|id| self.get_object(id));
        }

        matrix
    }

    /// Spawns every root node of a glTF scene. Returns the last spawned root.
    pub fn spawn_gltf_scene(&mut self, scene: &gltf::Scene) -> Option<ObjectId> {
        let mut last_object_id = None;

        for node in scene.nodes() {
            last_object_id = Some(self.spawn_gltf_node(&node, None));
        }

        last_object_id
    }

    fn spawn_gltf_node(&mut self, node: &gltf::Node, parent: Option<ObjectId>) -> ObjectId {
        let mut object = Object3D::named(node.name().unwrap_or("Unnamed"));
        let (translation, rotation, scale) = node.transform().decomposed();

        object.transform.set_transform(
            translation.into(),
            Quat::from_array(rotation),
            scale[0], // Assume uniform scale for simplicity
        );

        let object_id = self.add_object(object);

        if node.mesh().is_some() {
            let kind = if node.skin().is_some() {
                RendererKind::SkinnedMesh
            } else {
                RendererKind::Mesh
            };
            self.add_renderer(object_id, kind);
        }

        if let Some(parent_id) = parent {
            self.set_object_parent(object_id, Some(parent_id));
        }

        for child in node.children() {
            self.spawn_gltf_node(&child, Some(object_id));
        }

        object_id
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
