use glam::Vec3;
use itertools::Itertools;
use log::{debug, warn};

use crate::scene_graph::{Object3D, ObjectId, RendererId, RendererKind, Scene};

pub const DEFAULT_ANCHOR_NAME: &str = "AnchorTarget";

/// Bulk-assigns a probe anchor to every renderer under an avatar root.
///
/// The setter holds handles into a [`Scene`] but never owns the scene; every
/// operation that reads or mutates the graph takes it as an argument. Callers
/// are expected to re-run [`AnchorSetter::validate`] after changing any field,
/// [`AnchorSetter::apply`] re-checks its own preconditions regardless.
pub struct AnchorSetter {
    root: Option<ObjectId>,
    anchor_object: Option<ObjectId>,
    create_new_anchor: bool,
    new_anchor_name: String,
    new_anchor_local_position: Vec3,
    new_anchor_parent: Option<ObjectId>,
    renderers: Vec<RendererId>,
}

impl AnchorSetter {
    pub fn new() -> Self {
        Self {
            root: None,
            anchor_object: None,
            create_new_anchor: false,
            new_anchor_name: DEFAULT_ANCHOR_NAME.to_string(),
            new_anchor_local_position: Vec3::ZERO,
            new_anchor_parent: None,
            renderers: Vec::new(),
        }
    }

    pub fn root(&self) -> Option<ObjectId> {
        self.root
    }

    /// Sets the avatar root, rescans its renderers and, if no parent for a new
    /// anchor has been chosen yet, makes the root that parent.
    pub fn set_root(&mut self, scene: &Scene, root: Option<ObjectId>) {
        self.root = root;
        self.refresh_renderers(scene);

        if self.new_anchor_parent.is_none() {
            self.new_anchor_parent = self.root;
        }
    }

    pub fn has_root(&self) -> bool {
        self.root.is_some()
    }

    pub fn anchor_object(&self) -> Option<ObjectId> {
        self.anchor_object
    }

    pub fn set_anchor_object(&mut self, anchor_object: Option<ObjectId>) {
        self.anchor_object = anchor_object;
    }

    pub fn create_new_anchor(&self) -> bool {
        self.create_new_anchor
    }

    pub fn set_create_new_anchor(&mut self, create_new_anchor: bool) {
        self.create_new_anchor = create_new_anchor;
    }

    pub fn new_anchor_name(&self) -> &str {
        &self.new_anchor_name
    }

    pub fn set_new_anchor_name(&mut self, name: impl Into<String>) {
        self.new_anchor_name = name.into();
    }

    pub fn new_anchor_local_position(&self) -> Vec3 {
        self.new_anchor_local_position
    }

    pub fn set_new_anchor_local_position(&mut self, position: Vec3) {
        self.new_anchor_local_position = position;
    }

    pub fn new_anchor_parent(&self) -> Option<ObjectId> {
        self.new_anchor_parent
    }

    pub fn set_new_anchor_parent(&mut self, parent: Option<ObjectId>) {
        self.new_anchor_parent = parent;
    }

    /// Renderers found by the last scan.
    pub fn renderers(&self) -> &[RendererId] {
        &self.renderers
    }

    /// Whether the current settings are enough for [`AnchorSetter::apply`].
    ///
    /// The local position of a new anchor is never checked, any value is valid.
    pub fn validate(&self) -> bool {
        if !self.has_root() {
            return false;
        }

        if self.create_new_anchor {
            if self.new_anchor_name.is_empty() {
                return false;
            }
            self.new_anchor_parent.is_some()
        } else {
            self.anchor_object.is_some()
        }
    }

    /// Rebuilds the renderer list from the current root: every mesh renderer in
    /// depth-first order, followed by every skinned mesh renderer.
    pub fn refresh_renderers(&mut self, scene: &Scene) {
        let Some(root) = self.root else {
            return;
        };

        self.renderers = RendererKind::ALL
            .iter()
            .flat_map(|&kind| scene.renderers_in_hierarchy(root, kind))
            .unique()
            .collect();

        debug!(
            "Found {} renderers under {:?}",
            self.renderers.len(),
            scene.object_name(root)
        );
    }

    /// Points every renderer under the root at the anchor, creating the anchor
    /// node first in create mode. Nothing is mutated when this returns false.
    pub fn apply(&mut self, scene: &mut Scene) -> bool {
        if !self.has_root() {
            warn!("No avatar root set, not assigning probe anchors");
            return false;
        }

        let Some(anchor) = self.resolve_anchor(scene) else {
            warn!("No usable anchor object, not assigning probe anchors");
            return false;
        };

        self.refresh_renderers(scene);
        for &renderer_id in &self.renderers {
            if let Some(renderer) = scene.get_renderer_mut(renderer_id) {
                renderer.probe_anchor = Some(anchor);
            }
        }

        debug!(
            "Assigned {:?} as probe anchor of {} renderers",
            scene.object_name(anchor),
            self.renderers.len()
        );

        true
    }

    /// Anchor of the renderer at `index` in the current list.
    pub fn anchor_at(&self, scene: &Scene, index: usize) -> Option<ObjectId> {
        let renderer_id = *self.renderers.get(index)?;
        scene.get_renderer(renderer_id)?.probe_anchor
    }

    /// Overrides the anchor of a single renderer, bypassing validation. `None`
    /// clears it. Returns false if `index` is past the end of the list.
    pub fn set_anchor_at(&self, scene: &mut Scene, index: usize, anchor: Option<ObjectId>) -> bool {
        let Some(&renderer_id) = self.renderers.get(index) else {
            return false;
        };

        match scene.get_renderer_mut(renderer_id) {
            Some(renderer) => {
                renderer.probe_anchor = anchor;
                true
            }
            None => false,
        }
    }

    fn resolve_anchor(&self, scene: &mut Scene) -> Option<ObjectId> {
        if self.create_new_anchor {
            self.create_anchor_object(scene)
        } else {
            self.anchor_object
        }
    }

    fn create_anchor_object(&self, scene: &mut Scene) -> Option<ObjectId> {
        if self.new_anchor_name.is_empty() {
            return None;
        }

        let parent = self.new_anchor_parent?;
        scene.get_object(parent)?;

        let mut object = Object3D::named(self.new_anchor_name.as_str());
        object
            .transform
            .set_translation(self.new_anchor_local_position);

        let anchor = scene.add_object(object);
        scene.set_object_parent(anchor, Some(parent));

        debug!(
            "Created anchor {:?} under {:?} at {}",
            self.new_anchor_name,
            scene.object_name(parent),
            self.new_anchor_local_position
        );

        Some(anchor)
    }
}

impl Default for AnchorSetter {
    fn default() -> Self {
        Self::new()
    }
}
