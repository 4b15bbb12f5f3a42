use crate::scene::{LightKind, ObjectId, ObjectKind, SceneGraph};
use glam::{Mat4, Vec3};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperKind {
    PointLight,
    DirectionalLight,
    SpotLight,
    HemisphereLight,
    Camera,
    Skeleton,
}

impl HelperKind {
    /// Helper kind the editor creates for an object, if any.
    pub fn for_object(kind: &ObjectKind) -> Option<Self> {
        match kind {
            ObjectKind::Light(LightKind::Point) => Some(HelperKind::PointLight),
            ObjectKind::Light(LightKind::Directional) => Some(HelperKind::DirectionalLight),
            ObjectKind::Light(LightKind::Spot) => Some(HelperKind::SpotLight),
            ObjectKind::Light(LightKind::Hemisphere) => Some(HelperKind::HemisphereLight),
            ObjectKind::PerspectiveCamera(_) | ObjectKind::OrthographicCamera(_) => {
                Some(HelperKind::Camera)
            }
            ObjectKind::SkinnedMesh => Some(HelperKind::Skeleton),
            ObjectKind::Light(LightKind::Ambient)
            | ObjectKind::Scene
            | ObjectKind::Group
            | ObjectKind::Mesh => None,
        }
    }
}

/// Visual stand-in for a light, camera or skeleton. `update` re-reads the
/// owner's world transform.
#[derive(Debug, Clone)]
pub struct Helper {
    pub kind: HelperKind,
    pub object: ObjectId,
    world: Mat4,
    updates: u32,
}

impl Helper {
    pub fn new(kind: HelperKind, object: ObjectId) -> Self {
        Self {
            kind,
            object,
            world: Mat4::IDENTITY,
            updates: 0,
        }
    }

    pub fn is_skeleton(&self) -> bool {
        self.kind == HelperKind::Skeleton
    }

    pub fn update(&mut self, graph: &SceneGraph) {
        match graph.world_matrix(self.object) {
            Some(world) => self.world = world,
            None => log::warn!("Helper owner {} is gone; keeping last transform", self.object),
        }
        self.updates = self.updates.saturating_add(1);
    }

    pub fn position(&self) -> Vec3 {
        self.world.transform_point3(Vec3::ZERO)
    }

    pub fn update_count(&self) -> u32 {
        self.updates
    }
}

#[derive(Debug, Default)]
pub struct HelperRegistry {
    helpers: HashMap<ObjectId, Helper>,
}

impl HelperRegistry {
    pub fn new() -> Self {
        Self {
            helpers: HashMap::new(),
        }
    }

    /// Registers the default helper for `object`. Returns false when the
    /// object kind has none.
    pub fn register_for(&mut self, graph: &SceneGraph, object: ObjectId) -> bool {
        let Some(kind) = graph
            .get(object)
            .and_then(|owner| HelperKind::for_object(&owner.kind))
        else {
            return false;
        };
        let mut helper = Helper::new(kind, object);
        helper.update(graph);
        self.helpers.insert(object, helper);
        true
    }

    pub fn get(&self, object: ObjectId) -> Option<&Helper> {
        self.helpers.get(&object)
    }

    pub fn get_mut(&mut self, object: ObjectId) -> Option<&mut Helper> {
        self.helpers.get_mut(&object)
    }

    pub fn remove(&mut self, object: ObjectId) -> Option<Helper> {
        self.helpers.remove(&object)
    }

    pub fn len(&self) -> usize {
        self.helpers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.helpers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{HelperKind, HelperRegistry};
    use crate::scene::{LightKind, ObjectKind, SceneGraph};
    use glam::Vec3;

    #[test]
    fn register_picks_kind_from_object() {
        let mut graph = SceneGraph::new();
        let spot = graph.insert("Spot", ObjectKind::Light(LightKind::Spot));
        let skinned = graph.insert("Body", ObjectKind::SkinnedMesh);
        let mesh = graph.insert("Mesh", ObjectKind::Mesh);

        let mut registry = HelperRegistry::new();
        assert!(registry.register_for(&graph, spot));
        assert!(registry.register_for(&graph, skinned));
        assert!(!registry.register_for(&graph, mesh));
        assert_eq!(registry.get(spot).unwrap().kind, HelperKind::SpotLight);
        assert!(registry.get(skinned).unwrap().is_skeleton());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn update_tracks_owner_transform() {
        let mut graph = SceneGraph::new();
        let light = graph.insert("Point", ObjectKind::Light(LightKind::Point));
        let mut registry = HelperRegistry::new();
        registry.register_for(&graph, light);

        graph.get_mut(light).unwrap().transform.position = Vec3::new(1.0, 2.0, 3.0);
        let helper = registry.get_mut(light).unwrap();
        helper.update(&graph);
        assert_eq!(helper.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(helper.update_count(), 2);
    }
}
