use crate::scene::{ObjectId, SceneError, SceneGraph};
use glam::Vec3;

/// Free-navigation controls driving one camera (orbit/pan/zoom around
/// `center`). Only the parts the viewport core touches live here.
#[derive(Debug, Clone)]
pub struct NavigationControls {
    pub enabled: bool,
    pub center: Vec3,
    camera: ObjectId,
}

impl NavigationControls {
    pub fn new(camera: ObjectId) -> Self {
        Self {
            enabled: true,
            center: Vec3::ZERO,
            camera,
        }
    }

    pub fn reset_center(&mut self) {
        self.center = Vec3::ZERO;
    }

    /// Frames `target` while keeping the camera's orientation: the camera
    /// backs off along its view axis by four bounding-sphere radii from the
    /// target's centre, or by a small fixed distance from its origin when
    /// the target has no geometry.
    pub fn focus(&mut self, graph: &mut SceneGraph, target: ObjectId) -> Result<(), SceneError> {
        if !graph.contains(target) {
            return Err(SceneError::UnknownObject(target));
        }
        let bounds = graph.bounds_of(target);
        let (center, distance) = if bounds.is_empty() {
            let origin = graph
                .world_position(target)
                .ok_or(SceneError::UnknownObject(target))?;
            (origin, 0.1)
        } else {
            (bounds.center(), bounds.bounding_sphere_radius())
        };

        let camera = graph
            .get_mut(self.camera)
            .ok_or(SceneError::UnknownObject(self.camera))?;
        let back = camera.transform.rotation * Vec3::Z;
        camera.transform.position = center + back * (distance * 4.0);
        self.center = center;
        log::debug!(
            "Focused {} at center={:?} distance={:.3}",
            target,
            center,
            distance
        );
        Ok(())
    }
}
