use crate::render::HelperRegistry;
use crate::scene::ObjectId;

/// Editor-wide state the viewport reacts to: current selection, the
/// editor's primary camera, the camera the viewport draws through, and the
/// helper registry.
#[derive(Debug)]
pub struct EditorState {
    selected: Option<ObjectId>,
    camera: ObjectId,
    viewport_camera: ObjectId,
    helpers: HelperRegistry,
}

impl EditorState {
    pub fn new(camera: ObjectId) -> Self {
        Self {
            selected: None,
            camera,
            viewport_camera: camera,
            helpers: HelperRegistry::new(),
        }
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    /// Sets the selection; publishing `objectSelected` is the caller's job.
    pub fn select(&mut self, object: Option<ObjectId>) {
        self.selected = object;
    }

    pub fn camera(&self) -> ObjectId {
        self.camera
    }

    pub fn viewport_camera(&self) -> ObjectId {
        self.viewport_camera
    }

    pub fn set_viewport_camera(&mut self, camera: ObjectId) {
        self.viewport_camera = camera;
    }

    pub fn helpers(&self) -> &HelperRegistry {
        &self.helpers
    }

    pub fn helpers_mut(&mut self) -> &mut HelperRegistry {
        &mut self.helpers
    }
}
