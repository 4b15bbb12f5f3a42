use crate::scene::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformSpace {
    #[default]
    World,
    Local,
}

/// Transform gizmo state: at most one attached object plus the
/// mode/space/snap settings the handles are drawn with.
#[derive(Debug, Clone)]
pub struct TransformControls {
    pub enabled: bool,
    object: Option<ObjectId>,
    mode: TransformMode,
    space: TransformSpace,
    translation_snap: Option<f32>,
}

impl Default for TransformControls {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformControls {
    pub fn new() -> Self {
        Self {
            enabled: true,
            object: None,
            mode: TransformMode::Translate,
            space: TransformSpace::World,
            translation_snap: None,
        }
    }

    pub fn object(&self) -> Option<ObjectId> {
        self.object
    }

    pub fn attach(&mut self, object: ObjectId) {
        if let Some(previous) = self.object {
            if previous != object {
                log::debug!("Gizmo re-attached from {} to {}", previous, object);
            }
        }
        self.object = Some(object);
    }

    pub fn detach(&mut self) {
        self.object = None;
    }

    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: TransformMode) {
        self.mode = mode;
    }

    pub fn space(&self) -> TransformSpace {
        self.space
    }

    pub fn set_space(&mut self, space: TransformSpace) {
        self.space = space;
    }

    pub fn translation_snap(&self) -> Option<f32> {
        self.translation_snap
    }

    pub fn set_translation_snap(&mut self, snap: Option<f32>) {
        self.translation_snap = snap;
    }
}
