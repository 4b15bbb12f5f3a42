//! Editor signals and the synchronous bus that delivers them.
//!
//! Each signal name maps to one `Signal` variant carrying its typed
//! payload. Delivery is immediate: `publish` runs every handler registered
//! for the signal's name, in registration order, before returning.

pub mod script;

use crate::render::{RendererHandle, TransformMode, TransformSpace};
use crate::scene::{Color, ObjectId, TextureHandle};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalName {
    EditorCleared,
    TransformModeChanged,
    SnapChanged,
    SpaceChanged,
    RendererUpdated,
    RendererCreated,
    LoadDefaultEnvAndBackground,
    SceneBackgroundChanged,
    SceneEnvironmentChanged,
    SceneFogChanged,
    SceneFogSettingsChanged,
    SceneGraphChanged,
    CameraChanged,
    CameraReseted,
    ViewportCameraChanged,
    ObjectSelected,
    ObjectFocused,
    ObjectChanged,
    ObjectRemoved,
    GeometryChanged,
    MaterialChanged,
    ExitedVr,
    SceneResize,
    ShowGridChanged,
    ShowHelpersChanged,
}

impl SignalName {
    pub const ALL: [SignalName; 25] = [
        SignalName::EditorCleared,
        SignalName::TransformModeChanged,
        SignalName::SnapChanged,
        SignalName::SpaceChanged,
        SignalName::RendererUpdated,
        SignalName::RendererCreated,
        SignalName::LoadDefaultEnvAndBackground,
        SignalName::SceneBackgroundChanged,
        SignalName::SceneEnvironmentChanged,
        SignalName::SceneFogChanged,
        SignalName::SceneFogSettingsChanged,
        SignalName::SceneGraphChanged,
        SignalName::CameraChanged,
        SignalName::CameraReseted,
        SignalName::ViewportCameraChanged,
        SignalName::ObjectSelected,
        SignalName::ObjectFocused,
        SignalName::ObjectChanged,
        SignalName::ObjectRemoved,
        SignalName::GeometryChanged,
        SignalName::MaterialChanged,
        SignalName::ExitedVr,
        SignalName::SceneResize,
        SignalName::ShowGridChanged,
        SignalName::ShowHelpersChanged,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalName::EditorCleared => "editorCleared",
            SignalName::TransformModeChanged => "transformModeChanged",
            SignalName::SnapChanged => "snapChanged",
            SignalName::SpaceChanged => "spaceChanged",
            SignalName::RendererUpdated => "rendererUpdated",
            SignalName::RendererCreated => "rendererCreated",
            SignalName::LoadDefaultEnvAndBackground => "loadDefaultEnvAndBackground",
            SignalName::SceneBackgroundChanged => "sceneBackgroundChanged",
            SignalName::SceneEnvironmentChanged => "sceneEnvironmentChanged",
            SignalName::SceneFogChanged => "sceneFogChanged",
            SignalName::SceneFogSettingsChanged => "sceneFogSettingsChanged",
            SignalName::SceneGraphChanged => "sceneGraphChanged",
            SignalName::CameraChanged => "cameraChanged",
            SignalName::CameraReseted => "cameraReseted",
            SignalName::ViewportCameraChanged => "viewportCameraChanged",
            SignalName::ObjectSelected => "objectSelected",
            SignalName::ObjectFocused => "objectFocused",
            SignalName::ObjectChanged => "objectChanged",
            SignalName::ObjectRemoved => "objectRemoved",
            SignalName::GeometryChanged => "geometryChanged",
            SignalName::MaterialChanged => "materialChanged",
            SignalName::ExitedVr => "exitedVR",
            SignalName::SceneResize => "sceneResize",
            SignalName::ShowGridChanged => "showGridChanged",
            SignalName::ShowHelpersChanged => "showHelpersChanged",
        }
    }
}

impl fmt::Display for SignalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundKind {
    None,
    Color,
    Texture,
    Equirectangular,
    /// A type name was given but matches none of the above.
    Unrecognised,
}

impl BackgroundKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "None" => Some(BackgroundKind::None),
            "Color" => Some(BackgroundKind::Color),
            "Texture" => Some(BackgroundKind::Texture),
            "Equirectangular" => Some(BackgroundKind::Equirectangular),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentKind {
    None,
    Equirectangular,
    ModelViewer,
}

impl EnvironmentKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "None" => Some(EnvironmentKind::None),
            "Equirectangular" => Some(EnvironmentKind::Equirectangular),
            "ModelViewer" => Some(EnvironmentKind::ModelViewer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FogKind {
    None,
    Fog,
    FogExp2,
}

impl FogKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "None" => Some(FogKind::None),
            "Fog" => Some(FogKind::Fog),
            "FogExp2" => Some(FogKind::FogExp2),
            _ => None,
        }
    }
}

/// Fog parameters as published by the fog panel; which fields apply
/// depends on the fog kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogParams {
    pub color: Color,
    pub near: f32,
    pub far: f32,
    pub density: f32,
}

impl Default for FogParams {
    fn default() -> Self {
        Self {
            color: Color::from_hex(0xaaaaaa),
            near: 0.1,
            far: 50.0,
            density: 0.05,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Signal {
    EditorCleared,
    TransformModeChanged(TransformMode),
    /// `None` turns translation snapping off.
    SnapChanged(Option<f32>),
    SpaceChanged(TransformSpace),
    RendererUpdated,
    RendererCreated(RendererHandle),
    LoadDefaultEnvAndBackground,
    /// `kind: None` means the type was unset; nothing changes and no
    /// frame is drawn.
    SceneBackgroundChanged {
        kind: Option<BackgroundKind>,
        color: Option<Color>,
        texture: Option<TextureHandle>,
        equirectangular_texture: Option<TextureHandle>,
        blurriness: f32,
    },
    SceneEnvironmentChanged {
        kind: Option<EnvironmentKind>,
        equirectangular_texture: Option<TextureHandle>,
    },
    SceneFogChanged {
        kind: Option<FogKind>,
        params: FogParams,
    },
    SceneFogSettingsChanged {
        kind: Option<FogKind>,
        params: FogParams,
    },
    SceneGraphChanged,
    CameraChanged,
    CameraReseted,
    ViewportCameraChanged,
    ObjectSelected(Option<ObjectId>),
    ObjectFocused(ObjectId),
    ObjectChanged(ObjectId),
    ObjectRemoved(ObjectId),
    GeometryChanged(Option<ObjectId>),
    MaterialChanged,
    ExitedVr,
    SceneResize,
    ShowGridChanged(bool),
    ShowHelpersChanged(bool),
}

impl Signal {
    pub fn name(&self) -> SignalName {
        match self {
            Signal::EditorCleared => SignalName::EditorCleared,
            Signal::TransformModeChanged(_) => SignalName::TransformModeChanged,
            Signal::SnapChanged(_) => SignalName::SnapChanged,
            Signal::SpaceChanged(_) => SignalName::SpaceChanged,
            Signal::RendererUpdated => SignalName::RendererUpdated,
            Signal::RendererCreated(_) => SignalName::RendererCreated,
            Signal::LoadDefaultEnvAndBackground => SignalName::LoadDefaultEnvAndBackground,
            Signal::SceneBackgroundChanged { .. } => SignalName::SceneBackgroundChanged,
            Signal::SceneEnvironmentChanged { .. } => SignalName::SceneEnvironmentChanged,
            Signal::SceneFogChanged { .. } => SignalName::SceneFogChanged,
            Signal::SceneFogSettingsChanged { .. } => SignalName::SceneFogSettingsChanged,
            Signal::SceneGraphChanged => SignalName::SceneGraphChanged,
            Signal::CameraChanged => SignalName::CameraChanged,
            Signal::CameraReseted => SignalName::CameraReseted,
            Signal::ViewportCameraChanged => SignalName::ViewportCameraChanged,
            Signal::ObjectSelected(_) => SignalName::ObjectSelected,
            Signal::ObjectFocused(_) => SignalName::ObjectFocused,
            Signal::ObjectChanged(_) => SignalName::ObjectChanged,
            Signal::ObjectRemoved(_) => SignalName::ObjectRemoved,
            Signal::GeometryChanged(_) => SignalName::GeometryChanged,
            Signal::MaterialChanged => SignalName::MaterialChanged,
            Signal::ExitedVr => SignalName::ExitedVr,
            Signal::SceneResize => SignalName::SceneResize,
            Signal::ShowGridChanged(_) => SignalName::ShowGridChanged,
            Signal::ShowHelpersChanged(_) => SignalName::ShowHelpersChanged,
        }
    }
}

pub type Handler = Box<dyn FnMut(&Signal)>;

/// Single-threaded publish/subscribe registry keyed by signal name.
#[derive(Default)]
pub struct SignalBus {
    handlers: HashMap<SignalName, Vec<Handler>>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn subscribe<F>(&mut self, name: SignalName, handler: F)
    where
        F: FnMut(&Signal) + 'static,
    {
        self.handlers.entry(name).or_default().push(Box::new(handler));
    }

    /// Runs every handler registered for the signal's name, in order.
    /// Returns how many handlers ran.
    pub fn publish(&mut self, signal: Signal) -> usize {
        let name = signal.name();
        let Some(handlers) = self.handlers.get_mut(&name) else {
            log::debug!("No subscribers for {}", name);
            return 0;
        };
        for handler in handlers.iter_mut() {
            handler(&signal);
        }
        handlers.len()
    }

    pub fn subscriber_count(&self, name: SignalName) -> usize {
        self.handlers.get(&name).map(Vec::len).unwrap_or(0)
    }
}
