//! JSON replay scripts: a scene description plus an ordered list of
//! signals that refer to objects and textures by name.

use super::{BackgroundKind, EnvironmentKind, FogKind, FogParams, Signal, SignalBus};
use crate::assets::{AssetError, TextureLibrary};
use crate::editor::EditorState;
use crate::render::{HeadlessRenderer, RendererHandle, TransformMode, TransformSpace, Viewport};
use crate::scene::{
    Aabb, Color, LightKind, Material, ObjectId, ObjectKind, OrthographicCamera, PerspectiveCamera,
    SceneError, TextureHandle, Transform,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error("object '{name}' is not defined in the script")]
    UnknownObject { name: String },
    #[error("object '{name}' is defined twice")]
    DuplicateObject { name: String },
}

pub type Result<T> = std::result::Result<T, ScriptError>;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Script {
    #[serde(default)]
    pub textures: Vec<String>,
    #[serde(default)]
    pub objects: Vec<ObjectSpec>,
    #[serde(default)]
    pub signals: Vec<SignalSpec>,
}

#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct BoundsSpec {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl From<BoundsSpec> for Aabb {
    fn from(spec: BoundsSpec) -> Self {
        Aabb::from_arrays(spec.min, spec.max)
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectKindSpec {
    Group,
    Mesh,
    SkinnedMesh,
    PerspectiveCamera {
        #[serde(default = "default_fov")]
        fov: f32,
        #[serde(default = "default_near")]
        near: f32,
        #[serde(default = "default_far")]
        far: f32,
    },
    OrthographicCamera {
        #[serde(default = "default_half_extent")]
        half_extent: f32,
        #[serde(default = "default_near")]
        near: f32,
        #[serde(default = "default_far")]
        far: f32,
    },
    Light {
        light: LightKind,
    },
}

fn default_fov() -> f32 {
    50.0
}

fn default_near() -> f32 {
    0.01
}

fn default_far() -> f32 {
    1000.0
}

fn default_half_extent() -> f32 {
    1.0
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl ObjectKindSpec {
    fn to_kind(&self, aspect: f32) -> ObjectKind {
        match *self {
            ObjectKindSpec::Group => ObjectKind::Group,
            ObjectKindSpec::Mesh => ObjectKind::Mesh,
            ObjectKindSpec::SkinnedMesh => ObjectKind::SkinnedMesh,
            ObjectKindSpec::PerspectiveCamera { fov, near, far } => {
                ObjectKind::PerspectiveCamera(PerspectiveCamera::new(fov, aspect, near, far))
            }
            ObjectKindSpec::OrthographicCamera {
                half_extent,
                near,
                far,
            } => ObjectKind::OrthographicCamera(OrthographicCamera::new(
                -half_extent * aspect,
                half_extent * aspect,
                half_extent,
                -half_extent,
                near,
                far,
            )),
            ObjectKindSpec::Light { light } => ObjectKind::Light(light),
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ObjectSpec {
    pub name: String,
    pub kind: ObjectKindSpec,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation_deg: [f32; 3],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    #[serde(default)]
    pub geometry: Option<BoundsSpec>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub helper: bool,
}

/// One scripted signal. Kind fields stay strings so an unrecognised type
/// reaches the viewport instead of failing the whole script.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(tag = "signal", rename_all = "camelCase")]
pub enum SignalSpec {
    EditorCleared,
    TransformModeChanged {
        mode: TransformMode,
    },
    SnapChanged {
        #[serde(default)]
        distance: Option<f32>,
    },
    SpaceChanged {
        space: TransformSpace,
    },
    RendererUpdated,
    RendererCreated,
    LoadDefaultEnvAndBackground,
    SceneBackgroundChanged {
        #[serde(default, rename = "type")]
        kind: Option<String>,
        #[serde(default)]
        color: Option<Color>,
        #[serde(default)]
        texture: Option<String>,
        #[serde(default)]
        equirectangular_texture: Option<String>,
        #[serde(default)]
        blurriness: f32,
    },
    SceneEnvironmentChanged {
        #[serde(default, rename = "type")]
        kind: Option<String>,
        #[serde(default)]
        equirectangular_texture: Option<String>,
    },
    SceneFogChanged {
        #[serde(default, rename = "type")]
        kind: Option<String>,
        #[serde(default)]
        color: Option<Color>,
        #[serde(default)]
        near: Option<f32>,
        #[serde(default)]
        far: Option<f32>,
        #[serde(default)]
        density: Option<f32>,
    },
    SceneFogSettingsChanged {
        #[serde(default, rename = "type")]
        kind: Option<String>,
        #[serde(default)]
        color: Option<Color>,
        #[serde(default)]
        near: Option<f32>,
        #[serde(default)]
        far: Option<f32>,
        #[serde(default)]
        density: Option<f32>,
    },
    SceneGraphChanged,
    CameraChanged,
    CameraReseted,
    /// `camera: None` switches back to the editor camera.
    ViewportCameraChanged {
        #[serde(default)]
        camera: Option<String>,
    },
    ObjectSelected {
        #[serde(default)]
        object: Option<String>,
    },
    ObjectFocused {
        object: String,
    },
    ObjectChanged {
        object: String,
        #[serde(default)]
        position: Option<[f32; 3]>,
    },
    ObjectRemoved {
        object: String,
    },
    GeometryChanged {
        #[serde(default)]
        object: Option<String>,
        #[serde(default)]
        geometry: Option<BoundsSpec>,
    },
    MaterialChanged,
    #[serde(rename = "exitedVR")]
    ExitedVr,
    SceneResize {
        #[serde(default)]
        width: Option<u32>,
        #[serde(default)]
        height: Option<u32>,
    },
    ShowGridChanged {
        visible: bool,
    },
    ShowHelpersChanged {
        visible: bool,
    },
}

/// Fills unset fog fields from the fog panel defaults.
fn fog_params(color: Option<Color>, near: Option<f32>, far: Option<f32>, density: Option<f32>) -> FogParams {
    let defaults = FogParams::default();
    FogParams {
        color: color.unwrap_or(defaults.color),
        near: near.unwrap_or(defaults.near),
        far: far.unwrap_or(defaults.far),
        density: density.unwrap_or(defaults.density),
    }
}

fn parse_kind<T>(name: Option<&str>, parse: fn(&str) -> Option<T>, what: &str) -> Option<T> {
    let name = name.filter(|name| !name.is_empty())?;
    let kind = parse(name);
    if kind.is_none() {
        log::debug!("Unrecognised {} type '{}'", what, name);
    }
    kind
}

/// An empty or missing name is unset; any other unknown name is kept as
/// `Unrecognised` so the viewport still redraws.
fn background_kind(name: Option<&str>) -> Option<BackgroundKind> {
    let name = name.filter(|name| !name.is_empty())?;
    Some(
        parse_kind(Some(name), BackgroundKind::from_name, "background")
            .unwrap_or(BackgroundKind::Unrecognised),
    )
}

pub fn parse_script(json: &str) -> Result<Script> {
    let script: Script = serde_json::from_str(json)?;
    Ok(script)
}

pub fn load_script_from_file(path: &Path) -> Result<Script> {
    let json = std::fs::read_to_string(path)?;
    parse_script(&json)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub signals: usize,
    pub frames: u64,
}

/// Name tables for one script run.
#[derive(Debug)]
pub struct Replay {
    objects: HashMap<String, ObjectId>,
    textures: TextureLibrary,
}

impl Replay {
    /// Loads the script's textures and adds its objects to the viewport
    /// scene. `Scene` and `Camera` name the root and the editor camera.
    pub fn build(script: &Script, viewport: &mut Viewport, editor: &mut EditorState) -> Result<Self> {
        let mut textures = TextureLibrary::new();
        for name in &script.textures {
            textures.load(name)?;
        }

        let mut objects = HashMap::new();
        objects.insert("Scene".to_string(), viewport.scene.root);
        objects.insert("Camera".to_string(), viewport.camera);

        let aspect = viewport.container.aspect().unwrap_or(1.0);
        for spec in &script.objects {
            if objects.contains_key(&spec.name) {
                return Err(ScriptError::DuplicateObject {
                    name: spec.name.clone(),
                });
            }
            let parent = match &spec.parent {
                Some(name) => lookup(&objects, name)?,
                None => viewport.scene.root,
            };
            let id = viewport.graph.insert(&spec.name, spec.kind.to_kind(aspect));
            if let Some(object) = viewport.graph.get_mut(id) {
                object.transform =
                    Transform::from_euler_degrees(spec.position, spec.rotation_deg, spec.scale);
                object.geometry = spec.geometry.map(Aabb::from);
                object.material = spec.material.as_deref().map(Material::new);
            }
            viewport.graph.add_child(parent, id)?;
            if spec.helper && !editor.helpers_mut().register_for(&viewport.graph, id) {
                log::warn!("Object '{}' has no helper kind; helper skipped", spec.name);
            }
            objects.insert(spec.name.clone(), id);
        }
        log::info!(
            "Script scene built: {} objects, {} textures",
            script.objects.len(),
            textures.len()
        );

        Ok(Self { objects, textures })
    }

    pub fn object(&self, name: &str) -> Result<ObjectId> {
        lookup(&self.objects, name)
    }

    fn optional_object(&self, name: Option<&str>) -> Result<Option<ObjectId>> {
        name.map(|name| self.object(name)).transpose()
    }

    fn optional_texture(&self, name: Option<&str>) -> Result<Option<TextureHandle>> {
        Ok(name.map(|name| self.textures.get(name)).transpose()?)
    }

    /// Editor-side mutation that precedes the signal, as the editor's own
    /// commands do before publishing.
    fn prepare(&self, spec: &SignalSpec, viewport: &mut Viewport, editor: &mut EditorState) -> Result<()> {
        match spec {
            SignalSpec::ObjectSelected { object } => {
                editor.select(self.optional_object(object.as_deref())?);
            }
            SignalSpec::ViewportCameraChanged { camera } => {
                let camera = self
                    .optional_object(camera.as_deref())?
                    .unwrap_or_else(|| editor.camera());
                editor.set_viewport_camera(camera);
            }
            SignalSpec::ObjectChanged {
                object,
                position: Some(position),
            } => {
                let id = self.object(object)?;
                if let Some(object) = viewport.graph.get_mut(id) {
                    object.transform.position = glam::Vec3::from_array(*position);
                }
            }
            SignalSpec::ObjectRemoved { object } => {
                let id = self.object(object)?;
                viewport.graph.detach(id)?;
                editor.helpers_mut().remove(id);
                if editor.selected() == Some(id) {
                    editor.select(None);
                }
            }
            SignalSpec::GeometryChanged {
                object: Some(object),
                geometry: Some(geometry),
            } => {
                let id = self.object(object)?;
                if let Some(object) = viewport.graph.get_mut(id) {
                    object.geometry = Some(Aabb::from(*geometry));
                }
            }
            SignalSpec::SceneResize { width, height } => {
                if let Some(width) = width {
                    viewport.container.width = *width;
                }
                if let Some(height) = height {
                    viewport.container.height = *height;
                }
            }
            _ => {}
        }
        Ok(())
    }

    pub fn resolve(&self, spec: &SignalSpec) -> Result<Signal> {
        let signal = match spec {
            SignalSpec::EditorCleared => Signal::EditorCleared,
            SignalSpec::TransformModeChanged { mode } => Signal::TransformModeChanged(*mode),
            SignalSpec::SnapChanged { distance } => Signal::SnapChanged(*distance),
            SignalSpec::SpaceChanged { space } => Signal::SpaceChanged(*space),
            SignalSpec::RendererUpdated => Signal::RendererUpdated,
            SignalSpec::RendererCreated => {
                Signal::RendererCreated(RendererHandle::new(HeadlessRenderer::new()))
            }
            SignalSpec::LoadDefaultEnvAndBackground => Signal::LoadDefaultEnvAndBackground,
            SignalSpec::SceneBackgroundChanged {
                kind,
                color,
                texture,
                equirectangular_texture,
                blurriness,
            } => Signal::SceneBackgroundChanged {
                kind: background_kind(kind.as_deref()),
                color: *color,
                texture: self.optional_texture(texture.as_deref())?,
                equirectangular_texture: self
                    .optional_texture(equirectangular_texture.as_deref())?,
                blurriness: *blurriness,
            },
            SignalSpec::SceneEnvironmentChanged {
                kind,
                equirectangular_texture,
            } => Signal::SceneEnvironmentChanged {
                kind: parse_kind(kind.as_deref(), EnvironmentKind::from_name, "environment"),
                equirectangular_texture: self
                    .optional_texture(equirectangular_texture.as_deref())?,
            },
            SignalSpec::SceneFogChanged {
                kind,
                color,
                near,
                far,
                density,
            } => Signal::SceneFogChanged {
                kind: parse_kind(kind.as_deref(), FogKind::from_name, "fog"),
                params: fog_params(*color, *near, *far, *density),
            },
            SignalSpec::SceneFogSettingsChanged {
                kind,
                color,
                near,
                far,
                density,
            } => Signal::SceneFogSettingsChanged {
                kind: parse_kind(kind.as_deref(), FogKind::from_name, "fog"),
                params: fog_params(*color, *near, *far, *density),
            },
            SignalSpec::SceneGraphChanged => Signal::SceneGraphChanged,
            SignalSpec::CameraChanged => Signal::CameraChanged,
            SignalSpec::CameraReseted => Signal::CameraReseted,
            SignalSpec::ViewportCameraChanged { .. } => Signal::ViewportCameraChanged,
            SignalSpec::ObjectSelected { object } => {
                Signal::ObjectSelected(self.optional_object(object.as_deref())?)
            }
            SignalSpec::ObjectFocused { object } => Signal::ObjectFocused(self.object(object)?),
            SignalSpec::ObjectChanged { object, .. } => Signal::ObjectChanged(self.object(object)?),
            SignalSpec::ObjectRemoved { object } => Signal::ObjectRemoved(self.object(object)?),
            SignalSpec::GeometryChanged { object, .. } => {
                Signal::GeometryChanged(self.optional_object(object.as_deref())?)
            }
            SignalSpec::MaterialChanged => Signal::MaterialChanged,
            SignalSpec::ExitedVr => Signal::ExitedVr,
            SignalSpec::SceneResize { .. } => Signal::SceneResize,
            SignalSpec::ShowGridChanged { visible } => Signal::ShowGridChanged(*visible),
            SignalSpec::ShowHelpersChanged { visible } => Signal::ShowHelpersChanged(*visible),
        };
        Ok(signal)
    }

    /// Publishes every scripted signal in order.
    pub fn run(
        &self,
        script: &Script,
        bus: &mut SignalBus,
        viewport: &Rc<RefCell<Viewport>>,
        editor: &Rc<RefCell<EditorState>>,
    ) -> Result<ReplaySummary> {
        let frames_before = viewport.borrow().frames_rendered();
        for spec in &script.signals {
            {
                let mut viewport = viewport.borrow_mut();
                let mut editor = editor.borrow_mut();
                self.prepare(spec, &mut viewport, &mut editor)?;
            }
            let signal = self.resolve(spec)?;
            bus.publish(signal);
        }
        Ok(ReplaySummary {
            signals: script.signals.len(),
            frames: viewport.borrow().frames_rendered() - frames_before,
        })
    }
}

fn lookup(objects: &HashMap<String, ObjectId>, name: &str) -> Result<ObjectId> {
    objects
        .get(name)
        .copied()
        .ok_or_else(|| ScriptError::UnknownObject {
            name: name.to_string(),
        })
}
