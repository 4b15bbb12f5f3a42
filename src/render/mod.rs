mod camera;
mod environment;
mod gizmo;
mod helpers;
mod stats;

pub use camera::NavigationControls;
pub use environment::{PmremGenerator, RoomEnvironment, MODEL_VIEWER_SIGMA};
pub use gizmo::{TransformControls, TransformMode, TransformSpace};
pub use helpers::{Helper, HelperKind, HelperRegistry};
pub use stats::RenderStats;

use crate::config::{Container, ViewportConfig};
use crate::scene::{
    Aabb, Background, ObjectId, ObjectKind, PerspectiveCamera, Scene, SceneGraph, TextureHandle,
};
use glam::{Quat, Vec3};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("render target has zero area ({width}x{height})")]
    ZeroSizedTarget { width: u32, height: u32 },
    #[error("object {0} is not a camera")]
    NotACamera(ObjectId),
}

/// Rasterizer the viewport hands its scene to. One `render` call draws
/// one frame.
pub trait RenderBackend {
    fn set_size(&mut self, width: u32, height: u32) -> Result<(), RenderError>;
    fn render(
        &mut self,
        scene: &Scene,
        graph: &SceneGraph,
        camera: ObjectId,
    ) -> Result<(), RenderError>;
}

/// Shared renderer handle as carried by the `rendererCreated` signal.
#[derive(Clone)]
pub struct RendererHandle(Rc<RefCell<dyn RenderBackend>>);

impl RendererHandle {
    pub fn new<R: RenderBackend + 'static>(renderer: R) -> Self {
        Self(Rc::new(RefCell::new(renderer)))
    }

    /// Wraps a renderer the caller keeps its own handle to.
    pub fn from_shared<R: RenderBackend + 'static>(renderer: Rc<RefCell<R>>) -> Self {
        Self(renderer)
    }

    fn set_size(&self, width: u32, height: u32) -> Result<(), RenderError> {
        self.0.borrow_mut().set_size(width, height)
    }

    fn render(&self, scene: &Scene, graph: &SceneGraph, camera: ObjectId) -> Result<(), RenderError> {
        self.0.borrow_mut().render(scene, graph, camera)
    }
}

impl fmt::Debug for RendererHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererHandle").finish_non_exhaustive()
    }
}

/// Backend that draws nothing and records what it was asked to draw.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    pub frames: u64,
    pub width: u32,
    pub height: u32,
    pub last_camera: Option<ObjectId>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderBackend for HeadlessRenderer {
    fn set_size(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn render(
        &mut self,
        _scene: &Scene,
        graph: &SceneGraph,
        camera: ObjectId,
    ) -> Result<(), RenderError> {
        let is_camera = graph
            .get(camera)
            .map(|object| object.kind.is_camera())
            .unwrap_or(false);
        if !is_camera {
            return Err(RenderError::NotACamera(camera));
        }
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::ZeroSizedTarget {
                width: self.width,
                height: self.height,
            });
        }
        self.frames += 1;
        self.last_camera = Some(camera);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionBox {
    pub visible: bool,
}

/// Viewport state the synchronizer mutates: the scene graph, the editor
/// camera and the camera currently drawn through, the controls modules,
/// selection highlight, grid, and the render trigger.
pub struct Viewport {
    pub graph: SceneGraph,
    pub scene: Scene,
    /// The editor's own camera.
    pub camera: ObjectId,
    /// Camera frames are drawn through.
    pub viewport_camera: ObjectId,
    pub controls: NavigationControls,
    pub transform_controls: TransformControls,
    /// Accumulator for the selection highlight's extent.
    pub bounds: Aabb,
    pub selection_box: SelectionBox,
    pub grid: Grid,
    pub show_scene_helpers: bool,
    pub container: Container,
    default_background: crate::scene::Color,
    renderer: Option<RendererHandle>,
    pmrem_generator: PmremGenerator,
    stats: RenderStats,
}

impl Viewport {
    pub fn new(config: &ViewportConfig) -> Self {
        let mut graph = SceneGraph::new();
        let scene = Scene::new(&mut graph);

        let aspect = config.container.aspect().unwrap_or(1.0);
        let camera = graph.insert(
            "Camera",
            ObjectKind::PerspectiveCamera(PerspectiveCamera::new(
                config.camera.fov,
                aspect,
                config.camera.near,
                config.camera.far,
            )),
        );
        if let Some(object) = graph.get_mut(camera) {
            let position = Vec3::from_array(config.camera.position);
            object.transform.position = position;
            object.transform.rotation = look_at_rotation(position, Vec3::ZERO);
        }

        let mut transform_controls = TransformControls::new();
        transform_controls.enabled = config.show_helpers;

        log::info!(
            "Viewport created ({}x{}, camera {})",
            config.container.width,
            config.container.height,
            camera
        );

        Self {
            graph,
            scene,
            camera,
            viewport_camera: camera,
            controls: NavigationControls::new(camera),
            transform_controls,
            bounds: Aabb::EMPTY,
            selection_box: SelectionBox::default(),
            grid: Grid {
                visible: config.show_grid,
            },
            show_scene_helpers: config.show_helpers,
            container: config.container,
            default_background: config.default_background,
            renderer: None,
            pmrem_generator: PmremGenerator::new(),
            stats: RenderStats::new(),
        }
    }

    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }

    /// Draws one frame of the scene through the viewport camera. Every call
    /// counts as a frame, with or without a renderer attached.
    pub fn render(&mut self) {
        self.stats.record(Instant::now());
        let Some(renderer) = &self.renderer else {
            return;
        };
        if let Err(err) = renderer.render(&self.scene, &self.graph, self.viewport_camera) {
            self.stats.record_failure();
            log::warn!("Frame {} failed: {}", self.stats.frames(), err);
        }
    }

    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    pub fn frames_rendered(&self) -> u64 {
        self.stats.frames()
    }

    /// Recomputes the editor camera's aspect from the container.
    pub fn update_aspect_ratio(&mut self) {
        let Some(aspect) = self.container.aspect() else {
            log::debug!("Container has zero height; aspect ratio left unchanged");
            return;
        };
        if let Some(object) = self.graph.get_mut(self.camera) {
            if let ObjectKind::PerspectiveCamera(camera) = &mut object.kind {
                camera.aspect = aspect;
                camera.update_projection_matrix();
            }
        }
    }

    pub fn init_renderer(&mut self, renderer: RendererHandle) {
        let Container { width, height } = self.container;
        if let Err(err) = renderer.set_size(width, height) {
            log::warn!("New renderer rejected size {}x{}: {}", width, height, err);
        }
        log::info!("Renderer installed at {}x{}", width, height);
        self.renderer = Some(renderer);
    }

    /// Resizes the render target to the container, if a renderer exists.
    pub fn resize_renderer(&mut self) {
        let Some(renderer) = &self.renderer else {
            return;
        };
        let Container { width, height } = self.container;
        match renderer.set_size(width, height) {
            Ok(()) => log::info!("Renderer resized to {}x{}", width, height),
            Err(err) => log::warn!("Renderer resize to {}x{} failed: {}", width, height, err),
        }
    }

    pub fn generate_room_environment(&mut self) -> TextureHandle {
        self.pmrem_generator
            .from_scene(&RoomEnvironment, MODEL_VIEWER_SIGMA)
    }

    pub fn load_default_env_and_background(&mut self) {
        self.scene.background = Some(Background::Color(self.default_background));
        self.scene.environment = Some(self.generate_room_environment());
    }

    /// Flags every material under the scene root for a GPU-state refresh.
    /// Returns how many materials were flagged.
    pub fn mark_materials_for_update(&mut self) -> usize {
        let mut flagged = 0;
        for id in self.graph.traverse(self.scene.root) {
            if let Some(material) = self
                .graph
                .get_mut(id)
                .and_then(|object| object.material.as_mut())
            {
                material.mark_needs_update();
                flagged += 1;
            }
        }
        flagged
    }
}

fn look_at_rotation(eye: Vec3, target: Vec3) -> Quat {
    let forward = (target - eye).normalize_or_zero();
    if forward == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_arc(Vec3::NEG_Z, forward)
}
