//! Viewport synchronizer: turns editor signals into viewport mutations.
//!
//! One handler per signal name is registered on the bus at construction.
//! Every handler applies its mutation and then reports whether the frame
//! must be redrawn; the dispatcher renders at most once per signal.

mod appearance;
mod camera;
mod objects;
mod selection;

use crate::editor::EditorState;
use crate::render::Viewport;
use crate::scene::{FogVariant, ObjectId};
use crate::signals::{Signal, SignalBus, SignalName};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyncError {
    #[error("no {expected} fog is active")]
    NoActiveFog { expected: FogVariant },
    #[error("active fog is {active}, not {expected}")]
    FogVariantMismatch {
        expected: FogVariant,
        active: FogVariant,
    },
    #[error("object {0} is not in the scene graph")]
    UnknownObject(ObjectId),
}

pub type Result<T> = std::result::Result<T, SyncError>;

/// Whether a handler wants the current frame drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Redraw {
    Now,
    /// Another collaborator (or a follow-up signal) draws the frame.
    Skip,
}

pub struct ViewportSynchronizer {
    viewport: Rc<RefCell<Viewport>>,
    editor: Rc<RefCell<EditorState>>,
}

impl ViewportSynchronizer {
    /// Creates the synchronizer and subscribes it to every recognised
    /// signal on `bus`.
    pub fn new(
        bus: &mut SignalBus,
        viewport: Rc<RefCell<Viewport>>,
        editor: Rc<RefCell<EditorState>>,
    ) -> Rc<Self> {
        let synchronizer = Rc::new(Self { viewport, editor });
        for name in SignalName::ALL {
            let handler = Rc::clone(&synchronizer);
            bus.subscribe(name, move |signal| handler.dispatch(signal));
        }
        log::info!(
            "Viewport synchronizer subscribed to {} signals",
            SignalName::ALL.len()
        );
        synchronizer
    }

    fn dispatch(&self, signal: &Signal) {
        let name = signal.name();
        log::debug!("Signal {}", name);
        let mut viewport = self.viewport.borrow_mut();
        let mut editor = self.editor.borrow_mut();
        let viewport = &mut *viewport;
        let editor = &mut *editor;

        let redraw = match signal {
            Signal::EditorCleared => {
                viewport.controls.reset_center();
                Redraw::Now
            }
            Signal::TransformModeChanged(mode) => {
                viewport.transform_controls.set_mode(*mode);
                Redraw::Skip
            }
            Signal::SnapChanged(distance) => {
                viewport.transform_controls.set_translation_snap(*distance);
                Redraw::Skip
            }
            Signal::SpaceChanged(space) => {
                viewport.transform_controls.set_space(*space);
                Redraw::Skip
            }
            Signal::RendererUpdated => camera::renderer_updated(viewport),
            Signal::RendererCreated(renderer) => {
                viewport.init_renderer(renderer.clone());
                Redraw::Skip
            }
            Signal::LoadDefaultEnvAndBackground => {
                viewport.load_default_env_and_background();
                Redraw::Now
            }
            Signal::SceneBackgroundChanged {
                kind,
                color,
                texture,
                equirectangular_texture,
                blurriness,
            } => appearance::background_changed(
                &mut viewport.scene,
                *kind,
                *color,
                texture.as_ref(),
                equirectangular_texture.as_ref(),
                *blurriness,
            ),
            Signal::SceneEnvironmentChanged {
                kind,
                equirectangular_texture,
            } => appearance::environment_changed(viewport, *kind, equirectangular_texture.as_ref()),
            Signal::SceneFogChanged { kind, params } => {
                appearance::fog_changed(&mut viewport.scene, *kind, params)
            }
            Signal::SceneFogSettingsChanged { kind, params } => {
                if let Err(err) = appearance::fog_settings_changed(&mut viewport.scene, *kind, params)
                {
                    log::warn!("{} ignored: {}", name, err);
                }
                Redraw::Now
            }
            Signal::SceneGraphChanged
            | Signal::CameraChanged
            | Signal::MaterialChanged
            | Signal::ExitedVr => Redraw::Now,
            Signal::CameraReseted => {
                viewport.update_aspect_ratio();
                Redraw::Skip
            }
            Signal::ViewportCameraChanged => camera::viewport_camera_changed(viewport, editor),
            Signal::ObjectSelected(object) => selection::object_selected(viewport, *object),
            Signal::ObjectFocused(object) => selection::object_focused(viewport, *object),
            Signal::ObjectChanged(object) => objects::object_changed(viewport, editor, *object),
            Signal::ObjectRemoved(object) => selection::object_removed(viewport, *object),
            Signal::GeometryChanged(object) => objects::geometry_changed(viewport, *object),
            Signal::SceneResize => camera::scene_resize(viewport),
            Signal::ShowGridChanged(visible) => {
                viewport.grid.visible = *visible;
                Redraw::Now
            }
            Signal::ShowHelpersChanged(visible) => {
                viewport.show_scene_helpers = *visible;
                viewport.transform_controls.enabled = *visible;
                Redraw::Now
            }
        };

        if redraw == Redraw::Now {
            viewport.render();
        }
    }
}
