use super::{Redraw, SyncError};
use crate::editor::EditorState;
use crate::render::Viewport;
use crate::scene::ObjectKind;

/// Adopts the editor's viewport camera. A perspective viewport camera
/// takes the primary camera's aspect and projection; navigation controls
/// stay enabled only while the editor camera itself is active.
pub(crate) fn viewport_camera_changed(viewport: &mut Viewport, editor: &EditorState) -> Redraw {
    let active = editor.viewport_camera();
    let primary = editor.camera();

    let framing = match viewport.graph.get(primary).map(|object| &object.kind) {
        Some(ObjectKind::PerspectiveCamera(camera)) => {
            Some((camera.aspect, camera.projection_matrix()))
        }
        _ => None,
    };

    match viewport.graph.get_mut(active).map(|object| &mut object.kind) {
        Some(ObjectKind::PerspectiveCamera(camera)) => match framing {
            Some((aspect, projection)) => {
                camera.aspect = aspect;
                camera.copy_projection_matrix(projection);
            }
            None => log::debug!("Primary camera {} is not perspective; nothing to copy", primary),
        },
        Some(ObjectKind::OrthographicCamera(_)) => {
            log::debug!("Orthographic viewport camera {}: projection sync unsupported", active);
        }
        Some(_) => log::warn!("Viewport camera {} is not a camera object", active),
        None => log::warn!("viewportCameraChanged: {}", SyncError::UnknownObject(active)),
    }

    viewport.viewport_camera = active;
    viewport.controls.enabled = active == primary;
    Redraw::Now
}

pub(crate) fn scene_resize(viewport: &mut Viewport) -> Redraw {
    viewport.update_aspect_ratio();
    viewport.resize_renderer();
    Redraw::Now
}

pub(crate) fn renderer_updated(viewport: &mut Viewport) -> Redraw {
    let flagged = viewport.mark_materials_for_update();
    log::debug!("Flagged {} materials for refresh", flagged);
    Redraw::Now
}

#[cfg(test)]
mod tests {
    use crate::config::Container;
    use crate::render::{HeadlessRenderer, RendererHandle};
    use crate::scene::{Material, ObjectId, ObjectKind, OrthographicCamera, PerspectiveCamera};
    use crate::signals::Signal;
    use crate::sync::test_support::Harness;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn perspective(harness: &Harness, id: ObjectId) -> PerspectiveCamera {
        match &harness.viewport.borrow().graph.get(id).unwrap().kind {
            ObjectKind::PerspectiveCamera(camera) => camera.clone(),
            other => panic!("Expected perspective camera, got {:?}", other),
        }
    }

    #[test]
    fn editor_camera_keeps_controls_enabled() {
        let mut harness = Harness::new();
        assert_eq!(harness.publish(Signal::ViewportCameraChanged), 1);
        assert!(harness.viewport.borrow().controls.enabled);
    }

    #[test]
    fn user_camera_disables_controls_and_copies_framing() {
        let mut harness = Harness::new();
        let shot = harness.add(
            "Shot",
            ObjectKind::PerspectiveCamera(PerspectiveCamera::new(30.0, 0.5, 0.1, 50.0)),
            None,
        );
        harness.editor.borrow_mut().set_viewport_camera(shot);
        assert_eq!(harness.publish(Signal::ViewportCameraChanged), 1);

        let primary = perspective(&harness, harness.editor.borrow().camera());
        let copied = perspective(&harness, shot);
        assert_eq!(copied.aspect, primary.aspect);
        assert_eq!(copied.projection_matrix(), primary.projection_matrix());
        assert_eq!(copied.fov, 30.0);

        let viewport = harness.viewport.borrow();
        assert!(!viewport.controls.enabled);
        assert_eq!(viewport.viewport_camera, shot);
    }

    #[test]
    fn orthographic_camera_is_left_untouched() {
        let mut harness = Harness::new();
        let ortho = OrthographicCamera::new(-1.0, 1.0, 1.0, -1.0, 0.1, 10.0);
        let before = ortho.projection_matrix();
        let top = harness.add("Top", ObjectKind::OrthographicCamera(ortho), None);
        harness.editor.borrow_mut().set_viewport_camera(top);
        assert_eq!(harness.publish(Signal::ViewportCameraChanged), 1);

        let viewport = harness.viewport.borrow();
        match &viewport.graph.get(top).unwrap().kind {
            ObjectKind::OrthographicCamera(camera) => {
                assert_eq!(camera.projection_matrix(), before)
            }
            other => panic!("Expected orthographic camera, got {:?}", other),
        }
        assert!(!viewport.controls.enabled);
    }

    #[test]
    fn switching_back_to_editor_camera_reenables_controls() {
        let mut harness = Harness::new();
        let shot = harness.add(
            "Shot",
            ObjectKind::PerspectiveCamera(PerspectiveCamera::new(30.0, 0.5, 0.1, 50.0)),
            None,
        );
        harness.editor.borrow_mut().set_viewport_camera(shot);
        harness.publish(Signal::ViewportCameraChanged);
        let primary = harness.editor.borrow().camera();
        harness.editor.borrow_mut().set_viewport_camera(primary);
        harness.publish(Signal::ViewportCameraChanged);
        assert!(harness.viewport.borrow().controls.enabled);
    }

    #[test]
    fn camera_reseted_updates_aspect_without_rendering() {
        let mut harness = Harness::new();
        harness.viewport.borrow_mut().container = Container {
            width: 300,
            height: 100,
        };
        assert_eq!(harness.publish(Signal::CameraReseted), 0);
        let primary = harness.editor.borrow().camera();
        assert_eq!(perspective(&harness, primary).aspect, 3.0);
    }

    #[test]
    fn scene_resize_without_renderer_still_renders() {
        let mut harness = Harness::new();
        harness.viewport.borrow_mut().container = Container {
            width: 640,
            height: 480,
        };
        assert_eq!(harness.publish(Signal::SceneResize), 1);
        let primary = harness.editor.borrow().camera();
        assert!((perspective(&harness, primary).aspect - 640.0 / 480.0).abs() < 1e-6);
    }

    #[test]
    fn scene_resize_resizes_installed_renderer() {
        let mut harness = Harness::new();
        let renderer = Rc::new(RefCell::new(HeadlessRenderer::new()));
        harness.publish(Signal::RendererCreated(RendererHandle::from_shared(
            renderer.clone(),
        )));
        harness.viewport.borrow_mut().container = Container {
            width: 800,
            height: 600,
        };
        assert_eq!(harness.publish(Signal::SceneResize), 1);
        let renderer = renderer.borrow();
        assert_eq!((renderer.width, renderer.height), (800, 600));
        assert_eq!(renderer.frames, 1);
    }

    #[test]
    fn renderer_updated_flags_scene_materials() {
        let mut harness = Harness::new();
        let cube = harness.add_box("Cube");
        harness.viewport.borrow_mut().graph.get_mut(cube).unwrap().material =
            Some(Material::new("Standard"));
        assert_eq!(harness.publish(Signal::RendererUpdated), 1);
        let viewport = harness.viewport.borrow();
        let material = viewport.graph.get(cube).unwrap().material.as_ref().unwrap();
        assert!(material.needs_update);
    }
}
