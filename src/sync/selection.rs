use super::{Redraw, SyncError};
use crate::render::Viewport;
use crate::scene::ObjectId;

/// Hides the highlight and detaches the gizmo, then re-attaches both to
/// `object` unless it is absent, the scene root, or the editor camera.
pub(crate) fn object_selected(viewport: &mut Viewport, object: Option<ObjectId>) -> Redraw {
    viewport.selection_box.visible = false;
    viewport.transform_controls.detach();

    let selectable = object
        .filter(|id| *id != viewport.scene.root && *id != viewport.camera);
    if let Some(id) = selectable {
        if viewport.graph.contains(id) {
            viewport.bounds = viewport.graph.bounds_of(id);
            if !viewport.bounds.is_empty() {
                viewport.selection_box.visible = true;
            }
            viewport.transform_controls.attach(id);
        } else {
            log::warn!("objectSelected ignored: {}", SyncError::UnknownObject(id));
        }
    }
    Redraw::Now
}

pub(crate) fn object_focused(viewport: &mut Viewport, object: ObjectId) -> Redraw {
    if let Err(err) = viewport.controls.focus(&mut viewport.graph, object) {
        log::warn!("objectFocused ignored: {}", err);
    }
    Redraw::Skip
}

pub(crate) fn object_removed(viewport: &mut Viewport, object: ObjectId) -> Redraw {
    viewport.controls.enabled = true;
    if viewport.transform_controls.object() == Some(object) {
        viewport.transform_controls.detach();
    }
    Redraw::Skip
}
