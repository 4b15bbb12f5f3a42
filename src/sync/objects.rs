use super::Redraw;
use crate::editor::EditorState;
use crate::render::Viewport;
use crate::scene::{ObjectId, ObjectKind};

pub(crate) fn object_changed(
    viewport: &mut Viewport,
    editor: &mut EditorState,
    object: ObjectId,
) -> Redraw {
    if editor.selected() == Some(object) {
        viewport.bounds = viewport.graph.bounds_of(object);
    }

    if let Some(changed) = viewport.graph.get_mut(object) {
        if let ObjectKind::PerspectiveCamera(camera) = &mut changed.kind {
            camera.update_projection_matrix();
        }
    }

    // Skeleton helpers follow bone poses, not the owner transform.
    if let Some(helper) = editor.helpers_mut().get_mut(object) {
        if !helper.is_skeleton() {
            helper.update(&viewport.graph);
        }
    }
    Redraw::Now
}

/// With no object this is a plain redraw request.
pub(crate) fn geometry_changed(viewport: &mut Viewport, object: Option<ObjectId>) -> Redraw {
    if let Some(object) = object {
        viewport.bounds = viewport.graph.bounds_of(object);
    }
    Redraw::Now
}
