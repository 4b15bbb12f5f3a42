use crate::scene::{Texture, TextureHandle};

/// Roughness the "ModelViewer" environment is prefiltered at.
pub const MODEL_VIEWER_SIGMA: f32 = 0.04;

/// Neutral studio room (a box with a handful of area lights) used as the
/// reference scene for the ModelViewer environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomEnvironment;

impl RoomEnvironment {
    pub const NAME: &'static str = "RoomEnvironment";

    pub fn name(&self) -> &'static str {
        Self::NAME
    }
}

/// Produces tagged prefiltered textures; pixel work belongs to the backend.
#[derive(Debug, Default)]
pub struct PmremGenerator;

impl PmremGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Prefilters `room` into an environment texture blurred by `sigma`.
    pub fn from_scene(&mut self, room: &RoomEnvironment, sigma: f32) -> TextureHandle {
        log::debug!("Prefiltering {} (sigma {})", room.name(), sigma);
        Texture::prefiltered(room.name(), sigma)
    }
}
