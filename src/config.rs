use crate::scene::Color;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Pixel size of the element the viewport draws into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Container {
    pub width: u32,
    pub height: u32,
}

impl Default for Container {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl Container {
    /// Width over height, or `None` while the container has no height.
    pub fn aspect(&self) -> Option<f32> {
        if self.height == 0 {
            None
        } else {
            Some(self.width as f32 / self.height as f32)
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 50.0,
            near: 0.01,
            far: 1000.0,
            position: [0.0, 5.0, 10.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub container: Container,
    pub show_grid: bool,
    pub show_helpers: bool,
    pub default_background: Color,
    pub camera: CameraConfig,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            container: Container::default(),
            show_grid: true,
            show_helpers: true,
            default_background: Color::from_hex(0xaaaaaa),
            camera: CameraConfig::default(),
        }
    }
}

pub fn load_config_from_file(path: &Path) -> Result<ViewportConfig> {
    let json = std::fs::read_to_string(path)?;
    let config: ViewportConfig = serde_json::from_str(&json)?;
    Ok(config)
}
