//! Viewport synchronization for a 3D scene editor.
//!
//! The editor publishes named [`signals::Signal`]s on a [`signals::SignalBus`];
//! the [`sync::ViewportSynchronizer`] keeps the [`render::Viewport`] (scene
//! appearance, selection highlight, gizmo, cameras, helpers) consistent with
//! them and redraws when needed.

pub mod assets;
pub mod config;
pub mod editor;
pub mod render;
pub mod scene;
pub mod signals;
pub mod sync;

pub use config::ViewportConfig;
pub use editor::EditorState;
pub use render::Viewport;
pub use signals::{Signal, SignalBus, SignalName};
pub use sync::ViewportSynchronizer;
