//! Application layer: timeline playback and the [`Engine`] facade.

pub mod engine;
pub mod playback;

pub use engine::Engine;
pub use playback::Playback;
