//! Engine Settings
//!
//! Project-wide configuration consumed by the evaluation loop and the
//! compositor.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use puppet_core::settings::EngineSettings;
//!
//! // Defaults: 30 fps, 1280×720 canvas
//! let settings = EngineSettings::default();
//!
//! // Override a few fields
//! let settings = EngineSettings {
//!     fps: 24.0,
//!     show_anchor_markers: false,
//!     ..Default::default()
//! };
//!
//! // Or load from a JSON file; missing fields fall back to defaults
//! let settings = EngineSettings::load("project.json")?;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{PuppetError, Result};

/// Fixed padding (in source pixels) added around a deformed layer's render
/// target on every side.
pub const DEFAULT_RENDER_PADDING: f32 = 200.0;

/// Extra fraction of the deformed bounds added to the render target.
pub const DEFAULT_OVERSHOOT: f32 = 0.2;

/// Playback behaviour once the playhead passes the end of the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    /// Keep running past the end; procedural motion continues indefinitely.
    #[default]
    Unbounded,
    /// Stop at the end of the project.
    Once,
    /// Wrap back to the start.
    Loop,
}

/// Project and evaluation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Project frame rate; converts between frame numbers and seconds.
    pub fps: f32,
    /// Composited frame width in pixels.
    pub canvas_width: u32,
    /// Composited frame height in pixels.
    pub canvas_height: u32,
    /// Clear color of each composited frame (RGBA8).
    pub background: [u8; 4],
    /// Padding around a deformed layer's intermediate render target.
    pub render_padding: f32,
    /// Fraction of the deformed bounds added to the render target.
    pub overshoot: f32,
    /// Project length in seconds, used by [`LoopMode::Once`]/[`LoopMode::Loop`].
    pub duration: f32,
    /// What happens when playback reaches `duration`.
    pub loop_mode: LoopMode,
    /// Draw anchor markers on top of animated layers (editor preview only).
    pub show_anchor_markers: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            fps: 30.0,
            canvas_width: 1280,
            canvas_height: 720,
            background: [0, 0, 0, 0],
            render_padding: DEFAULT_RENDER_PADDING,
            overshoot: DEFAULT_OVERSHOOT,
            duration: 10.0,
            loop_mode: LoopMode::Unbounded,
            show_anchor_markers: false,
        }
    }
}

impl EngineSettings {
    /// Parses settings from JSON and validates them.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        log::info!("Loading engine settings from {}", path.display());
        Self::from_json_str(&text)
    }

    /// Rejects values the engine cannot meaningfully clamp.
    pub fn validate(&self) -> Result<()> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(PuppetError::InvalidSettings(format!(
                "fps must be positive, got {}",
                self.fps
            )));
        }
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(PuppetError::InvalidSettings(format!(
                "canvas must be non-empty, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.render_padding < 0.0 || self.overshoot < 0.0 {
            return Err(PuppetError::InvalidSettings(
                "render padding and overshoot must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Duration of one frame in seconds.
    #[inline]
    #[must_use]
    pub fn frame_duration(&self) -> f32 {
        1.0 / self.fps
    }
}
