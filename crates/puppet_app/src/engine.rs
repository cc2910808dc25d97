//! Engine facade.
//!
//! [`Engine`] bundles a [`Scene`], its [`Playback`] driver and a
//! [`FrameCompositor`] so a host only has to forward display-frame callbacks.
//!
//! ```rust,ignore
//! use puppet::{Engine, EngineSettings};
//!
//! let mut engine = Engine::new(EngineSettings::default());
//! let body = engine.scene.build_layer("body").with_image(image).with_bounce().build();
//! engine.scene.insert_keyframe(body)?;
//!
//! engine.toggle_playback();
//! while let Some(frame) = engine.tick(1.0 / 60.0) {
//!     present(&frame);
//!     if !engine.is_playing() { break; }
//! }
//! ```

use std::path::Path;

use image::RgbaImage;

use puppet_core::time::frame_to_seconds;
use puppet_core::{EngineSettings, Result};
use puppet_render::{FrameCompositor, MeshRasterizer, SoftwareRasterizer};
use puppet_scene::Scene;

use crate::playback::Playback;

pub struct Engine<R: MeshRasterizer = SoftwareRasterizer> {
    pub scene: Scene,
    pub playback: Playback,
    compositor: FrameCompositor<R>,
    frame_count: u64,
}

impl Engine<SoftwareRasterizer> {
    #[must_use]
    pub fn new(settings: EngineSettings) -> Self {
        Self::with_rasterizer(settings, SoftwareRasterizer)
    }

    /// Creates an engine from a JSON settings file.
    pub fn from_settings_file(path: impl AsRef<Path>) -> Result<Self> {
        let settings = EngineSettings::load(path)?;
        Ok(Self::new(settings))
    }
}

impl Default for Engine<SoftwareRasterizer> {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

impl<R: MeshRasterizer> Engine<R> {
    pub fn with_rasterizer(settings: EngineSettings, rasterizer: R) -> Self {
        Self {
            scene: Scene::with_settings(&settings),
            playback: Playback::new(&settings),
            compositor: FrameCompositor::with_rasterizer(settings, rasterizer),
            frame_count: 0,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        self.compositor.settings()
    }

    /// Number of frames rendered so far.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    pub fn toggle_playback(&mut self) -> bool {
        self.playback.toggle(&mut self.scene)
    }

    pub fn stop(&mut self) {
        self.playback.stop(&mut self.scene);
    }

    /// Renders the scene at its current time.
    pub fn render(&mut self) -> RgbaImage {
        self.frame_count += 1;
        self.compositor.render(&self.scene)
    }

    /// One display frame: advances playback by `dt` and renders.
    ///
    /// Returns `None` without rendering when playback is not running.
    pub fn tick(&mut self, dt: f32) -> Option<RgbaImage> {
        if !self.playback.is_playing() {
            return None;
        }
        self.playback.advance(&mut self.scene, dt);
        Some(self.render())
    }

    /// Like [`Engine::tick`], measuring `dt` from the wall clock.
    pub fn tick_wall_clock(&mut self) -> Option<RgbaImage> {
        if !self.playback.is_playing() {
            return None;
        }
        self.playback.tick(&mut self.scene);
        Some(self.render())
    }

    /// Renders `frames` frames from time zero at the fixed project frame step
    /// and hands each to `sink`. Anchor markers are hidden while exporting.
    ///
    /// The playhead is restored afterwards.
    pub fn export<F>(&mut self, frames: u32, mut sink: F) -> Result<()>
    where
        F: FnMut(u32, RgbaImage) -> Result<()>,
    {
        let fps = self.scene.fps();
        let saved_time = self.scene.current_time();
        let saved_markers = self.compositor.settings().show_anchor_markers;
        self.compositor.settings_mut().show_anchor_markers = false;

        log::info!("Exporting {frames} frames at {fps} fps");
        let mut result = Ok(());
        for index in 0..frames {
            self.scene
                .set_current_time(frame_to_seconds(i64::from(index), fps));
            let frame = self.render();
            result = sink(index, frame);
            if result.is_err() {
                break;
            }
        }

        self.compositor.settings_mut().show_anchor_markers = saved_markers;
        self.scene.set_current_time(saved_time);
        result
    }
}
