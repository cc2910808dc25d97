//! Capability ports the scene calls out through.
//!
//! Collaborators that live outside the engine (audio playback, puppet rigs
//! driven by another subsystem) are injected as trait objects. Each port has
//! a no-op implementation used when nothing is attached.

use glam::Vec2;

use puppet_core::LayerId;

/// Keeps an external audio track in step with timeline playback.
pub trait AudioSync {
    /// Playback started from `time` seconds.
    fn on_playback_started(&mut self, time: f32);
    /// Playback stopped or paused at `time` seconds.
    fn on_playback_stopped(&mut self, time: f32);
}

/// Supplies the canvas position of the puppet anchor a layer follows.
pub trait PuppetFollow {
    /// Position replacing the parent chain of `layer`, or `None` when the
    /// layer's followed anchor is unavailable.
    fn follow_position(&self, layer: LayerId) -> Option<Vec2>;
}

/// [`AudioSync`] that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSync for SilentAudio {
    fn on_playback_started(&mut self, _time: f32) {}
    fn on_playback_stopped(&mut self, _time: f32) {}
}

/// [`PuppetFollow`] that never yields a position.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPuppetFollow;

impl PuppetFollow for NoPuppetFollow {
    fn follow_position(&self, _layer: LayerId) -> Option<Vec2> {
        None
    }
}
