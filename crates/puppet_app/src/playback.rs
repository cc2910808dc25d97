use puppet_core::{EngineSettings, FrameClock, LoopMode};
use puppet_scene::Scene;

/// Cooperative timeline driver.
///
/// The host calls [`Playback::tick`] (wall clock) or [`Playback::advance`]
/// (explicit delta) once per display frame and schedules another call only
/// while it returns `true`. Stopping is simply not rescheduling.
#[derive(Default)]
pub struct Playback {
    playing: bool,
    loop_mode: LoopMode,
    duration: f32,
    clock: FrameClock,
}

impl Playback {
    #[must_use]
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            playing: false,
            loop_mode: settings.loop_mode,
            duration: settings.duration,
            clock: FrameClock::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    #[must_use]
    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        self.loop_mode = mode;
    }

    /// Starts playback from the scene's current time.
    pub fn play(&mut self, scene: &mut Scene) {
        if self.playing {
            return;
        }
        self.playing = true;
        self.clock.restart();
        let time = scene.current_time();
        scene.audio_sync_mut().on_playback_started(time);
        log::debug!("Playback started at {time:.3}s");
    }

    /// Pauses playback, keeping the playhead where it is.
    pub fn pause(&mut self, scene: &mut Scene) {
        if !self.playing {
            return;
        }
        self.playing = false;
        let time = scene.current_time();
        scene.audio_sync_mut().on_playback_stopped(time);
        log::debug!("Playback paused at {time:.3}s");
    }

    /// Starts or pauses playback. Returns the new playing state.
    pub fn toggle(&mut self, scene: &mut Scene) -> bool {
        if self.playing {
            self.pause(scene);
        } else {
            self.play(scene);
        }
        self.playing
    }

    /// Pauses playback if running and rewinds to the start.
    pub fn stop(&mut self, scene: &mut Scene) {
        self.pause(scene);
        scene.set_current_time(0.0);
    }

    /// Advances by the wall-clock time since the previous tick.
    pub fn tick(&mut self, scene: &mut Scene) -> bool {
        let dt = self.clock.tick();
        self.advance(scene, dt)
    }

    /// Advances the playhead by `dt` seconds and applies the loop mode.
    ///
    /// Returns whether another tick should be scheduled.
    pub fn advance(&mut self, scene: &mut Scene, dt: f32) -> bool {
        if !self.playing {
            return false;
        }

        let mut time = scene.current_time() + dt;
        match self.loop_mode {
            LoopMode::Unbounded => {}
            LoopMode::Loop => {
                if self.duration > 0.0 && time >= self.duration {
                    time = time.rem_euclid(self.duration);
                    log::debug!("Playback looped to {time:.3}s");
                }
            }
            LoopMode::Once => {
                if time >= self.duration {
                    scene.set_current_time(self.duration.max(0.0));
                    self.pause(scene);
                    return false;
                }
            }
        }

        scene.set_current_time(time);
        true
    }
}
