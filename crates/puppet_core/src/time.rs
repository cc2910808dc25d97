//! Timeline time.
//!
//! - [`FrameClock`]: wall-clock deltas between display-frame callbacks
//! - [`frame_at`] / [`frame_to_seconds`]: conversion between the timeline's
//!   seconds and the keyframe grid

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};
#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Measures the wall-clock time between consecutive playback ticks.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    last_tick: Instant,
    /// Delta measured by the latest [`FrameClock::tick`].
    pub delta: Duration,
    /// Ticks since the last restart.
    pub ticks: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            delta: Duration::ZERO,
            ticks: 0,
        }
    }

    /// Starts measuring from now. Called when playback resumes so the paused
    /// interval is not reported as one long frame.
    pub fn restart(&mut self) {
        *self = Self::new();
    }

    /// Records a frame boundary and returns the delta in seconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.delta = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        self.ticks += 1;
        self.delta.as_secs_f32()
    }
}

/// Frame number containing `time` at `fps`, i.e. `floor(time * fps)`.
#[inline]
#[must_use]
pub fn frame_at(time: f32, fps: f32) -> i64 {
    (f64::from(time) * f64::from(fps)).floor() as i64
}

/// Start time in seconds of `frame` at `fps`: the earliest `f32` time for
/// which [`frame_at`] yields `frame`. A non-positive fps maps every frame to
/// zero.
#[must_use]
pub fn frame_to_seconds(frame: i64, fps: f32) -> f32 {
    if fps <= 0.0 {
        return 0.0;
    }
    let mut time = (frame as f64 / f64::from(fps)) as f32;
    // Rounding to f32 can land just before the frame boundary.
    while time.is_finite() && frame_at(time, fps) < frame {
        time = time.next_up();
    }
    time
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_floor_toward_negative_infinity() {
        assert_eq!(frame_at(1.234, 30.0), 37);
        assert_eq!(frame_at(0.0, 30.0), 0);
        assert_eq!(frame_at(-0.01, 30.0), -1);
    }

    #[test]
    fn frame_start_round_trips_on_the_grid() {
        for frame in [0_i64, 1, 29, 30, 301] {
            assert_eq!(frame_at(frame_to_seconds(frame, 30.0), 30.0), frame);
        }
        assert_eq!(frame_to_seconds(12, 0.0), 0.0);
    }

    #[test]
    fn clock_counts_ticks() {
        let mut clock = FrameClock::new();
        assert!(clock.tick() >= 0.0);
        clock.tick();
        assert_eq!(clock.ticks, 2);
        clock.restart();
        assert_eq!(clock.ticks, 0);
    }
}
