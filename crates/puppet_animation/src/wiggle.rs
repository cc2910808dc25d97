//! Smooth pseudo-random positional jitter.
//!
//! Each axis is 1D value noise: random values on integer sample points,
//! interpolated with an ease curve. The random source is a pure sine hash
//! seeded by the layer id, so the same layer at the same time always yields
//! the same offset with no stored state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use puppet_core::LayerId;

/// Seed stride between layers.
const LAYER_SEED_STRIDE: f64 = 1000.0;
/// Seed offset separating the Y stream from the X stream of the same layer.
const Y_SEED_OFFSET: f64 = 500.0;

/// Tunable parameters of a layer's wiggle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WiggleParams {
    /// Noise samples per second.
    pub speed: f32,
    /// Peak horizontal offset in pixels.
    pub amplitude_x: f32,
    /// Peak vertical offset in pixels.
    pub amplitude_y: f32,
    pub decay_enabled: bool,
    /// Exponential decay rate per second when `decay_enabled`.
    pub decay_rate: f32,
}

impl Default for WiggleParams {
    fn default() -> Self {
        Self {
            speed: 10.0,
            amplitude_x: 5.0,
            amplitude_y: 5.0,
            decay_enabled: false,
            decay_rate: 0.5,
        }
    }
}

/// A single named parameter update, see [`Wiggle::set`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WiggleParam {
    Speed(f32),
    AmplitudeX(f32),
    AmplitudeY(f32),
    DecayEnabled(bool),
    DecayRate(f32),
}

/// Wiggle state carried by every layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wiggle {
    pub enabled: bool,
    /// Absolute timeline time at which the wiggle starts.
    pub start_time: Option<f32>,
    /// `None` until first edited; evaluation falls back to the defaults.
    pub params: Option<WiggleParams>,
}

impl Wiggle {
    /// Turns the wiggle on starting at `start_time`.
    pub fn enable(&mut self, start_time: f32) {
        self.enabled = true;
        self.start_time = Some(start_time);
        self.params_mut();
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Effective parameters, defaulted when never edited.
    #[must_use]
    pub fn params(&self) -> WiggleParams {
        self.params.unwrap_or_default()
    }

    /// Mutable parameters, created with defaults on first access.
    pub fn params_mut(&mut self) -> &mut WiggleParams {
        self.params.get_or_insert_with(WiggleParams::default)
    }

    pub fn set(&mut self, param: WiggleParam) {
        let params = self.params_mut();
        match param {
            WiggleParam::Speed(v) => params.speed = v,
            WiggleParam::AmplitudeX(v) => params.amplitude_x = v,
            WiggleParam::AmplitudeY(v) => params.amplitude_y = v,
            WiggleParam::DecayEnabled(v) => params.decay_enabled = v,
            WiggleParam::DecayRate(v) => params.decay_rate = v,
        }
    }

    /// Offset of `layer` at absolute time `time`. See [`wiggle_offset`].
    #[must_use]
    pub fn offset(&self, layer: LayerId, time: f32) -> Vec2 {
        wiggle_offset(layer, self, time)
    }
}

/// Deterministic hash of `seed` into `[0, 1)`.
#[inline]
#[must_use]
pub fn seeded_random(seed: f64) -> f64 {
    let x = (seed * 12.9898 + 78.233).sin() * 43758.5453;
    x - x.floor()
}

/// One axis of value noise at `time`, scaled by `amplitude`.
///
/// Returns exactly zero for a zero amplitude.
#[must_use]
pub fn wiggle_value(time: f64, speed: f64, amplitude: f64, seed: f64) -> f64 {
    if amplitude == 0.0 {
        return 0.0;
    }
    let sample = time * speed;
    let index = sample.floor();
    let t = sample - index;

    let v0 = seeded_random(seed + index) * 2.0 - 1.0;
    let v1 = seeded_random(seed + index + 1.0) * 2.0 - 1.0;
    let eased = t * t * (3.0 - 2.0 * t);

    amplitude * (v0 + (v1 - v0) * eased)
}

/// Positional jitter of `layer` at absolute time `time`.
///
/// Zero when the wiggle is disabled, has no start time, or has not started
/// yet.
#[must_use]
pub fn wiggle_offset(layer: LayerId, wiggle: &Wiggle, time: f32) -> Vec2 {
    if !wiggle.enabled {
        return Vec2::ZERO;
    }
    let Some(start_time) = wiggle.start_time else {
        return Vec2::ZERO;
    };
    if time < start_time {
        return Vec2::ZERO;
    }

    let params = wiggle.params();
    let elapsed = f64::from(time) - f64::from(start_time);
    let speed = f64::from(params.speed);
    let seed_x = f64::from(layer.raw()) * LAYER_SEED_STRIDE;
    let seed_y = seed_x + Y_SEED_OFFSET;

    let mut x = wiggle_value(elapsed, speed, f64::from(params.amplitude_x), seed_x);
    let mut y = wiggle_value(elapsed, speed, f64::from(params.amplitude_y), seed_y);

    if params.decay_enabled {
        let decay = decay_factor(layer, elapsed, f64::from(params.decay_rate));
        x *= decay;
        y *= decay;
    }

    Vec2::new(x as f32, y as f32)
}

/// Exponential fade with a little per-half-second randomness so the decay
/// does not look mechanical.
fn decay_factor(layer: LayerId, elapsed: f64, rate: f64) -> f64 {
    let jitter = seeded_random(f64::from(layer.raw()) + (elapsed * 2.0).floor());
    (-elapsed * rate).exp() * (0.8 + 0.4 * jitter)
}
