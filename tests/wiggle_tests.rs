//! Wiggle noise tests
//!
//! Tests for:
//! - Determinism of the seeded hash and the noise
//! - Zero offset when disabled, unstarted or before the start time
//! - Amplitude bounds, per-axis and per-layer independence
//! - Exponential decay
//! - Scene-level wiggle editing

use puppet::animation::wiggle::{Wiggle, wiggle_value};
use puppet::animation::{seeded_random, wiggle_offset};
use puppet::{LayerId, Scene, Vec2, WiggleParam, WiggleParams};

// ============================================================================
// Helper
// ============================================================================

fn enabled(params: WiggleParams) -> Wiggle {
    Wiggle {
        enabled: true,
        start_time: Some(0.0),
        params: Some(params),
    }
}

fn sample_times() -> impl Iterator<Item = f32> {
    (0..400).map(|i| i as f32 * 0.0137)
}

// ============================================================================
// Hash & Noise
// ============================================================================

#[test]
fn hash_matches_reference_formula() {
    let expected = {
        let x = (78.233_f64).sin() * 43758.5453;
        x - x.floor()
    };
    assert_eq!(seeded_random(0.0), expected);
}

#[test]
fn hash_is_deterministic() {
    for seed in [0.0, 1.0, 1000.0, 1500.0, -3.25, 123_456.0] {
        assert_eq!(seeded_random(seed).to_bits(), seeded_random(seed).to_bits());
    }
}

#[test]
fn zero_amplitude_is_exactly_zero() {
    assert_eq!(wiggle_value(3.7, 10.0, 0.0, 1000.0), 0.0);
}

#[test]
fn noise_is_continuous_across_sample_points() {
    let seed = 2000.0;
    let at = wiggle_value(1.0, 1.0, 5.0, seed);
    let before = wiggle_value(1.0 - 1e-9, 1.0, 5.0, seed);
    let after = wiggle_value(1.0 + 1e-9, 1.0, 5.0, seed);
    assert!((at - before).abs() < 1e-6);
    assert!((at - after).abs() < 1e-6);
}

// ============================================================================
// Layer Offsets
// ============================================================================

#[test]
fn same_layer_and_time_give_identical_offsets() {
    let wiggle = enabled(WiggleParams::default());
    for time in sample_times() {
        let a = wiggle_offset(LayerId(7), &wiggle, time);
        let b = wiggle_offset(LayerId(7), &wiggle, time);
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
    }
}

#[test]
fn disabled_wiggle_has_no_offset() {
    let mut wiggle = enabled(WiggleParams::default());
    wiggle.enabled = false;
    assert_eq!(wiggle_offset(LayerId(1), &wiggle, 2.0), Vec2::ZERO);
}

#[test]
fn wiggle_without_start_has_no_offset() {
    let mut wiggle = enabled(WiggleParams::default());
    wiggle.start_time = None;
    assert_eq!(wiggle_offset(LayerId(1), &wiggle, 2.0), Vec2::ZERO);
}

#[test]
fn nothing_moves_before_the_start_time() {
    let mut wiggle = enabled(WiggleParams::default());
    wiggle.start_time = Some(5.0);
    assert_eq!(wiggle_offset(LayerId(1), &wiggle, 4.999), Vec2::ZERO);
    assert_ne!(wiggle_offset(LayerId(1), &wiggle, 5.55), Vec2::ZERO);
}

#[test]
fn offsets_stay_within_amplitude() {
    let params = WiggleParams {
        amplitude_x: 8.0,
        amplitude_y: 3.0,
        ..Default::default()
    };
    let wiggle = enabled(params);
    for time in sample_times() {
        let offset = wiggle_offset(LayerId(3), &wiggle, time);
        assert!(offset.x.abs() <= 8.0 + 1e-4, "t={time}: {offset:?}");
        assert!(offset.y.abs() <= 3.0 + 1e-4, "t={time}: {offset:?}");
    }
}

#[test]
fn zero_amplitude_axis_never_moves() {
    let params = WiggleParams {
        amplitude_x: 0.0,
        ..Default::default()
    };
    let wiggle = enabled(params);
    for time in sample_times() {
        assert_eq!(wiggle_offset(LayerId(3), &wiggle, time).x, 0.0);
    }
}

#[test]
fn axes_and_layers_are_independent() {
    let wiggle = enabled(WiggleParams::default());
    let time = 1.234;

    let a = wiggle_offset(LayerId(1), &wiggle, time);
    let b = wiggle_offset(LayerId(2), &wiggle, time);
    assert_ne!(a, b);
    assert_ne!(a.x, a.y);
}

#[test]
fn decay_fades_the_offset() {
    let params = WiggleParams {
        decay_enabled: true,
        decay_rate: 2.0,
        ..Default::default()
    };
    let wiggle = enabled(params);

    for time in sample_times() {
        let offset = wiggle_offset(LayerId(4), &wiggle, time);
        // Random jitter keeps the factor within [0.8, 1.2] of the envelope.
        let bound = 5.0 * (-2.0 * time).exp() * 1.2 + 1e-4;
        assert!(offset.x.abs() <= bound, "t={time}");
        assert!(offset.y.abs() <= bound, "t={time}");
    }
    assert!(wiggle_offset(LayerId(4), &wiggle, 10.0).length() < 1e-6);
}

// ============================================================================
// Scene Editing
// ============================================================================

#[test]
fn scene_enables_and_tunes_wiggle() {
    let mut scene = Scene::default();
    let id = scene.build_layer("head").build();

    assert!(scene.layer(id).unwrap().wiggle.params.is_none());
    scene.enable_wiggle(id, 1.5).unwrap();
    scene.set_wiggle_param(id, WiggleParam::AmplitudeY(0.0)).unwrap();

    let wiggle = &scene.layer(id).unwrap().wiggle;
    assert!(wiggle.enabled);
    assert_eq!(wiggle.start_time, Some(1.5));
    let params = wiggle.params();
    assert_eq!(params.amplitude_y, 0.0);
    assert_eq!(params.speed, WiggleParams::default().speed);

    scene.disable_wiggle(id).unwrap();
    let wiggle = &scene.layer(id).unwrap().wiggle;
    assert!(!wiggle.enabled);
    assert_eq!(wiggle.offset(id, 3.0), Vec2::ZERO);
}

#[test]
fn wiggle_edits_on_missing_layer_fail() {
    let mut scene = Scene::default();
    assert!(scene.enable_wiggle(LayerId(42), 0.0).is_err());
    assert!(scene.set_wiggle_param(LayerId(42), WiggleParam::Speed(1.0)).is_err());
}
