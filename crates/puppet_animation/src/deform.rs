//! Procedural bounce and sway deformation.
//!
//! Both motion types build the same `(N+1) × (M+1)` grid, centered on the
//! layer origin, and differ only in how each row is placed:
//!
//! - **Bounce** stretches rows along Y on one side of the anchor. The stretch
//!   grows with distance from the anchor (smoothstep falloff) and follows a
//!   damped sine, so the layer first compresses and then overshoots.
//! - **Sway** shifts rows along X. Displacement grows with distance from the
//!   anchor (`smoothstep^1.2`) and is attenuated near pins.
//!
//! The pivot is always the layer's current anchor, regardless of where the
//! anchor was when the keyframe was recorded.

use glam::Vec2;

use puppet_core::math::{damping_envelope, safe_ratio, smoothstep};

use crate::mesh::{DeformMesh, RowPlacement};
use crate::motion::{BounceDirection, HORIZONTAL_DIVISIONS, MotionSettings, MotionType};
use crate::pins::pin_multiplier;

/// Exponent shaping how sway displacement grows away from the anchor.
const SWAY_FALLOFF_EXPONENT: f32 = 1.2;

/// Damped oscillation `sin(ω·elapsed) · damping` driving both motion types.
///
/// Zero before the motion starts (`elapsed < 0`).
#[must_use]
pub fn oscillation(settings: &MotionSettings, elapsed: f32) -> f32 {
    if elapsed < 0.0 {
        return 0.0;
    }
    let damping = damping_envelope(elapsed, settings.damping_time);
    (settings.angular_frequency() * elapsed).sin() * damping
}

/// Builds the deformed mesh of a `width × height` layer.
///
/// `local_time - start_time` is the time since the active keyframe fired;
/// `anchor` is the layer's current normalized anchor.
#[must_use]
pub fn build_deform_mesh(
    settings: &MotionSettings,
    width: f32,
    height: f32,
    local_time: f32,
    start_time: f32,
    anchor: Vec2,
) -> DeformMesh {
    let elapsed = local_time - start_time;
    let pivot = anchor.y.clamp(0.0, 1.0);
    let divisions = settings.divisions();
    let wave = oscillation(settings, elapsed);

    let rows: Vec<RowPlacement> = (0..=divisions)
        .map(|i| {
            let y_ratio = i as f32 / divisions as f32;
            match settings.motion_type {
                MotionType::Bounce => bounce_row(settings, y_ratio, pivot, wave, height),
                MotionType::Sway => sway_row(settings, y_ratio, pivot, wave, height),
            }
        })
        .collect();

    DeformMesh::from_rows(&rows, HORIZONTAL_DIVISIONS, width)
}

/// The undeformed grid: every vertex at `(u - 0.5)·w, (v - 0.5)·h`.
#[must_use]
pub fn rest_mesh(divisions: u32, width: f32, height: f32) -> DeformMesh {
    let divisions = divisions.max(1);
    let rows: Vec<RowPlacement> = (0..=divisions)
        .map(|i| rest_row(i as f32 / divisions as f32, height))
        .collect();
    DeformMesh::from_rows(&rows, HORIZONTAL_DIVISIONS, width)
}

#[inline]
fn rest_row(y_ratio: f32, height: f32) -> RowPlacement {
    RowPlacement {
        x_offset: 0.0,
        y: (y_ratio - 0.5) * height,
    }
}

fn bounce_row(
    settings: &MotionSettings,
    y_ratio: f32,
    pivot: f32,
    wave: f32,
    height: f32,
) -> RowPlacement {
    let rest = rest_row(y_ratio, height);
    let scale_effect = -(settings.amplitude / 100.0) * wave;

    let above = y_ratio <= pivot;
    let stretched_side = match settings.bounce_direction {
        BounceDirection::Down => above,
        BounceDirection::Up => !above,
    };
    if !stretched_side {
        return rest;
    }

    let (distance, side_length, sign) = if above {
        (pivot - y_ratio, pivot, -1.0)
    } else {
        (y_ratio - pivot, 1.0 - pivot, 1.0)
    };
    let falloff = smoothstep(0.0, 1.0, safe_ratio(distance, side_length));
    let stretch = distance * scale_effect * falloff;
    if stretch == 0.0 {
        return rest;
    }

    let pivot_y = (pivot - 0.5) * height;
    RowPlacement {
        x_offset: 0.0,
        y: pivot_y + sign * (distance + stretch) * height,
    }
}

fn sway_row(
    settings: &MotionSettings,
    y_ratio: f32,
    pivot: f32,
    wave: f32,
    height: f32,
) -> RowPlacement {
    let mut row = rest_row(y_ratio, height);

    let above = y_ratio <= pivot;
    let included = if above {
        settings.sway_extent.includes_above()
    } else {
        settings.sway_extent.includes_below()
    };
    if !included {
        return row;
    }

    let linear = if above {
        safe_ratio(pivot - y_ratio, pivot)
    } else {
        safe_ratio(y_ratio - pivot, 1.0 - pivot)
    };
    let distance = smoothstep(0.0, 1.0, linear);
    let pins = pin_multiplier(&settings.pins, y_ratio);
    let sway_wave = wave * settings.sway_direction.sign();

    row.x_offset = settings.sway_amplitude * sway_wave * distance.powf(SWAY_FALLOFF_EXPONENT) * pins;
    row
}
