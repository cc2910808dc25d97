//! Deformation mesh tests
//!
//! Tests for:
//! - Grid topology, UVs and division clamping
//! - Rest pose before and at the keyframe start
//! - Damping envelope and easing kernels
//! - Bounce: one-sided stretch around the anchor, compression then overshoot
//! - Sway: horizontal-only displacement, extent, direction
//! - Pins: strongest suppression wins, ignored by bounce

use puppet::animation::deform::{oscillation, rest_mesh};
use puppet::animation::motion::{HORIZONTAL_DIVISIONS, MAX_DIVISIONS};
use puppet::animation::pins::{Pin, PinId, pin_multiplier};
use puppet::core::math::{damping_envelope, smootherstep, smoothstep};
use puppet::{
    BounceDirection, DeformMesh, MotionSettings, MotionType, SwayDirection, SwayExtent, Vec2,
    build_deform_mesh,
};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;
const WIDTH: f32 = 200.0;
const HEIGHT: f32 = 300.0;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn bounce_settings() -> MotionSettings {
    MotionSettings {
        motion_type: MotionType::Bounce,
        amplitude: 50.0,
        frequency: 3.0,
        damping_time: 1.0,
        divisions: 30,
        ..Default::default()
    }
}

fn sway_settings() -> MotionSettings {
    MotionSettings {
        motion_type: MotionType::Sway,
        sway_amplitude: 100.0,
        ..bounce_settings()
    }
}

/// Elapsed time at which the first quarter oscillation peaks.
fn quarter_period(settings: &MotionSettings) -> f32 {
    settings.damping_time / (4.0 * settings.frequency)
}

/// First vertex of row `i`.
fn row_start(mesh: &DeformMesh, i: u32) -> Vec2 {
    mesh.positions[(i * (mesh.columns + 1)) as usize]
}

fn row_y(mesh: &DeformMesh, i: u32) -> f32 {
    row_start(mesh, i).y
}

/// Horizontal shift of row `i` relative to the rest pose.
fn row_shift(mesh: &DeformMesh, rest: &DeformMesh, i: u32) -> f32 {
    row_start(mesh, i).x - row_start(rest, i).x
}

// ============================================================================
// Grid
// ============================================================================

#[test]
fn grid_has_expected_topology() {
    let mesh = build_deform_mesh(&bounce_settings(), WIDTH, HEIGHT, 0.3, 0.0, Vec2::splat(0.5));
    let columns1 = HORIZONTAL_DIVISIONS as usize + 1;

    assert_eq!(mesh.rows, 30);
    assert_eq!(mesh.columns, HORIZONTAL_DIVISIONS);
    assert_eq!(mesh.vertex_count(), 31 * columns1);
    assert_eq!(mesh.triangle_count(), 30 * HORIZONTAL_DIVISIONS as usize * 2);
}

#[test]
fn uvs_map_the_undeformed_grid() {
    let mesh = build_deform_mesh(&bounce_settings(), WIDTH, HEIGHT, 0.3, 0.0, Vec2::splat(0.5));
    let columns1 = mesh.columns + 1;

    for i in 0..=mesh.rows {
        for j in 0..=mesh.columns {
            let uv = mesh.uvs[(i * columns1 + j) as usize];
            assert_eq!(uv.x, j as f32 / mesh.columns as f32);
            assert_eq!(uv.y, i as f32 / mesh.rows as f32);
        }
    }
}

#[test]
fn divisions_are_clamped() {
    let mut settings = bounce_settings();

    settings.divisions = 0;
    let mesh = build_deform_mesh(&settings, WIDTH, HEIGHT, 0.0, 0.0, Vec2::splat(0.5));
    assert_eq!(mesh.rows, 1);

    settings.divisions = 500;
    let mesh = build_deform_mesh(&settings, WIDTH, HEIGHT, 0.0, 0.0, Vec2::splat(0.5));
    assert_eq!(mesh.rows, MAX_DIVISIONS);

    settings.set_divisions(0);
    assert_eq!(settings.divisions, 1);
}

#[test]
fn bounds_contain_every_vertex() {
    let mesh = build_deform_mesh(&sway_settings(), WIDTH, HEIGHT, 0.05, 0.0, Vec2::new(0.5, 1.0));
    for p in &mesh.positions {
        assert!(p.x >= mesh.bounds.min.x && p.x <= mesh.bounds.max.x);
        assert!(p.y >= mesh.bounds.min.y && p.y <= mesh.bounds.max.y);
    }
}

// ============================================================================
// Rest Pose
// ============================================================================

#[test]
fn grid_is_flat_before_the_keyframe_starts() {
    for settings in [bounce_settings(), sway_settings()] {
        let mesh = build_deform_mesh(&settings, WIDTH, HEIGHT, 0.5, 1.0, Vec2::new(0.3, 0.7));

        for i in 0..=mesh.rows {
            for j in 0..=mesh.columns {
                let expected = Vec2::new(
                    (j as f32 / mesh.columns as f32 - 0.5) * WIDTH,
                    (i as f32 / mesh.rows as f32 - 0.5) * HEIGHT,
                );
                let p = mesh.positions[(i * (mesh.columns + 1) + j) as usize];
                assert_eq!(p, expected, "row {i} column {j}");
            }
        }
    }
}

#[test]
fn grid_is_at_rest_on_the_keyframe_frame() {
    let settings = bounce_settings();
    let mesh = build_deform_mesh(&settings, WIDTH, HEIGHT, 2.0, 2.0, Vec2::splat(0.5));
    let rest = rest_mesh(settings.divisions(), WIDTH, HEIGHT);
    assert_eq!(mesh.positions, rest.positions);
}

#[test]
fn zero_damping_time_stays_finite() {
    let settings = MotionSettings {
        damping_time: 0.0,
        ..bounce_settings()
    };
    let mesh = build_deform_mesh(&settings, WIDTH, HEIGHT, 0.4, 0.0, Vec2::splat(0.5));
    assert!(mesh.positions.iter().all(|p| p.is_finite()));
}

#[test]
fn anchor_on_the_edges_stays_finite() {
    for anchor_y in [0.0, 1.0] {
        for settings in [bounce_settings(), sway_settings()] {
            let mesh = build_deform_mesh(&settings, WIDTH, HEIGHT, 0.1, 0.0, Vec2::new(0.5, anchor_y));
            assert!(mesh.positions.iter().all(|p| p.is_finite()));
        }
    }
}

// ============================================================================
// Envelope & Kernels
// ============================================================================

#[test]
fn damping_decreases_strictly_and_stays_positive() {
    let mut previous = damping_envelope(0.0, 1.0);
    assert_eq!(previous, 1.0);

    for step in 1..=40 {
        let current = damping_envelope(step as f32 * 0.05, 1.0);
        assert!(current < previous, "step {step}");
        assert!(current > 0.0, "step {step}");
        previous = current;
    }
}

#[test]
fn easing_kernels_are_monotone() {
    let mut prev_smooth = smoothstep(0.0, 1.0, 0.0);
    let mut prev_smoother = smootherstep(0.0, 1.0, 0.0);
    assert_eq!(prev_smooth, 0.0);
    assert_eq!(prev_smoother, 0.0);

    for step in 1..=100 {
        let x = step as f32 / 100.0;
        let smooth = smoothstep(0.0, 1.0, x);
        let smoother = smootherstep(0.0, 1.0, x);
        assert!(smooth >= prev_smooth);
        assert!(smoother >= prev_smoother);
        prev_smooth = smooth;
        prev_smoother = smoother;
    }

    assert_eq!(smoothstep(0.0, 1.0, 1.0), 1.0);
    assert_eq!(smootherstep(0.0, 1.0, 1.0), 1.0);
    assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
    assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
}

#[test]
fn oscillation_peaks_at_the_quarter_period() {
    let settings = bounce_settings();
    let t = quarter_period(&settings);

    assert_eq!(oscillation(&settings, 0.0), 0.0);
    assert_eq!(oscillation(&settings, -0.1), 0.0);
    assert!(approx_eq(oscillation(&settings, t), damping_envelope(t, 1.0)));
}

// ============================================================================
// Bounce
// ============================================================================

#[test]
fn bounce_down_compresses_rows_above_the_anchor() {
    let settings = bounce_settings();
    let anchor = Vec2::new(0.5, 0.5);
    let mesh = build_deform_mesh(&settings, WIDTH, HEIGHT, quarter_period(&settings), 0.0, anchor);
    let rest = rest_mesh(settings.divisions(), WIDTH, HEIGHT);

    // Top row is pulled toward the anchor.
    assert!(row_y(&mesh, 0) > row_y(&rest, 0));
    // Anchor row and everything below it stay put.
    for i in 15..=30 {
        assert_eq!(row_y(&mesh, i), row_y(&rest, i), "row {i}");
    }
}

#[test]
fn bounce_overshoots_after_half_a_period() {
    let settings = bounce_settings();
    let elapsed = 3.0 * quarter_period(&settings);
    let mesh = build_deform_mesh(&settings, WIDTH, HEIGHT, elapsed, 0.0, Vec2::splat(0.5));
    let rest = rest_mesh(settings.divisions(), WIDTH, HEIGHT);

    assert!(row_y(&mesh, 0) < row_y(&rest, 0));
}

#[test]
fn bounce_up_stretches_rows_below_the_anchor() {
    let settings = MotionSettings {
        bounce_direction: BounceDirection::Up,
        ..bounce_settings()
    };
    let mesh = build_deform_mesh(&settings, WIDTH, HEIGHT, quarter_period(&settings), 0.0, Vec2::splat(0.5));
    let rest = rest_mesh(settings.divisions(), WIDTH, HEIGHT);

    for i in 0..=15 {
        assert_eq!(row_y(&mesh, i), row_y(&rest, i), "row {i}");
    }
    assert!(row_y(&mesh, 30) < row_y(&rest, 30));
}

#[test]
fn bounce_never_moves_vertices_sideways() {
    let settings = bounce_settings();
    let mesh = build_deform_mesh(&settings, WIDTH, HEIGHT, 0.13, 0.0, Vec2::new(0.5, 0.8));
    let rest = rest_mesh(settings.divisions(), WIDTH, HEIGHT);

    for (p, r) in mesh.positions.iter().zip(&rest.positions) {
        assert_eq!(p.x, r.x);
    }
}

#[test]
fn bounce_follows_the_current_anchor() {
    let settings = bounce_settings();
    let t = quarter_period(&settings);
    let low = build_deform_mesh(&settings, WIDTH, HEIGHT, t, 0.0, Vec2::new(0.5, 1.0));
    let high = build_deform_mesh(&settings, WIDTH, HEIGHT, t, 0.0, Vec2::new(0.5, 0.2));

    assert_ne!(low.positions, high.positions);
    // With the anchor on the bottom edge the bottom row is the pivot.
    assert_eq!(row_y(&low, 30), HEIGHT * 0.5);
}

#[test]
fn bounce_ignores_pins() {
    let mut pinned = bounce_settings();
    pinned.pins.push(Pin::new(PinId(0), 10.0, 30.0));
    let t = quarter_period(&pinned);

    let with_pins = build_deform_mesh(&pinned, WIDTH, HEIGHT, t, 0.0, Vec2::splat(0.5));
    let without = build_deform_mesh(&bounce_settings(), WIDTH, HEIGHT, t, 0.0, Vec2::splat(0.5));
    assert_eq!(with_pins.positions, without.positions);
}

// ============================================================================
// Sway
// ============================================================================

#[test]
fn sway_only_moves_vertices_sideways() {
    let settings = sway_settings();
    let mesh = build_deform_mesh(&settings, WIDTH, HEIGHT, 0.07, 0.0, Vec2::new(0.5, 0.6));
    let rest = rest_mesh(settings.divisions(), WIDTH, HEIGHT);

    for (p, r) in mesh.positions.iter().zip(&rest.positions) {
        assert_eq!(p.y, r.y);
    }
}

#[test]
fn sway_grows_away_from_the_anchor() {
    let settings = sway_settings();
    let t = quarter_period(&settings);
    let mesh = build_deform_mesh(&settings, WIDTH, HEIGHT, t, 0.0, Vec2::new(0.5, 1.0));
    let rest = rest_mesh(settings.divisions(), WIDTH, HEIGHT);

    // Anchor row is fixed, the far edge swings by the full amplitude.
    assert_eq!(row_shift(&mesh, &rest, 30), 0.0);
    let expected = settings.sway_amplitude * oscillation(&settings, t);
    assert!((row_shift(&mesh, &rest, 0) - expected).abs() < 1e-3);

    let mut previous = 0.0;
    for i in (0..30).rev() {
        let shift = row_shift(&mesh, &rest, i);
        assert!(shift >= previous, "row {i}");
        previous = shift;
    }
}

#[test]
fn sway_left_mirrors_sway_right() {
    let right = sway_settings();
    let left = MotionSettings {
        sway_direction: SwayDirection::Left,
        ..sway_settings()
    };
    let t = quarter_period(&right);
    let rest = rest_mesh(right.divisions(), WIDTH, HEIGHT);
    let right_mesh = build_deform_mesh(&right, WIDTH, HEIGHT, t, 0.0, Vec2::new(0.5, 1.0));
    let left_mesh = build_deform_mesh(&left, WIDTH, HEIGHT, t, 0.0, Vec2::new(0.5, 1.0));

    for i in 0..=30 {
        let r = row_shift(&right_mesh, &rest, i);
        let l = row_shift(&left_mesh, &rest, i);
        assert!((r + l).abs() < 1e-3, "row {i}");
    }
}

#[test]
fn sway_extent_down_keeps_upper_rows_still() {
    let settings = MotionSettings {
        sway_extent: SwayExtent::Down,
        ..sway_settings()
    };
    let t = quarter_period(&settings);
    let mesh = build_deform_mesh(&settings, WIDTH, HEIGHT, t, 0.0, Vec2::splat(0.5));
    let rest = rest_mesh(settings.divisions(), WIDTH, HEIGHT);

    for i in 0..=15 {
        assert_eq!(row_shift(&mesh, &rest, i), 0.0, "row {i}");
    }
    assert!(row_shift(&mesh, &rest, 30).abs() > 1.0);
}

// ============================================================================
// Pins
// ============================================================================

#[test]
fn strongest_pin_wins() {
    let a = Pin::new(PinId(0), 20.0, 30.0);
    let b = Pin::new(PinId(1), 40.0, 50.0);
    let y = 0.3;

    let ia = a.influence(y).unwrap();
    let ib = b.influence(y).unwrap();
    assert!(ia > 0.0 && ia < 1.0);
    assert!(ib > 0.0 && ib < 1.0);
    assert_ne!(ia, ib);

    let expected = ia.min(ib);
    assert_eq!(pin_multiplier(&[a, b], y), expected);
    assert_eq!(pin_multiplier(&[b, a], y), expected);
}

#[test]
fn pins_are_not_multiplied_together() {
    // Two pins with multipliers 0.3 and 0.7 on the same row yield 0.3.
    let target_a = 0.3;
    let target_b = 0.7;
    let solve = |target: f32| {
        // smootherstep is monotone on [0, 1]; bisect for its inverse.
        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        for _ in 0..60 {
            let mid = 0.5 * (lo + hi);
            if smootherstep(0.0, 1.0, mid) < target {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        0.5 * (lo + hi)
    };
    let y = 0.5;
    let range = 40.0;
    let pin_at = |id: u32, t: f32| Pin::new(PinId(id), (y - t * range / 100.0) * 100.0, range);

    let a = pin_at(0, solve(target_a));
    let b = pin_at(1, solve(target_b));
    let m = pin_multiplier(&[a, b], y);
    assert!((m - target_a).abs() < 1e-3, "got {m}");
}

#[test]
fn pins_attenuate_sway_rows() {
    let mut settings = sway_settings();
    settings.divisions = 10;
    settings.pins.push(Pin::new(PinId(0), 30.0, 40.0));
    let t = quarter_period(&settings);

    let free = MotionSettings {
        pins: Default::default(),
        ..settings.clone()
    };
    let pinned_mesh = build_deform_mesh(&settings, WIDTH, HEIGHT, t, 0.0, Vec2::new(0.5, 1.0));
    let free_mesh = build_deform_mesh(&free, WIDTH, HEIGHT, t, 0.0, Vec2::new(0.5, 1.0));
    let rest = rest_mesh(10, WIDTH, HEIGHT);

    // Row 3 sits on the pin.
    assert_eq!(row_shift(&pinned_mesh, &rest, 3), 0.0);
    assert!(row_shift(&free_mesh, &rest, 3).abs() > 1.0);
    // Row 9 is out of range and unaffected.
    assert_eq!(
        row_shift(&pinned_mesh, &rest, 9),
        row_shift(&free_mesh, &rest, 9)
    );
}
