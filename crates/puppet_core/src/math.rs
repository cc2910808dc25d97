//! Interpolation kernels and envelopes shared by the motion generators.
//!
//! - [`smoothstep`]: cubic Hermite ramp, used for falloff away from the anchor
//! - [`smootherstep`]: quintic ramp with zero first and second derivatives at
//!   both ends, used for pin influence so overlapping pins do not kink
//! - [`damping_envelope`]: exponential decay of an oscillation over time
//! - [`safe_ratio`]: division that yields zero instead of NaN/inf

/// Decay constant of the damping envelope: after one damping time the
/// oscillation has fallen to `e^-5` (< 1%) of its initial strength.
pub const DAMPING_RATE: f32 = 5.0;

/// Cubic Hermite interpolation, clamped to `[0, 1]`.
#[inline]
#[must_use]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = normalized(edge0, edge1, x);
    t * t * (3.0 - 2.0 * t)
}

/// Quintic (Perlin) interpolation, clamped to `[0, 1]`.
#[inline]
#[must_use]
pub fn smootherstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = normalized(edge0, edge1, x);
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Ease curve `t²(3 - 2t)` on an already-normalized parameter.
#[inline]
#[must_use]
pub fn ease_in_out(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// `numerator / denominator`, or `0.0` when the denominator is zero.
#[inline]
#[must_use]
pub fn safe_ratio(numerator: f32, denominator: f32) -> f32 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Exponential damping `exp(-5 * elapsed / damping_time)`.
///
/// The envelope is asymptotic: it approaches zero but is never clamped to it.
/// A zero damping time substitutes a zero ratio (envelope of `1.0`).
#[inline]
#[must_use]
pub fn damping_envelope(elapsed: f32, damping_time: f32) -> f32 {
    (-DAMPING_RATE * safe_ratio(elapsed, damping_time)).exp()
}

fn normalized(edge0: f32, edge1: f32, x: f32) -> f32 {
    let span = edge1 - edge0;
    if span == 0.0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    ((x - edge0) / span).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernels_hit_their_endpoints() {
        assert_eq!(smoothstep(0.0, 1.0, -0.5), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 0.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 1.0), 1.0);
        assert_eq!(smoothstep(0.0, 1.0, 3.0), 1.0);
        assert_eq!(smootherstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smootherstep(0.0, 1.0, 1.0), 1.0);
        assert_eq!(smootherstep(0.0, 1.0, 2.0), 1.0);
    }

    #[test]
    fn kernels_are_symmetric_about_the_midpoint() {
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
        assert!((smootherstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn safe_ratio_never_produces_nan() {
        assert_eq!(safe_ratio(0.0, 0.0), 0.0);
        assert_eq!(safe_ratio(3.0, 0.0), 0.0);
        assert_eq!(safe_ratio(3.0, 2.0), 1.5);
    }

    #[test]
    fn zero_damping_time_is_not_nan() {
        let d = damping_envelope(0.5, 0.0);
        assert!(d.is_finite());
        assert_eq!(d, 1.0);
    }
}
