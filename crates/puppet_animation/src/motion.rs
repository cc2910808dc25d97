use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::pins::Pin;

/// Lower bound of the vertical mesh divisions.
pub const MIN_DIVISIONS: u32 = 1;
/// Upper bound of the vertical mesh divisions.
pub const MAX_DIVISIONS: u32 = 50;
/// Default vertical divisions; dense enough for a smooth deformation curve.
pub const DEFAULT_DIVISIONS: u32 = 30;
/// Horizontal divisions are fixed: every vertex in a row shares its Y.
pub const HORIZONTAL_DIVISIONS: u32 = 10;

pub type PinList = SmallVec<[Pin; 4]>;

/// The two mutually exclusive deformation modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionType {
    /// Vertical stretch around the anchor.
    #[default]
    Bounce,
    /// Lateral whip growing away from the anchor.
    Sway,
}

/// Which side of the anchor stretches in [`MotionType::Bounce`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BounceDirection {
    /// Rows below the anchor stretch; rows above stay at rest.
    Up,
    /// Rows above the anchor stretch; rows below stay at rest.
    #[default]
    Down,
}

/// Initial swing direction of [`MotionType::Sway`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwayDirection {
    Left,
    #[default]
    Right,
}

impl SwayDirection {
    #[inline]
    #[must_use]
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Which rows relative to the anchor take part in [`MotionType::Sway`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwayExtent {
    /// Only rows above the anchor.
    Up,
    /// Only rows below the anchor.
    Down,
    #[default]
    Both,
}

impl SwayExtent {
    #[inline]
    #[must_use]
    pub fn includes_above(self) -> bool {
        matches!(self, Self::Up | Self::Both)
    }

    #[inline]
    #[must_use]
    pub fn includes_below(self) -> bool {
        matches!(self, Self::Down | Self::Both)
    }
}

/// Every motion-relevant parameter of a bounce/sway layer.
///
/// The layer's live parameters and each keyframe's snapshot share this type,
/// so a keyframe replays exactly what was configured when it was inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    pub motion_type: MotionType,
    /// Vertical mesh divisions; see [`MotionSettings::divisions`].
    pub divisions: u32,
    /// Stretch strength in percent of the stretched span.
    pub amplitude: f32,
    /// Lateral swing in pixels at the far end.
    pub sway_amplitude: f32,
    /// Oscillations per damping time.
    pub frequency: f32,
    /// Seconds until the motion has faded out.
    pub damping_time: f32,
    pub bounce_direction: BounceDirection,
    pub sway_direction: SwayDirection,
    pub sway_extent: SwayExtent,
    pub pins: PinList,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            motion_type: MotionType::Bounce,
            divisions: DEFAULT_DIVISIONS,
            amplitude: 50.0,
            sway_amplitude: 100.0,
            frequency: 3.0,
            damping_time: 1.0,
            bounce_direction: BounceDirection::Down,
            sway_direction: SwayDirection::Right,
            sway_extent: SwayExtent::Both,
            pins: PinList::new(),
        }
    }
}

impl MotionSettings {
    /// Vertical divisions clamped to `[MIN_DIVISIONS, MAX_DIVISIONS]`.
    #[inline]
    #[must_use]
    pub fn divisions(&self) -> u32 {
        self.divisions.clamp(MIN_DIVISIONS, MAX_DIVISIONS)
    }

    /// Sets the division count, clamping out-of-range requests.
    pub fn set_divisions(&mut self, divisions: u32) {
        self.divisions = divisions.clamp(MIN_DIVISIONS, MAX_DIVISIONS);
    }

    /// Angular frequency of the oscillation, `2π·f / damping_time`, or zero
    /// when the damping time is zero.
    #[inline]
    #[must_use]
    pub fn angular_frequency(&self) -> f32 {
        puppet_core::math::safe_ratio(std::f32::consts::TAU * self.frequency, self.damping_time)
    }
}
