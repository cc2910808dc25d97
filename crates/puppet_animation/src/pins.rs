use serde::{Deserialize, Serialize};

use puppet_core::math::smootherstep;

/// Default influence range of a newly placed pin, in percent of the height.
pub const DEFAULT_PIN_RANGE: f32 = 20.0;

/// Identifier of a pin, unique within its layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinId(pub u32);

/// A horizontal line across the layer that locally suppresses sway.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub id: PinId,
    /// Vertical position, percent of the layer height from the top.
    pub position: f32,
    /// Influence radius, percent of the layer height.
    pub range: f32,
}

impl Pin {
    /// Creates a pin, clamping position and range to `[0, 100]`.
    #[must_use]
    pub fn new(id: PinId, position: f32, range: f32) -> Self {
        Self {
            id,
            position: position.clamp(0.0, 100.0),
            range: range.clamp(0.0, 100.0),
        }
    }

    /// Multiplier this pin applies to a row at `y_ratio` (0 = top, 1 = bottom),
    /// or `None` when the row lies outside the pin's range.
    #[must_use]
    pub fn influence(&self, y_ratio: f32) -> Option<f32> {
        let pin_pos = self.position / 100.0;
        let range = self.range / 100.0;
        let distance = (y_ratio - pin_pos).abs();
        // A zero range never satisfies the strict comparison.
        (distance < range).then(|| smootherstep(0.0, 1.0, distance / range))
    }
}

/// Combined suppression of `pins` on a row: the strongest (minimum)
/// multiplier among the pins in range, `1.0` when none apply.
#[must_use]
pub fn pin_multiplier(pins: &[Pin], y_ratio: f32) -> f32 {
    pins.iter()
        .filter_map(|pin| pin.influence(y_ratio))
        .fold(1.0_f32, f32::min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_on_the_pin_is_fully_suppressed() {
        let pin = Pin::new(PinId(1), 50.0, 20.0);
        assert_eq!(pin.influence(0.5), Some(0.0));
    }

    #[test]
    fn row_outside_range_is_unaffected() {
        let pin = Pin::new(PinId(1), 50.0, 20.0);
        assert_eq!(pin.influence(0.9), None);
        assert_eq!(pin_multiplier(&[pin], 0.9), 1.0);
    }

    #[test]
    fn zero_range_pin_is_inert() {
        let pin = Pin::new(PinId(1), 50.0, 0.0);
        assert_eq!(pin.influence(0.5), None);
    }

    #[test]
    fn out_of_range_inputs_are_clamped() {
        let pin = Pin::new(PinId(1), 140.0, -5.0);
        assert_eq!(pin.position, 100.0);
        assert_eq!(pin.range, 0.0);
    }
}
