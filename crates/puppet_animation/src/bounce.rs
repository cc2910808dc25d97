use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::keyframes::{Keyframe, KeyframeTimeline};
use crate::motion::MotionSettings;
use crate::pins::{Pin, PinId};

/// Motion payload of a bounce/sway layer: the live parameters the user is
/// editing plus the keyframes that trigger them on the timeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BounceParams {
    pub settings: MotionSettings,
    pub keyframes: KeyframeTimeline,
    next_pin_id: u32,
}

impl BounceParams {
    #[must_use]
    pub fn new(settings: MotionSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Places a pin on the live parameters. Position and range are clamped
    /// to `[0, 100]`.
    pub fn add_pin(&mut self, position: f32, range: f32) -> PinId {
        // Keep ids unique even after deserializing a payload with pins.
        let max_existing = self.settings.pins.iter().map(|p| p.id.0 + 1).max().unwrap_or(0);
        self.next_pin_id = self.next_pin_id.max(max_existing);

        let id = PinId(self.next_pin_id);
        self.next_pin_id += 1;
        self.settings.pins.push(Pin::new(id, position, range));
        id
    }

    /// Removes a pin from the live parameters. Keyframe snapshots keep their
    /// own copies and are unaffected.
    pub fn remove_pin(&mut self, id: PinId) -> Option<Pin> {
        let idx = self.settings.pins.iter().position(|p| p.id == id)?;
        Some(self.settings.pins.remove(idx))
    }

    /// Snapshots the live parameters into a keyframe on `frame`, replacing any
    /// keyframe already there.
    pub fn insert_keyframe(&mut self, frame: i64, layer_position: Vec2, anchor: Vec2) -> Option<Keyframe> {
        self.keyframes.insert(Keyframe {
            frame,
            settings: self.settings.clone(),
            layer_position,
            anchor,
        })
    }

    pub fn remove_keyframe(&mut self, frame: i64) -> Option<Keyframe> {
        self.keyframes.remove(frame)
    }
}
