use glam::Vec2;
use serde::{Deserialize, Serialize};

use puppet_core::time::frame_to_seconds;

use crate::motion::MotionSettings;

/// A motion trigger on the timeline.
///
/// `settings` is a full snapshot taken at insertion. `layer_position` and
/// `anchor` record the layer state at that moment for display only: the
/// deformation always pivots on the layer's *current* anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: i64,
    pub settings: MotionSettings,
    pub layer_position: Vec2,
    pub anchor: Vec2,
}

/// The keyframe in effect at some frame together with the moment its motion
/// started.
#[derive(Debug, Clone, Copy)]
pub struct ActiveKeyframe<'a> {
    pub keyframe: &'a Keyframe,
    pub start_frame: i64,
}

impl ActiveKeyframe<'_> {
    /// Animation start converted to seconds at `fps`.
    #[inline]
    #[must_use]
    pub fn start_time(&self, fps: f32) -> f32 {
        frame_to_seconds(self.start_frame, fps)
    }
}

/// Sparse, frame-indexed list of [`Keyframe`]s kept in ascending frame order
/// with at most one entry per frame.
///
/// Serialized as a plain list. Loading re-inserts every entry, so unsorted
/// lists are sorted and the last keyframe on a duplicated frame wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<Keyframe>", from = "Vec<Keyframe>")]
pub struct KeyframeTimeline {
    keyframes: Vec<Keyframe>,
}

impl From<Vec<Keyframe>> for KeyframeTimeline {
    fn from(keyframes: Vec<Keyframe>) -> Self {
        let mut timeline = Self::new();
        for keyframe in keyframes {
            timeline.insert(keyframe);
        }
        timeline
    }
}

impl From<KeyframeTimeline> for Vec<Keyframe> {
    fn from(timeline: KeyframeTimeline) -> Self {
        timeline.keyframes
    }
}

impl KeyframeTimeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `keyframe`, replacing any existing keyframe on the same frame.
    ///
    /// Returns the replaced keyframe, if any.
    pub fn insert(&mut self, keyframe: Keyframe) -> Option<Keyframe> {
        let replaced = self
            .keyframes
            .iter()
            .position(|k| k.frame == keyframe.frame)
            .map(|idx| self.keyframes.remove(idx));
        if replaced.is_some() {
            log::debug!("Replacing keyframe at frame {}", keyframe.frame);
        }
        self.keyframes.push(keyframe);
        self.keyframes.sort_by_key(|k| k.frame);
        replaced
    }

    /// Removes the keyframe on `frame`. Absent frames are a no-op.
    pub fn remove(&mut self, frame: i64) -> Option<Keyframe> {
        let idx = self.keyframes.iter().position(|k| k.frame == frame)?;
        Some(self.keyframes.remove(idx))
    }

    #[must_use]
    pub fn get(&self, frame: i64) -> Option<&Keyframe> {
        self.keyframes.iter().find(|k| k.frame == frame)
    }

    /// The most recent keyframe at or before `current_frame`.
    #[must_use]
    pub fn resolve_active(&self, current_frame: i64) -> Option<ActiveKeyframe<'_>> {
        resolve_active(&self.keyframes, current_frame)
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Keyframe] {
        &self.keyframes
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Keyframe> {
        self.keyframes.iter()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    pub fn clear(&mut self) {
        self.keyframes.clear();
    }
}

/// Selects the last keyframe whose frame is `<= current_frame` from a slice
/// sorted ascending by frame.
#[must_use]
pub fn resolve_active(keyframes: &[Keyframe], current_frame: i64) -> Option<ActiveKeyframe<'_>> {
    // partition_point finds the first keyframe strictly after the playhead
    let next_idx = keyframes.partition_point(|k| k.frame <= current_frame);
    let keyframe = keyframes.get(next_idx.checked_sub(1)?)?;
    Some(ActiveKeyframe {
        keyframe,
        start_frame: keyframe.frame,
    })
}
