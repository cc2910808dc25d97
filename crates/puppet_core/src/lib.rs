//! Core utilities and foundational types shared by every Puppet crate.
//!
//! - [`errors`]: [`PuppetError`] and the [`Result`] alias
//! - [`ids`]: [`LayerId`]
//! - [`math`]: easing kernels and the damping envelope
//! - [`time`]: playback clock and frame/second conversion
//! - [`settings`]: [`EngineSettings`]

pub mod errors;
pub mod ids;
pub mod math;
pub mod settings;
pub mod time;

pub use errors::{PuppetError, Result};
pub use ids::LayerId;
pub use settings::{EngineSettings, LoopMode};
pub use time::FrameClock;
