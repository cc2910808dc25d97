//! Layer model and scene editing.
//!
//! - [`layer`]: [`Layer`] and its source image
//! - [`transform`] / [`transform_system`]: world transforms through the
//!   parent chain
//! - [`clipping`]: color clipping settings and color picking
//! - [`ports`]: injected collaborators
//! - [`scene`]: [`Scene`], the editing context

pub mod clipping;
pub mod layer;
pub mod ports;
pub mod scene;
pub mod transform;
pub mod transform_system;

pub use clipping::{ColorClipping, UNPICKED_CLIP_COLOR};
pub use layer::{BlendMode, Layer, LayerImage, LayerKind};
pub use ports::{AudioSync, NoPuppetFollow, PuppetFollow, SilentAudio};
pub use scene::{LayerBuilder, Scene};
pub use transform::WorldTransform;
