//! Procedural motion for puppet layers.
//!
//! - [`motion`]: [`MotionSettings`], the parameter snapshot of bounce/sway
//! - [`pins`]: sway suppression lines
//! - [`keyframes`]: sparse timeline and the active-keyframe resolver
//! - [`bounce`]: [`BounceParams`], a layer's live settings plus its timeline
//! - [`mesh`] / [`deform`]: the deforming triangle grid
//! - [`wiggle`]: deterministic positional noise

pub mod bounce;
pub mod deform;
pub mod keyframes;
pub mod mesh;
pub mod motion;
pub mod pins;
pub mod wiggle;

pub use bounce::BounceParams;
pub use deform::{build_deform_mesh, oscillation, rest_mesh};
pub use keyframes::{ActiveKeyframe, Keyframe, KeyframeTimeline, resolve_active};
pub use mesh::{DeformMesh, MeshBounds};
pub use motion::{BounceDirection, MotionSettings, MotionType, SwayDirection, SwayExtent};
pub use pins::{DEFAULT_PIN_RANGE, Pin, PinId};
pub use wiggle::{Wiggle, WiggleParam, WiggleParams, seeded_random, wiggle_offset};
