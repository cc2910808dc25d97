//! Puppet: a 2D puppet animator core.
//!
//! Image layers are arranged into a parent/child rig, driven by procedural
//! motion (bounce/sway mesh deformation and wiggle noise) triggered from a
//! sparse keyframe timeline, and composited into frames in software.
//!
//! This umbrella crate re-exports the workspace crates:
//!
//! - [`core`]: ids, errors, easing math, frame clock and [`EngineSettings`]
//! - [`animation`]: motion settings, keyframes, deformation meshes, wiggle
//! - [`scene`]: layers, transform hierarchy and the editing [`Scene`]
//! - [`render`]: rasterization, clipping and the [`FrameCompositor`]
//! - [`app`]: [`Playback`] and the [`Engine`] facade

pub use puppet_animation as animation;
pub use puppet_app as app;
pub use puppet_core as core;
pub use puppet_render as render;
pub use puppet_scene as scene;

pub use glam::Vec2;

pub use puppet_animation::{
    BounceDirection, BounceParams, DeformMesh, Keyframe, MotionSettings, MotionType, PinId,
    SwayDirection, SwayExtent, WiggleParam, WiggleParams, build_deform_mesh,
};
pub use puppet_app::{Engine, Playback};
pub use puppet_core::{EngineSettings, LayerId, LoopMode, PuppetError, Result};
pub use puppet_render::{FrameCompositor, MeshRasterizer, SoftwareRasterizer};
pub use puppet_scene::{
    AudioSync, BlendMode, ColorClipping, Layer, LayerImage, LayerKind, PuppetFollow, Scene,
    WorldTransform,
};
