//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! The main error type [`PuppetError`] covers all failure modes including:
//! - Editing requests against missing or wrong-typed layers
//! - Hierarchy edits that would introduce a parent cycle
//! - Color picking outside of the reference image
//! - Settings, I/O and image decoding failures
//!
//! Editing errors are *soft*: the scene is left untouched and the caller
//! decides how to report the problem to the user.
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, PuppetError>`.
//!
//! ```rust,ignore
//! use puppet_core::errors::{PuppetError, Result};
//!
//! fn edit_layer() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::ids::LayerId;

/// The main error type for the Puppet engine.
#[derive(Error, Debug)]
pub enum PuppetError {
    // ========================================================================
    // Scene Editing Errors
    // ========================================================================
    /// The referenced layer does not exist in the scene.
    #[error("Layer not found: {0}")]
    LayerNotFound(LayerId),

    /// An operation that requires a bounce/sway layer was aimed at another kind.
    #[error("Layer {0} is not a bounce/sway motion layer")]
    NotABounceLayer(LayerId),

    /// An operation on the active selection was requested with nothing selected.
    #[error("No layer is selected")]
    NoSelection,

    /// Re-parenting would make a layer its own ancestor.
    #[error("Parenting {child} under {parent} would create a cycle")]
    ParentCycle {
        /// The layer being re-parented
        child: LayerId,
        /// The requested new parent
        parent: LayerId,
    },

    /// The referenced pin does not exist on the layer.
    #[error("Pin {pin} not found on layer {layer}")]
    PinNotFound {
        /// Owning layer
        layer: LayerId,
        /// The missing pin id
        pin: u32,
    },

    // ========================================================================
    // Color Clipping Errors
    // ========================================================================
    /// The picked pixel is fully transparent.
    #[error("No image at the picked position (transparent pixel)")]
    TransparentPick,

    /// The picked position lies outside the reference image.
    #[error("Picked position ({x}, {y}) is outside the reference image")]
    PickOutOfBounds {
        /// Picked x coordinate in source pixels
        x: i64,
        /// Picked y coordinate in source pixels
        y: i64,
    },

    // ========================================================================
    // Configuration & I/O Errors
    // ========================================================================
    /// Settings failed validation.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Image decoding or encoding error.
    #[error("Image error: {0}")]
    ImageDecodeError(String),
}

impl From<image::ImageError> for PuppetError {
    fn from(err: image::ImageError) -> Self {
        PuppetError::ImageDecodeError(err.to_string())
    }
}

/// Alias for `Result<T, PuppetError>`.
pub type Result<T> = std::result::Result<T, PuppetError>;
