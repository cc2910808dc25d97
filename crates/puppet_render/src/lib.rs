//! Software rendering of puppet scenes.
//!
//! - [`raster`]: the [`MeshRasterizer`] seam and [`SoftwareRasterizer`]
//! - [`target`]: off-screen targets for deformed meshes
//! - [`clipping`]: color clipping masks
//! - [`compositor`]: [`FrameCompositor`], one frame per call
//! - [`pixel`]: premultiplied color helpers and blend modes

pub mod clipping;
pub mod compositor;
pub mod pixel;
pub mod raster;
pub mod target;

pub use clipping::{ClipMask, build_mask};
pub use compositor::FrameCompositor;
pub use raster::{MeshRasterizer, SoftwareRasterizer};
pub use target::RenderTarget;
