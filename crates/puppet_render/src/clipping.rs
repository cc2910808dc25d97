use glam::{Affine2, Vec2};
use image::{GrayImage, Luma, RgbaImage};

use puppet_scene::ColorClipping;

/// Alpha mask of `reference` at its native size: 255 where the clipped layer
/// shows through, 0 elsewhere.
#[must_use]
pub fn build_mask(reference: &RgbaImage, clipping: &ColorClipping) -> GrayImage {
    let (width, height) = reference.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let admitted = clipping.admits(reference.get_pixel(x, y).0);
        Luma([if admitted { 255 } else { 0 }])
    })
}

/// A mask placed in frame space.
///
/// Lookups are nearest-neighbour so mask edges stay as hard as the color
/// test that produced them.
#[derive(Debug, Clone)]
pub struct ClipMask {
    mask: GrayImage,
    frame_to_mask: Affine2,
}

impl ClipMask {
    /// `placement` maps mask pixel coordinates to frame pixel coordinates.
    #[must_use]
    pub fn new(mask: GrayImage, placement: Affine2) -> Self {
        Self {
            mask,
            frame_to_mask: placement.inverse(),
        }
    }

    /// Mask value in `[0, 1]` at a frame-space point; zero outside the mask.
    #[must_use]
    pub fn coverage(&self, frame_point: Vec2) -> f32 {
        let q = self.frame_to_mask.transform_point2(frame_point).floor();
        let (width, height) = self.mask.dimensions();
        if !q.is_finite() || q.x < 0.0 || q.y < 0.0 || q.x >= width as f32 || q.y >= height as f32 {
            return 0.0;
        }
        f32::from(self.mask.get_pixel(q.x as u32, q.y as u32).0[0]) / 255.0
    }

    #[must_use]
    pub fn mask(&self) -> &GrayImage {
        &self.mask
    }
}
