use image::RgbaImage;

use puppet_core::{LayerId, PuppetError, Result};

/// Target color meaning "no color picked yet": every opaque pixel of the
/// reference layer clips.
pub const UNPICKED_CLIP_COLOR: [u8; 3] = [0, 255, 0];
/// Default Euclidean RGB distance accepted as a color match.
pub const DEFAULT_CLIP_TOLERANCE: f32 = 30.0;

/// Restricts a layer to the pixels of another layer that match a color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorClipping {
    pub enabled: bool,
    pub reference: Option<LayerId>,
    pub color: [u8; 3],
    pub tolerance: f32,
    /// Clip to the pixels that do *not* match instead.
    pub invert: bool,
}

impl Default for ColorClipping {
    fn default() -> Self {
        Self {
            enabled: false,
            reference: None,
            color: UNPICKED_CLIP_COLOR,
            tolerance: DEFAULT_CLIP_TOLERANCE,
            invert: false,
        }
    }
}

impl ColorClipping {
    #[must_use]
    pub fn new(reference: LayerId) -> Self {
        Self {
            enabled: true,
            reference: Some(reference),
            ..Default::default()
        }
    }

    /// Whether a target color has been picked.
    #[inline]
    #[must_use]
    pub fn has_color(&self) -> bool {
        self.color != UNPICKED_CLIP_COLOR
    }

    /// Whether a reference pixel lets the clipped layer through.
    #[must_use]
    pub fn admits(&self, rgba: [u8; 4]) -> bool {
        if rgba[3] == 0 {
            return false;
        }
        if !self.has_color() {
            return true;
        }
        let within = color_distance([rgba[0], rgba[1], rgba[2]], self.color) <= self.tolerance;
        within != self.invert
    }
}

/// Euclidean distance between two RGB colors.
#[must_use]
pub fn color_distance(a: [u8; 3], b: [u8; 3]) -> f32 {
    let sq: i32 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = i32::from(x) - i32::from(y);
            d * d
        })
        .sum();
    (sq as f32).sqrt()
}

/// Reads the clip color at source pixel `(x, y)` of `image`.
///
/// Transparent pixels carry no usable color and are rejected.
pub fn pick_clip_color(image: &RgbaImage, x: i64, y: i64) -> Result<[u8; 3]> {
    let (width, height) = image.dimensions();
    if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
        return Err(PuppetError::PickOutOfBounds { x, y });
    }
    let [r, g, b, a] = image.get_pixel(x as u32, y as u32).0;
    if a == 0 {
        return Err(PuppetError::TransparentPick);
    }
    Ok([r, g, b])
}
