//! Pixel math on premultiplied-alpha `Vec4` colors (`xyz` = color, `w` = alpha,
//! all in `[0, 1]`). Images stay straight-alpha `Rgba<u8>`; conversion happens
//! at load and store.

use glam::{Vec2, Vec4};
use image::{Rgba, RgbaImage};

use puppet_scene::BlendMode;

/// How samples outside the image are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeMode {
    /// Repeat the border texel (texture sampling of mesh UVs).
    Clamp,
    /// Treat the outside as fully transparent (placing whole images).
    Transparent,
}

#[inline]
#[must_use]
pub fn to_premultiplied(px: Rgba<u8>) -> Vec4 {
    let [r, g, b, a] = px.0;
    let a = f32::from(a) / 255.0;
    Vec4::new(
        f32::from(r) / 255.0 * a,
        f32::from(g) / 255.0 * a,
        f32::from(b) / 255.0 * a,
        a,
    )
}

#[inline]
#[must_use]
pub fn from_premultiplied(color: Vec4) -> Rgba<u8> {
    let a = color.w.clamp(0.0, 1.0);
    if a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let rgb = (color.truncate() / a).clamp(glam::Vec3::ZERO, glam::Vec3::ONE) * 255.0;
    Rgba([
        rgb.x.round() as u8,
        rgb.y.round() as u8,
        rgb.z.round() as u8,
        (a * 255.0).round() as u8,
    ])
}

/// Composites `src` over `dst` with `mode`.
#[must_use]
pub fn blend(mode: BlendMode, src: Vec4, dst: Vec4) -> Vec4 {
    let sa = src.w;
    let da = dst.w;
    let alpha = sa + da - sa * da;
    let s = src.truncate();
    let d = dst.truncate();

    match mode {
        BlendMode::Normal => src + dst * (1.0 - sa),
        BlendMode::Multiply => (s * (1.0 - da) + d * (1.0 - sa) + s * d).extend(alpha),
        BlendMode::Screen => (s + d - s * d).extend(alpha),
        BlendMode::Additive => (src + dst).min(Vec4::ONE),
    }
}

/// Bilinear sample of `image` at continuous pixel coordinates `p`, where texel
/// `(i, j)` covers `[i, i+1) × [j, j+1)`.
#[must_use]
pub fn sample_bilinear(image: &RgbaImage, p: Vec2, edge: EdgeMode) -> Vec4 {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Vec4::ZERO;
    }

    let x = p.x - 0.5;
    let y = p.y - 0.5;
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let texel = |ix: i64, iy: i64| -> Vec4 {
        let (w, h) = (i64::from(width), i64::from(height));
        match edge {
            EdgeMode::Clamp => {
                let cx = ix.clamp(0, w - 1) as u32;
                let cy = iy.clamp(0, h - 1) as u32;
                to_premultiplied(*image.get_pixel(cx, cy))
            }
            EdgeMode::Transparent => {
                if ix < 0 || iy < 0 || ix >= w || iy >= h {
                    Vec4::ZERO
                } else {
                    to_premultiplied(*image.get_pixel(ix as u32, iy as u32))
                }
            }
        }
    };

    let top = texel(x0, y0).lerp(texel(x0 + 1, y0), fx);
    let bottom = texel(x0, y0 + 1).lerp(texel(x0 + 1, y0 + 1), fx);
    top.lerp(bottom, fy)
}
