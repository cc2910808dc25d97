use glam::Vec2;
use image::RgbaImage;

use puppet_animation::DeformMesh;
use puppet_scene::BlendMode;

use crate::pixel::{EdgeMode, blend, from_premultiplied, sample_bilinear, to_premultiplied};
use crate::target::RenderTarget;

/// Textures and rasterizes a [`DeformMesh`] into a [`RenderTarget`].
///
/// The mesh is centered on the target; `texture` is sampled through the
/// mesh UVs and composited source-over onto the target contents.
pub trait MeshRasterizer {
    fn draw(&mut self, mesh: &DeformMesh, texture: &RgbaImage, target: &mut RenderTarget);
}

/// CPU rasterizer: barycentric triangle fill with bilinear, clamp-to-edge
/// texture sampling.
///
/// Coverage follows the top-left rule so pixels on shared edges are filled
/// exactly once.
#[derive(Debug, Default, Clone, Copy)]
pub struct SoftwareRasterizer;

impl SoftwareRasterizer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MeshRasterizer for SoftwareRasterizer {
    fn draw(&mut self, mesh: &DeformMesh, texture: &RgbaImage, target: &mut RenderTarget) {
        let tex_size = {
            let (w, h) = texture.dimensions();
            Vec2::new(w as f32, h as f32)
        };
        let center = target.center();

        for tri in mesh.triangles() {
            let corners = tri.map(|(position, uv)| Corner {
                pixel: position + center,
                texel: uv * tex_size,
            });
            fill_triangle(&mut target.image, corners, texture);
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Corner {
    pixel: Vec2,
    texel: Vec2,
}

/// Signed doubled area of `(a, b, p)`; positive when `p` lies to the right of
/// `a → b` on a Y-down raster.
///
/// Evaluated in a canonical vertex order so the two triangles sharing an edge
/// get exactly opposite values for every pixel.
#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    let raw = |a: Vec2, b: Vec2| (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    if (a.x, a.y) <= (b.x, b.y) {
        raw(a, b)
    } else {
        -raw(b, a)
    }
}

#[inline]
fn is_top_left(a: Vec2, b: Vec2) -> bool {
    let d = b - a;
    (d.y == 0.0 && d.x > 0.0) || d.y < 0.0
}

#[inline]
fn covers(w: f32, top_left: bool) -> bool {
    w > 0.0 || (w == 0.0 && top_left)
}

fn fill_triangle(target: &mut RgbaImage, corners: [Corner; 3], texture: &RgbaImage) {
    let [c0, mut c1, mut c2] = corners;
    let mut area = edge(c0.pixel, c1.pixel, c2.pixel);
    if area == 0.0 || !area.is_finite() {
        return;
    }
    if area < 0.0 {
        std::mem::swap(&mut c1, &mut c2);
        area = -area;
    }

    let (width, height) = target.dimensions();
    let min = c0.pixel.min(c1.pixel).min(c2.pixel).floor().max(Vec2::ZERO);
    let max = c0
        .pixel
        .max(c1.pixel)
        .max(c2.pixel)
        .ceil()
        .min(Vec2::new(width as f32, height as f32));
    if min.x >= max.x || min.y >= max.y {
        return;
    }

    let tl0 = is_top_left(c1.pixel, c2.pixel);
    let tl1 = is_top_left(c2.pixel, c0.pixel);
    let tl2 = is_top_left(c0.pixel, c1.pixel);

    for py in min.y as u32..max.y as u32 {
        for px in min.x as u32..max.x as u32 {
            let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
            let w0 = edge(c1.pixel, c2.pixel, p);
            let w1 = edge(c2.pixel, c0.pixel, p);
            let w2 = edge(c0.pixel, c1.pixel, p);
            if !(covers(w0, tl0) && covers(w1, tl1) && covers(w2, tl2)) {
                continue;
            }

            let texel = (c0.texel * w0 + c1.texel * w1 + c2.texel * w2) / area;
            let src = sample_bilinear(texture, texel, EdgeMode::Clamp);
            if src.w <= 0.0 {
                continue;
            }
            let dst = target.get_pixel_mut(px, py);
            *dst = from_premultiplied(blend(BlendMode::Normal, src, to_premultiplied(*dst)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use puppet_animation::rest_mesh;

    #[test]
    fn undeformed_mesh_covers_exactly_the_image_rect() {
        let texture = RgbaImage::from_pixel(20, 10, Rgba([255, 0, 0, 255]));
        let mesh = rest_mesh(4, 20.0, 10.0);
        let mut target = RenderTarget::new(40, 30);
        SoftwareRasterizer.draw(&mesh, &texture, &mut target);

        // Image spans [10, 30) × [10, 20) around the target center (20, 15).
        let covered = target.image.pixels().filter(|p| p.0[3] > 0).count();
        assert_eq!(covered, 200);
        assert_eq!(target.image.get_pixel(10, 10).0, [255, 0, 0, 255]);
        assert_eq!(target.image.get_pixel(29, 19).0, [255, 0, 0, 255]);
        assert_eq!(target.image.get_pixel(9, 10).0[3], 0);
        assert_eq!(target.image.get_pixel(30, 19).0[3], 0);
    }
}
