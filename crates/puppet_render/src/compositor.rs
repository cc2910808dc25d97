//! Frame composition.
//!
//! For every visible layer, bottom to top:
//!
//! 1. Resolve the world transform through the parent chain and add the
//!    wiggle offset.
//! 2. For a bounce/sway layer with an active keyframe, build the deformed
//!    mesh and rasterize it into an off-screen [`RenderTarget`]; otherwise use
//!    the source image as is.
//! 3. Place that raster so its anchor pixel lands on the layer pivot, then
//!    blend it into the frame with the layer's opacity and blend mode, masked
//!    by the layer's color clipping if any.

use std::borrow::Cow;

use glam::{Affine2, Vec2};
use image::{Rgba, RgbaImage};

use puppet_animation::build_deform_mesh;
use puppet_core::EngineSettings;
use puppet_core::time::frame_at;
use puppet_scene::{Layer, Scene, WorldTransform};

use crate::clipping::{ClipMask, build_mask};
use crate::pixel::{EdgeMode, blend, from_premultiplied, sample_bilinear, to_premultiplied};
use crate::raster::{MeshRasterizer, SoftwareRasterizer};
use crate::target::RenderTarget;

const ANCHOR_MARKER_COLOR: Rgba<u8> = Rgba([255, 215, 0, 255]);
const ANCHOR_MARKER_ARM: i64 = 25;

/// A layer's pixels ready for placement.
struct LayerRaster<'a> {
    pixels: Cow<'a, RgbaImage>,
    /// Raster pixel that must land on the layer pivot, in layer pixels.
    origin: Vec2,
    /// Layer pixels per raster pixel.
    texel_scale: Vec2,
}

/// Renders whole frames of a [`Scene`].
pub struct FrameCompositor<R: MeshRasterizer = SoftwareRasterizer> {
    settings: EngineSettings,
    rasterizer: R,
}

impl FrameCompositor<SoftwareRasterizer> {
    #[must_use]
    pub fn new(settings: EngineSettings) -> Self {
        Self::with_rasterizer(settings, SoftwareRasterizer)
    }
}

impl<R: MeshRasterizer> FrameCompositor<R> {
    pub fn with_rasterizer(settings: EngineSettings, rasterizer: R) -> Self {
        Self {
            settings,
            rasterizer,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut EngineSettings {
        &mut self.settings
    }

    /// Renders the scene at its current time into a new canvas-sized frame.
    pub fn render(&mut self, scene: &Scene) -> RgbaImage {
        let mut frame = RgbaImage::from_pixel(
            self.settings.canvas_width,
            self.settings.canvas_height,
            Rgba(self.settings.background),
        );
        self.render_into(scene, &mut frame);
        frame
    }

    /// Composites every visible layer of `scene` over `frame`.
    pub fn render_into(&mut self, scene: &Scene, frame: &mut RgbaImage) {
        let time = scene.current_time();
        for layer in scene.layers() {
            if !layer.visible || layer.opacity <= 0.0 {
                continue;
            }
            let Ok(world) = scene.world_transform(layer.id) else {
                continue;
            };
            let Some(raster) = self.layer_raster(layer, time, scene.fps()) else {
                continue;
            };

            let pivot = layer_pivot(layer, &world, time);
            let placement = raster_placement(pivot, &raster);
            let mask = clip_mask(scene, layer, time);

            composite(
                frame,
                &raster.pixels,
                placement,
                layer.opacity,
                layer.blend_mode,
                mask.as_ref(),
            );

            if self.settings.show_anchor_markers {
                draw_anchor_marker(frame, pivot.translation);
            }
        }
    }

    fn layer_raster<'a>(&mut self, layer: &'a Layer, time: f32, fps: f32) -> Option<LayerRaster<'a>> {
        let image = layer.image.as_ref()?.pixels();
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return None;
        }

        let active = layer
            .bounce
            .as_ref()
            .filter(|_| layer.is_bounce())
            .and_then(|bounce| bounce.keyframes.resolve_active(frame_at(time, fps)));

        let Some(active) = active else {
            return Some(LayerRaster {
                pixels: Cow::Borrowed(image),
                origin: layer.anchor_offset(),
                texel_scale: layer.size() / Vec2::new(w as f32, h as f32),
            });
        };

        let mesh = build_deform_mesh(
            &active.keyframe.settings,
            layer.width,
            layer.height,
            time,
            active.start_time(fps),
            layer.anchor,
        );
        let mut target = RenderTarget::for_layer(
            &mesh.bounds,
            layer.size(),
            self.settings.render_padding,
            self.settings.overshoot,
        );
        self.rasterizer.draw(&mesh, image, &mut target);
        log::trace!(
            "Layer {} deformed from keyframe {} into a {:?} target",
            layer.id,
            active.start_frame,
            target.image.dimensions()
        );

        let origin = target.anchor_in_target(layer.size(), layer.anchor);
        Some(LayerRaster {
            pixels: Cow::Owned(target.image),
            origin,
            texel_scale: Vec2::ONE,
        })
    }
}

/// Affine map from a layer's pivot-centered space to frame pixels.
///
/// The layer position locates the image center at rest. Rotation and scale
/// pivot on the anchor; the anchor offset itself is not rotated or scaled.
#[must_use]
pub fn layer_pivot(layer: &Layer, world: &WorldTransform, time: f32) -> Affine2 {
    let wiggle = layer.wiggle.offset(layer.id, time);
    let translation = world.position + wiggle + layer.anchor_offset() - layer.size() * 0.5;
    Affine2::from_scale_angle_translation(
        Vec2::splat(world.scale),
        world.rotation.to_radians(),
        translation,
    )
}

fn raster_placement(pivot: Affine2, raster: &LayerRaster<'_>) -> Affine2 {
    pivot * Affine2::from_scale(raster.texel_scale) * Affine2::from_translation(-raster.origin / raster.texel_scale)
}

/// Mask restricting `layer`, placed where its reference layer is drawn.
///
/// `None` when clipping is off or the reference is missing, hidden or empty.
fn clip_mask(scene: &Scene, layer: &Layer, time: f32) -> Option<ClipMask> {
    let clipping = layer.color_clipping.filter(|c| c.enabled)?;
    let reference_id = clipping.reference?;
    let Some(reference) = scene.layer(reference_id).filter(|r| r.visible) else {
        log::trace!("Clipping of layer {} skipped: reference {reference_id} not drawn", layer.id);
        return None;
    };
    let image = reference.image.as_ref()?.pixels();
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return None;
    }

    let world = scene.world_transform(reference_id).ok()?;
    let raster = LayerRaster {
        pixels: Cow::Borrowed(image),
        origin: reference.anchor_offset(),
        texel_scale: reference.size() / Vec2::new(w as f32, h as f32),
    };
    let placement = raster_placement(layer_pivot(reference, &world, time), &raster);
    Some(ClipMask::new(build_mask(image, &clipping), placement))
}

/// Draws `source` into `frame` through `placement` (source pixels → frame
/// pixels) with bilinear sampling.
fn composite(
    frame: &mut RgbaImage,
    source: &RgbaImage,
    placement: Affine2,
    opacity: f32,
    mode: puppet_scene::BlendMode,
    mask: Option<&ClipMask>,
) {
    let (sw, sh) = source.dimensions();
    let (fw, fh) = frame.dimensions();

    let corners = [
        Vec2::ZERO,
        Vec2::new(sw as f32, 0.0),
        Vec2::new(0.0, sh as f32),
        Vec2::new(sw as f32, sh as f32),
    ]
    .map(|c| placement.transform_point2(c));
    let min = corners
        .iter()
        .fold(Vec2::splat(f32::INFINITY), |a, c| a.min(*c))
        .floor()
        .max(Vec2::ZERO);
    let max = corners
        .iter()
        .fold(Vec2::splat(f32::NEG_INFINITY), |a, c| a.max(*c))
        .ceil()
        .min(Vec2::new(fw as f32, fh as f32));
    if !(min.x < max.x && min.y < max.y) {
        return;
    }

    let inverse = placement.inverse();
    let opacity = opacity.clamp(0.0, 1.0);

    for py in min.y as u32..max.y as u32 {
        for px in min.x as u32..max.x as u32 {
            let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
            let mut src = sample_bilinear(source, inverse.transform_point2(p), EdgeMode::Transparent);
            if src.w <= 0.0 {
                continue;
            }
            let coverage = mask.map_or(1.0, |m| m.coverage(p));
            src *= opacity * coverage;
            if src.w <= 0.0 {
                continue;
            }
            let dst = frame.get_pixel_mut(px, py);
            *dst = from_premultiplied(blend(mode, src, to_premultiplied(*dst)));
        }
    }
}

/// Debug cross over the layer pivot.
fn draw_anchor_marker(frame: &mut RgbaImage, at: Vec2) {
    let (fw, fh) = frame.dimensions();
    let cx = at.x.round() as i64;
    let cy = at.y.round() as i64;
    let mut put = |x: i64, y: i64| {
        if x >= 0 && y >= 0 && x < i64::from(fw) && y < i64::from(fh) {
            frame.put_pixel(x as u32, y as u32, ANCHOR_MARKER_COLOR);
        }
    };
    for d in -ANCHOR_MARKER_ARM..=ANCHOR_MARKER_ARM {
        for t in -1..=1 {
            put(cx + d, cy + t);
            put(cx + t, cy + d);
        }
    }
}
