use std::fmt;
use std::sync::Arc;

use glam::Vec2;
use image::RgbaImage;

use puppet_animation::{BounceParams, Wiggle};
use puppet_core::LayerId;

use crate::clipping::ColorClipping;
use crate::transform::WorldTransform;

/// Lower bound of a layer's uniform scale.
pub const MIN_SCALE: f32 = 0.1;
/// Upper bound of a layer's uniform scale.
pub const MAX_SCALE: f32 = 10.0;

/// How a layer's pixels combine with what is already on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    /// Channel sum, clamped.
    Additive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayerKind {
    /// A static image.
    #[default]
    Image,
    /// An image driven by the bounce/sway mesh deformation.
    Bounce,
}

/// Shared, immutable source pixels of a layer.
#[derive(Clone)]
pub struct LayerImage(Arc<RgbaImage>);

impl LayerImage {
    #[must_use]
    pub fn new(image: RgbaImage) -> Self {
        Self(Arc::new(image))
    }

    #[inline]
    #[must_use]
    pub fn pixels(&self) -> &RgbaImage {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }
}

impl fmt::Debug for LayerImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.dimensions();
        write!(f, "LayerImage({w}x{h})")
    }
}

impl From<RgbaImage> for LayerImage {
    fn from(image: RgbaImage) -> Self {
        Self::new(image)
    }
}

/// A node of the puppet rig.
///
/// `position`, `rotation` and `scale` are relative to the parent layer, or
/// to the canvas for root layers. `position` locates the image center at
/// rest; rotation and scale pivot on `anchor`.
#[derive(Debug, Clone)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    /// Non-owning reference resolved through the scene index. Assigned only
    /// through [`Scene::set_parent`](crate::Scene::set_parent) and layer
    /// insertion, which reject cycles.
    pub(crate) parent: Option<LayerId>,
    pub position: Vec2,
    /// Degrees.
    pub rotation: f32,
    pub scale: f32,
    /// Pivot as a fraction of the layer size, `(0, 0)` = top-left.
    pub anchor: Vec2,
    pub width: f32,
    pub height: f32,
    pub visible: bool,
    pub opacity: f32,
    pub blend_mode: BlendMode,
    pub kind: LayerKind,
    pub image: Option<LayerImage>,
    pub bounce: Option<BounceParams>,
    pub wiggle: Wiggle,
    pub color_clipping: Option<ColorClipping>,
    /// Place the layer relative to a puppet anchor supplied by the
    /// [`PuppetFollow`](crate::ports::PuppetFollow) port.
    pub follow_puppet: bool,
}

impl Layer {
    /// An empty image layer with no pixels.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: LayerId(0),
            name: name.into(),
            parent: None,
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: 1.0,
            anchor: Vec2::splat(0.5),
            width: 0.0,
            height: 0.0,
            visible: true,
            opacity: 1.0,
            blend_mode: BlendMode::Normal,
            kind: LayerKind::Image,
            image: None,
            bounce: None,
            wiggle: Wiggle::default(),
            color_clipping: None,
            follow_puppet: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<LayerId> {
        self.parent
    }

    /// An image layer sized to `image`.
    #[must_use]
    pub fn with_image(name: impl Into<String>, image: impl Into<LayerImage>) -> Self {
        let mut layer = Self::new(name);
        layer.set_image(image.into());
        layer
    }

    /// A bounce/sway layer sized to `image`, with default motion settings.
    #[must_use]
    pub fn bounce(name: impl Into<String>, image: impl Into<LayerImage>) -> Self {
        let mut layer = Self::with_image(name, image);
        layer.kind = LayerKind::Bounce;
        layer.bounce = Some(BounceParams::default());
        layer
    }

    /// Replaces the source pixels and resizes the layer to match.
    pub fn set_image(&mut self, image: LayerImage) {
        let (w, h) = image.dimensions();
        self.width = w as f32;
        self.height = h as f32;
        self.image = Some(image);
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Anchor offset from the top-left corner, in source pixels.
    #[inline]
    #[must_use]
    pub fn anchor_offset(&self) -> Vec2 {
        self.anchor * self.size()
    }

    #[inline]
    #[must_use]
    pub fn is_bounce(&self) -> bool {
        self.kind == LayerKind::Bounce
    }

    /// The layer's own transform, relative to its parent.
    #[must_use]
    pub fn local_transform(&self) -> WorldTransform {
        WorldTransform::new(self.position, self.rotation, self.scale)
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
    }

    pub fn set_anchor(&mut self, anchor: Vec2) {
        self.anchor = anchor.clamp(Vec2::ZERO, Vec2::ONE);
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Bounce payload, created with defaults on first access.
    ///
    /// Returns `None` for non-bounce layers.
    pub fn bounce_mut(&mut self) -> Option<&mut BounceParams> {
        if !self.is_bounce() {
            return None;
        }
        Some(self.bounce.get_or_insert_with(BounceParams::default))
    }

    /// Clipping settings, created disabled on first access.
    pub fn color_clipping_mut(&mut self) -> &mut ColorClipping {
        self.color_clipping.get_or_insert_with(ColorClipping::default)
    }
}
