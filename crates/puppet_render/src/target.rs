use glam::Vec2;
use image::RgbaImage;

use puppet_animation::MeshBounds;

/// Off-screen buffer a deformed mesh is rasterized into.
///
/// Mesh coordinates are centered on the target center. The target is larger
/// than the mesh so overshooting motion is never cut off.
#[derive(Debug, Clone)]
pub struct RenderTarget {
    pub image: RgbaImage,
}

impl RenderTarget {
    /// A transparent target of at least `1 × 1` pixels.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width.max(1), height.max(1)),
        }
    }

    /// A target sized `bounds.size * (1 + overshoot) + 2 * padding` per axis.
    #[must_use]
    pub fn for_bounds(bounds: &MeshBounds, padding: f32, overshoot: f32) -> Self {
        let size = target_size(bounds, padding, overshoot);
        Self::new(size.x.ceil() as u32, size.y.ceil() as u32)
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> Vec2 {
        let (w, h) = self.image.dimensions();
        Vec2::new(w as f32, h as f32)
    }

    #[inline]
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// Like [`RenderTarget::for_bounds`], growing each axis by at most one
    /// pixel so the undeformed image edges of a `layer_size` layer fall on
    /// pixel boundaries.
    #[must_use]
    pub fn for_layer(bounds: &MeshBounds, layer_size: Vec2, padding: f32, overshoot: f32) -> Self {
        let size = target_size(bounds, padding, overshoot);
        let align = |target: f32, layer: f32| -> u32 {
            let target = target.ceil().max(1.0) as u32;
            let layer = layer.round().max(0.0) as u32;
            if (target + layer) % 2 == 1 { target + 1 } else { target }
        };
        Self::new(align(size.x, layer_size.x), align(size.y, layer_size.y))
    }

    /// Target pixel position of a mesh-space point.
    #[inline]
    #[must_use]
    pub fn to_pixel(&self, mesh_point: Vec2) -> Vec2 {
        mesh_point + self.center()
    }

    /// Where the anchor of an undeformed `layer_size` image sits in this
    /// target. Drawing the target at minus this offset keeps the anchor fixed.
    #[must_use]
    pub fn anchor_in_target(&self, layer_size: Vec2, anchor: Vec2) -> Vec2 {
        self.center() - layer_size * 0.5 + anchor * layer_size
    }
}

/// Unrounded target dimensions for `bounds`.
#[must_use]
pub fn target_size(bounds: &MeshBounds, padding: f32, overshoot: f32) -> Vec2 {
    bounds.size() * (1.0 + overshoot) + Vec2::splat(2.0 * padding)
}
