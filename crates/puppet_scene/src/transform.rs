use glam::{Affine2, Vec2};

/// Resolved placement of a layer in canvas space.
///
/// Derived on demand from the layer and its ancestors, never stored on the
/// layer itself. Rotation is in degrees, clockwise on screen (Y points down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTransform {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: f32,
}

impl Default for WorldTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl WorldTransform {
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
        rotation: 0.0,
        scale: 1.0,
    };

    #[must_use]
    pub fn new(position: Vec2, rotation: f32, scale: f32) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Re-expresses `self`, given relative to `parent`, in the parent's own
    /// frame of reference.
    ///
    /// The offset is scaled by the parent, rotated by the parent's rotation
    /// and added to the parent position; rotations add and scales multiply.
    #[must_use]
    pub fn in_parent(&self, parent: &WorldTransform) -> Self {
        let (sin, cos) = parent.rotation.to_radians().sin_cos();
        let scaled = self.position * parent.scale;
        let rotated = Vec2::new(
            scaled.x * cos - scaled.y * sin,
            scaled.x * sin + scaled.y * cos,
        );
        Self {
            position: parent.position + rotated,
            rotation: parent.rotation + self.rotation,
            scale: parent.scale * self.scale,
        }
    }

    /// Affine map from the transform's local space to its parent space.
    #[must_use]
    pub fn to_affine(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(
            Vec2::splat(self.scale),
            self.rotation.to_radians(),
            self.position,
        )
    }
}
