//! Position / rotation / scale state shared by drawable primitives.

use glam::{Mat4, Vec2, Vec3};

/// Per-object placement in world space.
///
/// The model matrix composes as `Translate(position) * Rotate(rotation) *
/// Scale(scale)`: geometry is scaled first, then rotated about its local
/// origin, then placed in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    position: Vec2,
    /// Degrees, counter-clockwise about +Z.
    rotation: f32,
    scale: f32,
}

impl Transform {
    /// Creates a transform at `position` with no rotation and unit scale.
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
            scale: 1.0,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Rotation in degrees.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees;
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    /// Moves by a relative offset.
    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.position += Vec2::new(dx, dy);
    }

    /// Adds `degrees` to the current rotation.
    pub fn rotate(&mut self, degrees: f32) {
        self.rotation += degrees;
    }

    /// Multiplies the current scale by `factor`.
    pub fn scale_by(&mut self, factor: f32) {
        self.scale *= factor;
    }

    /// Computes `T * R * S` for upload as the `model` uniform.
    pub fn model_matrix(&self) -> Mat4 {
        let t = Mat4::from_translation(self.position.extend(0.0));
        let r = Mat4::from_rotation_z(self.rotation.to_radians());
        let s = Mat4::from_scale(Vec3::new(self.scale, self.scale, 1.0));
        t * r * s
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::at(Vec2::ZERO)
    }
}
