//! Node transforms.
//!
//! Rotations are stored as XYZ Euler angles because the render loop drives the
//! Earth spin by assigning the Y angle directly from ticker time.

use std::ops::Mul;

use cgmath::{Matrix4, Rad, Vector3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    /// Euler angles in radians, composed as Rx · Ry · Rz.
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    /// Identity transform (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn uniform_scale(scale: f32) -> Self {
        Self {
            scale: Vector3::new(scale, scale, scale),
            ..Self::new()
        }
    }

    pub fn rotation_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * self.rotation_matrix()
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// Parent × child, yielding the child's transform in the parent's space.
impl<'a, 'b> Mul<&'b Transform> for &'a Transform {
    type Output = Matrix4<f32>;

    fn mul(self, rhs: &'b Transform) -> Self::Output {
        self.to_matrix() * rhs.to_matrix()
    }
}
