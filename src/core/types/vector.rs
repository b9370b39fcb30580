//! 3-vector type and the axis rotations used for motion compensation.

use crate::core::math::Angle;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// A 3D vector in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a new vector.
    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Dot product.
    #[inline]
    pub fn dot(&self, other: &Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Squared Euclidean norm (avoids sqrt).
    #[inline]
    pub fn norm_squared(&self) -> f32 {
        self.dot(self)
    }

    /// Euclidean norm.
    #[inline]
    pub fn norm(&self) -> f32 {
        self.norm_squared().sqrt()
    }

    /// Squared distance to another vector.
    #[inline]
    pub fn distance_squared(&self, other: &Vec3) -> f32 {
        (*self - *other).norm_squared()
    }

    /// Squared distance to `other` scaled by `scale`, i.e. ‖self − other·scale‖².
    ///
    /// Used by the occlusion test, which compares a point against its
    /// neighbor rescaled to the same depth.
    #[inline]
    pub fn distance_squared_scaled(&self, other: &Vec3, scale: f32) -> f32 {
        (*self - *other * scale).norm_squared()
    }

    /// Linear interpolation: `self` at ratio 0, `other` at ratio 1.
    #[inline]
    pub fn lerp(&self, other: &Vec3, ratio: f32) -> Vec3 {
        *self * (1.0 - ratio) + *other * ratio
    }

    /// True when all three components are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Rotate about the x axis.
    #[inline]
    pub fn rotate_x(self, angle: Angle) -> Vec3 {
        let (sin, cos) = angle.sin_cos();
        Vec3::new(self.x, cos * self.y - sin * self.z, sin * self.y + cos * self.z)
    }

    /// Rotate about the y axis.
    #[inline]
    pub fn rotate_y(self, angle: Angle) -> Vec3 {
        let (sin, cos) = angle.sin_cos();
        Vec3::new(cos * self.x + sin * self.z, self.y, cos * self.z - sin * self.x)
    }

    /// Rotate about the z axis.
    #[inline]
    pub fn rotate_z(self, angle: Angle) -> Vec3 {
        let (sin, cos) = angle.sin_cos();
        Vec3::new(cos * self.x - sin * self.y, sin * self.x + cos * self.y, self.z)
    }

    /// Rotate about z, then x, then y — the sensor-to-world convention of
    /// motion compensation (roll about z, pitch about x, yaw about y).
    #[inline]
    pub fn rotate_zxy(self, roll: Angle, pitch: Angle, yaw: Angle) -> Vec3 {
        self.rotate_z(roll).rotate_x(pitch).rotate_y(yaw)
    }

    /// Rotate about y, then x, then z — the inverse nesting of
    /// [`rotate_zxy`](Self::rotate_zxy) when called with negated angles.
    #[inline]
    pub fn rotate_yxz(self, yaw: Angle, pitch: Angle, roll: Angle) -> Vec3 {
        self.rotate_y(yaw).rotate_x(pitch).rotate_z(roll)
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec3) {
        *self = *self - rhs;
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}
