//! Angular math primitives.
//!
//! All angles in the crate live in the half-open interval (-π, π]. The
//! [`Angle`] newtype keeps that invariant through arithmetic; the free
//! functions are the building blocks shared with inertial interpolation.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Normalize an angle to (-π, π].
///
/// # Example
/// ```
/// use parikrama_loam::core::math::normalize_angle;
/// use std::f32::consts::PI;
///
/// assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-6);
/// assert!((normalize_angle(-PI) - PI).abs() < 1e-6);
/// ```
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a <= -PI {
        a += 2.0 * PI;
    }
    a
}

/// Blend two angles along the shorter arc.
///
/// `ratio` = 0 returns `start`, 1 returns `end`. When the two angles sit on
/// opposite sides of the ±π seam the blend crosses the seam instead of
/// sweeping the long way around.
#[inline]
pub fn shortest_arc_blend(start: f32, end: f32, ratio: f32) -> f32 {
    let inv = 1.0 - ratio;
    let blended = if start - end > PI {
        start * inv + (end + 2.0 * PI) * ratio
    } else if start - end < -PI {
        start * inv + (end - 2.0 * PI) * ratio
    } else {
        start * inv + end * ratio
    };
    normalize_angle(blended)
}

/// A scalar angle normalized to (-π, π].
///
/// Arithmetic re-normalizes, so sums and differences never leave the
/// interval. Construction from raw radians normalizes as well.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Angle(f32);

impl Angle {
    /// Zero angle.
    pub const ZERO: Angle = Angle(0.0);

    /// Create an angle from radians, normalizing into (-π, π].
    #[inline]
    pub fn from_rad(rad: f32) -> Self {
        Angle(normalize_angle(rad))
    }

    /// Create an angle from degrees.
    #[inline]
    pub fn from_deg(deg: f32) -> Self {
        Self::from_rad(deg.to_radians())
    }

    /// The angle in radians, guaranteed within (-π, π].
    #[inline]
    pub fn rad(self) -> f32 {
        self.0
    }

    /// The angle in degrees.
    #[inline]
    pub fn deg(self) -> f32 {
        self.0.to_degrees()
    }

    #[inline]
    pub fn sin(self) -> f32 {
        self.0.sin()
    }

    #[inline]
    pub fn cos(self) -> f32 {
        self.0.cos()
    }

    /// Simultaneous sine and cosine.
    #[inline]
    pub fn sin_cos(self) -> (f32, f32) {
        self.0.sin_cos()
    }
}

impl Add for Angle {
    type Output = Angle;

    #[inline]
    fn add(self, rhs: Angle) -> Angle {
        Angle::from_rad(self.0 + rhs.0)
    }
}

impl AddAssign for Angle {
    #[inline]
    fn add_assign(&mut self, rhs: Angle) {
        *self = *self + rhs;
    }
}

impl Sub for Angle {
    type Output = Angle;

    #[inline]
    fn sub(self, rhs: Angle) -> Angle {
        Angle::from_rad(self.0 - rhs.0)
    }
}

impl SubAssign for Angle {
    #[inline]
    fn sub_assign(&mut self, rhs: Angle) {
        *self = *self - rhs;
    }
}

impl Neg for Angle {
    type Output = Angle;

    #[inline]
    fn neg(self) -> Angle {
        Angle::from_rad(-self.0)
    }
}

impl Mul<f32> for Angle {
    type Output = Angle;

    #[inline]
    fn mul(self, rhs: f32) -> Angle {
        Angle::from_rad(self.0 * rhs)
    }
}
