//! Inertial state type.

use crate::core::math::{Angle, shortest_arc_blend};
use crate::core::types::vector::Vec3;
use serde::{Deserialize, Serialize};

/// Inertial state at a single timestamp.
///
/// Orientation is roll/pitch/yaw; position and velocity are accumulated in
/// the world frame, acceleration stays in the sensor-local frame (with the
/// gravity component already removed upstream).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImuState {
    /// Measurement time in seconds.
    pub stamp: f64,
    /// Roll angle.
    pub roll: Angle,
    /// Pitch angle.
    pub pitch: Angle,
    /// Yaw angle.
    pub yaw: Angle,
    /// Accumulated position in the world frame (meters).
    pub position: Vec3,
    /// Accumulated velocity in the world frame (m/s).
    pub velocity: Vec3,
    /// Sensor-local linear acceleration (m/s²), gravity-free.
    pub acceleration: Vec3,
}

impl ImuState {
    /// Interpolate between two states.
    ///
    /// Roll, pitch, position and velocity blend linearly; yaw blends along
    /// the shorter arc across the ±π seam. Acceleration does not
    /// participate in projection and is carried over from `end`.
    pub fn interpolate(start: &ImuState, end: &ImuState, ratio: f32) -> ImuState {
        let inv = 1.0 - ratio;
        ImuState {
            stamp: start.stamp + (end.stamp - start.stamp) * ratio as f64,
            roll: Angle::from_rad(start.roll.rad() * inv + end.roll.rad() * ratio),
            pitch: Angle::from_rad(start.pitch.rad() * inv + end.pitch.rad() * ratio),
            yaw: Angle::from_rad(shortest_arc_blend(start.yaw.rad(), end.yaw.rad(), ratio)),
            position: start.position.lerp(&end.position, ratio),
            velocity: start.velocity.lerp(&end.velocity, ratio),
            acceleration: end.acceleration,
        }
    }
}
