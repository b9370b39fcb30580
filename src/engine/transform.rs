//! Inertial transform summary over one sweep.

use crate::core::types::{ImuState, Vec3};
use crate::sensors::imu::MotionCompensator;
use serde::{Deserialize, Serialize};

/// Compact summary of the inertial motion over a sweep, expressed in the
/// sweep-start frame. This is the hand-off contract consumed by the
/// odometry stage.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImuTransform {
    /// Sweep-start attitude as (roll, pitch, yaw) radians.
    pub start_pose: Vec3,
    /// Sweep-end attitude as (roll, pitch, yaw) radians.
    pub end_pose: Vec3,
    /// End-of-sweep deviation from constant-velocity motion, rotated into
    /// the start frame.
    pub shift_from_start: Vec3,
    /// End-of-sweep velocity change, rotated into the start frame.
    pub velocity_from_start: Vec3,
}

impl ImuTransform {
    /// Build the summary for a sweep of duration `scan_period` seconds.
    pub fn over_sweep(
        compensator: &MotionCompensator,
        end: &ImuState,
        scan_period: f32,
    ) -> Self {
        let start = compensator.start();

        let shift = compensator
            .position_shift(end, scan_period)
            .rotate_yxz(-start.yaw, -start.pitch, -start.roll);
        let velocity =
            (end.velocity - start.velocity).rotate_yxz(-start.yaw, -start.pitch, -start.roll);

        Self {
            start_pose: Vec3::new(start.roll.rad(), start.pitch.rad(), start.yaw.rad()),
            end_pose: Vec3::new(end.roll.rad(), end.pitch.rad(), end.yaw.rad()),
            shift_from_start: shift,
            velocity_from_start: velocity,
        }
    }

    /// Render the legacy 4-point cloud form: start pose, position shift,
    /// velocity change, end pose.
    pub fn to_cloud(&self) -> [Vec3; 4] {
        [
            self.start_pose,
            self.shift_from_start,
            self.velocity_from_start,
            self.end_pose,
        ]
    }
}
