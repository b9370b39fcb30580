//! Motion compensation of mid-sweep points into the sweep-start frame.

use crate::core::types::{ImuState, Vec3};

/// Projects points measured during a sweep into the sweep-start frame.
///
/// Owns the inertial state interpolated at the sweep start. For each point
/// the caller supplies the state interpolated at the point's measurement
/// time; the projection removes the distortion the sensor's own motion
/// introduced between the two.
///
/// The correction uses only the deviation from constant-velocity motion:
/// a uniform translation over the sweep is left in place for the
/// downstream odometry stage to estimate.
#[derive(Debug, Clone)]
pub struct MotionCompensator {
    start: ImuState,
}

impl MotionCompensator {
    /// Create a compensator anchored at the sweep-start state.
    pub fn new(start: ImuState) -> Self {
        Self { start }
    }

    /// The sweep-start state.
    pub fn start(&self) -> &ImuState {
        &self.start
    }

    /// Deviation of `current` from constant-velocity extrapolation of the
    /// start state over `rel_time` seconds.
    #[inline]
    pub fn position_shift(&self, current: &ImuState, rel_time: f32) -> Vec3 {
        current.position - self.start.position - self.start.velocity * rel_time
    }

    /// Project a sensor-frame point measured at sweep-relative time
    /// `rel_time` into the sweep-start frame.
    ///
    /// Rotates the point to world with the current attitude (roll about z,
    /// pitch about x, yaw about y), applies the acceleration-induced shift,
    /// then rotates back with the inverted start attitude (yaw, pitch,
    /// roll — the inverse nesting).
    pub fn project_to_start(&self, point: Vec3, current: &ImuState, rel_time: f32) -> Vec3 {
        let world = point.rotate_zxy(current.roll, current.pitch, current.yaw);
        let shifted = world + self.position_shift(current, rel_time);
        shifted.rotate_yxz(-self.start.yaw, -self.start.pitch, -self.start.roll)
    }
}
