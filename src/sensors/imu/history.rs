//! Bounded time-ordered inertial history.

use crate::core::math::Angle;
use crate::core::types::{ImuState, Vec3};
use std::collections::VecDeque;

/// Default history capacity.
pub const IMU_HISTORY_SIZE: usize = 200;

/// Raw samples further apart than this are not integrated; the pose is
/// carried but position/velocity propagation is skipped for the gap.
const MAX_INTEGRATION_DT: f32 = 0.1;

/// Bounded ring of inertial states ordered by strictly increasing stamp.
///
/// Out-of-order samples are dropped (and counted); a sample with the same
/// stamp as the newest replaces it; the oldest state is evicted once the
/// capacity is reached.
#[derive(Debug, Clone)]
pub struct ImuHistory {
    states: VecDeque<ImuState>,
    capacity: usize,
    dropped: u64,
}

impl ImuHistory {
    /// Create a history with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            states: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    /// Append a state, enforcing stamp ordering and the capacity bound.
    pub fn push(&mut self, state: ImuState) {
        if let Some(newest) = self.states.back_mut() {
            if state.stamp < newest.stamp {
                self.dropped += 1;
                log::warn!(
                    "dropping out-of-order inertial sample: {:.6} < {:.6}",
                    state.stamp,
                    newest.stamp
                );
                return;
            }
            if state.stamp == newest.stamp {
                *newest = state;
                return;
            }
        }
        if self.states.len() == self.capacity {
            self.states.pop_front();
        }
        self.states.push_back(state);
    }

    /// Append a raw orientation + acceleration sample, dead-reckoning
    /// position and velocity from the newest stored state.
    ///
    /// The sensor-local acceleration (gravity-free) is rotated to world via
    /// the sample's own attitude; position and velocity then integrate under
    /// constant acceleration over the gap. Gaps of [`MAX_INTEGRATION_DT`] or
    /// more carry the previous motion state unchanged. The first sample
    /// starts at rest at the origin.
    pub fn push_raw(
        &mut self,
        stamp: f64,
        roll: Angle,
        pitch: Angle,
        yaw: Angle,
        acceleration: Vec3,
    ) {
        let state = match self.states.back() {
            Some(last) => {
                let dt = (stamp - last.stamp) as f32;
                if dt > 0.0 && dt < MAX_INTEGRATION_DT {
                    let world_acc = acceleration.rotate_zxy(roll, pitch, yaw);
                    ImuState {
                        stamp,
                        roll,
                        pitch,
                        yaw,
                        position: last.position
                            + last.velocity * dt
                            + world_acc * (0.5 * dt * dt),
                        velocity: last.velocity + world_acc * dt,
                        acceleration,
                    }
                } else {
                    ImuState {
                        stamp,
                        roll,
                        pitch,
                        yaw,
                        position: last.position,
                        velocity: last.velocity,
                        acceleration,
                    }
                }
            }
            None => ImuState {
                stamp,
                roll,
                pitch,
                yaw,
                acceleration,
                ..Default::default()
            },
        };
        self.push(state);
    }

    /// Interpolated state at time `t`.
    ///
    /// Never fails: times before the oldest stamp yield the oldest state,
    /// times at or after the newest yield the newest, and an empty history
    /// yields the zero state.
    pub fn interpolate_at(&self, t: f64) -> ImuState {
        let Some(oldest) = self.states.front() else {
            return ImuState::default();
        };
        if t <= oldest.stamp {
            return *oldest;
        }
        let newest = self.states.back().expect("non-empty history has a back");
        if t >= newest.stamp {
            return *newest;
        }

        // Binary search for the bracketing pair; stamps are strictly
        // increasing by construction.
        let mut lo = 0;
        let mut hi = self.states.len() - 1;
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if self.states[mid].stamp <= t {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        let start = &self.states[lo];
        let end = &self.states[hi];
        let ratio = ((t - start.stamp) / (end.stamp - start.stamp)) as f32;
        ImuState::interpolate(start, end, ratio)
    }

    /// Number of stored states.
    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Check if the history is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The newest stored state, if any.
    pub fn newest(&self) -> Option<&ImuState> {
        self.states.back()
    }

    /// The oldest stored state, if any.
    pub fn oldest(&self) -> Option<&ImuState> {
        self.states.front()
    }

    /// Number of samples dropped for arriving out of order.
    #[inline]
    pub fn dropped_out_of_order(&self) -> u64 {
        self.dropped
    }
}

impl Default for ImuHistory {
    fn default() -> Self {
        Self::new(IMU_HISTORY_SIZE)
    }
}
