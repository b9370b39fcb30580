//! LiDAR point and point cloud types.

use super::vector::Vec3;
use serde::{Deserialize, Serialize};

/// A single LiDAR return.
///
/// The `channel` field carries the legacy packed encoding: its integer part
/// is the ring index and its fractional part is the measurement time
/// relative to the sweep start, in seconds (always below one full second,
/// so the two parts never collide).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LidarPoint {
    /// Position in the sensor (or, after compensation, sweep-start) frame.
    pub position: Vec3,
    /// Packed ring index + sweep-relative time.
    pub channel: f32,
}

impl LidarPoint {
    /// Create a point from raw coordinates and a packed channel value.
    #[inline]
    pub fn new(x: f32, y: f32, z: f32, channel: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            channel,
        }
    }

    /// Create a point from a position and a packed channel value.
    #[inline]
    pub fn from_position(position: Vec3, channel: f32) -> Self {
        Self { position, channel }
    }

    /// Pack a ring index and a sweep-relative time (seconds) into a channel
    /// value. `rel_time` must be in [0, 1) — sweep periods are well below a
    /// second in practice.
    #[inline]
    pub fn encode_channel(ring: u16, rel_time: f32) -> f32 {
        ring as f32 + rel_time
    }

    /// Ring index decoded from the channel.
    #[inline]
    pub fn ring(&self) -> usize {
        self.channel as usize
    }

    /// Sweep-relative measurement time in seconds.
    #[inline]
    pub fn rel_time(&self) -> f32 {
        self.channel.fract()
    }

    /// True when the position and channel are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.channel.is_finite()
    }
}

/// A growable collection of LiDAR points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointCloud3D {
    /// The points, in insertion order.
    pub points: Vec<LidarPoint>,
}

impl PointCloud3D {
    /// Create an empty cloud.
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Create a cloud with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Append a point.
    #[inline]
    pub fn push(&mut self, point: LidarPoint) {
        self.points.push(point);
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Remove all points, keeping allocated capacity.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Iterate over the points.
    pub fn iter(&self) -> impl Iterator<Item = &LidarPoint> + '_ {
        self.points.iter()
    }
}

impl Extend<LidarPoint> for PointCloud3D {
    fn extend<T: IntoIterator<Item = LidarPoint>>(&mut self, iter: T) {
        self.points.extend(iter);
    }
}
