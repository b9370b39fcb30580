//! Full-rotation sweep type.

use super::point::LidarPoint;
use serde::{Deserialize, Serialize};

/// Default sweep duration in seconds (10 Hz rotation).
pub const DEFAULT_SCAN_PERIOD: f32 = 0.1;

/// One full rotation of the sensor: a flat point list grouped contiguously
/// by ascending ring index.
///
/// Each point's ring and sweep-relative time are packed in its channel (see
/// [`LidarPoint`]). Grouping is required: all points of ring 0 first, then
/// ring 1, and so on, with no gaps between groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sweep {
    /// Points in ring order.
    pub points: Vec<LidarPoint>,
    /// Number of rings the sensor produces.
    pub ring_count: u16,
    /// Total sweep duration in seconds.
    pub scan_period: f32,
}

impl Sweep {
    /// Create a sweep from an already grouped point list.
    pub fn new(points: Vec<LidarPoint>, ring_count: u16, scan_period: f32) -> Self {
        Self {
            points,
            ring_count,
            scan_period,
        }
    }

    /// Build a sweep from per-ring point vectors.
    ///
    /// This is the seam where sensor-specific drivers plug in: a driver
    /// splits raw returns into rings with relative timestamps, and this
    /// adapter flattens them, re-stamping each channel's integer part with
    /// the ring index while keeping the fractional relative time.
    pub fn from_rings(rings: Vec<Vec<LidarPoint>>, scan_period: f32) -> Self {
        let ring_count = rings.len() as u16;
        let total: usize = rings.iter().map(|r| r.len()).sum();
        let mut points = Vec::with_capacity(total);

        for (ring, ring_points) in rings.into_iter().enumerate() {
            for p in ring_points {
                points.push(LidarPoint::from_position(
                    p.position,
                    LidarPoint::encode_channel(ring as u16, p.rel_time()),
                ));
            }
        }

        Self {
            points,
            ring_count,
            scan_period,
        }
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the sweep is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Validate internal consistency.
    ///
    /// Returns Ok(()) if valid, or a message describing the inconsistency.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.scan_period <= 0.0 {
            return Err("scan_period must be positive");
        }

        let mut last_ring = 0usize;
        for p in &self.points {
            if !p.channel.is_finite() {
                return Err("point channel must be finite");
            }
            let ring = p.ring();
            if ring >= self.ring_count as usize {
                return Err("point ring exceeds ring_count");
            }
            if ring < last_ring {
                return Err("points must be grouped by ascending ring");
            }
            last_ring = ring;
        }
        Ok(())
    }
}

impl Default for Sweep {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            ring_count: 0,
            scan_period: DEFAULT_SCAN_PERIOD,
        }
    }
}
