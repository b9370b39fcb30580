//! Sweep registration façade.
//!
//! Owns the whole per-sweep lifecycle: inertial ingestion, motion
//! compensation of each point into the sweep-start frame, per-ring feature
//! extraction and the compact transform summary handed to the odometry
//! stage. Purely synchronous; one sweep at a time.

use crate::core::types::{ImuState, LidarPoint, PointCloud3D, Sweep, Vec3};
use crate::core::math::Angle;
use crate::engine::transform::ImuTransform;
use crate::error::{RegistrationError, Result};
use crate::features::{FeatureExtractor, FeatureSets, RegistrationConfig};
use crate::sensors::imu::{ImuHistory, MotionCompensator};
use serde::{Deserialize, Serialize};

/// Sweep processing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepState {
    /// Ready for the next sweep.
    Idle,
    /// A sweep is being processed.
    Processing,
}

/// Borrowed view of the results of the last processed sweep.
///
/// Valid until the next [`ScanRegistration::process_sweep`] call.
#[derive(Debug)]
pub struct RegistrationOutputs<'a> {
    /// Full-resolution motion-compensated cloud.
    pub full_cloud: &'a PointCloud3D,
    /// Sharp corner points.
    pub corners_sharp: &'a PointCloud3D,
    /// Less sharp corner points (includes the sharp ones).
    pub corners_less_sharp: &'a PointCloud3D,
    /// Flat surface points.
    pub surfaces_flat: &'a PointCloud3D,
    /// Less flat surface points, voxel-downsampled.
    pub surfaces_less_flat: &'a PointCloud3D,
    /// Inertial transform summary over the sweep.
    pub imu_transform: &'a ImuTransform,
}

/// Scan registration front-end.
///
/// Feed inertial samples as they arrive, then hand over each completed
/// [`Sweep`]; the outputs are the five clouds plus the transform summary,
/// all expressed in the sweep-start frame.
#[derive(Debug)]
pub struct ScanRegistration {
    imu_history: ImuHistory,
    extractor: FeatureExtractor,
    state: SweepState,
    sweep_stamp: f64,
    full_cloud: PointCloud3D,
    ring_ranges: Vec<(usize, usize)>,
    features: FeatureSets,
    imu_transform: ImuTransform,
}

impl ScanRegistration {
    /// Create a registration front-end with the given configuration.
    ///
    /// Fails with [`RegistrationError::ConfigInvalid`] when a field is out
    /// of range.
    pub fn new(config: RegistrationConfig) -> Result<Self> {
        config.validate()?;
        config.log_summary();
        Ok(Self {
            imu_history: ImuHistory::default(),
            extractor: FeatureExtractor::new(config),
            state: SweepState::Idle,
            sweep_stamp: 0.0,
            full_cloud: PointCloud3D::new(),
            ring_ranges: Vec::new(),
            features: FeatureSets::default(),
            imu_transform: ImuTransform::default(),
        })
    }

    /// Create a registration front-end with the default configuration.
    pub fn with_defaults() -> Self {
        Self::new(RegistrationConfig::default()).expect("default config is valid")
    }

    /// The active configuration.
    pub fn config(&self) -> &RegistrationConfig {
        self.extractor.config()
    }

    /// Replace the configuration.
    ///
    /// The update is atomic: on any invalid field the previous
    /// configuration stays active and the error is returned.
    pub fn set_config(&mut self, config: RegistrationConfig) -> Result<()> {
        config.validate()?;
        self.extractor.set_config(config);
        Ok(())
    }

    /// Current sweep processing state.
    pub fn state(&self) -> SweepState {
        self.state
    }

    /// Feed a complete inertial state.
    ///
    /// Out-of-order samples are dropped and counted, never reported as an
    /// error (see [`inertial_dropped`](Self::inertial_dropped)).
    pub fn ingest_inertial(&mut self, sample: ImuState) {
        self.imu_history.push(sample);
    }

    /// Feed a raw orientation + gravity-free acceleration sample, letting
    /// the history dead-reckon position and velocity.
    pub fn ingest_inertial_raw(
        &mut self,
        stamp: f64,
        roll: Angle,
        pitch: Angle,
        yaw: Angle,
        acceleration: Vec3,
    ) {
        self.imu_history
            .push_raw(stamp, roll, pitch, yaw, acceleration);
    }

    /// Number of inertial samples dropped for arriving out of order.
    pub fn inertial_dropped(&self) -> u64 {
        self.imu_history.dropped_out_of_order()
    }

    /// Stamp of the last processed sweep (seconds).
    pub fn sweep_stamp(&self) -> f64 {
        self.sweep_stamp
    }

    /// Per-ring half-open index ranges into the full cloud, recorded while
    /// the last sweep was ingested.
    pub fn ring_ranges(&self) -> &[(usize, usize)] {
        &self.ring_ranges
    }

    /// Process one sweep stamped `sweep_stamp` (seconds, sweep start).
    ///
    /// Motion-compensates every point into the sweep-start frame, extracts
    /// features and computes the transform summary. A sweep arriving before
    /// any inertial sample is processed with the identity start state —
    /// compensation is then a no-op, not an error, since the inertial
    /// stream is optional.
    ///
    /// Errors: [`RegistrationError::EmptySweep`] for a sweep without
    /// points (state stays [`SweepState::Idle`], outputs untouched);
    /// [`RegistrationError::Busy`] if a sweep is already in flight. The
    /// busy guard is defensive: `&mut self` already serializes callers, so
    /// it only fires when an earlier call unwound mid-sweep and the caller
    /// caught the panic — the instance then stays busy (its buffers are in
    /// an undefined state) and should be rebuilt rather than reused.
    pub fn process_sweep(&mut self, sweep: &Sweep, sweep_stamp: f64) -> Result<()> {
        if self.state == SweepState::Processing {
            return Err(RegistrationError::Busy);
        }
        if sweep.is_empty() {
            return Err(RegistrationError::EmptySweep);
        }
        self.state = SweepState::Processing;
        self.reset(sweep_stamp);

        let compensator = MotionCompensator::new(self.imu_history.interpolate_at(sweep_stamp));

        let mut ring_start = 0usize;
        let mut current_ring = 0usize;
        for (i, p) in sweep.points.iter().enumerate() {
            // non-finite channels stay in the current ring run
            let ring = if p.channel.is_finite() {
                p.ring()
            } else {
                current_ring
            };
            if i == 0 {
                current_ring = ring;
            } else if ring != current_ring {
                self.ring_ranges.push((ring_start, i));
                ring_start = i;
                current_ring = ring;
            }

            let rel_time = p.rel_time();
            let current = self
                .imu_history
                .interpolate_at(sweep_stamp + rel_time as f64);
            let projected = compensator.project_to_start(p.position, &current, rel_time);
            self.full_cloud
                .push(LidarPoint::from_position(projected, p.channel));
        }
        self.ring_ranges.push((ring_start, sweep.points.len()));

        {
            let Self {
                extractor,
                full_cloud,
                ring_ranges,
                features,
                ..
            } = self;
            extractor.extract(&full_cloud.points, ring_ranges, features);
        }

        let end_state = self
            .imu_history
            .interpolate_at(sweep_stamp + sweep.scan_period as f64);
        self.imu_transform =
            ImuTransform::over_sweep(&compensator, &end_state, sweep.scan_period);

        self.state = SweepState::Idle;
        log::debug!(
            "sweep at {:.3}s: {} points in {} rings, {} sharp / {} less-sharp / {} flat / {} less-flat",
            sweep_stamp,
            self.full_cloud.len(),
            self.ring_ranges.len(),
            self.features.corners_sharp.len(),
            self.features.corners_less_sharp.len(),
            self.features.surfaces_flat.len(),
            self.features.surfaces_less_flat.len()
        );
        Ok(())
    }

    /// Results of the last processed sweep.
    pub fn outputs(&self) -> RegistrationOutputs<'_> {
        RegistrationOutputs {
            full_cloud: &self.full_cloud,
            corners_sharp: &self.features.corners_sharp,
            corners_less_sharp: &self.features.corners_less_sharp,
            surfaces_flat: &self.features.surfaces_flat,
            surfaces_less_flat: &self.features.surfaces_less_flat,
            imu_transform: &self.imu_transform,
        }
    }

    /// Clear per-sweep buffers and fix the new sweep stamp.
    fn reset(&mut self, sweep_stamp: f64) {
        self.sweep_stamp = sweep_stamp;
        self.full_cloud.clear();
        self.ring_ranges.clear();
        self.features.clear();
        self.imu_transform = ImuTransform::default();
    }
}

impl Default for ScanRegistration {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat_ring_sweep(n: usize) -> Sweep {
        let period = 0.1;
        let points = (0..n)
            .map(|i| {
                let rel = i as f32 / n as f32 * period;
                LidarPoint::new(
                    i as f32 * 0.02 - 2.0,
                    4.0,
                    -1.0,
                    LidarPoint::encode_channel(0, rel),
                )
            })
            .collect();
        Sweep::new(points, 1, period)
    }

    #[test]
    fn test_empty_sweep_is_an_error() {
        let mut registration = ScanRegistration::with_defaults();
        let sweep = Sweep::new(Vec::new(), 0, 0.1);

        assert_eq!(
            registration.process_sweep(&sweep, 0.0),
            Err(RegistrationError::EmptySweep)
        );
        assert_eq!(registration.state(), SweepState::Idle);
        assert!(registration.outputs().full_cloud.is_empty());
    }

    #[test]
    fn test_busy_after_an_aborted_sweep() {
        let mut registration = ScanRegistration::with_defaults();
        // simulate a sweep that unwound mid-flight with the panic caught
        // by the caller
        registration.state = SweepState::Processing;

        let sweep = flat_ring_sweep(300);
        assert_eq!(
            registration.process_sweep(&sweep, 0.0),
            Err(RegistrationError::Busy)
        );
        assert_eq!(registration.state(), SweepState::Processing);
    }

    #[test]
    fn test_sweep_without_inertial_is_identity() {
        let mut registration = ScanRegistration::with_defaults();
        let sweep = flat_ring_sweep(300);

        registration.process_sweep(&sweep, 10.0).unwrap();

        let outputs = registration.outputs();
        assert_eq!(outputs.full_cloud.len(), sweep.len());
        for (raw, compensated) in sweep.points.iter().zip(outputs.full_cloud.iter()) {
            assert_eq!(raw.position, compensated.position);
        }
        assert_eq!(outputs.imu_transform.shift_from_start, Vec3::ZERO);
    }

    #[test]
    fn test_ring_ranges_cover_the_cloud() {
        let mut registration = ScanRegistration::with_defaults();
        let ring: Vec<LidarPoint> = (0..50)
            .map(|i| LidarPoint::new(i as f32 * 0.05, 3.0, 0.0, 0.0))
            .collect();
        let sweep = Sweep::from_rings(vec![ring.clone(), ring.clone(), ring], 0.1);

        registration.process_sweep(&sweep, 0.0).unwrap();

        let ranges = registration.ring_ranges();
        assert_eq!(ranges, &[(0, 50), (50, 100), (100, 150)]);
    }

    #[test]
    fn test_set_config_is_atomic() {
        let mut registration = ScanRegistration::with_defaults();
        let before = registration.config().clone();

        let bad = RegistrationConfig::default().with_feature_regions(0);
        assert!(registration.set_config(bad).is_err());
        assert_eq!(registration.config(), &before);

        let good = RegistrationConfig::default().with_feature_regions(4);
        registration.set_config(good).unwrap();
        assert_eq!(registration.config().feature_regions, 4);
    }

    #[test]
    fn test_transform_summary_tracks_end_state() {
        let mut registration = ScanRegistration::with_defaults();
        // start at rest, then accelerate: the end of the sweep deviates
        // from the constant-velocity track
        registration.ingest_inertial(ImuState {
            stamp: 0.0,
            ..Default::default()
        });
        registration.ingest_inertial(ImuState {
            stamp: 0.1,
            position: Vec3::new(0.2, 0.0, 0.0),
            velocity: Vec3::new(4.0, 0.0, 0.0),
            ..Default::default()
        });

        let sweep = flat_ring_sweep(300);
        registration.process_sweep(&sweep, 0.0).unwrap();

        let summary = registration.outputs().imu_transform;
        assert_relative_eq!(summary.shift_from_start.x, 0.2, epsilon = 1e-6);
        assert_relative_eq!(summary.velocity_from_start.x, 4.0, epsilon = 1e-6);
    }
}
