//! ParikramaLOAM - Scan registration front-end for LOAM-style LiDAR odometry
//!
//! Ingests raw sweeps from a rotating 3D laser scanner plus an optional
//! inertial stream, motion-compensates every point into the sweep-start
//! frame and classifies points into the four geometric feature sets the
//! downstream odometry stage consumes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    engine/                          │  ← Sweep lifecycle
//! │        (registration façade, transform summary)     │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                   features/                         │  ← Feature extraction
//! │   (curvature, masking, selection, voxel filter)     │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                   sensors/                          │  ← Inertial processing
//! │          (history, motion compensation)             │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │                 (types, math)                       │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Data flow
//!
//! Inertial samples accumulate in a bounded [`ImuHistory`]. Each arriving
//! [`Sweep`] is processed atomically by [`ScanRegistration`]: every point is
//! projected into the sweep-start frame using the inertial state
//! interpolated at its measurement time, per-ring index ranges are recorded,
//! and the [`FeatureExtractor`] walks each ring to produce sharp/less-sharp
//! corners and flat/less-flat surfaces. Outputs are exposed by reference and
//! stay valid until the next sweep.
//!
//! # Example
//!
//! ```
//! use parikrama_loam::{LidarPoint, ScanRegistration, Sweep};
//!
//! let mut registration = ScanRegistration::with_defaults();
//!
//! // a single flat ring, no inertial input (compensation is a no-op)
//! let ring: Vec<LidarPoint> = (0..300)
//!     .map(|i| LidarPoint::new(i as f32 * 0.02 - 3.0, 5.0, -1.0, 0.0))
//!     .collect();
//! let sweep = Sweep::from_rings(vec![ring], 0.1);
//!
//! registration.process_sweep(&sweep, 0.0).unwrap();
//! let outputs = registration.outputs();
//! assert!(outputs.corners_sharp.is_empty());
//! assert!(!outputs.surfaces_flat.is_empty());
//! ```

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Sensor processing (depends on core)
// ============================================================================
pub mod sensors;

// ============================================================================
// Layer 3: Feature extraction (depends on core)
// ============================================================================
pub mod features;

// ============================================================================
// Layer 4: Registration engine (depends on all layers)
// ============================================================================
pub mod engine;

pub mod error;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

// Core
pub use crate::core::math::{Angle, normalize_angle, shortest_arc_blend};
pub use crate::core::types::{
    DEFAULT_SCAN_PERIOD, ImuState, LidarPoint, PointCloud3D, Sweep, Vec3,
};

// Sensors
pub use sensors::imu::{IMU_HISTORY_SIZE, ImuHistory, MotionCompensator};

// Features
pub use features::{
    FeatureExtractor, FeatureSets, PointLabel, RegistrationConfig, voxel_downsample,
};

// Engine
pub use engine::{ImuTransform, RegistrationOutputs, ScanRegistration, SweepState};

// Errors
pub use error::{RegistrationError, Result};
