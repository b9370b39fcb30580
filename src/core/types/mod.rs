//! Core data types for sweep registration.
//!
//! - [`Vec3`]: 3D vector in meters with the axis rotations used by motion
//!   compensation
//! - [`LidarPoint`] / [`PointCloud3D`]: a return with its packed
//!   ring/relative-time channel, and a cloud of them
//! - [`Sweep`]: one full rotation grouped by ring
//! - [`ImuState`]: inertial pose + kinematics at a timestamp

mod imu;
mod point;
mod sweep;
mod vector;

pub use imu::ImuState;
pub use point::{LidarPoint, PointCloud3D};
pub use sweep::{DEFAULT_SCAN_PERIOD, Sweep};
pub use vector::Vec3;
