//! Inertial history and motion compensation.

mod compensator;
mod history;

pub use compensator::MotionCompensator;
pub use history::{IMU_HISTORY_SIZE, ImuHistory};
