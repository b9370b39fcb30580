//! Registration engine (depends on core, sensors, features).

mod registration;
mod transform;

pub use registration::{RegistrationOutputs, ScanRegistration, SweepState};
pub use transform::ImuTransform;
