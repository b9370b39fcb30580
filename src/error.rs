//! Error types for sweep registration.

use thiserror::Error;

/// Registration error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistrationError {
    /// A configuration field violates its allowed range. The previous
    /// configuration stays active.
    #[error("invalid configuration: {field} = {value} (expected {constraint})")]
    ConfigInvalid {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Human-readable constraint, e.g. ">= 1".
        constraint: &'static str,
    },

    /// The sweep contains no points; no outputs were produced.
    #[error("sweep contains no points")]
    EmptySweep,

    /// A sweep is already being processed (serial contract).
    #[error("a sweep is already being processed")]
    Busy,
}

pub type Result<T> = std::result::Result<T, RegistrationError>;
