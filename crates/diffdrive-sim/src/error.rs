//! Error type for the simulator.

use diffdrive_kinematics::KinematicsError;
use thiserror::Error;

/// Errors raised while configuring or stepping a [`crate::Simulator`].
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    /// A limit or noise parameter is negative or not a number.
    #[error("invalid configuration: `{field}` must be non-negative, got {value}")]
    InvalidConfiguration {
        /// Name of the offending parameter.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// The integration method name is not one of `euler` or `rk4`.
    #[error("unknown integrator `{0}`, expected `euler` or `rk4`")]
    InvalidIntegrator(String),
    /// The time step passed to a step was not positive and finite.
    #[error("invalid time step {0}: must be positive and finite")]
    InvalidTimeStep(f64),
    /// Invalid robot geometry.
    #[error(transparent)]
    Kinematics(#[from] KinematicsError),
}
