//! Error types for the kinematics library.
//!
//! Configuration problems are reported when a value is constructed, never on
//! first use.

use core::fmt;

/// Errors that can occur in kinematic calculations.
#[derive(Debug, Clone, PartialEq)]
pub enum KinematicsError {
    /// A geometric or limit parameter is out of range.
    /// Returned when a wheel radius or wheel base is not strictly positive.
    InvalidConfiguration(&'static str),
    /// An integration method name was not recognized.
    InvalidIntegrator(&'static str),
    /// A time step that is zero, negative or not finite was supplied.
    InvalidTimeStep(&'static str),
}

impl fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KinematicsError::InvalidConfiguration(msg) => {
                write!(f, "Invalid configuration: {}", msg)
            }
            KinematicsError::InvalidIntegrator(msg) => write!(f, "Invalid integrator: {}", msg),
            KinematicsError::InvalidTimeStep(msg) => write!(f, "Invalid time step: {}", msg),
        }
    }
}

impl core::error::Error for KinematicsError {}
