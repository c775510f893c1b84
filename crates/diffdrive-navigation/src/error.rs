//! This module defines the error types used by the `diffdrive-navigation` crate.

/// Error type for navigation operations.
#[derive(Debug, PartialEq)]
pub enum NavigationError {
    /// Error for an unusable waypoint count.
    /// This variant is returned when a generator is asked for too few points.
    InvalidPointCount(&'static str),
    /// Error for an unusable generator parameter.
    /// This variant is returned for non-finite sizes or coordinates.
    InvalidParameter(&'static str),
}

impl core::fmt::Display for NavigationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            NavigationError::InvalidPointCount(msg) => write!(f, "Invalid point count: {}", msg),
            NavigationError::InvalidParameter(msg) => write!(f, "Invalid path parameter: {}", msg),
        }
    }
}

impl core::error::Error for NavigationError {}
