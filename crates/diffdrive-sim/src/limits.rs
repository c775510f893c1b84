//! Actuator limits: velocity saturation followed by an optional rate clamp.

use diffdrive_kinematics::ChassisSpeeds;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::SimError;

/// Velocity and acceleration bounds applied to every commanded action.
///
/// `None` for an acceleration limit disables the rate clamp on that channel.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    /// Maximum linear speed magnitude (m/s).
    pub max_v: f64,
    /// Maximum angular speed magnitude (rad/s).
    pub max_omega: f64,
    /// Maximum linear acceleration magnitude (m/s²).
    pub max_accel_v: Option<f64>,
    /// Maximum angular acceleration magnitude (rad/s²).
    pub max_accel_omega: Option<f64>,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_v: 1.0,
            max_omega: 2.0,
            max_accel_v: None,
            max_accel_omega: None,
        }
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), SimError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidConfiguration { field, value })
    }
}

impl Limits {
    /// Velocity limits with no acceleration clamp.
    pub const fn new(max_v: f64, max_omega: f64) -> Self {
        Limits {
            max_v,
            max_omega,
            max_accel_v: None,
            max_accel_omega: None,
        }
    }

    /// Adds acceleration limits for both channels.
    pub fn with_acceleration(mut self, max_accel_v: f64, max_accel_omega: f64) -> Self {
        self.max_accel_v = Some(max_accel_v);
        self.max_accel_omega = Some(max_accel_omega);
        self
    }

    /// Checks that every bound is a non-negative number.
    pub fn validate(&self) -> Result<(), SimError> {
        non_negative("max_v", self.max_v)?;
        non_negative("max_omega", self.max_omega)?;
        if let Some(a) = self.max_accel_v {
            non_negative("max_accel_v", a)?;
        }
        if let Some(a) = self.max_accel_omega {
            non_negative("max_accel_omega", a)?;
        }
        Ok(())
    }

    /// Applies the absolute clamp, then the rate clamp relative to `previous`.
    ///
    /// The rate clamp only runs when a previous command exists and the
    /// channel has an acceleration limit. Expects validated limits and a
    /// positive `dt`.
    pub fn apply(
        &self,
        command: ChassisSpeeds,
        previous: Option<ChassisSpeeds>,
        dt: f64,
    ) -> ChassisSpeeds {
        let mut v = command.v.clamp(-self.max_v, self.max_v);
        let mut omega = command.omega.clamp(-self.max_omega, self.max_omega);

        if let Some(last) = previous {
            if let Some(a) = self.max_accel_v {
                v = last.v + rate_limited(v - last.v, a * dt);
            }
            if let Some(a) = self.max_accel_omega {
                omega = last.omega + rate_limited(omega - last.omega, a * dt);
            }
        }

        ChassisSpeeds::new(v, omega)
    }
}

fn rate_limited(delta: f64, max_delta: f64) -> f64 {
    delta.clamp(-max_delta, max_delta)
}
