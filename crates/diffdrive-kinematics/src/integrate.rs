//! Fixed-step integration of the unicycle model
//! `ẋ = v·cos θ`, `ẏ = v·sin θ`, `θ̇ = ω`.
//!
//! The chassis speeds are held constant over a step (zero-order hold).

use core::fmt;
use core::str::FromStr;
use libm::{cos, sin};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{ChassisSpeeds, KinematicsError, Pose};

/// Integration method used to advance a pose over one time step.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Integrator {
    /// Single forward step using the derivative at the current state.
    Euler,
    /// Classical 4th-order Runge-Kutta.
    #[default]
    Rk4,
}

/// State derivative `(ẋ, ẏ, θ̇)`.
#[derive(Debug, Clone, Copy)]
struct Derivative {
    dx: f64,
    dy: f64,
    dtheta: f64,
}

fn derivative(theta: f64, speeds: ChassisSpeeds) -> Derivative {
    Derivative {
        dx: speeds.v * cos(theta),
        dy: speeds.v * sin(theta),
        dtheta: speeds.omega,
    }
}

/// `pose + k·h`, without normalizing the heading. Intermediate RK stages
/// work on the raw heading.
fn offset(pose: Pose, k: Derivative, h: f64) -> Pose {
    Pose {
        x: pose.x + k.dx * h,
        y: pose.y + k.dy * h,
        theta: pose.theta + k.dtheta * h,
    }
}

impl Integrator {
    /// Name accepted by [`Integrator::from_str`].
    pub const fn name(&self) -> &'static str {
        match self {
            Integrator::Euler => "euler",
            Integrator::Rk4 => "rk4",
        }
    }

    /// Advance `pose` by `dt` seconds under constant `speeds`.
    ///
    /// The returned heading is normalized to `[-PI, PI)`. `dt` is not
    /// validated here; see [`crate::DifferentialDrive::update_pose`].
    pub fn advance(&self, pose: Pose, speeds: ChassisSpeeds, dt: f64) -> Pose {
        let next = match self {
            Integrator::Euler => offset(pose, derivative(pose.theta, speeds), dt),
            Integrator::Rk4 => {
                let half = 0.5 * dt;
                let k1 = derivative(pose.theta, speeds);
                let k2 = derivative(offset(pose, k1, half).theta, speeds);
                let k3 = derivative(offset(pose, k2, half).theta, speeds);
                let k4 = derivative(offset(pose, k3, dt).theta, speeds);

                let sixth = dt / 6.0;
                Pose {
                    x: pose.x + sixth * (k1.dx + 2.0 * k2.dx + 2.0 * k3.dx + k4.dx),
                    y: pose.y + sixth * (k1.dy + 2.0 * k2.dy + 2.0 * k3.dy + k4.dy),
                    theta: pose.theta
                        + sixth * (k1.dtheta + 2.0 * k2.dtheta + 2.0 * k3.dtheta + k4.dtheta),
                }
            }
        };

        Pose {
            theta: Pose::normalize_angle(next.theta),
            ..next
        }
    }
}

impl FromStr for Integrator {
    type Err = KinematicsError;

    /// Parses `"euler"` or `"rk4"`, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("euler") {
            Ok(Integrator::Euler)
        } else if s.eq_ignore_ascii_case("rk4") {
            Ok(Integrator::Rk4)
        } else {
            Err(KinematicsError::InvalidIntegrator(
                "expected `euler` or `rk4`",
            ))
        }
    }
}

impl fmt::Display for Integrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
