#![warn(missing_docs)]
//! Kinematic simulation of a differential-drive robot.
//!
//! One step resolves the commanded [`Action`] to chassis speeds, optionally
//! perturbs them with process noise, applies the actuator [`Limits`] and
//! integrates the pose. [`step`] is the pure transition; [`Simulator`] wraps
//! it with owned state and an append-only pose history.

use diffdrive_kinematics::{ChassisSpeeds, DifferentialDrive, Integrator, Pose, WheelSpeeds};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod error;
pub mod limits;
pub mod noise;
pub mod simulator;

pub use error::SimError;
pub use limits::Limits;
pub use noise::{NoiseConfig, ProcessNoise};
pub use simulator::{Simulator, SimulatorBuilder};

/// A commanded input for one step.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Body-frame linear and angular velocity.
    Body(ChassisSpeeds),
    /// Left and right wheel rim speeds.
    Wheels(WheelSpeeds),
}

impl Action {
    /// Shorthand for `Action::Body(ChassisSpeeds::new(v, omega))`.
    pub const fn body(v: f64, omega: f64) -> Self {
        Action::Body(ChassisSpeeds::new(v, omega))
    }

    /// Shorthand for `Action::Wheels(WheelSpeeds::new(v_l, v_r))`.
    pub const fn wheels(v_l: f64, v_r: f64) -> Self {
        Action::Wheels(WheelSpeeds::new(v_l, v_r))
    }

    /// Chassis speeds requested by this action, before noise and limits.
    pub fn resolve(&self, kinematics: &DifferentialDrive) -> ChassisSpeeds {
        match *self {
            Action::Body(speeds) => speeds,
            Action::Wheels(wheels) => kinematics.body_from_wheels(wheels),
        }
    }
}

impl From<ChassisSpeeds> for Action {
    fn from(speeds: ChassisSpeeds) -> Self {
        Action::Body(speeds)
    }
}

impl From<WheelSpeeds> for Action {
    fn from(wheels: WheelSpeeds) -> Self {
        Action::Wheels(wheels)
    }
}

/// Simulation state carried from one step to the next.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimState {
    /// Current pose, heading in `[-PI, PI)`.
    pub pose: Pose,
    /// Command applied on the previous step, after limits. `None` before the
    /// first step.
    pub last_command: Option<ChassisSpeeds>,
}

impl SimState {
    /// State at `pose` with no command history.
    pub fn new(pose: Pose) -> Self {
        SimState {
            pose,
            last_command: None,
        }
    }
}

/// Advance `state` by one step of `dt` seconds.
///
/// Order of operations: resolve the action, add process noise (if any),
/// clamp absolute speeds, clamp the change from the last applied command,
/// integrate, normalize the heading.
///
/// # Errors
///
/// Returns `SimError::InvalidTimeStep` if `dt` is not positive and finite,
/// and `SimError::InvalidConfiguration` for negative or NaN limits.
pub fn step(
    kinematics: &DifferentialDrive,
    limits: &Limits,
    integrator: Integrator,
    state: SimState,
    action: Action,
    dt: f64,
    noise: Option<&mut ProcessNoise>,
) -> Result<SimState, SimError> {
    if !(dt > 0.0) || !dt.is_finite() {
        return Err(SimError::InvalidTimeStep(dt));
    }
    limits.validate()?;

    let mut command = action.resolve(kinematics);
    if let Some(noise) = noise {
        command = noise.perturb(command);
    }

    let applied = limits.apply(command, state.last_command, dt);
    if applied != command {
        tracing::trace!(%command, %applied, "command limited");
    }

    Ok(SimState {
        pose: integrator.advance(state.pose, applied, dt),
        last_command: Some(applied),
    })
}
