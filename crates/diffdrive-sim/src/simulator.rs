//! Stateful simulator owning the pose, the last applied command and the
//! pose history.

use diffdrive_kinematics::{ChassisSpeeds, DifferentialDrive, Integrator, Pose};
use tracing::{debug, trace};

use crate::{Action, Limits, NoiseConfig, ProcessNoise, SimError, SimState};

/// Builder for [`Simulator`]. Every configuration error is reported by the
/// builder, never by [`Simulator::step`].
#[derive(Debug, Clone)]
pub struct SimulatorBuilder {
    kinematics: DifferentialDrive,
    pose: Pose,
    limits: Limits,
    integrator: Integrator,
    noise: NoiseConfig,
    record_history: bool,
}

impl SimulatorBuilder {
    /// Initial pose. The heading is normalized on build.
    pub fn pose(mut self, pose: Pose) -> Self {
        self.pose = pose;
        self
    }

    /// Actuator limits.
    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Integration method.
    pub fn integrator(mut self, integrator: Integrator) -> Self {
        self.integrator = integrator;
        self
    }

    /// Integration method by name (`"euler"` or `"rk4"`).
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidIntegrator` for any other name.
    pub fn integrator_name(self, name: &str) -> Result<Self, SimError> {
        let integrator = name
            .parse()
            .map_err(|_| SimError::InvalidIntegrator(name.to_string()))?;
        Ok(self.integrator(integrator))
    }

    /// Process noise. Disabled unless a standard deviation is positive.
    pub fn process_noise(mut self, noise: NoiseConfig) -> Self {
        self.noise = noise;
        self
    }

    /// Whether to keep a pose per step. Enabled by default.
    pub fn record_history(mut self, record: bool) -> Self {
        self.record_history = record;
        self
    }

    /// Validate the configuration and create the simulator.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidConfiguration` for negative or NaN limits
    /// or noise standard deviations.
    pub fn build(self) -> Result<Simulator, SimError> {
        self.limits.validate()?;
        self.noise.validate()?;
        let noise = if self.noise.is_active() {
            Some(ProcessNoise::new(self.noise)?)
        } else {
            None
        };

        let pose = Pose {
            theta: Pose::normalize_angle(self.pose.theta),
            ..self.pose
        };
        let history = if self.record_history { vec![pose] } else { Vec::new() };

        debug!(
            kinematics = %self.kinematics,
            integrator = %self.integrator,
            limits = ?self.limits,
            noise = noise.is_some(),
            initial_pose = %pose,
            "Simulator created"
        );

        Ok(Simulator {
            kinematics: self.kinematics,
            limits: self.limits,
            integrator: self.integrator,
            state: SimState::new(pose),
            noise,
            record_history: self.record_history,
            history,
            steps: 0,
        })
    }
}

/// Differential-drive simulator.
///
/// Holds the current [`SimState`] and, when recording, one pose per completed
/// step plus the initial pose.
#[derive(Debug, Clone)]
pub struct Simulator {
    kinematics: DifferentialDrive,
    limits: Limits,
    integrator: Integrator,
    state: SimState,
    noise: Option<ProcessNoise>,
    record_history: bool,
    history: Vec<Pose>,
    steps: u64,
}

impl Simulator {
    /// Start a builder with default limits, RK4 integration, no noise and
    /// history recording enabled.
    pub fn builder(kinematics: DifferentialDrive) -> SimulatorBuilder {
        SimulatorBuilder {
            kinematics,
            pose: Pose::default(),
            limits: Limits::default(),
            integrator: Integrator::default(),
            noise: NoiseConfig::default(),
            record_history: true,
        }
    }

    /// Apply `action` for `dt` seconds and return the new pose.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidTimeStep` if `dt` is not positive and
    /// finite. The state is left untouched in that case.
    pub fn step(&mut self, action: impl Into<Action>, dt: f64) -> Result<Pose, SimError> {
        self.state = crate::step(
            &self.kinematics,
            &self.limits,
            self.integrator,
            self.state,
            action.into(),
            dt,
            self.noise.as_mut(),
        )?;
        self.steps += 1;

        let pose = self.state.pose;
        if self.record_history {
            self.history.push(pose);
        }
        trace!(step = self.steps, x = pose.x, y = pose.y, theta = pose.theta, "Simulator stepped");
        Ok(pose)
    }

    /// Move the robot to `pose`, forgetting the command and pose history.
    /// The step counter restarts at zero.
    pub fn reset(&mut self, pose: Pose) {
        let pose = Pose {
            theta: Pose::normalize_angle(pose.theta),
            ..pose
        };
        self.state = SimState::new(pose);
        self.steps = 0;
        self.history.clear();
        if self.record_history {
            self.history.push(pose);
        }
    }

    /// Current pose.
    pub fn pose(&self) -> Pose {
        self.state.pose
    }

    /// Current state, including the last applied command.
    pub fn state(&self) -> SimState {
        self.state
    }

    /// Command applied on the most recent step, after limits.
    pub fn last_command(&self) -> Option<ChassisSpeeds> {
        self.state.last_command
    }

    /// Recorded poses, oldest first. Empty when recording is disabled.
    pub fn history(&self) -> &[Pose] {
        &self.history
    }

    /// Number of completed steps.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Actuator limits.
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Integration method.
    pub fn integrator(&self) -> Integrator {
        self.integrator
    }

    /// Robot geometry.
    pub fn kinematics(&self) -> &DifferentialDrive {
        &self.kinematics
    }
}
