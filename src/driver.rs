use anyhow::{Context, bail};
use diffdrive_kinematics::{DifferentialDrive, Pose};
use diffdrive_navigation::{NavigationError, Path, Point2, PurePursuit, path};
use diffdrive_sim::{Action, Limits, Simulator};
use tracing::{debug, info};

use crate::config::{PathConfig, PathKind, SimConfig};

/// Result of a closed-loop run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub path: Path,
    /// Initial pose plus one pose per step. Empty if history recording was off.
    pub history: Vec<Pose>,
    pub final_pose: Pose,
    pub steps: u64,
}

impl RunOutput {
    /// Largest distance from a recorded pose to its nearest waypoint,
    /// skipping the first `skip` poses.
    pub fn max_tracking_error(&self, skip: usize) -> f64 {
        self.history
            .iter()
            .skip(skip)
            .map(|pose| distance_to_path(&self.path, pose))
            .fold(0.0, f64::max)
    }
}

fn distance_to_path(path: &Path, pose: &Pose) -> f64 {
    path.iter()
        .map(|p| p.distance_to_pose(pose))
        .fold(f64::INFINITY, f64::min)
}

pub fn build_path(config: &PathConfig) -> Result<Path, NavigationError> {
    match config.kind {
        PathKind::Circle => path::circle(config.radius, config.circle_points, Point2::default()),
        PathKind::Line => path::line(config.start.into(), config.end.into(), config.line_points),
        PathKind::Figure8 => {
            path::figure_eight(config.figure8_a, config.figure8_b, config.figure8_points)
        }
    }
}

pub fn build_simulator(config: &SimConfig) -> anyhow::Result<Simulator> {
    let robot = &config.robot;
    let kinematics = DifferentialDrive::new(robot.wheel_radius, robot.wheel_base)
        .context("invalid robot geometry")?;
    let limits = Limits {
        max_v: robot.max_v,
        max_omega: robot.max_omega,
        max_accel_v: robot.max_accel_v,
        max_accel_omega: robot.max_accel_omega,
    };

    let simulator = Simulator::builder(kinematics)
        .pose(config.start_pose())
        .limits(limits)
        .integrator_name(&config.run.integrator)?
        .process_noise(config.noise)
        .record_history(config.run.record_history)
        .build()
        .context("invalid simulator configuration")?;
    Ok(simulator)
}

pub fn build_controller(config: &SimConfig) -> PurePursuit {
    let c = &config.controller;
    PurePursuit::new(c.lookahead, c.nominal_speed, c.min_lookahead)
}

/// Number of whole steps of `dt` that fit in `duration`.
pub fn step_count(duration: f64, dt: f64) -> anyhow::Result<u64> {
    if !(dt > 0.0) || !dt.is_finite() {
        bail!("time step must be positive and finite, got {}", dt);
    }
    if !(duration >= 0.0) || !duration.is_finite() {
        bail!("duration must be non-negative and finite, got {}", duration);
    }
    Ok((duration / dt) as u64)
}

/// Run the controller and simulator in lockstep for `duration / dt` steps.
pub fn run(config: &SimConfig) -> anyhow::Result<RunOutput> {
    let steps = step_count(config.run.duration, config.run.dt)?;
    let path = build_path(&config.path).context("failed to generate reference path")?;
    let mut simulator = build_simulator(config)?;
    let controller = build_controller(config);

    info!(
        path = ?config.path.kind,
        waypoints = path.len(),
        steps,
        dt = config.run.dt,
        integrator = %simulator.integrator(),
        start = %simulator.pose(),
        "Starting simulation"
    );

    let dt = config.run.dt;
    let log_every = (steps / 10).max(1);
    for i in 0..steps {
        let command = controller.compute(&simulator.pose(), &path);
        let pose = simulator
            .step(Action::Body(command), dt)
            .with_context(|| format!("simulation step {} failed", i + 1))?;
        if (i + 1) % log_every == 0 {
            debug!(step = i + 1, %command, %pose, "Progress");
        }
    }

    let final_pose = simulator.pose();
    info!(%final_pose, steps = simulator.steps(), "Simulation complete");

    Ok(RunOutput {
        path,
        history: simulator.history().to_vec(),
        final_pose,
        steps: simulator.steps(),
    })
}
