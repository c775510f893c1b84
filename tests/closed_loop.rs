use approx::assert_relative_eq;
use diffdrive::config::{PathKind, SimConfig};
use diffdrive::driver;
use diffdrive_kinematics::Pose;
use diffdrive_sim::NoiseConfig;
use std::f64::consts::PI;

fn headless(kind: PathKind, duration: f64) -> SimConfig {
    let mut config = SimConfig::default();
    config.path.kind = kind;
    config.run.duration = duration;
    config.output.show = false;
    config
}

#[test]
fn history_has_one_pose_per_step_plus_initial() {
    let config = headless(PathKind::Circle, 2.0);
    let output = driver::run(&config).unwrap();
    assert_eq!(output.steps, 100);
    assert_eq!(output.history.len(), 101);
    assert_eq!(output.history[0], config.start_pose());
    assert_eq!(*output.history.last().unwrap(), output.final_pose);
    for pose in &output.history {
        assert!(pose.theta >= -PI && pose.theta < PI);
    }
}

#[test]
fn converges_onto_line_from_offset_start() {
    let mut config = headless(PathKind::Line, 8.0);
    config.robot.start_pose = Some(Pose::new(-3.0, 0.5, 0.0));
    let output = driver::run(&config).unwrap();

    assert!(output.final_pose.y.abs() < 0.05, "final {}", output.final_pose);
    assert!(output.final_pose.x > 0.0 && output.final_pose.x < 3.0);
    let peak = output.history.iter().map(|p| p.y.abs()).fold(0.0, f64::max);
    assert!(peak <= 0.5 + 1e-9, "peak lateral error {}", peak);
}

#[test]
fn tracks_circle_after_turn_in() {
    // The robot starts on the circle facing its centre, so the first seconds
    // are a turn-in transient. 10 s at 0.7 m/s stays short of the path end.
    let config = headless(PathKind::Circle, 10.0);
    let output = driver::run(&config).unwrap();
    let settled = output.max_tracking_error(150);
    assert!(settled < 0.1, "tracking error after 3 s: {}", settled);
    assert!(output.max_tracking_error(0) < 0.5);
}

#[test]
fn euler_and_rk4_agree_closely_at_small_dt() {
    let mut rk4 = headless(PathKind::Figure8, 5.0);
    rk4.run.dt = 0.005;
    // On the first waypoint, tangent to the curve.
    rk4.robot.start_pose = Some(Pose::new(0.0, 0.0, 1.2_f64.atan2(2.0)));
    let mut euler = rk4.clone();
    euler.run.integrator = "euler".into();

    let a = driver::run(&rk4).unwrap().final_pose;
    let b = driver::run(&euler).unwrap().final_pose;
    assert!(a.distance_to(&b) < 0.05, "rk4 {} vs euler {}", a, b);
}

#[test]
fn seeded_noise_runs_are_reproducible() {
    let mut config = headless(PathKind::Circle, 3.0);
    config.noise = NoiseConfig::seeded(0.05, 0.1, 2024);
    let a = driver::run(&config).unwrap();
    let b = driver::run(&config).unwrap();
    assert_eq!(a.history, b.history);

    let clean = driver::run(&headless(PathKind::Circle, 3.0)).unwrap();
    assert_ne!(a.final_pose, clean.final_pose);
}

#[test]
fn straight_start_on_line_moves_at_nominal_speed() {
    let output = driver::run(&headless(PathKind::Line, 1.0)).unwrap();
    assert_relative_eq!(output.final_pose.x, -3.0 + 0.7, epsilon = 1e-9);
    assert_eq!(output.final_pose.y, 0.0);
}

#[test]
fn angular_acceleration_limit_bounds_turn_rate_changes() {
    let mut config = headless(PathKind::Line, 4.0);
    config.robot.start_pose = Some(Pose::new(-3.0, 0.5, 0.0));
    config.robot.max_accel_omega = Some(1.0);
    let limited = driver::run(&config).unwrap();

    config.robot.max_accel_omega = None;
    let free = driver::run(&config).unwrap();
    assert_ne!(limited.final_pose, free.final_pose);

    // With v, omega held over a step, dtheta = omega * dt, so successive
    // heading increments differ by at most max_accel_omega * dt^2.
    let dt = config.run.dt;
    let increments: Vec<f64> = limited
        .history
        .windows(2)
        .map(|w| Pose::normalize_angle(w[1].theta - w[0].theta))
        .collect();
    for pair in increments.windows(2) {
        assert!((pair[1] - pair[0]).abs() <= 1.0 * dt * dt + 1e-12);
    }
}

#[test]
fn history_can_be_disabled() {
    let mut config = headless(PathKind::Circle, 1.0);
    config.run.record_history = false;
    let output = driver::run(&config).unwrap();
    assert!(output.history.is_empty());
    assert_eq!(output.steps, 50);
}
