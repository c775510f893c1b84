#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` library for 2D differential-drive robot kinematics."]
#![doc = ""]
#![doc = "This crate provides pose and velocity types, conversions between wheel and"]
#![doc = "chassis speeds, and fixed-step Euler and Runge-Kutta pose integration."]

use core::f64::consts::{PI, TAU};
use core::fmt;
use libm::fmod;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod error;
pub mod integrate;

pub use error::KinematicsError;
pub use integrate::Integrator;

/// A 2‑D pose `(x, y, θ)` in meters and radians (θ measured counter‑clockwise
/// from the x‑axis in the world frame).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// World‑frame x position (m).
    pub x: f64,
    /// World‑frame y position (m).
    pub y: f64,
    /// Heading (rad), normalized to `[-PI, PI)`.
    pub theta: f64,
}

impl Pose {
    /// Construct a new pose.
    ///
    /// # Arguments
    ///
    /// * `x`: World-frame x position in meters.
    /// * `y`: World-frame y position in meters.
    /// * `theta`: Heading in radians.
    pub const fn new(x: f64, y: f64, theta: f64) -> Self {
        Pose { x, y, theta }
    }

    /// Normalize an angle to be within `[-PI, PI)`.
    ///
    /// Computes `((angle + PI) mod 2PI) - PI` with a floored modulo, so
    /// negative inputs wrap the same way as positive ones. Angles at `PI`
    /// will be normalized to `-PI`.
    ///
    /// # Arguments
    ///
    /// * `angle`: The angle in radians to normalize.
    ///
    /// # Returns
    ///
    /// The normalized angle in radians.
    pub fn normalize_angle(angle: f64) -> f64 {
        let mut a = fmod(angle + PI, TAU);
        if a < 0.0 {
            a += TAU;
        }
        // A tiny negative remainder plus TAU can round up to TAU itself.
        if a >= TAU {
            a -= TAU;
        }
        a - PI
    }

    /// Euclidean distance between the positions of two poses.
    pub fn distance_to(&self, other: &Pose) -> f64 {
        libm::hypot(other.x - self.x, other.y - self.y)
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x: {:.2}, y: {:.2}, θ: {:.2} rad)", self.x, self.y, self.theta)
    }
}

/// Left and right wheel rim speeds.
///
/// These are linear speeds at the contact patch, not wheel angular rates. Use
/// [`DifferentialDrive::wheel_speeds_from_angular`] to convert from rad/s.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelSpeeds {
    /// Left wheel linear speed (m/s).
    pub v_l: f64,
    /// Right wheel linear speed (m/s).
    pub v_r: f64,
}

impl WheelSpeeds {
    /// Construct wheel speeds.
    ///
    /// # Arguments
    ///
    /// * `v_l`: Left wheel linear speed (m/s).
    /// * `v_r`: Right wheel linear speed (m/s).
    pub const fn new(v_l: f64, v_r: f64) -> Self {
        WheelSpeeds { v_l, v_r }
    }
}

impl fmt::Display for WheelSpeeds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(vL: {:.2} m/s, vR: {:.2} m/s)", self.v_l, self.v_r)
    }
}

/// Linear and angular chassis velocities in the robot body frame.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChassisSpeeds {
    /// Linear speed of the chassis center (m/s).
    pub v: f64,
    /// Angular speed of the chassis (rad/s).
    pub omega: f64,
}

impl ChassisSpeeds {
    /// Construct chassis speeds.
    ///
    /// # Arguments
    ///
    /// * `v`: Linear speed of the chassis center (m/s).
    /// * `omega`: Angular speed of the chassis (rad/s).
    pub const fn new(v: f64, omega: f64) -> Self {
        ChassisSpeeds { v, omega }
    }

    /// Zero command.
    pub const fn stop() -> Self {
        ChassisSpeeds { v: 0.0, omega: 0.0 }
    }
}

impl fmt::Display for ChassisSpeeds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(v: {:.2} m/s, ω: {:.2} rad/s)", self.v, self.omega)
    }
}

/// Differential‑drive kinematics helper.
///
/// This struct encapsulates the physical parameters of a differential-drive robot
/// (wheel radius and wheel base) and provides methods for kinematic calculations.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifferentialDrive {
    /// Wheel radius (m).
    wheel_radius: f64,
    /// Distance between the two drive wheels (m).
    wheel_base: f64,
}

impl DifferentialDrive {
    /// Construct a new differential‑drive kinematics helper.
    ///
    /// # Arguments
    ///
    /// * `wheel_radius`: The radius of the robot's wheels in meters.
    /// * `wheel_base`: The distance between the centers of the two drive wheels in meters.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidConfiguration)` if either value is
    /// not strictly positive (NaN included).
    pub fn new(wheel_radius: f64, wheel_base: f64) -> Result<Self, KinematicsError> {
        if !(wheel_radius > 0.0) {
            return Err(KinematicsError::InvalidConfiguration(
                "wheel radius must be positive",
            ));
        }
        if !(wheel_base > 0.0) {
            return Err(KinematicsError::InvalidConfiguration(
                "wheel base must be positive",
            ));
        }
        Ok(DifferentialDrive {
            wheel_radius,
            wheel_base,
        })
    }

    /// Returns the wheel radius.
    pub fn wheel_radius(&self) -> f64 {
        self.wheel_radius
    }

    /// Returns the wheel base.
    pub fn wheel_base(&self) -> f64 {
        self.wheel_base
    }

    /// Calculates the robot's chassis speeds (linear and angular velocity)
    /// from the wheel rim speeds. This is the forward kinematics problem.
    pub fn body_from_wheels(&self, wheel_speeds: WheelSpeeds) -> ChassisSpeeds {
        let v = (wheel_speeds.v_l + wheel_speeds.v_r) / 2.0;
        let omega = (wheel_speeds.v_r - wheel_speeds.v_l) / self.wheel_base;

        ChassisSpeeds::new(v, omega)
    }

    /// Calculates the wheel rim speeds required to achieve the given chassis
    /// speeds. This is the inverse kinematics problem, and the exact inverse
    /// of [`DifferentialDrive::body_from_wheels`].
    pub fn wheels_from_body(&self, chassis_speeds: ChassisSpeeds) -> WheelSpeeds {
        let half_base = self.wheel_base / 2.0;
        let v_r = chassis_speeds.v + chassis_speeds.omega * half_base;
        let v_l = chassis_speeds.v - chassis_speeds.omega * half_base;

        WheelSpeeds::new(v_l, v_r)
    }

    /// Converts wheel angular rates (rad/s) into rim speeds (m/s).
    pub fn wheel_speeds_from_angular(&self, omega_l: f64, omega_r: f64) -> WheelSpeeds {
        WheelSpeeds::new(omega_l * self.wheel_radius, omega_r * self.wheel_radius)
    }

    /// Converts rim speeds (m/s) into wheel angular rates `(ωL, ωR)` in rad/s.
    pub fn angular_from_wheel_speeds(&self, wheel_speeds: WheelSpeeds) -> (f64, f64) {
        (
            wheel_speeds.v_l / self.wheel_radius,
            wheel_speeds.v_r / self.wheel_radius,
        )
    }

    /// Integrates the chassis speeds over `dt` seconds to produce a new pose.
    ///
    /// The speeds are held constant over the interval and the final heading is
    /// normalized to `[-PI, PI)`.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidTimeStep)` if `dt` is not a
    /// positive finite number.
    pub fn update_pose(
        &self,
        current_pose: Pose,
        chassis_speeds: ChassisSpeeds,
        dt: f64,
        integrator: Integrator,
    ) -> Result<Pose, KinematicsError> {
        if !(dt > 0.0) || !dt.is_finite() {
            return Err(KinematicsError::InvalidTimeStep(
                "must be positive and finite",
            ));
        }

        Ok(integrator.advance(current_pose, chassis_speeds, dt))
    }

    /// Convenience function to update pose directly from wheel speeds and dt.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidTimeStep)` if `dt` is not a
    /// positive finite number (propagated from `update_pose`).
    pub fn update_pose_from_wheel_speeds(
        &self,
        current_pose: Pose,
        wheel_speeds: WheelSpeeds,
        dt: f64,
        integrator: Integrator,
    ) -> Result<Pose, KinematicsError> {
        let chassis_speeds = self.body_from_wheels(wheel_speeds);
        self.update_pose(current_pose, chassis_speeds, dt, integrator)
    }
}

impl fmt::Display for DifferentialDrive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DifferentialDrive (r: {:.2} m, L: {:.2} m)",
            self.wheel_radius, self.wheel_base
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_pose_normalization() {
        assert!((Pose::normalize_angle(0.0) - 0.0).abs() < EPSILON);
        assert_eq!(Pose::normalize_angle(PI), -PI); // PI maps to -PI for [-PI, PI)
        assert_eq!(Pose::normalize_angle(-PI), -PI);
        assert!((Pose::normalize_angle(PI - 1e-3) - (PI - 1e-3)).abs() < EPSILON);
        assert!((Pose::normalize_angle(2.5 * PI) - 0.5 * PI).abs() < EPSILON);
        assert!((Pose::normalize_angle(-2.5 * PI) - -0.5 * PI).abs() < EPSILON);
        assert!((Pose::normalize_angle(-0.75 * PI) - -0.75 * PI).abs() < EPSILON);
    }

    #[test]
    fn test_normalization_stays_in_range() {
        let mut angle = -50.0;
        while angle < 50.0 {
            let a = Pose::normalize_angle(angle);
            assert!((-PI..PI).contains(&a), "{} -> {}", angle, a);
            angle += 0.137;
        }
        // Remainder just below zero must not escape to +PI.
        let a = Pose::normalize_angle(-PI - 1e-17);
        assert!((-PI..PI).contains(&a));
    }

    #[test]
    fn test_normalization_ignores_full_turns() {
        for base in [-3.0, -1.0, 0.0, 0.5, 2.0, 3.1] {
            let expected = Pose::normalize_angle(base);
            for turns in 1..5 {
                let shifted = Pose::normalize_angle(base + turns as f64 * TAU);
                assert!((shifted - expected).abs() < EPSILON, "{} + {} turns", base, turns);
            }
        }
    }

    #[test]
    fn test_kinematics_constructor() {
        let kinematics = DifferentialDrive::new(0.05, 0.3).unwrap();
        assert_eq!(kinematics.wheel_radius(), 0.05);
        assert_eq!(kinematics.wheel_base(), 0.3);
    }

    #[test]
    fn test_constructor_invalid_radius() {
        for radius in [0.0, -0.1, f64::NAN] {
            let result = DifferentialDrive::new(radius, 0.3);
            assert!(matches!(result, Err(KinematicsError::InvalidConfiguration(_))));
        }
    }

    #[test]
    fn test_constructor_invalid_wheel_base() {
        for base in [0.0, -0.3, f64::NAN] {
            let result = DifferentialDrive::new(0.05, base);
            assert!(matches!(
                result,
                Err(KinematicsError::InvalidConfiguration("wheel base must be positive"))
            ));
        }
    }

    #[test]
    fn test_equal_wheel_speeds_drive_straight() {
        for base in [0.1, 0.3, 2.0] {
            let kinematics = DifferentialDrive::new(0.05, base).unwrap();
            let chassis = kinematics.body_from_wheels(WheelSpeeds::new(1.0, 1.0));
            assert!(chassis.omega.abs() < 1e-12);
            assert!((chassis.v - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_body_from_wheels_pivot_turn() {
        let kinematics = DifferentialDrive::new(0.05, 0.5).unwrap();
        // v = 0, omega = (0.5 - (-0.5)) / 0.5 = 2 rad/s
        let chassis = kinematics.body_from_wheels(WheelSpeeds::new(-0.5, 0.5));
        assert!(chassis.v.abs() < EPSILON);
        assert!((chassis.omega - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_wheels_from_body_gentle_turn() {
        let kinematics = DifferentialDrive::new(0.05, 0.5).unwrap();
        // v_r = 0.75 + 1.0 * 0.25 = 1.0, v_l = 0.75 - 0.25 = 0.5
        let wheels = kinematics.wheels_from_body(ChassisSpeeds::new(0.75, 1.0));
        assert!((wheels.v_l - 0.5).abs() < EPSILON);
        assert!((wheels.v_r - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_body_wheels_round_trip() {
        let kinematics = DifferentialDrive::new(0.05, 0.3).unwrap();
        for &(v, omega) in &[(0.8, 1.2), (-1.5, 0.0), (0.0, -3.0), (12.0, 7.5)] {
            let wheels = kinematics.wheels_from_body(ChassisSpeeds::new(v, omega));
            let back = kinematics.body_from_wheels(wheels);
            assert!((back.v - v).abs() < EPSILON);
            assert!((back.omega - omega).abs() < EPSILON);
        }
    }

    #[test]
    fn test_angular_wheel_rates_use_radius() {
        let kinematics = DifferentialDrive::new(0.1, 0.5).unwrap();
        let wheels = kinematics.wheel_speeds_from_angular(10.0, 5.0);
        assert!((wheels.v_l - 1.0).abs() < EPSILON);
        assert!((wheels.v_r - 0.5).abs() < EPSILON);
        let (omega_l, omega_r) = kinematics.angular_from_wheel_speeds(wheels);
        assert!((omega_l - 10.0).abs() < EPSILON);
        assert!((omega_r - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_update_pose_rejects_bad_dt() {
        let kinematics = DifferentialDrive::new(0.05, 0.3).unwrap();
        let speeds = ChassisSpeeds::new(1.0, 0.0);
        for dt in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let result = kinematics.update_pose(Pose::default(), speeds, dt, Integrator::Rk4);
            assert!(matches!(result, Err(KinematicsError::InvalidTimeStep(_))));
        }
    }

    #[test]
    fn test_update_pose_straight_negative_x_axis() {
        let kinematics = DifferentialDrive::new(0.05, 0.3).unwrap();
        let pose = Pose::new(0.0, 0.0, -PI); // Facing along -X-axis
        let new_pose = kinematics
            .update_pose(pose, ChassisSpeeds::new(1.0, 0.0), 1.0, Integrator::Euler)
            .unwrap();
        assert!((new_pose.x - (-1.0)).abs() < EPSILON);
        assert!(new_pose.y.abs() < EPSILON);
        assert_eq!(new_pose.theta, -PI);
    }

    #[test]
    fn test_update_pose_from_wheel_speeds_pivot_turn() {
        let kinematics = DifferentialDrive::new(0.1, 0.5).unwrap();
        // omega = (0.1PI - (-0.1PI)) / 0.5 = 0.4PI rad/s
        let wheels = kinematics.wheel_speeds_from_angular(-PI, PI);
        let new_pose = kinematics
            .update_pose_from_wheel_speeds(Pose::default(), wheels, 1.0, Integrator::Rk4)
            .unwrap();
        assert!(new_pose.x.abs() < EPSILON);
        assert!(new_pose.y.abs() < EPSILON);
        assert!((new_pose.theta - 0.4 * PI).abs() < EPSILON);
    }
}
