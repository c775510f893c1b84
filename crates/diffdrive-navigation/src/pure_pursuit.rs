//! Pure pursuit path tracking.
//!
//! Each call picks a lookahead target on the path ahead of the nearest
//! waypoint, fits an arc from the robot through that target and commands the
//! nominal speed along the arc:
//!
//! 1. Find the waypoint nearest to the robot
//! 2. Walk forward until a waypoint is at least `Ld` away (or the path ends)
//! 3. Express the target in the robot frame
//! 4. Curvature `κ = 2·y / Ld²`, `ω = v·κ`
//!
//! The search never looks behind the nearest waypoint and never wraps past
//! the end, so paths must be laid out in the direction of travel.

use diffdrive_kinematics::{ChassisSpeeds, Pose};
use tracing::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::path::{Path, Point2};

/// Lookahead distances below this produce a stop command.
pub const MIN_EFFECTIVE_LOOKAHEAD: f64 = 1e-6;

/// Stateless pure pursuit controller.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PurePursuit {
    /// Lookahead distance (m).
    pub lookahead: f64,
    /// Forward speed commanded on every call (m/s).
    pub nominal_speed: f64,
    /// Floor applied to `lookahead` (m).
    pub min_lookahead: f64,
}

impl Default for PurePursuit {
    fn default() -> Self {
        PurePursuit {
            lookahead: 0.5,
            nominal_speed: 0.5,
            min_lookahead: 0.2,
        }
    }
}

impl PurePursuit {
    /// Create a controller.
    pub const fn new(lookahead: f64, nominal_speed: f64, min_lookahead: f64) -> Self {
        PurePursuit {
            lookahead,
            nominal_speed,
            min_lookahead,
        }
    }

    /// Lookahead distance actually used, `max(min_lookahead, lookahead)`.
    pub fn effective_lookahead(&self) -> f64 {
        self.min_lookahead.max(self.lookahead)
    }

    /// Index of the lookahead target, or `None` for paths with fewer than two
    /// waypoints.
    pub fn target_index(&self, pose: &Pose, path: &Path) -> Option<usize> {
        if path.len() < 2 {
            return None;
        }
        let points = path.points();

        // First occurrence wins ties.
        let mut i_min = 0;
        let mut d_min = f64::INFINITY;
        for (i, p) in points.iter().enumerate() {
            let d = p.distance_to_pose(pose);
            if d < d_min {
                d_min = d;
                i_min = i;
            }
        }

        let ld = self.effective_lookahead();
        let mut i = i_min;
        while i < points.len() - 1 && points[i].distance_to_pose(pose) < ld {
            i += 1;
        }
        Some(i)
    }

    /// Velocity command to track `path` from `pose`.
    ///
    /// Returns a stop command for paths with fewer than two waypoints or a
    /// negligible lookahead distance.
    pub fn compute(&self, pose: &Pose, path: &Path) -> ChassisSpeeds {
        let Some(index) = self.target_index(pose, path) else {
            return ChassisSpeeds::stop();
        };
        let target = path[index];

        let ld = self.effective_lookahead();
        if ld < MIN_EFFECTIVE_LOOKAHEAD {
            return ChassisSpeeds::stop();
        }

        let Point2 { y: y_t, .. } = to_body_frame(pose, target);
        let kappa = 2.0 * y_t / (ld * ld);
        let v = self.nominal_speed;
        let omega = v * kappa;

        trace!(index, target_x = target.x, target_y = target.y, kappa, "pure pursuit target");
        ChassisSpeeds::new(v, omega)
    }
}

/// Rotate the world-frame offset from `pose` to `point` by `-θ`.
fn to_body_frame(pose: &Pose, point: Point2) -> Point2 {
    let dx = point.x - pose.x;
    let dy = point.y - pose.y;
    let (s, c) = (-pose.theta).sin_cos();
    Point2::new(c * dx - s * dy, s * dx + c * dy)
}
