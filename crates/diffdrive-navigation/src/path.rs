//! Reference paths and parametric path generators.

use std::f64::consts::TAU;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use diffdrive_kinematics::Pose;

use crate::error::NavigationError;

/// Represents a point in world coordinates (meters).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct Point2 {
    /// The x-coordinate in meters.
    pub x: f64,
    /// The y-coordinate in meters.
    pub y: f64,
}

impl Point2 {
    /// Creates a new `Point2`.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance from this point to the position of `pose`.
    pub fn distance_to_pose(&self, pose: &Pose) -> f64 {
        (self.x - pose.x).hypot(self.y - pose.y)
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Point2::new(x, y)
    }
}

/// An ordered sequence of waypoints, traversed in increasing index order.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Path {
    points: Vec<Point2>,
}

impl Path {
    /// Creates a path from waypoints.
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// The waypoints, in traversal order.
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Number of waypoints.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the path has no waypoints.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over the waypoints.
    pub fn iter(&self) -> std::slice::Iter<'_, Point2> {
        self.points.iter()
    }

    /// Summed length of the segments between consecutive waypoints.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (w[1].x - w[0].x).hypot(w[1].y - w[0].y))
            .sum()
    }
}

impl FromIterator<Point2> for Path {
    fn from_iter<I: IntoIterator<Item = Point2>>(iter: I) -> Self {
        Path::new(iter.into_iter().collect())
    }
}

impl Index<usize> for Path {
    type Output = Point2;

    fn index(&self, index: usize) -> &Point2 {
        &self.points[index]
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Point2;
    type IntoIter = std::slice::Iter<'a, Point2>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

fn finite(value: f64, msg: &'static str) -> Result<(), NavigationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(NavigationError::InvalidParameter(msg))
    }
}

/// `num_points` points on a circle, counter-clockwise from angle 0.
/// The last point stops one spacing short of the first.
///
/// # Errors
///
/// `InvalidPointCount` when `num_points` is zero, `InvalidParameter` for a
/// non-finite radius or center.
pub fn circle(radius: f64, num_points: usize, center: Point2) -> Result<Path, NavigationError> {
    if num_points == 0 {
        return Err(NavigationError::InvalidPointCount("circle needs at least 1 point"));
    }
    finite(radius, "circle radius must be finite")?;
    finite(center.x, "circle center must be finite")?;
    finite(center.y, "circle center must be finite")?;

    Ok((0..num_points)
        .map(|i| {
            let th = TAU * i as f64 / num_points as f64;
            Point2::new(center.x + radius * th.cos(), center.y + radius * th.sin())
        })
        .collect())
}

/// `num_points` evenly spaced points from `start` to `end`, both included.
///
/// # Errors
///
/// `InvalidPointCount` when `num_points < 2`, `InvalidParameter` for
/// non-finite endpoints.
pub fn line(start: Point2, end: Point2, num_points: usize) -> Result<Path, NavigationError> {
    if num_points < 2 {
        return Err(NavigationError::InvalidPointCount("line needs at least 2 points"));
    }
    for value in [start.x, start.y, end.x, end.y] {
        finite(value, "line endpoints must be finite")?;
    }

    let last = (num_points - 1) as f64;
    Ok((0..num_points)
        .map(|i| {
            let t = i as f64 / last;
            Point2::new(
                start.x + t * (end.x - start.x),
                start.y + t * (end.y - start.y),
            )
        })
        .collect())
}

/// Lemniscate of Gerono, `x = a·sin t`, `y = b·sin t·cos t`, sampled at
/// `num_points` values of `t` in `[0, 2PI)`.
///
/// # Errors
///
/// `InvalidPointCount` when `num_points` is zero, `InvalidParameter` for
/// non-finite `a` or `b`.
pub fn figure_eight(a: f64, b: f64, num_points: usize) -> Result<Path, NavigationError> {
    if num_points == 0 {
        return Err(NavigationError::InvalidPointCount("figure eight needs at least 1 point"));
    }
    finite(a, "figure eight extents must be finite")?;
    finite(b, "figure eight extents must be finite")?;

    Ok((0..num_points)
        .map(|i| {
            let t = TAU * i as f64 / num_points as f64;
            Point2::new(a * t.sin(), b * t.sin() * t.cos())
        })
        .collect())
}
