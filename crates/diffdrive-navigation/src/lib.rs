#![warn(missing_docs)]
//! Reference paths and path tracking for differential-drive robots.
//!
//! [`path`] holds the waypoint types and the circle, line and figure-eight
//! generators; [`pure_pursuit`] turns a pose and a path into a chassis speed
//! command.

pub mod error;
pub mod path;
pub mod pure_pursuit;

pub use error::NavigationError;
pub use path::{Path, Point2};
pub use pure_pursuit::PurePursuit;
