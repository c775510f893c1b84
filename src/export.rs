use std::fs;
use std::path::{Path as FsPath, PathBuf};

use anyhow::Context;
use diffdrive_kinematics::Pose;
use diffdrive_navigation::Path;
use serde::Serialize;
use tracing::info;

pub const PATH_FILE: &str = "path.csv";
pub const TRAJECTORY_FILE: &str = "trajectory.csv";

#[derive(Serialize)]
struct WaypointRecord {
    x: f64,
    y: f64,
}

#[derive(Serialize)]
struct PoseRecord {
    step: usize,
    x: f64,
    y: f64,
    theta: f64,
}

fn write_records<T: Serialize>(
    file: &FsPath,
    records: impl IntoIterator<Item = T>,
) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(file)
        .with_context(|| format!("failed to create {}", file.display()))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write waypoints as `x,y` rows.
pub fn write_path_csv(file: &FsPath, path: &Path) -> anyhow::Result<()> {
    write_records(file, path.iter().map(|p| WaypointRecord { x: p.x, y: p.y }))
}

/// Write poses as `step,x,y,theta` rows, step 0 being the initial pose.
pub fn write_history_csv(file: &FsPath, history: &[Pose]) -> anyhow::Result<()> {
    write_records(
        file,
        history.iter().enumerate().map(|(step, p)| PoseRecord {
            step,
            x: p.x,
            y: p.y,
            theta: p.theta,
        }),
    )
}

/// Write both files into `dir`, creating it if needed. Returns the two paths.
pub fn export_run(dir: &FsPath, path: &Path, history: &[Pose]) -> anyhow::Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let path_file = dir.join(PATH_FILE);
    let trajectory_file = dir.join(TRAJECTORY_FILE);
    write_path_csv(&path_file, path)?;
    write_history_csv(&trajectory_file, history)?;
    info!(
        path = %path_file.display(),
        trajectory = %trajectory_file.display(),
        "Exported run"
    );
    Ok((path_file, trajectory_file))
}
