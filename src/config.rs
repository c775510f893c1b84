use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use diffdrive_kinematics::Pose;
use diffdrive_sim::NoiseConfig;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "DIFFDRIVE";

/// Which reference path to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    #[default]
    Circle,
    Line,
    Figure8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    pub kind: PathKind,
    /// Circle radius (m), centred on the origin.
    pub radius: f64,
    pub circle_points: usize,
    pub start: (f64, f64),
    pub end: (f64, f64),
    pub line_points: usize,
    pub figure8_a: f64,
    pub figure8_b: f64,
    pub figure8_points: usize,
}

impl Default for PathConfig {
    fn default() -> Self {
        PathConfig {
            kind: PathKind::Circle,
            radius: 3.0,
            circle_points: 300,
            start: (-3.0, 0.0),
            end: (3.0, 0.0),
            line_points: 200,
            figure8_a: 2.0,
            figure8_b: 1.2,
            figure8_points: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub wheel_radius: f64,
    pub wheel_base: f64,
    pub max_v: f64,
    pub max_omega: f64,
    pub max_accel_v: Option<f64>,
    pub max_accel_omega: Option<f64>,
    /// Initial pose. Defaults to `(-radius, 0, 0)`, on the circle's left edge.
    pub start_pose: Option<Pose>,
}

impl Default for RobotConfig {
    fn default() -> Self {
        RobotConfig {
            wheel_radius: 0.05,
            wheel_base: 0.3,
            max_v: 1.0,
            max_omega: 3.0,
            max_accel_v: None,
            max_accel_omega: None,
            start_pose: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub lookahead: f64,
    pub nominal_speed: f64,
    pub min_lookahead: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            lookahead: 0.6,
            nominal_speed: 0.7,
            min_lookahead: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Simulated time (s).
    pub duration: f64,
    /// Step size (s).
    pub dt: f64,
    /// `euler` or `rk4`. Kept as a string so an unknown name is reported by
    /// the simulator builder.
    pub integrator: String,
    pub record_history: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            duration: 20.0,
            dt: 0.02,
            integrator: "rk4".to_string(),
            record_history: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for `path.csv` and `trajectory.csv`. Nothing is written when unset.
    pub dir: Option<PathBuf>,
    /// Open a window showing the path and trajectory after the run.
    pub show: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            dir: None,
            show: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub path: PathConfig,
    pub robot: RobotConfig,
    pub noise: NoiseConfig,
    pub controller: ControllerConfig,
    pub run: RunConfig,
    pub output: OutputConfig,
}

impl SimConfig {
    /// Configured start pose, or `(-radius, 0, 0)`.
    pub fn start_pose(&self) -> Pose {
        self.robot
            .start_pose
            .unwrap_or(Pose::new(-self.path.radius, 0.0, 0.0))
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

/// Load settings from `path` (or [`DEFAULT_CONFIG_PATH`] if it exists), then
/// apply `DIFFDRIVE__SECTION__KEY` environment overrides. Missing keys take
/// their defaults.
pub fn load_config(path: Option<&Path>) -> Result<SimConfig, ConfigError> {
    let (source, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    };
    info!("Attempting to load configuration from {}", source.display());

    let settings = Config::builder()
        .add_source(File::from(source.as_path()).format(FileFormat::Toml).required(required))
        .add_source(environment())
        .build()
        .and_then(|c| c.try_deserialize::<SimConfig>());

    match settings {
        Ok(config) => {
            info!("Successfully loaded configuration: {:?}", config);
            Ok(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

/// Parse settings from a TOML string, without environment overrides.
pub fn from_toml_str(toml: &str) -> Result<SimConfig, ConfigError> {
    Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Held by every test that calls `load_config`, which reads the environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = from_toml_str("").unwrap();
        assert_eq!(config, SimConfig::default());
        assert_eq!(config.start_pose(), Pose::new(-3.0, 0.0, 0.0));
        assert!(!config.noise.is_active());
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = from_toml_str(
            r#"
            [path]
            kind = "figure8"

            [controller]
            lookahead = 0.9

            [noise]
            std_omega = 0.05
            seed = 7

            [run]
            integrator = "euler"
            "#,
        )
        .unwrap();
        assert_eq!(config.path.kind, PathKind::Figure8);
        assert_eq!(config.path.figure8_points, 500);
        assert_eq!(config.controller.lookahead, 0.9);
        assert_eq!(config.controller.nominal_speed, 0.7);
        assert_eq!(config.noise.seed, Some(7));
        assert_eq!(config.noise.std_v, 0.0);
        assert_eq!(config.run.integrator, "euler");
        assert_eq!(config.run.dt, 0.02);
    }

    #[test]
    fn test_start_pose_override() {
        let config = from_toml_str(
            r#"
            [robot]
            start_pose = { x = 1.0, y = 2.0, theta = 0.5 }
            max_accel_v = 2.0
            "#,
        )
        .unwrap();
        assert_eq!(config.start_pose(), Pose::new(1.0, 2.0, 0.5));
        assert_eq!(config.robot.max_accel_v, Some(2.0));
        assert_eq!(config.robot.max_accel_omega, None);
    }

    #[test]
    fn test_unknown_path_kind_is_an_error() {
        assert!(from_toml_str("[path]\nkind = \"spiral\"").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let _env = ENV_LOCK.lock().unwrap();
        let missing = std::env::temp_dir().join("diffdrive-does-not-exist.toml");
        assert!(load_config(Some(&missing)).is_err());
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = std::env::temp_dir().join(format!("diffdrive-env-{}.toml", std::process::id()));
        std::fs::write(&file, "[controller]\nlookahead = 0.9\nnominal_speed = 0.4\n").unwrap();
        let _env = ENV_LOCK.lock().unwrap();
        // SAFETY: ENV_LOCK serializes the tests that load configuration, and
        // nothing in this binary reads the environment outside `std::env`.
        unsafe { std::env::set_var("DIFFDRIVE__CONTROLLER__LOOKAHEAD", "1.25") };
        let config = load_config(Some(&file));
        unsafe { std::env::remove_var("DIFFDRIVE__CONTROLLER__LOOKAHEAD") };
        std::fs::remove_file(&file).unwrap();

        let config = config.unwrap();
        assert_eq!(config.controller.lookahead, 1.25);
        assert_eq!(config.controller.nominal_speed, 0.4);
    }

    #[test]
    fn test_shipped_default_file_matches_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_PATH);
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(from_toml_str(&text).unwrap(), SimConfig::default());
    }
}
