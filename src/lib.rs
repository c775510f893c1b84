//! Closed-loop differential-drive simulation: configuration, the
//! controller/simulator driver loop and CSV export of the results.

pub mod config;
pub mod driver;
pub mod export;

pub use config::{SimConfig, load_config};
pub use driver::{RunOutput, run};
