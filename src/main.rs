mod graphics;

use std::path::PathBuf;
use std::process::ExitCode;

use diffdrive::{config, driver, export};
use tracing::{error, info};
use tracing_subscriber::{self, EnvFilter};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Simulation failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = config::load_config(config_path.as_deref())?;

    let output = driver::run(&config)?;
    info!(
        final_pose = %output.final_pose,
        max_tracking_error = output.max_tracking_error(0),
        "Run finished"
    );

    if let Some(dir) = &config.output.dir {
        export::export_run(dir, &output.path, &output.history)?;
    }

    if config.output.show {
        if output.history.is_empty() {
            info!("History recording disabled, nothing to show.");
        } else {
            info!("Opening visualization window. Press Escape to close.");
            macroquad::Window::from_config(
                graphics::window_conf(),
                graphics::run_visualization_loop(output.path, output.history, config.run.dt),
            );
        }
    }

    Ok(())
}
