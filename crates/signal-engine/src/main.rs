//! Comparison binary for the fuzzy signal controller.
//!
//! Loads configuration, runs every configured scenario under both the
//! fuzzy and the fixed-time controller with the same seed, logs the
//! results and optionally writes the full report as JSON.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from the path given as the first argument, or
//!    `signal-config.yaml` in the working directory
//! 2. Initialize structured logging (tracing), `RUST_LOG` overriding the
//!    configured level
//! 3. Build the scenario catalog with any custom scenarios
//! 4. Run the comparisons
//! 5. Log the results and write the report

mod error;
mod report;

use std::path::PathBuf;

use signal_control::config::SimulationConfig;
use signal_control::runner;
use signal_control::scenario::ScenarioCatalog;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

const DEFAULT_CONFIG_PATH: &str = "signal-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, a scenario, a run or the report
/// output fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let (config, loaded) = load_config(&config_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("signal-engine starting");
    if loaded {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        seed = config.simulation.seed,
        time_step = config.simulation.time_step,
        departure_interval = config.simulation.departure_interval,
        max_duration = config.simulation.max_duration,
        fixed_ns_green = config.fixed.ns_green,
        fixed_ew_green = config.fixed.ew_green,
        fallback_green_time = config.fuzzy.fallback_green_time,
        "Simulation settings"
    );

    let catalog = ScenarioCatalog::with_custom(&config.custom_scenarios)
        .map_err(EngineError::from)?;
    info!(
        scenarios = catalog.scenarios().len(),
        custom = config.custom_scenarios.len(),
        "Scenario catalog ready"
    );

    let report = runner::compare_all(&catalog, &config).map_err(EngineError::from)?;
    report::log_report(&report);

    if let Some(path) = &config.simulation.report_path {
        report::write_report(&report, path)?;
    }

    info!(run_id = %report.run_id, "signal-engine finished");
    Ok(())
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist. The flag is `true` when the file was read.
fn load_config(path: &std::path::Path) -> Result<(SimulationConfig, bool), EngineError> {
    if path.exists() {
        Ok((SimulationConfig::from_file(path)?, true))
    } else {
        Ok((SimulationConfig::default(), false))
    }
}
