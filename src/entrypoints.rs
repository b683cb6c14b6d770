use crate::logger;
use crate::model::parameters::Parameters;
use crate::model::state::ModelState;
use crate::model::RegulationModel;
use crate::routines::output::Trajectory;
use crate::routines::settings::{write_settings_to_file, Settings};
use crate::simulator::simulate_model;

use eyre::{Result, WrapErr};
use std::path::Path;
use std::time::Instant;

/// Primary entrypoint for renocore
///
/// Builds the regulation model from the settings, integrates it over the
/// configured simulation window, and writes output files if enabled.
///
/// The settings are specified in a TOML configuration file, see
/// `routines::settings` for details.
pub fn simulate(settings: Settings) -> Result<Trajectory> {
    let now = Instant::now();

    logger::setup_log(&settings)?;
    tracing::info!("Starting renocore");

    // Build the parameter set, applying any overrides from the configuration
    let params = Parameters::with_overrides(&settings.parameters.parameters)?;
    if !settings.parameters.parameters.is_empty() {
        tracing::info!(
            "Applied {} parameter override(s)",
            settings.parameters.parameters.len()
        );
    }

    let model = RegulationModel::new(params, settings.config.neural_coupling);
    tracing::info!(
        "Simulating {:.1} minutes with the {:?} solver, neural coupling {}",
        settings.config.duration,
        settings.config.solver,
        if model.neural_coupling() {
            "enabled"
        } else {
            "disabled"
        }
    );

    // Tell the user where the output files will be written
    let output_folder = settings
        .paths
        .output
        .clone()
        .unwrap_or_else(|| String::from("."));
    match settings.config.output {
        true => {
            tracing::info!("Output files will be written to {}", output_folder)
        }
        false => {
            tracing::info!("Output files will not be written - set `output = true` in the configuration file to enable output files")
        }
    }

    let initial = ModelState::nominal(model.params());
    let trajectory = simulate_model(&model, initial, &settings.config)?;

    // Write output files (if configured)
    if settings.config.output {
        std::fs::create_dir_all(&output_folder)
            .wrap_err_with(|| format!("Failed to create output folder at {}", output_folder))?;
        trajectory.write_outputs(true, Path::new(&output_folder));
        write_settings_to_file(&settings, Path::new(&output_folder))?;
    }

    tracing::info!("Simulation complete after {:.2?}", now.elapsed());

    Ok(trajectory)
}

/// Alternative entrypoint, primarily meant for third-party libraries or APIs
///
/// Takes an already constructed model and initial state together with the
/// settings. It does not write any output files.
pub fn simulate_internal(
    model: &RegulationModel,
    initial: ModelState,
    settings: &Settings,
) -> Result<Trajectory> {
    let now = Instant::now();
    logger::setup_log(settings)?;

    let trajectory = simulate_model(model, initial, &settings.config)?;
    tracing::info!("Total time: {:.2?}", now.elapsed());
    Ok(trajectory)
}
