//! Defines the Settings structure and its related functions.
//!
//! Settings are read from a TOML file, with `RENOCORE_`-prefixed environment
//! variables taking precedence. Every field has a default, so an empty file
//! yields a runnable 24-hour simulation at nominal parameters.

use std::collections::HashMap;
use std::path::Path;

use config::Config as eConfig;
use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};

/// Contains all settings for a renocore simulation run.
#[derive(Debug, Deserialize, Clone, Serialize, Default)]
pub struct Settings {
    /// Output and log locations
    #[serde(default)]
    pub paths: Paths,
    /// Simulation configuration
    #[serde(default)]
    pub config: Config,
    /// Named physiological parameter overrides
    #[serde(default)]
    pub parameters: Overrides,
}

#[derive(Debug, Deserialize, Clone, Serialize, Default)]
pub struct Paths {
    /// Folder that receives the trajectory CSV and the settings dump
    pub output: Option<String>,
    /// Log file; stdout only when absent
    pub log: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Serialize)]
pub struct Config {
    /// Simulation horizon in minutes
    #[serde(default = "default_duration")]
    pub duration: f64,
    /// Spacing of recorded output points in minutes
    #[serde(default = "default_output_interval")]
    pub output_interval: f64,
    /// Integration routine
    #[serde(default)]
    pub solver: Solver,
    /// Relative tolerance for the adaptive solver
    #[serde(default = "default_tol")]
    pub rtol: f64,
    /// Absolute tolerance for the adaptive solver
    #[serde(default = "default_tol")]
    pub atol: f64,
    /// Fixed step size in minutes, used by the fixed-step solver only
    #[serde(default = "default_step_size")]
    pub step_size: f64,
    /// Couple the autonomic nervous system into the model
    #[serde(default = "default_true")]
    pub neural_coupling: bool,
    /// Write the trajectory and settings to the output folder
    #[serde(default = "default_true")]
    pub output: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            duration: default_duration(),
            output_interval: default_output_interval(),
            solver: Solver::default(),
            rtol: default_tol(),
            atol: default_tol(),
            step_size: default_step_size(),
            neural_coupling: true,
            output: true,
            log_level: default_log_level(),
        }
    }
}

/// Integration routine selection.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Solver {
    /// Adaptive Dormand-Prince 4(5)
    #[default]
    Dopri5,
    /// Classic fixed-step Runge-Kutta 4
    Rk4,
}

/// Parameter overrides keyed by field name, e.g. `sodium_intake_rate = 0.2`.
#[derive(Debug, Deserialize, Clone, Serialize, Default)]
pub struct Overrides {
    #[serde(flatten)]
    pub parameters: HashMap<String, f64>,
}

pub fn read_settings(path: &str) -> Result<Settings> {
    let parsed = eConfig::builder()
        .add_source(config::File::with_name(path).format(config::FileFormat::Toml))
        .add_source(config::Environment::with_prefix("RENOCORE").separator("_"))
        .build()
        .wrap_err_with(|| format!("failed to read settings from {}", path))?;

    let settings: Settings = parsed
        .try_deserialize()
        .wrap_err("settings file did not match the expected structure")?;

    Ok(settings)
}

/// Dump the effective settings next to the simulation output.
pub fn write_settings_to_file(settings: &Settings, folder: &Path) -> Result<()> {
    let serialized = serde_json::to_string_pretty(settings)?;
    let file_path = folder.join("settings.json");
    std::fs::write(&file_path, serialized)
        .wrap_err_with(|| format!("could not write {}", file_path.display()))?;
    Ok(())
}

// *********************************
// Default values for deserializing
// *********************************
fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_duration() -> f64 {
    24.0 * 60.0
}

fn default_output_interval() -> f64 {
    1.0
}

fn default_tol() -> f64 {
    1e-4
}

fn default_step_size() -> f64 {
    0.5
}
