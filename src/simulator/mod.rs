//! Numerical integration of the regulation model.
//!
//! Wraps the model derivative function as an [`ode_solvers::System`] and
//! drives either the adaptive Dormand-Prince stepper or the fixed-step
//! Runge-Kutta stepper over the configured simulation window.

use eyre::{bail, eyre, Result};
use ode_solvers::{Dopri5, Rk4};
use tracing::{debug, info};

use crate::model::state::{ModelState, StateVector, Time};
use crate::model::RegulationModel;
use crate::routines::output::{DerivedQuantities, Trajectory};
use crate::routines::settings::{Config, Solver};

impl ode_solvers::System<Time, StateVector> for RegulationModel {
    fn system(&self, t: Time, y: &StateVector, dy: &mut StateVector) {
        *dy = self.derivatives(t, y);
    }
}

/// Integrate the model forward from `initial` over `config.duration` minutes.
///
/// The returned [`Trajectory`] holds one entry per output point, starting at
/// t = 0, with the derived quantities recomputed at each point.
pub fn simulate_model(
    model: &RegulationModel,
    initial: ModelState,
    config: &Config,
) -> Result<Trajectory> {
    if !config.duration.is_finite() || config.duration <= 0.0 {
        bail!("Simulation duration must be positive, got {}", config.duration);
    }

    let y0 = initial.to_vector();

    let (times, raw) = match config.solver {
        Solver::Dopri5 => {
            if !config.output_interval.is_finite() || config.output_interval <= 0.0 {
                bail!(
                    "Output interval must be positive, got {}",
                    config.output_interval
                );
            }
            let mut stepper = Dopri5::new(
                model.clone(),
                0.0,
                config.duration,
                config.output_interval,
                y0,
                config.rtol,
                config.atol,
            );
            let stats = stepper
                .integrate()
                .map_err(|e| eyre!("Integration failed: {}", e))?;
            debug!("{}", stats);
            (stepper.x_out().clone(), stepper.y_out().clone())
        }
        Solver::Rk4 => {
            if !config.step_size.is_finite() || config.step_size <= 0.0 {
                bail!("Step size must be positive, got {}", config.step_size);
            }
            let mut stepper = Rk4::new(model.clone(), 0.0, y0, config.duration, config.step_size);
            let stats = stepper
                .integrate()
                .map_err(|e| eyre!("Integration failed: {}", e))?;
            debug!("{}", stats);
            (stepper.x_out().clone(), stepper.y_out().clone())
        }
    };

    let mut states = Vec::with_capacity(times.len());
    let mut derived = Vec::with_capacity(times.len());
    for (t, y) in times.iter().zip(&raw) {
        let state = ModelState::from_vector(y);
        derived.push(DerivedQuantities::compute(model, *t, &state));
        states.push(state);
    }

    info!(
        "Integration produced {} output points over {:.1} minutes",
        times.len(),
        config.duration
    );

    Ok(Trajectory::new(times, states, derived))
}
