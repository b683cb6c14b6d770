//! renocore is a lumped-parameter model of long-term blood pressure and
//! renal sodium-water regulation, integrating systemic hemodynamics, renal
//! vascular and tubular function, hormonal cascades and autonomic control.

// Entrypoints for running simulations
pub mod entrypoints;
// Logging configuration
pub mod logger;
// The physiological model and its parameters
pub mod model;
// Routines for settings and output
pub mod routines;
// Numerical integration of the model
pub mod simulator;

pub mod prelude {
    pub use crate::entrypoints::{simulate, simulate_internal};
    pub use crate::logger::setup_log;
    pub use crate::model::neural::{
        baroreceptor_firing_rate, compute_neural_effects, AutonomicTone, CardiacEffects,
        NeuralEffects, RenalSympatheticEffects, VascularEffects,
    };
    pub use crate::model::parameters::Parameters;
    pub use crate::model::state::{ModelState, StateVector, Time, FIELD_NAMES, STATE_DIM};
    pub use crate::model::tubular::{
        hormonal_regulation, tubular_function, HormonalRegulation, LoopHenleStage, TubularFunction,
        TubuleStage,
    };
    pub use crate::model::{Hemodynamics, RegulationModel, RenalVasculature, StepEvaluation};
    pub use crate::routines::output::{DerivedQuantities, Trajectory, DERIVED_NAMES};
    pub use crate::routines::settings::{
        read_settings, write_settings_to_file, Config, Overrides, Paths, Settings, Solver,
    };
    pub use crate::simulator::simulate_model;
}
