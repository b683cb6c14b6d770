//! Defines the result objects from a simulation run.
//!
//! A [`Trajectory`] contains the recorded time series of every state
//! variable plus the derived quantities recomputed at each output point,
//! and knows how to export itself to CSV.

use std::fs::File;
use std::path::Path;

use csv::WriterBuilder;
use ndarray::Array1;
use tracing::error;

use crate::model::state::{ModelState, FIELD_NAMES};
use crate::model::{neural, RegulationModel};

/// Derived series names, aligned with [`DerivedQuantities::to_array`].
pub const DERIVED_NAMES: [&str; 6] = [
    "adh",
    "baroreceptor_firing",
    "gfr",
    "urine_flow",
    "sodium_excretion",
    "renal_blood_flow",
];

/// Quantities that are algebraic functions of the state, recomputed per
/// output point so plots can show them alongside the integrated states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedQuantities {
    /// ADH level (normalized)
    pub adh: f64,
    /// Baroreceptor firing rate in [0, 2]
    pub baroreceptor_firing: f64,
    /// Glomerular filtration rate (ml/min)
    pub gfr: f64,
    /// Urine flow (ml/min)
    pub urine_flow: f64,
    /// Urinary sodium excretion (mEq/min, ml-based)
    pub sodium_excretion: f64,
    /// Renal blood flow (L/min)
    pub renal_blood_flow: f64,
}

impl DerivedQuantities {
    /// Recompute the derived quantities at one output point.
    ///
    /// Goes through the same evaluation path as the derivative function, so
    /// the series agree with what the integrator saw. Baroreceptor firing is
    /// reported even for uncoupled runs since it is a pure pressure reading.
    pub fn compute(model: &RegulationModel, t: f64, state: &ModelState) -> Self {
        let eval = model.evaluate(t, state);
        let baroreceptor_firing = eval
            .neural
            .map(|n| n.autonomic.baroreceptor_firing)
            .unwrap_or_else(|| {
                neural::baroreceptor_firing_rate(model.params(), state.mean_arterial_pressure)
            });

        DerivedQuantities {
            adh: eval.tubular.adh,
            baroreceptor_firing,
            gfr: eval.tubular.gfr,
            urine_flow: eval.tubular.urine_flow,
            sodium_excretion: eval.tubular.sodium_excretion,
            renal_blood_flow: eval.renal.renal_blood_flow,
        }
    }

    /// Values in [`DERIVED_NAMES`] order.
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.adh,
            self.baroreceptor_firing,
            self.gfr,
            self.urine_flow,
            self.sodium_excretion,
            self.renal_blood_flow,
        ]
    }
}

/// Recorded simulation output: one entry per output time point.
#[derive(Debug, Clone)]
pub struct Trajectory {
    pub times: Vec<f64>,
    pub states: Vec<ModelState>,
    pub derived: Vec<DerivedQuantities>,
}

impl Trajectory {
    /// Create a new Trajectory object; the three series must be parallel.
    pub fn new(times: Vec<f64>, states: Vec<ModelState>, derived: Vec<DerivedQuantities>) -> Self {
        debug_assert_eq!(times.len(), states.len());
        debug_assert_eq!(times.len(), derived.len());
        Self {
            times,
            states,
            derived,
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn final_state(&self) -> Option<&ModelState> {
        self.states.last()
    }

    /// Time points as an array (minutes).
    pub fn times(&self) -> Array1<f64> {
        Array1::from_vec(self.times.clone())
    }

    /// Series of one state variable by field name, in time order.
    pub fn state_series(&self, name: &str) -> Option<Array1<f64>> {
        let index = FIELD_NAMES.iter().position(|field| *field == name)?;
        Some(Array1::from_iter(
            self.states.iter().map(|state| state.to_array()[index]),
        ))
    }

    /// Series of one derived quantity by name, in time order.
    pub fn derived_series(&self, name: &str) -> Option<Array1<f64>> {
        let index = DERIVED_NAMES.iter().position(|field| *field == name)?;
        Some(Array1::from_iter(
            self.derived.iter().map(|d| d.to_array()[index]),
        ))
    }

    pub fn write_outputs(&self, write: bool, folder: &Path) {
        if write {
            self.write_trajectory(folder);
        }
    }

    /// Writes trajectory.csv: time, every state field, every derived series.
    pub fn write_trajectory(&self, folder: &Path) {
        let result = (|| {
            let file = File::create(folder.join("trajectory.csv"))?;
            let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

            let mut header = vec!["time".to_string()];
            header.extend(FIELD_NAMES.iter().map(|name| name.to_string()));
            header.extend(DERIVED_NAMES.iter().map(|name| name.to_string()));
            writer.write_record(&header)?;

            for ((time, state), derived) in
                self.times.iter().zip(&self.states).zip(&self.derived)
            {
                let mut row = vec![time.to_string()];
                row.extend(state.to_array().iter().map(|val| val.to_string()));
                row.extend(derived.to_array().iter().map(|val| val.to_string()));
                writer.write_record(&row)?;
            }
            writer.flush()
        })();

        if let Err(e) = result {
            error!("Error while writing trajectory: {}", e);
        }
    }
}
