//! The state vector of the regulation model and its named view.
//!
//! The integrator works on a flat, fixed-order vector of 26 scalars; the
//! model components read and write named fields. [`ModelState`] is the
//! lossless bridge between the two: `from_vector` followed by `to_vector`
//! reproduces the input bit for bit, and the index-to-field mapping below is
//! fixed for the lifetime of a run.

use crate::model::parameters::Parameters;

/// Number of state variables carried by the model.
pub const STATE_DIM: usize = 26;

/// Flat state vector as consumed by the integration routine.
pub type StateVector = ode_solvers::SVector<f64, STATE_DIM>;

/// Simulation time, in minutes.
pub type Time = f64;

/// Named view of the state vector.
///
/// Field order matches the vector index order exactly; `to_vector` and
/// `from_vector` are the only places that order is spelled out.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ModelState {
    /// 0: blood volume (L)
    pub blood_volume: f64,
    /// 1: low-pass filtered cardiac output (L/min)
    pub cardiac_output_delayed: f64,
    /// 2: time-integral of cardiac output error (L)
    pub co_error: f64,
    /// 3: mean arterial pressure (mmHg)
    pub mean_arterial_pressure: f64,
    /// 4: renin (normalized)
    pub renin: f64,
    /// 5: angiotensin I (normalized)
    pub angiotensin_i: f64,
    /// 6: angiotensin II (normalized)
    pub angiotensin_ii: f64,
    /// 7: aldosterone (normalized)
    pub aldosterone: f64,
    /// 8: ACE activity (normalized)
    pub ace_activity: f64,
    /// 9: preafferent pressure autoregulation signal (normalized)
    pub preafferent_autoreg_signal: f64,
    /// 10: calcium channel blocker effect (normalized)
    pub ccb_effect: f64,
    /// 11: afferent arteriole resistance (mmHg per L/min, per nephron)
    pub afferent_resistance: f64,
    /// 12: efferent arteriole resistance (mmHg per L/min, per nephron)
    pub efferent_resistance: f64,
    /// 13: peritubular capillary resistance (mmHg per L/min, per nephron)
    pub peritubular_resistance: f64,
    /// 14: glomerular capillary pressure (mmHg)
    pub glomerular_pressure: f64,
    /// 15: Bowman's capsule pressure (mmHg)
    pub bowmans_capsule_pressure: f64,
    /// 16: plasma sodium concentration (mEq/L)
    pub plasma_sodium: f64,
    /// 17: water-tracked blood volume (L)
    pub blood_volume_water: f64,
    /// 18: plasma potassium concentration (mEq/L)
    pub plasma_potassium: f64,
    /// 19: plasma osmolarity (mOsm/L)
    pub plasma_osmolarity: f64,
    /// 20: sodium delivery to the distal tubule (mEq/min)
    pub distal_sodium_delivery: f64,
    /// 21: sympathetic tone (normalized)
    pub sympathetic_tone: f64,
    /// 22: parasympathetic tone (normalized)
    pub parasympathetic_tone: f64,
    /// 23: renal sympathetic nerve activity (normalized)
    pub renal_sympathetic_activity: f64,
    /// 24: heart rate (beats/min)
    pub heart_rate: f64,
    /// 25: stroke volume (ml/beat)
    pub stroke_volume: f64,
}

/// Field names in vector index order, used for series lookup and CSV headers.
pub const FIELD_NAMES: [&str; STATE_DIM] = [
    "blood_volume",
    "cardiac_output_delayed",
    "co_error",
    "mean_arterial_pressure",
    "renin",
    "angiotensin_i",
    "angiotensin_ii",
    "aldosterone",
    "ace_activity",
    "preafferent_autoreg_signal",
    "ccb_effect",
    "afferent_resistance",
    "efferent_resistance",
    "peritubular_resistance",
    "glomerular_pressure",
    "bowmans_capsule_pressure",
    "plasma_sodium",
    "blood_volume_water",
    "plasma_potassium",
    "plasma_osmolarity",
    "distal_sodium_delivery",
    "sympathetic_tone",
    "parasympathetic_tone",
    "renal_sympathetic_activity",
    "heart_rate",
    "stroke_volume",
];

impl ModelState {
    /// Decode a flat state vector into the named view.
    pub fn from_vector(y: &StateVector) -> Self {
        ModelState {
            blood_volume: y[0],
            cardiac_output_delayed: y[1],
            co_error: y[2],
            mean_arterial_pressure: y[3],
            renin: y[4],
            angiotensin_i: y[5],
            angiotensin_ii: y[6],
            aldosterone: y[7],
            ace_activity: y[8],
            preafferent_autoreg_signal: y[9],
            ccb_effect: y[10],
            afferent_resistance: y[11],
            efferent_resistance: y[12],
            peritubular_resistance: y[13],
            glomerular_pressure: y[14],
            bowmans_capsule_pressure: y[15],
            plasma_sodium: y[16],
            blood_volume_water: y[17],
            plasma_potassium: y[18],
            plasma_osmolarity: y[19],
            distal_sodium_delivery: y[20],
            sympathetic_tone: y[21],
            parasympathetic_tone: y[22],
            renal_sympathetic_activity: y[23],
            heart_rate: y[24],
            stroke_volume: y[25],
        }
    }

    /// Encode the named view back into a flat state vector.
    pub fn to_vector(&self) -> StateVector {
        StateVector::from([
            self.blood_volume,
            self.cardiac_output_delayed,
            self.co_error,
            self.mean_arterial_pressure,
            self.renin,
            self.angiotensin_i,
            self.angiotensin_ii,
            self.aldosterone,
            self.ace_activity,
            self.preafferent_autoreg_signal,
            self.ccb_effect,
            self.afferent_resistance,
            self.efferent_resistance,
            self.peritubular_resistance,
            self.glomerular_pressure,
            self.bowmans_capsule_pressure,
            self.plasma_sodium,
            self.blood_volume_water,
            self.plasma_potassium,
            self.plasma_osmolarity,
            self.distal_sodium_delivery,
            self.sympathetic_tone,
            self.parasympathetic_tone,
            self.renal_sympathetic_activity,
            self.heart_rate,
            self.stroke_volume,
        ])
    }

    /// State values in vector index order, aligned with [`FIELD_NAMES`].
    pub fn to_array(&self) -> [f64; STATE_DIM] {
        let mut values = [0.0; STATE_DIM];
        values.copy_from_slice(self.to_vector().as_slice());
        values
    }

    /// The nominal resting state the model is initialized from.
    ///
    /// Pressures, volumes and hormone levels sit at their parameter
    /// nominals; the cardiac output error integral and distal sodium
    /// delivery start at zero.
    pub fn nominal(params: &Parameters) -> Self {
        ModelState {
            blood_volume: params.blood_volume_nom,
            cardiac_output_delayed: params.cardiac_output_nom,
            co_error: 0.0,
            mean_arterial_pressure: params.map_setpoint,
            renin: params.renin_secretion_nom,
            angiotensin_i: params.angiotensin_i_nom,
            angiotensin_ii: params.angiotensin_ii_nom,
            aldosterone: params.aldosterone_nom,
            ace_activity: params.ace_activity_nom,
            preafferent_autoreg_signal: 1.0,
            ccb_effect: 1.0,
            afferent_resistance: params.preafferent_resistance_nom,
            efferent_resistance: params.preafferent_resistance_nom,
            peritubular_resistance: params.preafferent_resistance_nom,
            glomerular_pressure: 60.0,
            bowmans_capsule_pressure: 15.0,
            plasma_sodium: params.sodium_ref_concentration,
            blood_volume_water: params.blood_volume_nom,
            plasma_potassium: 4.0,
            plasma_osmolarity: 290.0,
            distal_sodium_delivery: 0.0,
            sympathetic_tone: params.sympathetic_tone_nom,
            parasympathetic_tone: params.parasympathetic_tone_nom,
            renal_sympathetic_activity: params.renal_symp_activity_nom,
            heart_rate: 72.0,
            stroke_volume: 70.0,
        }
    }
}
