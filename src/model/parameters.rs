//! Defines the physiological parameter set shared by every model component.
//!
//! All parameters are read-only for the lifetime of a simulation run. Values
//! default to the nominal adult human operating point; individual entries can
//! be overridden by name through [`Parameters::with_overrides`], which is how
//! the settings file reaches the model.

use std::collections::HashMap;

use eyre::{bail, eyre, Result};
use serde::{Deserialize, Serialize};

/// Immutable bag of physiological constants.
///
/// Units are noted per field; pressures are mmHg, flows L/min unless stated
/// otherwise, times are minutes and hormone levels are normalized so that 1.0
/// is the nominal plasma level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    // Systemic circulation and body fluids
    /// Nominal mean arterial pressure setpoint (mmHg)
    pub map_setpoint: f64,
    /// Nominal cardiac output (L/min)
    pub cardiac_output_nom: f64,
    /// Nominal extracellular fluid volume (L)
    pub extracellular_fluid_nom: f64,
    /// Nominal blood volume (L)
    pub blood_volume_nom: f64,
    /// Dietary sodium intake (mEq/min)
    pub sodium_intake_rate: f64,
    /// Daily water intake (L/day)
    pub water_intake_per_day: f64,
    /// Reference plasma sodium concentration (mEq/L)
    pub sodium_ref_concentration: f64,
    /// Plasma protein concentration (g/dl)
    pub plasma_protein_concentration: f64,
    /// Central venous pressure (mmHg)
    pub venous_pressure: f64,
    /// Venous resistance (mmHg per L/min)
    pub venous_resistance: f64,
    /// Nominal mean circulatory filling pressure (mmHg)
    pub mean_filling_pressure_nom: f64,
    /// Venous compliance (L per mmHg)
    pub venous_compliance: f64,

    // Renal vasculature and filtration
    /// Nominal renal blood flow (L/min)
    pub renal_blood_flow_nom: f64,
    /// Number of functioning nephrons
    pub nephron_count: f64,
    /// Nominal glomerular ultrafiltration coefficient Kf (ml/min per mmHg)
    pub kf_nom: f64,
    /// Nominal transcapillary oncotic pressure difference (mmHg)
    pub oncotic_pressure_difference_nom: f64,
    /// Renal vein pressure (mmHg)
    pub renal_vein_pressure: f64,
    /// Nominal glomerular filtration rate (ml/min)
    pub gfr_nom: f64,
    /// Nominal filtration fraction (dimensionless)
    pub filtration_fraction_nom: f64,
    /// Nominal preafferent arteriole resistance (mmHg per L/min)
    pub preafferent_resistance_nom: f64,
    /// Nominal afferent arteriole diameter (m)
    pub afferent_diameter_nom: f64,
    /// Nominal efferent arteriole diameter (m)
    pub efferent_diameter_nom: f64,

    // Tubular sodium reabsorption fractions
    /// Proximal tubule sodium reabsorption fraction
    pub proximal_na_reab_frac: f64,
    /// Loop of Henle sodium reabsorption fraction
    pub loop_henle_na_reab_frac: f64,
    /// Distal tubule sodium reabsorption fraction
    pub distal_na_reab_frac: f64,
    /// Collecting duct sodium reabsorption fraction
    pub collecting_duct_na_reab_frac: f64,

    // RAAS hormone nominals (normalized levels)
    /// Nominal renin secretion rate
    pub renin_secretion_nom: f64,
    /// Nominal ACE activity
    pub ace_activity_nom: f64,
    /// Nominal angiotensin I level
    pub angiotensin_i_nom: f64,
    /// Nominal angiotensin II level
    pub angiotensin_ii_nom: f64,
    /// Nominal aldosterone level
    pub aldosterone_nom: f64,

    // Hormone and transport time constants (min)
    /// Renin relaxation time constant
    pub tau_renin: f64,
    /// Angiotensin I relaxation time constant
    pub tau_angiotensin_i: f64,
    /// Angiotensin II relaxation time constant
    pub tau_angiotensin_ii: f64,
    /// Aldosterone relaxation time constant
    pub tau_aldosterone: f64,
    /// ADH relaxation time constant
    pub tau_adh: f64,
    /// Tubular sodium transport delay
    pub tau_na_transport: f64,
    /// Tubular water transport delay
    pub tau_water_transport: f64,

    // Circadian rhythm
    /// Relative amplitude of the 24 h modulation of GFR and hormone synthesis
    pub circadian_amplitude: f64,
    /// Phase offset of the circadian oscillation (rad)
    pub circadian_phase: f64,

    // Hemodynamic control gains
    /// Overall gain on the tissue autoregulation signal
    pub tissue_autoreg_scale: f64,
    /// Proportional gain on cardiac output error
    pub kp_cardiac_output: f64,
    /// Integral gain on cardiac output error
    pub ki_cardiac_output: f64,
    /// Species scaling of cardiac output
    pub cardiac_output_scale: f64,
    /// Species scaling of blood volume
    pub blood_volume_scale: f64,
    /// Nominal systemic arterial resistance (mmHg per L/min)
    pub systemic_arterial_resistance_nom: f64,
    /// Slope of the AT1-bound AngII effect on systemic vascular resistance
    pub at1_svr_slope: f64,
    /// Equilibrium AT1-bound angiotensin II level
    pub at1_bound_angii_nom: f64,
    /// Span of the AT1 effect on the preafferent arteriole
    pub at1_preaff_scale: f64,
    /// Slope of the AT1 effect on the preafferent arteriole
    pub at1_preaff_slope: f64,
    /// Steepness of the preafferent signal squashing nonlinearity
    pub preaff_signal_nonlin_scale: f64,

    // Autonomic control
    /// Nominal sympathetic tone
    pub sympathetic_tone_nom: f64,
    /// Nominal parasympathetic tone
    pub parasympathetic_tone_nom: f64,
    /// Nominal renal sympathetic nerve activity
    pub renal_symp_activity_nom: f64,
    /// MAP below which baroreceptors stop firing (mmHg)
    pub baroreceptor_lower_threshold: f64,
    /// MAP above which baroreceptor firing saturates (mmHg)
    pub baroreceptor_upper_threshold: f64,
    /// Sympathetic tone response time constant (min)
    pub tau_symp_response: f64,
    /// Parasympathetic tone response time constant (min)
    pub tau_parasymp_response: f64,
    /// Heart rate and stroke volume response time constant (min)
    pub tau_cardiac_response: f64,
    /// Sympathetic gain on vascular resistance
    pub symp_vasoconstriction_gain: f64,
    /// Sympathetic gain on renin release
    pub symp_renin_gain: f64,
    /// Sympathetic gain on tubular sodium reabsorption
    pub symp_na_reabsorption_gain: f64,
    /// Sympathetic gain on heart rate
    pub symp_hr_gain: f64,
    /// Parasympathetic gain on heart rate (negative: slows the heart)
    pub parasymp_hr_gain: f64,
    /// Sympathetic gain on cardiac contractility
    pub symp_contractility_gain: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            map_setpoint: 93.0,
            cardiac_output_nom: 5.0,
            extracellular_fluid_nom: 15.0,
            blood_volume_nom: 5.0,
            sodium_intake_rate: 100.0 / (24.0 * 60.0),
            water_intake_per_day: 2.1,
            sodium_ref_concentration: 140.0,
            plasma_protein_concentration: 7.0,
            venous_pressure: 4.0,
            venous_resistance: 3.4,
            mean_filling_pressure_nom: 7.0,
            venous_compliance: 0.13,

            renal_blood_flow_nom: 1.0,
            nephron_count: 2.0e6,
            kf_nom: 3.9,
            oncotic_pressure_difference_nom: 28.0,
            renal_vein_pressure: 4.0,
            gfr_nom: 120.0,
            filtration_fraction_nom: 0.2,
            preafferent_resistance_nom: 19.0,
            afferent_diameter_nom: 1.5e-5,
            efferent_diameter_nom: 1.1e-5,

            proximal_na_reab_frac: 0.67,
            loop_henle_na_reab_frac: 0.25,
            distal_na_reab_frac: 0.05,
            collecting_duct_na_reab_frac: 0.02,

            renin_secretion_nom: 1.0,
            ace_activity_nom: 1.0,
            angiotensin_i_nom: 1.0,
            angiotensin_ii_nom: 1.0,
            aldosterone_nom: 1.0,

            tau_renin: 60.0,
            tau_angiotensin_i: 1.0,
            tau_angiotensin_ii: 2.0,
            tau_aldosterone: 30.0,
            tau_adh: 30.0,
            tau_na_transport: 5.0,
            tau_water_transport: 5.0,

            circadian_amplitude: 0.1,
            circadian_phase: 0.0,

            tissue_autoreg_scale: 1.0,
            kp_cardiac_output: 1.0,
            ki_cardiac_output: 0.1,
            cardiac_output_scale: 1.0,
            blood_volume_scale: 1.0,
            systemic_arterial_resistance_nom: 20.0,
            at1_svr_slope: 0.5,
            at1_bound_angii_nom: 1.0,
            at1_preaff_scale: 1.0,
            at1_preaff_slope: 0.5,
            preaff_signal_nonlin_scale: 1.0,

            sympathetic_tone_nom: 1.0,
            parasympathetic_tone_nom: 1.0,
            renal_symp_activity_nom: 1.0,
            baroreceptor_lower_threshold: 60.0,
            baroreceptor_upper_threshold: 160.0,
            tau_symp_response: 1.0,
            tau_parasymp_response: 0.5,
            tau_cardiac_response: 0.5,
            symp_vasoconstriction_gain: 0.5,
            symp_renin_gain: 0.5,
            symp_na_reabsorption_gain: 0.3,
            symp_hr_gain: 0.5,
            parasymp_hr_gain: -0.3,
            symp_contractility_gain: 0.3,
        }
    }
}

impl Parameters {
    /// Build a parameter set from the defaults with named overrides applied.
    ///
    /// Keys are the snake_case field names of this struct, e.g.
    /// `"sodium_intake_rate"`. An unknown key is an error rather than a
    /// silent no-op, as is a non-finite value.
    pub fn with_overrides(overrides: &HashMap<String, f64>) -> Result<Self> {
        let mut value = serde_json::to_value(Parameters::default())?;
        let fields = value
            .as_object_mut()
            .ok_or_else(|| eyre!("parameter set did not serialize to a map"))?;

        for (name, val) in overrides {
            if !fields.contains_key(name.as_str()) {
                bail!("unknown parameter: {}", name);
            }
            if !val.is_finite() {
                bail!("parameter {} must be finite, got {}", name, val);
            }
            fields.insert(name.clone(), serde_json::Value::from(*val));
        }

        Ok(serde_json::from_value(value)?)
    }
}
