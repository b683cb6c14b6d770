//! Glomerular filtration, tubular sodium/water transport and the hormonal
//! cascade (renin, angiotensin, aldosterone, ADH).
//!
//! Transport is a strictly sequential pipeline: filtrate leaves the
//! glomerulus and is reabsorbed stage by stage in the proximal tubule, the
//! loop of Henle and the distal tubule/collecting duct; whatever remains is
//! urine. Hormone levels are computed as synthesis targets which the state
//! relaxes toward; ADH alone is purely algebraic and never integrated.

use crate::model::neural::RenalSympatheticEffects;
use crate::model::parameters::Parameters;
use crate::model::state::ModelState;

/// Lower bound for normalized hormone levels.
pub const HORMONE_MIN: f64 = 0.1;
/// Upper bound for normalized hormone levels.
pub const HORMONE_MAX: f64 = 5.0;

/// Reference plasma osmolarity (mOsm/L).
const OSMOLARITY_REF: f64 = 290.0;
/// Reference plasma potassium (mEq/L).
const POTASSIUM_REF: f64 = 4.0;
/// Flows below this magnitude are treated as zero to keep the
/// glomerulotubular ratio and medullary gradient finite.
const FLOW_EPS: f64 = 1e-9;

/// Sodium/water balance of a single reabsorption stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TubuleStage {
    /// Sodium leaving the stage (mEq/min).
    pub sodium_out: f64,
    /// Water leaving the stage (ml/min).
    pub water_out: f64,
    /// Sodium reabsorbed in the stage (mEq/min).
    pub sodium_reabsorption: f64,
    /// Water reabsorbed in the stage (ml/min).
    pub water_reabsorption: f64,
}

/// Loop of Henle balance, including the countercurrent gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopHenleStage {
    pub sodium_out: f64,
    pub water_out: f64,
    pub sodium_reabsorption: f64,
    pub water_reabsorption: f64,
    /// Medullary concentration gradient (mEq/ml).
    pub medullary_gradient: f64,
}

/// Output of one full tubular transport pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TubularFunction {
    /// Glomerular filtration rate (ml/min); may be non-positive during
    /// transients with collapsed filtration pressure.
    pub gfr: f64,
    /// Filtered sodium load (mEq/min).
    pub filtered_sodium: f64,
    /// Filtered water (ml/min).
    pub filtered_water: f64,
    pub proximal: TubuleStage,
    pub loop_of_henle: LoopHenleStage,
    /// Distal tubule and collecting duct combined.
    pub distal: TubuleStage,
    /// Final urine flow (ml/min).
    pub urine_flow: f64,
    /// Final urinary sodium excretion (mEq/min).
    pub sodium_excretion: f64,
    /// ADH level used by the water-handling stages (normalized).
    pub adh: f64,
}

/// Hormone synthesis targets for one derivative evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HormonalRegulation {
    pub renin_release: f64,
    pub angiotensin_i: f64,
    pub angiotensin_ii: f64,
    pub aldosterone: f64,
    pub adh: f64,
    /// Distal sodium delivery echoed from the state (mEq/min).
    pub distal_sodium_delivery: f64,
    /// ACE activity echoed from the state (normalized).
    pub ace_activity: f64,
}

/// 24 h periodic modulation applied to GFR and hormone synthesis.
pub fn circadian_factor(params: &Parameters, t: f64) -> f64 {
    let hours = (t / 60.0) % 24.0;
    let phase = 2.0 * std::f64::consts::PI * hours / 24.0 + params.circadian_phase;
    1.0 + params.circadian_amplitude * phase.sin()
}

/// Algebraic ADH level from osmolarity, pressure and sympathetic drive.
///
/// Rises with osmolarity and sympathetic activity, falls with pressure.
/// The baseline is tied to the aldosterone nominal constant, not a separate
/// ADH constant.
pub fn adh_level(params: &Parameters, osmolarity: f64, map: f64, sympathetic_activity: f64) -> f64 {
    let osm_effect = 1.0 + 0.5 * (osmolarity - OSMOLARITY_REF) / OSMOLARITY_REF;
    let pressure_effect = 1.0 - 0.3 * (map - params.map_setpoint) / params.map_setpoint;
    let symp_effect = 1.0 + 0.2 * (sympathetic_activity - 1.0);
    (params.aldosterone_nom * osm_effect * pressure_effect * symp_effect)
        .clamp(HORMONE_MIN, HORMONE_MAX)
}

/// One tubular transport pass: filtration followed by the sequential
/// reabsorption stages.
///
/// When `renal_sym` is absent every neural multiplier defaults to 1.0.
pub fn tubular_function(
    params: &Parameters,
    state: &ModelState,
    t: f64,
    renal_sym: Option<&RenalSympatheticEffects>,
) -> TubularFunction {
    let circadian = circadian_factor(params, t);

    let sympathetic_activity = renal_sym.map_or(1.0, |n| n.nerve_activity);
    let adh = adh_level(
        params,
        state.plasma_osmolarity,
        state.mean_arterial_pressure,
        sympathetic_activity,
    );

    let gfr = params.kf_nom
        * (state.glomerular_pressure
            - state.bowmans_capsule_pressure
            - params.oncotic_pressure_difference_nom)
        * circadian;
    let filtered_sodium = gfr * state.plasma_sodium;
    let filtered_water = gfr;

    let sodium_reab_effect = renal_sym.map_or(1.0, |n| n.sodium_reabsorption);

    let proximal = proximal_reabsorption(
        params,
        filtered_sodium,
        filtered_water,
        state.angiotensin_ii,
        sodium_reab_effect,
    );
    let loop_of_henle = loop_of_henle(params, proximal.sodium_out, proximal.water_out, adh);
    let distal = distal_function(
        params,
        loop_of_henle.sodium_out,
        loop_of_henle.water_out,
        state.aldosterone,
        adh,
        sodium_reab_effect,
    );

    TubularFunction {
        gfr,
        filtered_sodium,
        filtered_water,
        proximal,
        loop_of_henle,
        distal,
        urine_flow: distal.water_out,
        sodium_excretion: distal.sodium_out,
        adh,
    }
}

/// Hormone synthesis targets from the current state.
///
/// Targets chain within the pass: angiotensin I is driven by the fresh renin
/// release and angiotensin II by that angiotensin I through ACE, so the
/// cascade reacts within a single evaluation rather than waiting a full
/// relaxation time per stage.
pub fn hormonal_regulation(
    params: &Parameters,
    state: &ModelState,
    t: f64,
    renal_sym: Option<&RenalSympatheticEffects>,
) -> HormonalRegulation {
    let circadian = circadian_factor(params, t);

    let renin_stimulation = renal_sym.map_or(1.0, |n| n.renin_stimulation);
    let renin_release = renin_release(
        params,
        state.mean_arterial_pressure,
        state.distal_sodium_delivery,
        circadian,
        renin_stimulation,
    );

    let angiotensin_i = renin_release * params.angiotensin_i_nom;
    let angiotensin_ii = angiotensin_i * state.ace_activity;

    let aldosterone = aldosterone_level(params, angiotensin_ii, state.plasma_potassium, circadian);

    let sympathetic_activity = renal_sym.map_or(1.0, |n| n.nerve_activity);
    let adh = adh_level(
        params,
        state.plasma_osmolarity,
        state.mean_arterial_pressure,
        sympathetic_activity,
    );

    HormonalRegulation {
        renin_release,
        angiotensin_i,
        angiotensin_ii,
        aldosterone,
        adh,
        distal_sodium_delivery: state.distal_sodium_delivery,
        ace_activity: state.ace_activity,
    }
}

/// Proximal tubule: fractional sodium reabsorption scaled by angiotensin II
/// and sympathetic drive; water follows sodium (glomerulotubular balance).
fn proximal_reabsorption(
    params: &Parameters,
    sodium_in: f64,
    water_in: f64,
    angiotensin_ii: f64,
    sodium_reab_effect: f64,
) -> TubuleStage {
    let angii_effect = 1.0 + 0.3 * (angiotensin_ii - params.angiotensin_ii_nom);
    let sodium_reabsorption =
        params.proximal_na_reab_frac * sodium_in * angii_effect * sodium_reab_effect;

    let water_reabsorption = if sodium_in.abs() <= FLOW_EPS {
        0.0
    } else {
        water_in * (sodium_reabsorption / sodium_in)
    };

    TubuleStage {
        sodium_out: sodium_in - sodium_reabsorption,
        water_out: water_in - water_reabsorption,
        sodium_reabsorption,
        water_reabsorption,
    }
}

/// Loop of Henle: fixed-fraction sodium reabsorption in the ascending limb,
/// ADH-scaled water reabsorption in the descending limb.
fn loop_of_henle(params: &Parameters, sodium_in: f64, water_in: f64, adh: f64) -> LoopHenleStage {
    let sodium_reabsorption = params.loop_henle_na_reab_frac * sodium_in;
    let sodium_out = sodium_in - sodium_reabsorption;

    let adh_effect = 1.0 + 0.5 * (adh - 1.0);
    let water_reabsorption = water_in * params.loop_henle_na_reab_frac * adh_effect;
    let water_out = water_in - water_reabsorption;

    let medullary_gradient = if water_out.abs() <= FLOW_EPS {
        0.0
    } else {
        sodium_reabsorption / water_out
    };

    LoopHenleStage {
        sodium_out,
        water_out,
        sodium_reabsorption,
        water_reabsorption,
        medullary_gradient,
    }
}

/// Distal tubule and collecting duct: two sequential aldosterone- and
/// neurally-scaled sodium reabsorption steps, ADH-scaled water reabsorption.
fn distal_function(
    params: &Parameters,
    sodium_in: f64,
    water_in: f64,
    aldosterone: f64,
    adh: f64,
    sodium_reab_effect: f64,
) -> TubuleStage {
    let aldosterone_effect = 1.0 + 0.5 * (aldosterone - params.aldosterone_nom);
    let adh_effect = 1.0 + 0.8 * (adh - 1.0);

    let distal_reab =
        params.distal_na_reab_frac * sodium_in * aldosterone_effect * sodium_reab_effect;
    let duct_reab = params.collecting_duct_na_reab_frac
        * (sodium_in - distal_reab)
        * aldosterone_effect
        * sodium_reab_effect;

    let water_reabsorption = water_in * 0.9 * adh_effect;

    TubuleStage {
        sodium_out: sodium_in - distal_reab - duct_reab,
        water_out: water_in - water_reabsorption,
        sodium_reabsorption: distal_reab + duct_reab,
        water_reabsorption,
    }
}

/// Renin release from perfusion pressure, macula densa feedback, circadian
/// phase and sympathetic stimulation.
fn renin_release(
    params: &Parameters,
    map: f64,
    distal_sodium_delivery: f64,
    circadian: f64,
    renin_stimulation: f64,
) -> f64 {
    // Low pressure and low distal salt delivery both stimulate release
    let pressure_effect = 1.0 + 2.0 * (params.map_setpoint - map) / params.map_setpoint;
    let macula_densa_effect = 1.0 + 0.5 * (1.0 - distal_sodium_delivery / params.gfr_nom);

    (params.renin_secretion_nom * pressure_effect * macula_densa_effect * circadian * renin_stimulation)
        .clamp(HORMONE_MIN, HORMONE_MAX)
}

/// Aldosterone from angiotensin II, plasma potassium and circadian phase.
fn aldosterone_level(params: &Parameters, angiotensin_ii: f64, plasma_potassium: f64, circadian: f64) -> f64 {
    let angii_effect = 1.0 + 0.5 * (angiotensin_ii - params.angiotensin_ii_nom);
    let potassium_effect = 1.0 + 0.3 * (plasma_potassium - POTASSIUM_REF);

    (params.aldosterone_nom * angii_effect * potassium_effect * circadian)
        .clamp(HORMONE_MIN, HORMONE_MAX)
}
