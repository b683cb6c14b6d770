//! Autonomic nervous system control of the circulation and the kidney.
//!
//! Baroreceptor firing is a pure function of mean arterial pressure; from it
//! the sympathetic and parasympathetic tones relax toward their targets, and
//! the tones in turn set heart rate, contractility, vascular tone and renal
//! sympathetic nerve activity. Everything here is stateless: each call
//! recomputes the full effect bundle from the pressure and tones it is given.

use crate::model::parameters::Parameters;

/// Lower bound for autonomic tones and nerve activity.
pub const TONE_MIN: f64 = 0.1;
/// Upper bound for autonomic tones and nerve activity.
pub const TONE_MAX: f64 = 5.0;

/// Steepness of the logistic baroreceptor response.
const BARORECEPTOR_STEEPNESS: f64 = 8.0;
/// Resting heart rate (beats/min).
const HEART_RATE_BASELINE: f64 = 72.0;
/// Bradycardia floor and tachycardia ceiling (beats/min).
const HEART_RATE_MIN: f64 = 40.0;
const HEART_RATE_MAX: f64 = 180.0;
/// Resting stroke volume (ml/beat).
const STROKE_VOLUME_BASELINE: f64 = 70.0;
/// Sympathetic gain on venous tone.
const VENOUS_TONE_GAIN: f64 = 0.3;
/// Resting cardiac output in ml/min; normalizes heart rate x stroke volume.
const CARDIAC_OUTPUT_NORM: f64 = 5000.0;

/// Sympathetic/parasympathetic tone after one relaxation step, plus the raw
/// targets the state derivatives relax toward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutonomicTone {
    /// Relaxed and clamped sympathetic tone used by downstream effects.
    pub sympathetic_tone: f64,
    /// Relaxed and clamped parasympathetic tone used by downstream effects.
    pub parasympathetic_tone: f64,
    /// Baroreceptor firing rate in [0, 2], 1.0 at the pressure setpoint.
    pub baroreceptor_firing: f64,
    /// Unclamped sympathetic tone target.
    pub target_sympathetic: f64,
    /// Unclamped parasympathetic tone target.
    pub target_parasympathetic: f64,
}

/// Renal-specific sympathetic effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenalSympatheticEffects {
    /// Renal sympathetic nerve activity (normalized).
    pub nerve_activity: f64,
    /// Multiplier on renal vascular resistance.
    pub vasoconstriction: f64,
    /// Multiplier on renin release.
    pub renin_stimulation: f64,
    /// Multiplier on tubular sodium reabsorption.
    pub sodium_reabsorption: f64,
}

/// Autonomic effects on the heart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardiacEffects {
    /// Heart rate (beats/min), clamped to physiological limits.
    pub heart_rate: f64,
    /// Contractility multiplier.
    pub contractility: f64,
    /// Stroke volume (ml/beat).
    pub stroke_volume: f64,
    /// Combined cardiac output multiplier, approximately 1.0 at rest.
    pub output_factor: f64,
}

/// Sympathetic effects on the vasculature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VascularEffects {
    /// Multiplier on systemic vascular resistance.
    pub systemic_resistance_factor: f64,
    /// Multiplier on venous tone, raising mean filling pressure.
    pub venous_tone_factor: f64,
}

/// Full per-step neural effect bundle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeuralEffects {
    pub autonomic: AutonomicTone,
    pub renal: RenalSympatheticEffects,
    pub cardiac: CardiacEffects,
    pub vascular: VascularEffects,
}

impl RenalSympatheticEffects {
    /// Bundle with every multiplier at 1.0, equivalent to no neural input.
    pub fn neutral() -> Self {
        RenalSympatheticEffects {
            nerve_activity: 1.0,
            vasoconstriction: 1.0,
            renin_stimulation: 1.0,
            sodium_reabsorption: 1.0,
        }
    }
}

/// Baroreceptor firing rate as a function of mean arterial pressure.
///
/// Saturates hard at 0.0 at or below the lower threshold and at 2.0 at or
/// above the upper threshold; between them it follows a logistic curve
/// centered on the nominal setpoint, so firing is exactly 1.0 when the
/// pressure sits at the setpoint.
pub fn baroreceptor_firing_rate(params: &Parameters, map: f64) -> f64 {
    if map >= params.baroreceptor_upper_threshold {
        return 2.0;
    }
    if map <= params.baroreceptor_lower_threshold {
        return 0.0;
    }
    let span = params.baroreceptor_upper_threshold - params.baroreceptor_lower_threshold;
    let normalized = (map - params.baroreceptor_lower_threshold) / span;
    let setpoint_fraction = (params.map_setpoint - params.baroreceptor_lower_threshold) / span;
    2.0 / (1.0 + (-BARORECEPTOR_STEEPNESS * (normalized - setpoint_fraction)).exp())
}

/// Compute the full neural effect bundle for one derivative evaluation.
///
/// High firing (high pressure) suppresses sympathetic and raises
/// parasympathetic tone; the downstream cardiac, vascular and renal effects
/// are computed from the relaxed, clamped tones rather than the raw targets.
pub fn compute_neural_effects(
    params: &Parameters,
    map: f64,
    current_sympathetic: f64,
    current_parasympathetic: f64,
) -> NeuralEffects {
    let autonomic = autonomic_tone(params, map, current_sympathetic, current_parasympathetic);
    let renal = renal_sympathetic_effects(params, autonomic.sympathetic_tone);
    let cardiac = cardiac_effects(
        params,
        autonomic.sympathetic_tone,
        autonomic.parasympathetic_tone,
    );
    let vascular = vascular_effects(params, autonomic.sympathetic_tone);
    NeuralEffects {
        autonomic,
        renal,
        cardiac,
        vascular,
    }
}

fn autonomic_tone(
    params: &Parameters,
    map: f64,
    current_sympathetic: f64,
    current_parasympathetic: f64,
) -> AutonomicTone {
    let firing = baroreceptor_firing_rate(params, map);

    // Inverse relation for sympathetic, direct for parasympathetic
    let target_sympathetic = params.sympathetic_tone_nom * (2.0 - firing);
    let target_parasympathetic = params.parasympathetic_tone_nom * firing;

    let sympathetic_tone = (current_sympathetic
        + (target_sympathetic - current_sympathetic) / params.tau_symp_response)
        .clamp(TONE_MIN, TONE_MAX);
    let parasympathetic_tone = (current_parasympathetic
        + (target_parasympathetic - current_parasympathetic) / params.tau_parasymp_response)
        .clamp(TONE_MIN, TONE_MAX);

    AutonomicTone {
        sympathetic_tone,
        parasympathetic_tone,
        baroreceptor_firing: firing,
        target_sympathetic,
        target_parasympathetic,
    }
}

fn renal_sympathetic_effects(params: &Parameters, sympathetic_tone: f64) -> RenalSympatheticEffects {
    let nerve_activity = params.renal_symp_activity_nom * sympathetic_tone;
    RenalSympatheticEffects {
        nerve_activity,
        vasoconstriction: 1.0 + (nerve_activity - 1.0) * params.symp_vasoconstriction_gain,
        renin_stimulation: 1.0 + (nerve_activity - 1.0) * params.symp_renin_gain,
        sodium_reabsorption: 1.0 + (nerve_activity - 1.0) * params.symp_na_reabsorption_gain,
    }
}

fn cardiac_effects(params: &Parameters, sympathetic_tone: f64, parasympathetic_tone: f64) -> CardiacEffects {
    let heart_rate = (HEART_RATE_BASELINE
        + (sympathetic_tone - 1.0) * params.symp_hr_gain * HEART_RATE_BASELINE
        + (parasympathetic_tone - 1.0) * params.parasymp_hr_gain * HEART_RATE_BASELINE)
        .clamp(HEART_RATE_MIN, HEART_RATE_MAX);

    let contractility = 1.0 + (sympathetic_tone - 1.0) * params.symp_contractility_gain;
    let stroke_volume = STROKE_VOLUME_BASELINE * contractility;

    CardiacEffects {
        heart_rate,
        contractility,
        stroke_volume,
        output_factor: heart_rate * stroke_volume / CARDIAC_OUTPUT_NORM,
    }
}

fn vascular_effects(params: &Parameters, sympathetic_tone: f64) -> VascularEffects {
    VascularEffects {
        systemic_resistance_factor: 1.0
            + (sympathetic_tone - 1.0) * params.symp_vasoconstriction_gain,
        venous_tone_factor: 1.0 + (sympathetic_tone - 1.0) * VENOUS_TONE_GAIN,
    }
}
