//! The coupled regulation model.
//!
//! [`RegulationModel`] owns the parameter set and orchestrates one
//! derivative evaluation: neural effects (when coupled), systemic
//! hemodynamics, renal vasculature, tubular transport and hormonal
//! regulation, in that order, each pass consuming the outputs of the ones
//! before it. The derivative function is pure: it reads only the supplied
//! time and state and the read-only parameters, so adaptive integrators can
//! re-evaluate any point freely.

pub mod neural;
pub mod parameters;
pub mod state;
pub mod tubular;

use neural::{NeuralEffects, RenalSympatheticEffects};
use parameters::Parameters;
use state::{ModelState, StateVector};
use tubular::{HormonalRegulation, TubularFunction};

/// Time constant for slow vascular and pressure adaptation (min).
const PRESSURE_ADAPTATION_TAU: f64 = 60.0;
/// Fraction of arterial pressure transmitted to the glomerulus.
const GLOMERULAR_PRESSURE_FRACTION: f64 = 0.6;
/// Nominal Bowman's capsule pressure (mmHg).
const BOWMANS_PRESSURE_NOM: f64 = 15.0;
/// Floor on the tissue autoregulation signal.
const AUTOREG_FLOOR: f64 = 0.1;
/// Constant dietary potassium intake (mEq/min).
const POTASSIUM_INTAKE: f64 = 0.1;
/// Reference plasma potassium (mEq/L).
const POTASSIUM_REF: f64 = 4.0;
/// Tubular flows are ml-based; mass balances are L-based.
const ML_PER_L: f64 = 1000.0;

/// Systemic pressures, flows and resistances for one evaluation.
///
/// The optional fields echo the neural pass and are only populated when the
/// model runs with neural coupling enabled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hemodynamics {
    /// Systemic arterial resistance (mmHg per L/min).
    pub systemic_arterial_resistance: f64,
    /// Cardiac output (L/min).
    pub cardiac_output: f64,
    /// Mean arterial pressure (mmHg).
    pub mean_arterial_pressure: f64,
    /// Total peripheral resistance (mmHg per L/min).
    pub total_peripheral_resistance: f64,
    pub heart_rate: Option<f64>,
    pub stroke_volume: Option<f64>,
    pub sympathetic_tone: Option<f64>,
    pub parasympathetic_tone: Option<f64>,
}

/// Renal perfusion quantities for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenalVasculature {
    /// Renal blood flow (L/min).
    pub renal_blood_flow: f64,
    /// Total renal vascular resistance (mmHg per L/min).
    pub renal_vascular_resistance: f64,
    /// Preafferent arteriole resistance (mmHg per L/min).
    pub preafferent_resistance: f64,
    /// Echo of renal sympathetic nerve activity when neural-coupled.
    pub renal_sympathetic_activity: Option<f64>,
}

/// All effect bundles produced by one derivative evaluation, in evaluation
/// order. Step-scoped: built fresh per call and never cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepEvaluation {
    pub neural: Option<NeuralEffects>,
    pub hemodynamics: Hemodynamics,
    pub renal: RenalVasculature,
    pub tubular: TubularFunction,
    pub hormones: HormonalRegulation,
}

/// The lumped-parameter blood pressure and renal regulation model.
#[derive(Debug, Clone)]
pub struct RegulationModel {
    params: Parameters,
    neural_coupling: bool,
}

impl RegulationModel {
    pub fn new(params: Parameters, neural_coupling: bool) -> Self {
        RegulationModel {
            params,
            neural_coupling,
        }
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn neural_coupling(&self) -> bool {
        self.neural_coupling
    }

    /// Neural effect bundle for the given pressure and current tones.
    pub fn compute_neural_effects(
        &self,
        map: f64,
        sympathetic_tone: f64,
        parasympathetic_tone: f64,
    ) -> NeuralEffects {
        neural::compute_neural_effects(&self.params, map, sympathetic_tone, parasympathetic_tone)
    }

    /// Systemic hemodynamics: autoregulated arterial resistance, venous
    /// return and the Ohm's-law pressure that closes the feedback loop.
    pub fn compute_hemodynamics(
        &self,
        state: &ModelState,
        neural: Option<&NeuralEffects>,
    ) -> Hemodynamics {
        let p = &self.params;

        // PI control on cardiac output error, floored to keep resistance positive
        let autoreg = (1.0
            + p.tissue_autoreg_scale
                * ((p.kp_cardiac_output / p.cardiac_output_scale)
                    * (state.cardiac_output_delayed - p.cardiac_output_nom)
                    + (p.ki_cardiac_output / p.cardiac_output_scale) * state.co_error))
            .max(AUTOREG_FLOOR);

        let at1_intercept = 1.0 - p.at1_svr_slope * p.at1_bound_angii_nom;
        let at1_effect = at1_intercept + p.at1_svr_slope * state.angiotensin_ii;

        let neural_svr = neural.map_or(1.0, |n| n.vascular.systemic_resistance_factor);
        let systemic_arterial_resistance =
            p.systemic_arterial_resistance_nom * autoreg * at1_effect * neural_svr;

        // Guyton-style weighting of venous and arterial resistance
        let venous_return_resistance =
            (8.0 * p.venous_resistance + systemic_arterial_resistance) / 31.0;

        let venous_tone = neural.map_or(1.0, |n| n.vascular.venous_tone_factor);
        let mean_filling_pressure = (p.mean_filling_pressure_nom
            + (state.blood_volume / p.blood_volume_scale - p.blood_volume_nom)
                / p.venous_compliance)
            * venous_tone;

        let cardiac_factor = neural.map_or(1.0, |n| n.cardiac.output_factor);
        let cardiac_output = mean_filling_pressure / venous_return_resistance * cardiac_factor;

        let total_peripheral_resistance = systemic_arterial_resistance + p.venous_resistance;
        let mean_arterial_pressure = cardiac_output * total_peripheral_resistance;

        Hemodynamics {
            systemic_arterial_resistance,
            cardiac_output,
            mean_arterial_pressure,
            total_peripheral_resistance,
            heart_rate: neural.map(|n| n.cardiac.heart_rate),
            stroke_volume: neural.map(|n| n.cardiac.stroke_volume),
            sympathetic_tone: neural.map(|n| n.autonomic.sympathetic_tone),
            parasympathetic_tone: neural.map(|n| n.autonomic.parasympathetic_tone),
        }
    }

    /// Renal vasculature: preafferent resistance through the saturating
    /// signal transform, then series resistance and perfusion.
    pub fn compute_renal_vasculature(
        &self,
        state: &ModelState,
        hemodynamics: &Hemodynamics,
        renal_sym: Option<&RenalSympatheticEffects>,
    ) -> RenalVasculature {
        let p = &self.params;

        let at1_intercept = 1.0 - p.at1_preaff_scale / 2.0;
        let at1_effect = at1_intercept
            + p.at1_preaff_scale
                / (1.0
                    + (-(state.angiotensin_ii - p.at1_bound_angii_nom) / p.at1_preaff_slope).exp());

        let vasoconstriction = renal_sym.map_or(1.0, |n| n.vasoconstriction);
        let signal =
            at1_effect * state.preafferent_autoreg_signal * state.ccb_effect * vasoconstriction;

        // Squash into (0.5, 1.5) so the resistance saturates instead of diverging
        let adjusted_signal =
            1.0 / (1.0 + (p.preaff_signal_nonlin_scale * (1.0 - signal)).exp()) + 0.5;
        let preafferent_resistance = p.preafferent_resistance_nom * adjusted_signal;

        // Afferent, efferent and peritubular resistances act per nephron, in parallel
        let renal_vascular_resistance = preafferent_resistance
            + (state.afferent_resistance + state.efferent_resistance + state.peritubular_resistance)
                / p.nephron_count;

        let renal_blood_flow =
            (hemodynamics.mean_arterial_pressure - p.venous_pressure) / renal_vascular_resistance;

        RenalVasculature {
            renal_blood_flow,
            renal_vascular_resistance,
            preafferent_resistance,
            renal_sympathetic_activity: renal_sym.map(|n| n.nerve_activity),
        }
    }

    /// Tubular transport pass. The perfusion bundle is accepted for call
    /// symmetry with the other passes; transport itself is driven by the
    /// filtration pressures carried in the state.
    pub fn compute_tubular_function(
        &self,
        state: &ModelState,
        _renal_flow: &RenalVasculature,
        t: f64,
        renal_sym: Option<&RenalSympatheticEffects>,
    ) -> TubularFunction {
        tubular::tubular_function(&self.params, state, t, renal_sym)
    }

    /// Hormonal regulation pass.
    pub fn compute_hormonal_regulation(
        &self,
        state: &ModelState,
        t: f64,
        renal_sym: Option<&RenalSympatheticEffects>,
    ) -> HormonalRegulation {
        tubular::hormonal_regulation(&self.params, state, t, renal_sym)
    }

    /// Run every pass for one instant and return all effect bundles.
    ///
    /// This is the single evaluation path used both by [`Self::derivatives`]
    /// and by diagnostic output, so derived series always agree with what
    /// the integrator saw.
    pub fn evaluate(&self, t: f64, state: &ModelState) -> StepEvaluation {
        let neural = if self.neural_coupling {
            Some(self.compute_neural_effects(
                state.mean_arterial_pressure,
                state.sympathetic_tone,
                state.parasympathetic_tone,
            ))
        } else {
            None
        };
        let renal_sym = neural.as_ref().map(|n| &n.renal);

        let hemodynamics = self.compute_hemodynamics(state, neural.as_ref());
        let renal = self.compute_renal_vasculature(state, &hemodynamics, renal_sym);
        let tubular = self.compute_tubular_function(state, &renal, t, renal_sym);
        let hormones = self.compute_hormonal_regulation(state, t, renal_sym);

        StepEvaluation {
            neural,
            hemodynamics,
            renal,
            tubular,
            hormones,
        }
    }

    /// Time derivative of the state vector, as handed to the integrator.
    ///
    /// Index-for-index correspondence with the input vector is the core
    /// invariant here; both sides go through the same [`ModelState`]
    /// encoding.
    pub fn derivatives(&self, t: f64, y: &StateVector) -> StateVector {
        let state = ModelState::from_vector(y);
        let eval = self.evaluate(t, &state);
        self.assemble(&state, &eval)
    }

    fn assemble(&self, s: &ModelState, eval: &StepEvaluation) -> StateVector {
        let p = &self.params;
        let mut d = ModelState::default();

        // Urine flow is ml/min, sodium excretion mEq-per-ml based
        let urine_flow = eval.tubular.urine_flow / ML_PER_L;
        let sodium_excretion = eval.tubular.sodium_excretion / ML_PER_L;

        d.blood_volume = p.water_intake_per_day / (24.0 * 60.0) - urine_flow;
        d.cardiac_output_delayed = (eval.hemodynamics.cardiac_output - s.cardiac_output_delayed)
            / PRESSURE_ADAPTATION_TAU;
        d.co_error = eval.hemodynamics.cardiac_output - p.cardiac_output_nom;
        d.mean_arterial_pressure = (eval.hemodynamics.mean_arterial_pressure
            - s.mean_arterial_pressure)
            / PRESSURE_ADAPTATION_TAU;

        d.renin = (eval.hormones.renin_release - s.renin) / p.tau_renin;
        d.angiotensin_i = (eval.hormones.angiotensin_i - s.angiotensin_i) / p.tau_angiotensin_i;
        d.angiotensin_ii = (eval.hormones.angiotensin_ii - s.angiotensin_ii) / p.tau_angiotensin_ii;
        d.aldosterone = (eval.hormones.aldosterone - s.aldosterone) / p.tau_aldosterone;
        d.ace_activity = (p.ace_activity_nom - s.ace_activity) / PRESSURE_ADAPTATION_TAU;

        d.preafferent_autoreg_signal =
            (1.0 - s.preafferent_autoreg_signal) / PRESSURE_ADAPTATION_TAU;
        d.ccb_effect = (1.0 - s.ccb_effect) / PRESSURE_ADAPTATION_TAU;
        d.afferent_resistance =
            (eval.renal.preafferent_resistance - s.afferent_resistance) / PRESSURE_ADAPTATION_TAU;
        d.efferent_resistance =
            (eval.renal.preafferent_resistance - s.efferent_resistance) / PRESSURE_ADAPTATION_TAU;
        d.peritubular_resistance = (eval.renal.preafferent_resistance - s.peritubular_resistance)
            / PRESSURE_ADAPTATION_TAU;

        d.glomerular_pressure = (eval.hemodynamics.mean_arterial_pressure
            * GLOMERULAR_PRESSURE_FRACTION
            - s.glomerular_pressure)
            / PRESSURE_ADAPTATION_TAU;
        d.bowmans_capsule_pressure =
            (BOWMANS_PRESSURE_NOM - s.bowmans_capsule_pressure) / PRESSURE_ADAPTATION_TAU;

        d.plasma_sodium = p.sodium_intake_rate - sodium_excretion;
        d.blood_volume_water = d.blood_volume;
        d.plasma_potassium = POTASSIUM_INTAKE - POTASSIUM_INTAKE * s.plasma_potassium / POTASSIUM_REF;
        // Sodium counts twice for its accompanying anions
        d.plasma_osmolarity = (2.0 * d.plasma_sodium + d.plasma_potassium) / s.blood_volume;
        d.distal_sodium_delivery =
            (sodium_excretion - s.distal_sodium_delivery) / p.tau_na_transport;

        if let Some(n) = &eval.neural {
            d.sympathetic_tone =
                (n.autonomic.target_sympathetic - s.sympathetic_tone) / p.tau_symp_response;
            d.parasympathetic_tone = (n.autonomic.target_parasympathetic - s.parasympathetic_tone)
                / p.tau_parasymp_response;
            d.renal_sympathetic_activity =
                (n.renal.nerve_activity - s.renal_sympathetic_activity) / p.tau_symp_response;
            d.heart_rate = (n.cardiac.heart_rate - s.heart_rate) / p.tau_cardiac_response;
            d.stroke_volume = (n.cardiac.stroke_volume - s.stroke_volume) / p.tau_cardiac_response;
        }

        d.to_vector()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nominal_setup(neural_coupling: bool) -> (RegulationModel, ModelState) {
        let params = Parameters::default();
        let state = ModelState::nominal(&params);
        (RegulationModel::new(params, neural_coupling), state)
    }

    #[test]
    fn pressure_closes_ohms_law() {
        let (model, state) = nominal_setup(true);
        let neural = model.compute_neural_effects(
            state.mean_arterial_pressure,
            state.sympathetic_tone,
            state.parasympathetic_tone,
        );
        let h = model.compute_hemodynamics(&state, Some(&neural));
        assert_eq!(
            h.mean_arterial_pressure,
            h.cardiac_output * h.total_peripheral_resistance
        );
    }

    #[test]
    fn nominal_hemodynamics_without_coupling() {
        let (model, state) = nominal_setup(false);
        let h = model.compute_hemodynamics(&state, None);
        // SAR at nominal is exactly the nominal resistance
        assert!((h.systemic_arterial_resistance - 20.0).abs() < 1e-9);
        assert!((h.cardiac_output - 7.0 / (47.2 / 31.0)).abs() < 1e-9);
        assert!(h.heart_rate.is_none());
        assert!(h.sympathetic_tone.is_none());
    }

    #[test]
    fn autoregulation_signal_is_floored() {
        let (model, mut state) = nominal_setup(false);
        state.cardiac_output_delayed = -100.0;
        state.co_error = -1000.0;
        let h = model.compute_hemodynamics(&state, None);
        let floored = model.params().systemic_arterial_resistance_nom * AUTOREG_FLOOR;
        assert!((h.systemic_arterial_resistance - floored).abs() < 1e-9);
    }

    #[test]
    fn volume_expansion_raises_cardiac_output() {
        let (model, mut state) = nominal_setup(false);
        let base = model.compute_hemodynamics(&state, None);
        state.blood_volume = 6.0;
        let expanded = model.compute_hemodynamics(&state, None);
        assert!(expanded.cardiac_output > base.cardiac_output);
        assert!(expanded.mean_arterial_pressure > base.mean_arterial_pressure);
    }

    #[test]
    fn preafferent_resistance_saturates() {
        let (model, mut state) = nominal_setup(false);
        let p = model.params().clone();
        let h = model.compute_hemodynamics(&state, None);

        state.angiotensin_ii = 1.0e6;
        let high = model.compute_renal_vasculature(&state, &h, None);
        state.angiotensin_ii = -1.0e6;
        let low = model.compute_renal_vasculature(&state, &h, None);

        let lo_bound = p.preafferent_resistance_nom * 0.5;
        let hi_bound = p.preafferent_resistance_nom * 1.5;
        for r in [high.preafferent_resistance, low.preafferent_resistance] {
            assert!(r.is_finite());
            assert!(r > lo_bound && r < hi_bound, "resistance {} escaped bounds", r);
        }
    }

    #[test]
    fn renal_flow_follows_perfusion_pressure() {
        let (model, state) = nominal_setup(false);
        let h = model.compute_hemodynamics(&state, None);
        let r = model.compute_renal_vasculature(&state, &h, None);
        let expected =
            (h.mean_arterial_pressure - model.params().venous_pressure) / r.renal_vascular_resistance;
        assert_eq!(r.renal_blood_flow, expected);
        assert!(r.renal_blood_flow > 0.0);
    }

    #[test]
    fn derivatives_are_pure() {
        let (model, state) = nominal_setup(true);
        let y = state.to_vector();
        let a = model.derivatives(0.0, &y);
        let b = model.derivatives(0.0, &y);
        for i in 0..crate::model::state::STATE_DIM {
            assert_eq!(a[i].to_bits(), b[i].to_bits(), "index {}", i);
        }
    }

    #[test]
    fn uncoupled_model_freezes_neural_states() {
        let (model, state) = nominal_setup(false);
        let d = model.derivatives(0.0, &state.to_vector());
        for i in 21..26 {
            assert_eq!(d[i], 0.0, "neural state {} drifted without coupling", i);
        }
    }

    #[test]
    fn coupled_model_relaxes_tones_toward_baroreceptor_targets() {
        let (model, mut state) = nominal_setup(true);
        state.mean_arterial_pressure = 120.0;
        let d = model.derivatives(0.0, &state.to_vector());
        // High pressure: sympathetic down, parasympathetic up
        assert!(d[21] < 0.0);
        assert!(d[22] > 0.0);
    }

    #[test]
    fn sodium_balance_matches_tubular_excretion() {
        let (model, state) = nominal_setup(false);
        let p = model.params().clone();
        let d = model.derivatives(0.0, &state.to_vector());
        let tf = tubular::tubular_function(&p, &state, 0.0, None);
        let expected = p.sodium_intake_rate - tf.sodium_excretion / 1000.0;
        assert!((d[16] - expected).abs() < 1e-12);
    }

    #[test]
    fn potassium_balances_at_reference_level() {
        let (model, state) = nominal_setup(false);
        let d = model.derivatives(0.0, &state.to_vector());
        assert_eq!(d[18], 0.0);
    }

    #[test]
    fn evaluate_populates_neural_only_when_coupled() {
        let (coupled, state) = nominal_setup(true);
        let (uncoupled, _) = nominal_setup(false);
        assert!(coupled.evaluate(0.0, &state).neural.is_some());
        assert!(uncoupled.evaluate(0.0, &state).neural.is_none());
        let h = coupled.evaluate(0.0, &state).hemodynamics;
        assert!(h.heart_rate.is_some());
    }
}
