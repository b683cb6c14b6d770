use eyre::Result;
use renocore::prelude::*;

use std::collections::HashMap;

fn nominal_model(neural_coupling: bool) -> (RegulationModel, ModelState) {
    let params = Parameters::default();
    let state = ModelState::nominal(&params);
    (RegulationModel::new(params, neural_coupling), state)
}

/// Test that the slow pressure and hormone states barely move at the
/// nominal operating point
#[test]
fn test_nominal_state_is_near_equilibrium() {
    for coupling in [false, true] {
        let (model, state) = nominal_model(coupling);
        let d = model.derivatives(0.0, &state.to_vector());
        // mean_arterial_pressure
        assert!(d[3].abs() < 0.5, "coupling {}: dMAP {}", coupling, d[3]);
        // renin
        assert!(d[4].abs() < 0.02, "coupling {}: drenin {}", coupling, d[4]);
        // angiotensin_ii
        assert!(d[6].abs() < 0.3, "coupling {}: dangii {}", coupling, d[6]);
        // aldosterone
        assert!(d[7].abs() < 0.02, "coupling {}: daldo {}", coupling, d[7]);
    }
}

/// Test the sodium mass balance identity against the tubular pass
#[test]
fn test_sodium_derivative_matches_intake_minus_excretion() {
    let (model, state) = nominal_model(false);
    let eval = model.evaluate(0.0, &state);
    let d = model.derivatives(0.0, &state.to_vector());
    let expected = model.params().sodium_intake_rate - eval.tubular.sodium_excretion / 1000.0;
    assert!((d[16] - expected).abs() < 1e-12);
}

/// Test that matching the sodium intake to the nominal excretion produces
/// an exact sodium steady state
#[test]
fn test_adjusted_sodium_intake_balances_excretion() -> Result<()> {
    let (model, state) = nominal_model(false);
    let excretion = model.evaluate(0.0, &state).tubular.sodium_excretion / 1000.0;

    let mut overrides = HashMap::new();
    overrides.insert("sodium_intake_rate".to_string(), excretion);
    let balanced = RegulationModel::new(Parameters::with_overrides(&overrides)?, false);

    let d = balanced.derivatives(0.0, &state.to_vector());
    assert!(d[16].abs() < 1e-12, "sodium derivative {}", d[16]);
    Ok(())
}

/// Test that sodium excretion falls with plasma sodium, restoring the balance
#[test]
fn test_sodium_excretion_restores_low_plasma_sodium() {
    let (model, mut state) = nominal_model(false);
    let mut previous = f64::NEG_INFINITY;
    for sodium in [140.0, 120.0, 60.0, 0.0] {
        state.plasma_sodium = sodium;
        let d = model.derivatives(0.0, &state.to_vector());
        assert!(d[16] > previous, "no restoring trend at sodium {}", sodium);
        previous = d[16];
    }
    // With no plasma sodium there is nothing to excrete, so intake dominates
    assert!(previous > 0.0);
}

/// Test that blood volume drifts only slowly at the nominal operating point
/// and that the water bookkeeping state tracks it exactly
#[test]
fn test_fluid_balance_drifts_slowly_at_nominal() {
    let (model, state) = nominal_model(false);
    let d = model.derivatives(0.0, &state.to_vector());
    assert!(d[0].abs() < 1e-3, "blood volume drift {}", d[0]);
    assert_eq!(d[0].to_bits(), d[17].to_bits());
}

/// Test the osmolarity derivative identity: sodium counts twice for its
/// accompanying anions, potassium once, normalized by blood volume
#[test]
fn test_osmolarity_derivative_identity() {
    let (model, state) = nominal_model(false);
    let d = model.derivatives(0.0, &state.to_vector());
    let expected = (2.0 * d[16] + d[18]) / state.blood_volume;
    assert!((d[19] - expected).abs() < 1e-12);
}

/// Test that repeated integrations of the same problem agree exactly
#[test]
fn test_repeated_runs_are_deterministic() -> Result<()> {
    let (model, state) = nominal_model(true);
    let config = Config {
        duration: 120.0,
        ..Config::default()
    };

    let a = simulate_model(&model, state, &config)?;
    let b = simulate_model(&model, state, &config)?;

    assert_eq!(a.times, b.times);
    assert_eq!(a.states.last(), b.states.last());
    assert_eq!(a.derived.last(), b.derived.last());
    Ok(())
}
