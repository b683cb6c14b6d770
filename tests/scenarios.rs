use eyre::Result;
use renocore::prelude::*;

fn nominal_model(neural_coupling: bool) -> (RegulationModel, ModelState) {
    let params = Parameters::default();
    let state = ModelState::nominal(&params);
    (RegulationModel::new(params, neural_coupling), state)
}

/// Test the baroreflex response to a hypertensive pressure step
#[test]
fn test_hypertensive_pressure_silences_sympathetic_drive() {
    let (model, mut state) = nominal_model(true);
    state.mean_arterial_pressure = 180.0;

    assert_eq!(baroreceptor_firing_rate(model.params(), 180.0), 2.0);

    let d = model.derivatives(0.0, &state.to_vector());
    // sympathetic_tone falls, parasympathetic_tone rises
    assert!(d[21] <= -0.5, "sympathetic derivative {}", d[21]);
    assert!(d[22] >= 0.5, "parasympathetic derivative {}", d[22]);
}

/// Test the baroreflex response to a hypotensive pressure step
#[test]
fn test_hypotensive_pressure_drives_sympathetic_surge() {
    let (model, mut state) = nominal_model(true);
    state.mean_arterial_pressure = 40.0;

    assert_eq!(baroreceptor_firing_rate(model.params(), 40.0), 0.0);

    let d = model.derivatives(0.0, &state.to_vector());
    assert!(d[21] >= 0.5, "sympathetic derivative {}", d[21]);
    assert!(d[22] < 0.0, "parasympathetic derivative {}", d[22]);
}

/// Test a full simulated day with neural coupling: the trajectory must stay
/// inside physiological bounds throughout
#[test]
fn test_full_day_simulation_stays_physiological() -> Result<()> {
    let (model, state) = nominal_model(true);
    let config = Config::default();

    let trajectory = simulate_model(&model, state, &config)?;

    assert_eq!(trajectory.times.len(), trajectory.states.len());
    assert_eq!(trajectory.times.len(), trajectory.derived.len());
    assert!(trajectory.len() >= 1440);
    assert_eq!(trajectory.times[0], 0.0);

    let last = *trajectory.times.last().unwrap();
    assert!(last >= 1439.0 && last <= 1440.0 + 1e-9, "final time {}", last);
    for pair in trajectory.times.windows(2) {
        assert!(pair[1] > pair[0], "times not strictly increasing");
    }

    for (state, derived) in trajectory.states.iter().zip(&trajectory.derived) {
        let map = state.mean_arterial_pressure;
        assert!((50.0..=150.0).contains(&map), "MAP {} out of bounds", map);
        for tone in [state.sympathetic_tone, state.parasympathetic_tone] {
            assert!(tone > 0.0 && tone < 5.0, "tone {} out of bounds", tone);
        }
        let hr = state.heart_rate;
        assert!((40.0..=180.0).contains(&hr), "heart rate {} out of bounds", hr);

        assert!((0.0..=2.0).contains(&derived.baroreceptor_firing));
        assert!(derived.adh >= 0.1 && derived.adh <= 5.0);
        assert!(derived.renal_blood_flow > 0.0);
        assert!(derived.gfr.is_finite());
        assert!(derived.urine_flow.is_finite());
        assert!(derived.sodium_excretion.is_finite());
    }

    // By the end of the day the kidney has settled at a filtering, excreting
    // operating point
    let settled = trajectory.derived.last().unwrap();
    assert!(settled.gfr > 0.0);
    assert!(settled.urine_flow > 0.0);
    assert!(settled.sodium_excretion > 0.0);
    Ok(())
}

/// Test that the fixed-step solver records the initial point plus one point
/// per step
#[test]
fn test_fixed_step_solver_records_every_step() -> Result<()> {
    let (model, state) = nominal_model(true);
    let config = Config {
        duration: 60.0,
        solver: Solver::Rk4,
        step_size: 0.5,
        ..Config::default()
    };

    let trajectory = simulate_model(&model, state, &config)?;
    assert_eq!(trajectory.len(), 121);
    assert!((trajectory.times[1] - trajectory.times[0] - 0.5).abs() < 1e-12);
    assert!((*trajectory.times.last().unwrap() - 60.0).abs() < 1e-9);
    Ok(())
}

/// Test that the neural states stay frozen at their initial values when the
/// model runs without neural coupling
#[test]
fn test_uncoupled_simulation_freezes_neural_states() -> Result<()> {
    let (model, state) = nominal_model(false);
    let config = Config {
        duration: 240.0,
        ..Config::default()
    };

    let trajectory = simulate_model(&model, state, &config)?;
    for state in &trajectory.states {
        assert_eq!(state.sympathetic_tone, 1.0);
        assert_eq!(state.parasympathetic_tone, 1.0);
        assert_eq!(state.renal_sympathetic_activity, 1.0);
        assert_eq!(state.heart_rate, 72.0);
        assert_eq!(state.stroke_volume, 70.0);
    }

    let final_state = trajectory.final_state().unwrap();
    assert!(final_state.mean_arterial_pressure.is_finite());
    assert!(final_state.mean_arterial_pressure > 0.0);
    Ok(())
}

/// Test that nonsensical integration settings are rejected up front
#[test]
fn test_invalid_integration_settings_are_rejected() {
    let (model, state) = nominal_model(true);

    let zero_duration = Config {
        duration: 0.0,
        ..Config::default()
    };
    assert!(simulate_model(&model, state, &zero_duration).is_err());

    let negative_duration = Config {
        duration: -5.0,
        ..Config::default()
    };
    assert!(simulate_model(&model, state, &negative_duration).is_err());

    let zero_interval = Config {
        output_interval: 0.0,
        ..Config::default()
    };
    assert!(simulate_model(&model, state, &zero_interval).is_err());

    let zero_step = Config {
        solver: Solver::Rk4,
        step_size: 0.0,
        ..Config::default()
    };
    assert!(simulate_model(&model, state, &zero_step).is_err());
}

/// Test that the recorded derived series match a fresh evaluation of the
/// recorded states
#[test]
fn test_derived_series_align_with_recorded_states() -> Result<()> {
    let (model, state) = nominal_model(true);
    let config = Config {
        duration: 60.0,
        ..Config::default()
    };

    let trajectory = simulate_model(&model, state, &config)?;

    let gfr = trajectory.derived_series("gfr").unwrap();
    assert_eq!(gfr.len(), trajectory.len());
    let map = trajectory.state_series("mean_arterial_pressure").unwrap();
    assert_eq!(map.len(), trajectory.len());
    assert!(trajectory.state_series("no_such_field").is_none());
    assert!(trajectory.derived_series("no_such_series").is_none());

    let mid = trajectory.len() / 2;
    let recomputed =
        DerivedQuantities::compute(&model, trajectory.times[mid], &trajectory.states[mid]);
    assert_eq!(recomputed, trajectory.derived[mid]);
    Ok(())
}
