use criterion::{black_box, criterion_group, criterion_main, Criterion};

use renocore::prelude::*;

/// Benchmark a single derivative evaluation of the fully coupled model
fn benchmark_derivatives(c: &mut Criterion) {
    let params = Parameters::default();
    let state = ModelState::nominal(&params);
    let model = RegulationModel::new(params, true);
    let y = state.to_vector();

    c.bench_function("derivatives", |b| {
        b.iter(|| {
            let _ = model.derivatives(black_box(0.0), black_box(&y));
        });
    });
}

/// Benchmark one simulated hour with the adaptive solver
fn benchmark_one_hour_simulation(c: &mut Criterion) {
    let params = Parameters::default();
    let state = ModelState::nominal(&params);
    let model = RegulationModel::new(params, true);
    let config = Config {
        duration: 60.0,
        ..Config::default()
    };

    c.bench_function("one_hour_simulation", |b| {
        b.iter(|| {
            let _ = simulate_model(black_box(&model), black_box(state), &config);
        });
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(std::time::Duration::from_secs(10)) // Measure for 10 seconds
        .noise_threshold(0.10); // Performance changes less than 10% will be ignored
    targets = benchmark_derivatives, benchmark_one_hour_simulation
}
criterion_main!(benches);
