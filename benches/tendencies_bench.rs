//! Benchmarks for full tendency evaluations across model tiers.
//!
//! Run with: `cargo bench --bench tendencies_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gcm_rs::{initial, Model, ModelConfig};

fn bench_barotropic(c: &mut Criterion) {
    let mut group = c.benchmark_group("barotropic_rhs");
    group.sample_size(50);

    for trunc in [31, 63] {
        let mut model = Model::new(ModelConfig::barotropic(trunc)).unwrap();
        let mut progn = model.zeros_prognostic();
        let mut diagn = model.zeros_diagnostic();
        initial::rossby_haurwitz(
            &mut progn,
            &model.grid,
            &mut model.transform,
            4,
            7.848e-6,
            7.848e-6,
        );

        group.bench_with_input(BenchmarkId::from_parameter(trunc), &trunc, |b, _| {
            b.iter(|| {
                model.tendencies(black_box(&progn), &mut diagn, 1, 0.0);
            })
        });
    }
    group.finish();
}

fn bench_primitive(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitive_rhs");
    group.sample_size(30);

    for nlev in [4, 8] {
        let mut model = Model::new(ModelConfig::primitive(31, nlev)).unwrap();
        let mut progn = model.zeros_prognostic();
        let mut diagn = model.zeros_diagnostic();
        initial::zonal_jet(&mut progn, &mut model, 35.0, 288.0);

        group.bench_with_input(
            BenchmarkId::new("t31_nlev", nlev),
            &nlev,
            |b, _| {
                b.iter(|| {
                    model.tendencies(black_box(&progn), &mut diagn, 1, 0.0);
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_barotropic, bench_primitive);
criterion_main!(benches);
