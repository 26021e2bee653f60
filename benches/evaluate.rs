//! Benchmarks for basis construction and QUBO evaluation.
//!
//! Run with:
//! ```bash
//! cargo bench --bench evaluate
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use qubo_tt::basis::BasisMatrix;
use qubo_tt::qubo::Qubo;
use qubo_tt::truth_table::TruthTable;
use qubo_tt::types::Completion;

/// Generate deterministic random coefficients in `[-1, 1]`.
fn random_qubo(seed: u64, num_vars: usize, num_coeffs: usize) -> Qubo {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let coeffs = (0..num_coeffs).map(|_| rng.random_range(-1.0..=1.0)).collect();
    Qubo::new(num_vars, coeffs).unwrap()
}

// ============================================================================
// Benchmark: Basis construction
// ============================================================================

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("basis/build");

    for n in [4, 8, 12] {
        group.throughput(Throughput::Elements(1 << n));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| BasisMatrix::build(n, 0).unwrap());
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Energy evaluation and separation
// ============================================================================

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("qubo/separation");

    for (cols, anc) in [(3, 0), (3, 1), (4, 2), (6, 3)] {
        let basis = BasisMatrix::build(cols, anc).unwrap();
        let table = TruthTable::from_fn(cols, |x| x.iter().filter(|&&b| b).count() % 2 == 0).unwrap();
        let qubo = random_qubo(42, cols + anc, basis.num_coeffs());

        group.throughput(Throughput::Elements(basis.num_assignments() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}+{}", cols, anc)),
            &(basis, table, qubo),
            |b, (basis, table, qubo)| {
                b.iter(|| qubo.separation(basis, table, Completion::Minimum).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_evaluate);
criterion_main!(benches);
