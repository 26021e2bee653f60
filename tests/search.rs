//! End-to-end searches over small truth tables.

use qubo_tt::basis::BasisMatrix;
use qubo_tt::error::Error;
use qubo_tt::eval::{evaluate_rows, Summary};
use qubo_tt::qubo::Qubo;
use qubo_tt::search::{prepare_search, run_search, Escalation, Parameters, SearchState};
use qubo_tt::truth_table::TruthTable;
use qubo_tt::types::{CoeffBounds, Completion};

fn params(table: TruthTable, seed: u64) -> Parameters {
    let bounds = CoeffBounds::new(-1.0, 1.0, -1.0, 1.0).unwrap();
    let mut params = Parameters::new(bounds, table).unwrap();
    params.ga.seed = seed;
    params
}

// ─── Concrete scenarios ───────────────────────────────────────────────────────

#[test]
fn and_separates_without_ancillae() {
    let table = TruthTable::new(vec![false, false, false, true]).unwrap();
    let mut params = params(table, 2024);
    params.ga.max_generations = 200;

    let report = Escalation::new(params.clone()).unwrap().run().unwrap();
    println!("AND: {} (gap {})", report.qubo, report.gap);

    assert_eq!(report.n_anc, 0);
    assert!(report.gap > 0.0);
    assert!(report.generations <= 200);
    assert_eq!(report.attempts.len(), 1);

    // Classic AND shape: valid row 11 lies below 00, 01 and 10.
    let q = &report.qubo;
    assert!(q.linear(0) + q.quadratic(0, 1) < 0.0);
    assert!(q.linear(1) + q.quadratic(0, 1) < 0.0);
    assert!(q.linear(0) + q.linear(1) + q.quadratic(0, 1) < 0.0);

    let summary = Summary::new(&report, &params).unwrap();
    assert!(summary.gap > 0.0);
    assert!(summary.rescaled.is_within(&params.bounds));
    assert!(summary.rows.iter().all(|r| !r.misranked));
    assert_eq!(Qubo::from_octave(&summary.matrix).unwrap(), summary.rescaled);
}

#[test]
fn xor_requires_an_ancilla() {
    // z = x XOR y over three columns.
    let table = TruthTable::from_fn(3, |x| x[2] == (x[0] ^ x[1])).unwrap();
    let mut params = params(table, 17);
    params.max_ancillae = 3;
    params.ga.population_size = 200;
    params.ga.max_generations = 2000;
    params.ga.stall_generations = Some(150);

    let report = Escalation::new(params.clone()).unwrap().run().unwrap();
    println!("XOR: {} ancillae, {} (gap {})", report.n_anc, report.qubo, report.gap);

    assert!(report.n_anc >= 1);
    assert!(report.gap > 0.0);
    assert_eq!(report.attempts[0].n_anc, 0);
    assert_eq!(report.attempts[0].separated_gen, None);

    let summary = Summary::new(&report, &params).unwrap();
    assert_eq!(summary.rows.len(), 8);
    assert!(summary.rows.iter().all(|r| !r.misranked));
}

// ─── Properties ───────────────────────────────────────────────────────────────

#[test]
fn escalation_is_monotone() {
    let table = TruthTable::from_fn(3, |x| x[2] == (x[0] ^ x[1])).unwrap();
    let mut params = params(table, 5);
    params.max_ancillae = 2;
    params.ga.max_generations = 5;
    params.ga.population_size = 10;

    let mut escalation = Escalation::new(params).unwrap();
    let mut seen = Vec::new();
    while !escalation.state().is_done() {
        let before = escalation.params().n_anc;
        let state = escalation.step().unwrap().clone();
        if let SearchState::Searching { n_anc } = state {
            assert_eq!(n_anc, before + 1);
        }
        seen.push(before);
    }

    let attempts = escalation.attempts();
    assert_eq!(attempts.len(), seen.len());
    for w in attempts.windows(2) {
        assert_eq!(w[1].n_anc, w[0].n_anc + 1);
        assert!(w[1].basis_columns > w[0].basis_columns);
    }
    for a in attempts {
        assert_eq!(a.basis_columns, 1 << (3 + a.n_anc));
    }
}

#[test]
fn separated_gen_agrees_with_gap() {
    let tables = [
        TruthTable::from_fn(2, |x| x[0] || x[1]).unwrap(),
        TruthTable::from_fn(2, |x| x[0] ^ x[1]).unwrap(),
        TruthTable::from_fn(3, |x| x[2] == (x[0] && x[1])).unwrap(),
        TruthTable::from_fn(3, |x| x[2] == (x[0] ^ x[1])).unwrap(),
    ];
    for (seed, table) in tables.into_iter().enumerate() {
        let mut params = params(table, seed as u64);
        params.ga.max_generations = 100;
        let basis = prepare_search(&params).unwrap();
        let outcome = run_search(&mut params, &basis).unwrap();
        assert_eq!(outcome.best.separation.gap > 0.0, outcome.separated_gen.is_some());
        assert_eq!(params.separated_gen, outcome.separated_gen);
        for w in outcome.history.windows(2) {
            assert!(w[1] <= w[0]);
        }
    }
}

#[test]
fn evaluation_is_deterministic() {
    let basis = BasisMatrix::build(3, 1).unwrap();
    let coeffs: Vec<f64> = (0..basis.num_coeffs()).map(|k| (k as f64 * 0.37).sin()).collect();
    let q = Qubo::new(4, coeffs).unwrap();
    let first = q.evaluate(&basis).unwrap();
    for _ in 0..5 {
        assert_eq!(q.evaluate(&basis).unwrap(), first);
    }
}

#[test]
fn misranked_rows_iff_not_separated() {
    let table = TruthTable::from_fn(3, |x| x[2] == (x[0] && x[1])).unwrap();
    let basis = BasisMatrix::build(3, 0).unwrap();
    let candidates = [
        vec![0.0; 6],
        vec![-1.0, -1.0, 1.0, 1.0, -1.0, -1.0],
        vec![0.0, 0.0, 3.0, 1.0, -2.0, -2.0],
    ];
    for coeffs in candidates {
        let q = Qubo::new(3, coeffs).unwrap();
        let sep = q.separation(&basis, &table, Completion::Minimum).unwrap();
        let rows = evaluate_rows(&q, &basis, &table, Completion::Minimum).unwrap();
        assert_eq!(sep.is_separated(), rows.iter().all(|r| !r.misranked), "{}", q);
    }
}

// ─── Configuration errors ─────────────────────────────────────────────────────

#[test]
fn degenerate_tables_are_rejected() {
    assert!(matches!(
        TruthTable::new(vec![true; 4]),
        Err(Error::DegenerateTable { valid: 4, rows: 4 })
    ));
    assert!(matches!(
        TruthTable::new(vec![false; 2]),
        Err(Error::DegenerateTable { valid: 0, rows: 2 })
    ));
}

#[test]
fn inverted_bounds_are_rejected() {
    assert!(matches!(
        CoeffBounds::new(-1.0, 1.0, 1.0, -1.0),
        Err(Error::InvalidBounds { .. })
    ));
}

#[test]
fn overflowing_bounds_are_rejected() {
    assert!(matches!(
        CoeffBounds::new(-1e308, 1e308, -1.0, 1.0),
        Err(Error::InvalidBounds { .. })
    ));

    let table = TruthTable::from_valid_rows(2, [0b11]).unwrap();
    let bounds = CoeffBounds::new(-1.0, 1.0, 0.0, f64::MAX).unwrap();
    let params = Parameters::new(bounds, table).unwrap();
    assert!(matches!(
        Escalation::new(params.clone()),
        Err(Error::EnergyOverflow { num_vars: 2 })
    ));
    assert!(prepare_search(&params).is_err());
}
