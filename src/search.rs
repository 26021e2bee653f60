//! Search driver: run parameters, one genetic-algorithm run per ancilla
//! count, and the escalation over ancilla counts.
//!
//! # Escalation
//!
//! [`Escalation`] is a small state machine:
//!
//! ```text
//!   Searching(n_anc) --separated--> Separated
//!         |
//!         +--not separated, n_anc < max--> Searching(n_anc + 1)
//!         |
//!         +--not separated, n_anc = max--> Infeasible
//! ```
//!
//! Every [`Escalation::step`] rebuilds the basis matrix for the current number
//! of ancillary variables and starts the genetic algorithm from a fresh
//! population. Runs are strictly sequential.

use log::{debug, info};

use crate::basis::{BasisMatrix, MAX_VARIABLES};
use crate::error::{Error, Result};
use crate::ga::{GaConfig, GaOutcome, Optimizer};
use crate::qubo::Qubo;
use crate::truth_table::TruthTable;
use crate::types::{CoeffBounds, Completion};
use crate::utils::slots;

/// Default number of ancillary variables the escalation may add.
pub const DEFAULT_MAX_ANCILLAE: usize = 3;

/// Configuration of a coefficient search.
#[derive(Debug, Clone)]
pub struct Parameters {
    pub bounds: CoeffBounds,
    pub truth_table: TruthTable,
    /// Current number of ancillary variables.
    pub n_anc: usize,
    /// Generation at which the last run first separated the table.
    pub separated_gen: Option<usize>,
    pub completion: Completion,
    /// Largest number of ancillary variables the escalation may try.
    pub max_ancillae: usize,
    pub ga: GaConfig,
}

impl Parameters {
    /// Creates parameters with no ancillary variables and default GA settings.
    pub fn new(bounds: CoeffBounds, truth_table: TruthTable) -> Result<Self> {
        bounds.validate()?;
        let max_ancillae = DEFAULT_MAX_ANCILLAE.min(MAX_VARIABLES.saturating_sub(truth_table.num_cols()));
        Ok(Self {
            bounds,
            truth_table,
            n_anc: 0,
            separated_gen: None,
            completion: Completion::default(),
            max_ancillae,
            ga: GaConfig::default(),
        })
    }

    /// Number of visible columns.
    pub fn num_cols(&self) -> usize {
        self.truth_table.num_cols()
    }

    /// Total number of variables, visible plus ancillary.
    pub fn num_vars(&self) -> usize {
        self.num_cols() + self.n_anc
    }

    /// Checks the whole configuration, including the ancillary ceiling.
    pub fn validate(&self) -> Result<()> {
        self.bounds.validate()?;
        self.ga.validate()?;
        let ceiling = self.max_ancillae.min(MAX_VARIABLES.saturating_sub(self.num_cols()));
        if self.n_anc > ceiling {
            return Err(Error::TooManyVariables {
                requested: self.num_vars(),
                max: self.num_cols() + ceiling,
            });
        }
        // Energy differences (gap, spread) must stay finite too.
        if !(2.0 * worst_case_energy(&self.bounds, self.num_vars())).is_finite() {
            return Err(Error::EnergyOverflow {
                num_vars: self.num_vars(),
            });
        }
        Ok(())
    }
}

/// Upper bound on `|E(x)|` over all assignments of `num_vars` variables.
pub fn worst_case_energy(bounds: &CoeffBounds, num_vars: usize) -> f64 {
    slots(num_vars).map(|slot| bounds.magnitude(slot.kind())).sum()
}

/// Builds the basis matrix for the current number of ancillary variables.
pub fn prepare_search(params: &Parameters) -> Result<BasisMatrix> {
    params.validate()?;
    BasisMatrix::build(params.num_cols(), params.n_anc)
}

/// Runs the genetic algorithm once and records the separating generation in `params`.
pub fn run_search(params: &mut Parameters, basis: &BasisMatrix) -> Result<GaOutcome> {
    if basis.num_visible() != params.num_cols() || basis.num_anc() != params.n_anc {
        return Err(Error::BasisMismatch {
            qubo: params.num_vars(),
            basis: basis.num_vars(),
        });
    }
    let optimizer = Optimizer::new(basis, &params.truth_table, &params.bounds, params.completion, &params.ga)?;
    let outcome = optimizer.run()?;
    params.separated_gen = outcome.separated_gen;
    debug!(
        "search: {} ancillae, {} generations, badness {}, separated at {:?}",
        params.n_anc, outcome.generations, outcome.best.badness, outcome.separated_gen
    );
    Ok(outcome)
}

/// Summary of one genetic-algorithm run within an escalation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attempt {
    pub n_anc: usize,
    /// Number of assignment columns of the basis matrix, `2^(n + n_anc)`.
    pub basis_columns: usize,
    pub generations: usize,
    pub badness: f64,
    pub separated_gen: Option<usize>,
}

/// Outcome of a successful search.
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// Best QUBO of the separating run (not rescaled).
    pub qubo: Qubo,
    pub badness: f64,
    pub gap: f64,
    /// Generations evolved by the separating run.
    pub generations: usize,
    pub separated_gen: usize,
    pub n_anc: usize,
    /// All runs, in order.
    pub attempts: Vec<Attempt>,
}

#[derive(Debug, Clone)]
pub enum SearchState {
    Searching { n_anc: usize },
    Separated(Box<SearchReport>),
    Infeasible { max_ancillae: usize },
}

impl SearchState {
    pub fn is_done(&self) -> bool {
        !matches!(self, SearchState::Searching { .. })
    }
}

/// Escalation over the number of ancillary variables.
#[derive(Debug)]
pub struct Escalation {
    params: Parameters,
    state: SearchState,
    attempts: Vec<Attempt>,
}

impl Escalation {
    pub fn new(params: Parameters) -> Result<Self> {
        params.validate()?;
        let state = SearchState::Searching { n_anc: params.n_anc };
        Ok(Self {
            params,
            state,
            attempts: Vec::new(),
        })
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    /// Largest ancilla count this escalation will try.
    pub fn ceiling(&self) -> usize {
        self.params
            .max_ancillae
            .min(MAX_VARIABLES.saturating_sub(self.params.num_cols()))
    }

    /// Performs one genetic-algorithm run, or nothing if the search is already over.
    pub fn step(&mut self) -> Result<&SearchState> {
        if self.state.is_done() {
            return Ok(&self.state);
        }

        self.params.separated_gen = None;
        let basis = prepare_search(&self.params)?;
        let outcome = run_search(&mut self.params, &basis)?;
        self.attempts.push(Attempt {
            n_anc: self.params.n_anc,
            basis_columns: basis.num_assignments(),
            generations: outcome.generations,
            badness: outcome.best.badness,
            separated_gen: outcome.separated_gen,
        });

        self.state = match outcome.separated_gen {
            Some(separated_gen) => SearchState::Separated(Box::new(SearchReport {
                gap: outcome.best.separation.gap,
                qubo: outcome.best.qubo,
                badness: outcome.best.badness,
                generations: outcome.generations,
                separated_gen,
                n_anc: self.params.n_anc,
                attempts: self.attempts.clone(),
            })),
            None => {
                let n_anc = self.params.n_anc;
                let noun = if n_anc == 1 { "variable" } else { "variables" };
                info!("A solution with {} ancillary {} seems unlikely.", n_anc, noun);
                if n_anc >= self.ceiling() {
                    info!("Reached the limit of {} ancillary variables.", self.ceiling());
                    SearchState::Infeasible {
                        max_ancillae: self.ceiling(),
                    }
                } else {
                    info!(
                        "Increasing the number of ancillae from {} to {} and restarting the genetic algorithm.",
                        n_anc,
                        n_anc + 1
                    );
                    self.params.n_anc += 1;
                    SearchState::Searching { n_anc: n_anc + 1 }
                }
            }
        };
        Ok(&self.state)
    }

    /// Steps until the table is separated or the ancilla ceiling is reached.
    pub fn run(mut self) -> Result<SearchReport> {
        loop {
            match self.step()? {
                SearchState::Searching { .. } => continue,
                SearchState::Separated(report) => return Ok((**report).clone()),
                SearchState::Infeasible { max_ancillae } => {
                    return Err(Error::Infeasible {
                        max_ancillae: *max_ancillae,
                    })
                }
            }
        }
    }

    /// Consumes the escalation, returning the parameters as they stand.
    pub fn into_params(self) -> Parameters {
        self.params
    }
}
