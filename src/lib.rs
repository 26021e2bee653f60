//! # qubo-tt: QUBO coefficients from truth tables
//!
//! **`qubo-tt`** searches for the coefficients of a Quadratic Unconstrained Binary Optimization (QUBO)
//! function whose minimum-energy assignments are exactly the valid rows of a given Boolean truth table.
//!
//! ## What is being searched?
//!
//! A QUBO over binary variables `x_0 .. x_{n-1}` assigns every assignment an energy
//!
//! ```text
//! E(x) = sum_i L_i x_i + sum_{i<j} Q_ij x_i x_j
//! ```
//!
//! Given a truth table that marks each assignment of the visible variables as valid or invalid,
//! we look for coefficients, within configured bounds, such that every valid row has a strictly lower
//! energy than every invalid one. The margin between the two is the **gap**.
//!
//! Some tables (XOR, for example) cannot be separated by a quadratic function of the visible
//! variables alone. The search then introduces **ancillary** variables, one at a time: a valid row only
//! needs one assignment of the ancillae that reaches the low energy.
//!
//! ## Key Features
//!
//! - **Vectorized evaluation**: the [`BasisMatrix`][crate::basis::BasisMatrix] precomputes all monomials over
//!   the full Boolean hypercube, so scoring a candidate is one matrix-vector product.
//! - **Genetic search**: the [`Optimizer`][crate::ga::Optimizer] evolves coefficient vectors with elitism,
//!   tournament selection and parallel scoring, driven by seedable random streams.
//! - **Escalation**: the [`Escalation`][crate::search::Escalation] state machine adds ancillary variables
//!   until the table is separated or a ceiling is reached.
//!
//! ## Basic Usage
//!
//! ```rust
//! use qubo_tt::search::{Escalation, Parameters};
//! use qubo_tt::truth_table::TruthTable;
//! use qubo_tt::types::CoeffBounds;
//!
//! // AND over two columns: only `11` is valid.
//! let table = TruthTable::from_valid_rows(2, [0b11]).unwrap();
//! let params = Parameters::new(CoeffBounds::default(), table).unwrap();
//!
//! let report = Escalation::new(params).unwrap().run().unwrap();
//! assert!(report.gap > 0.0);
//! assert_eq!(report.n_anc, 0);
//! ```
//!
//! ## Core Components
//!
//! - **[`truth_table`]**: the table to embed.
//! - **[`basis`]**: the design matrix over all assignments.
//! - **[`qubo`]**: coefficients, energies, gap, rescaling and the matrix form.
//! - **[`badness`]**: the fitness minimised by the optimizer.
//! - **[`ga`]**: the genetic algorithm.
//! - **[`search`]**: run parameters and the ancilla escalation.
//! - **[`eval`]**: per-row evaluation and result summary.

pub mod badness;
pub mod basis;
pub mod error;
pub mod eval;
pub mod ga;
pub mod qubo;
pub mod search;
pub mod truth_table;
pub mod types;
pub mod utils;
