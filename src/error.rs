//! Error type shared by every fallible operation in the crate.

use crate::types::CoeffKind;

/// Errors raised while preparing or running a coefficient search.
///
/// All of them are local to the call that produced them: nothing is retried
/// internally, and no partially optimised coefficients are ever returned
/// alongside an error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("{kind} bounds must be finite with min < max (got [{min}, {max}])")]
    InvalidBounds { kind: CoeffKind, min: f64, max: f64 },

    #[error("truth table must have 2^n rows with n >= 1 (got {rows} rows)")]
    TableSize { rows: usize },

    #[error("truth table needs at least one valid and one invalid row (got {valid} valid of {rows})")]
    DegenerateTable { valid: usize, rows: usize },

    #[error("{requested} variables requested, but at most {max} are supported")]
    TooManyVariables { requested: usize, max: usize },

    #[error("no separating QUBO found with up to {max_ancillae} ancillary variables")]
    Infeasible { max_ancillae: usize },

    #[error("expected {expected} coefficients, got {actual}")]
    CoefficientCount { expected: usize, actual: usize },

    #[error("QUBO over {qubo} variables cannot be evaluated on a basis over {basis} variables")]
    BasisMismatch { qubo: usize, basis: usize },

    #[error("expected {expected} assignment energies, got {actual}")]
    EnergyCount { expected: usize, actual: usize },

    #[error("worst-case energy over {num_vars} variables overflows with the given bounds")]
    EnergyOverflow { num_vars: usize },

    #[error("energy of assignment {assignment} is not finite")]
    NonFiniteEnergy { assignment: usize },

    #[error("malformed matrix: {0}")]
    MatrixParse(String),

    #[error("invalid GA configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
