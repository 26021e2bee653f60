//! Per-row evaluation of a QUBO against its truth table, and the final
//! summary handed back to callers for display.

use crate::basis::BasisMatrix;
use crate::error::Result;
use crate::qubo::{row_energies, Qubo};
use crate::search::{Parameters, SearchReport};
use crate::truth_table::TruthTable;
use crate::types::Completion;

/// Evaluation of a single visible row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowEvaluation {
    pub row: usize,
    pub valid: bool,
    /// Energy of the row after completing its ancillary variables.
    pub energy: f64,
    /// 1-based rank of `energy` among all row energies; equal energies share the lowest rank.
    pub rank: usize,
    /// A valid row ranked below the valid block, or an invalid row ranked within it.
    pub misranked: bool,
}

/// Evaluates every visible row: energy, validity and rank.
///
/// A table is separated exactly when no row is misranked.
pub fn evaluate_rows(
    qubo: &Qubo,
    basis: &BasisMatrix,
    table: &TruthTable,
    completion: Completion,
) -> Result<Vec<RowEvaluation>> {
    let energies = qubo.evaluate(basis)?;
    let rows = row_energies(&energies, table, basis.num_anc(), completion);

    let mut sorted = rows.clone();
    sorted.sort_by(f64::total_cmp);
    let num_valid = table.num_valid();

    Ok(rows
        .iter()
        .enumerate()
        .map(|(row, &energy)| {
            let rank = sorted.partition_point(|&e| e < energy) + 1;
            let valid = table.is_valid(row);
            let misranked = if valid { rank > num_valid } else { rank <= num_valid };
            RowEvaluation {
                row,
                valid,
                energy,
                rank,
                misranked,
            }
        })
        .collect())
}

/// Everything a caller needs to present the result of a search.
#[derive(Debug, Clone)]
pub struct Summary {
    pub generations: usize,
    pub badness: f64,
    pub coeffs: Vec<f64>,
    pub rescaled: Qubo,
    /// Gap of the rescaled QUBO.
    pub gap: f64,
    pub matrix: String,
    pub n_anc: usize,
    pub rows: Vec<RowEvaluation>,
}

impl Summary {
    /// Rescales the reported QUBO to the bounds and evaluates it against the table.
    pub fn new(report: &SearchReport, params: &Parameters) -> Result<Self> {
        let mut rescaled = report.qubo.clone();
        rescaled.rescale(&params.bounds);

        let basis = BasisMatrix::build(params.num_cols(), report.n_anc)?;
        let separation = rescaled.separation(&basis, &params.truth_table, params.completion)?;
        let rows = evaluate_rows(&rescaled, &basis, &params.truth_table, params.completion)?;

        Ok(Self {
            generations: report.generations,
            badness: report.badness,
            coeffs: report.qubo.coeffs().to_vec(),
            matrix: rescaled.to_octave(),
            gap: separation.gap,
            rescaled,
            n_anc: report.n_anc,
            rows,
        })
    }
}
