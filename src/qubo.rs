//! QUBO model: a coefficient vector over visible and ancillary variables.
//!
//! The energy of an assignment `x` is
//!
//! ```text
//! E(x) = sum_i L_i x_i + sum_{i<j} Q_ij x_i x_j
//! ```
//!
//! Coefficients are stored in the order described in [`crate::utils`].
//! Energies of all `2^n` assignments are computed at once through a
//! [`BasisMatrix`].
//!
//! # Separation
//!
//! An assignment inherits the validity of its visible prefix. The valid rows
//! are scored through their ancillary completions according to a
//! [`Completion`] rule, and the *gap* is
//!
//! ```text
//! gap = min { E(k) : k invalid } - max { E_c(r) : r valid row }
//! ```
//!
//! where `E_c(r)` is the minimum (or, with [`Completion::Maximum`], the maximum)
//! energy over the completions of row `r`. A positive gap means every valid row
//! can reach a strictly lower energy than any invalid assignment.

use std::fmt;

use crate::basis::BasisMatrix;
use crate::error::{Error, Result};
use crate::truth_table::TruthTable;
use crate::types::{CoeffBounds, Completion, Slot, Var};
use crate::utils::{num_coeffs, slot_at, slot_index, slots};

#[derive(Debug, Clone, PartialEq)]
pub struct Qubo {
    num_vars: usize,
    coeffs: Vec<f64>,
}

impl Qubo {
    /// Creates a QUBO over `num_vars` variables from a full coefficient vector.
    pub fn new(num_vars: usize, coeffs: Vec<f64>) -> Result<Self> {
        let expected = num_coeffs(num_vars);
        if coeffs.len() != expected {
            return Err(Error::CoefficientCount {
                expected,
                actual: coeffs.len(),
            });
        }
        Ok(Self { num_vars, coeffs })
    }

    /// All-zero QUBO over `num_vars` variables.
    pub fn zeros(num_vars: usize) -> Self {
        Self {
            num_vars,
            coeffs: vec![0.0; num_coeffs(num_vars)],
        }
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    pub fn into_coeffs(self) -> Vec<f64> {
        self.coeffs
    }

    pub fn get(&self, slot: Slot) -> f64 {
        self.coeffs[slot_index(slot, self.num_vars)]
    }

    pub fn set(&mut self, slot: Slot, value: f64) {
        let index = slot_index(slot, self.num_vars);
        self.coeffs[index] = value;
    }

    /// Linear coefficient of variable `i`.
    pub fn linear(&self, i: usize) -> f64 {
        self.get(Slot::Linear(Var::new(i)))
    }

    /// Quadratic coefficient of the pair `{i, j}`, in either order.
    pub fn quadratic(&self, i: usize, j: usize) -> f64 {
        let (a, b) = if i < j { (i, j) } else { (j, i) };
        self.get(Slot::Quadratic(Var::new(a), Var::new(b)))
    }

    /// Energy of a single assignment, computed directly from the coefficients.
    pub fn energy(&self, assignment: usize) -> f64 {
        slots(self.num_vars)
            .zip(&self.coeffs)
            .filter(|(slot, _)| slot.monomial(assignment, self.num_vars) != 0)
            .map(|(_, &c)| c)
            .sum()
    }

    /// Energies of every full assignment, as one matrix-vector product.
    pub fn evaluate(&self, basis: &BasisMatrix) -> Result<Vec<f64>> {
        if basis.num_vars() != self.num_vars {
            return Err(Error::BasisMismatch {
                qubo: self.num_vars,
                basis: basis.num_vars(),
            });
        }
        let energies = basis.apply(&self.coeffs)?;
        if let Some(assignment) = energies.iter().position(|e| !e.is_finite()) {
            return Err(Error::NonFiniteEnergy { assignment });
        }
        Ok(energies)
    }

    /// Valid/invalid separation statistics of this QUBO for the given table.
    pub fn separation(&self, basis: &BasisMatrix, table: &TruthTable, completion: Completion) -> Result<Separation> {
        let energies = self.evaluate(basis)?;
        Separation::from_energies(&energies, table, basis.num_anc(), completion)
    }

    /// Checks that every coefficient lies within the bounds of its kind.
    pub fn is_within(&self, bounds: &CoeffBounds) -> bool {
        slots(self.num_vars).zip(&self.coeffs).all(|(slot, &c)| {
            let (min, max) = bounds.range(slot.kind());
            min <= c && c <= max
        })
    }

    /// Scales all coefficients by the largest positive factor that keeps each
    /// of them within the bounds of its kind.
    ///
    /// Positive scaling leaves the sign of the gap and the ordering of all
    /// energies unchanged. Once a coefficient sits on its bound, rescaling
    /// again changes nothing. The zero QUBO is left untouched, as is a QUBO
    /// holding a coefficient whose sign its bounds do not admit.
    pub fn rescale(&mut self, bounds: &CoeffBounds) {
        let mut factor = f64::INFINITY;
        for (slot, &c) in slots(self.num_vars).zip(&self.coeffs) {
            let (min, max) = bounds.range(slot.kind());
            let limit = if c > 0.0 {
                max / c
            } else if c < 0.0 {
                min / c
            } else {
                continue;
            };
            factor = factor.min(limit);
        }
        if !factor.is_finite() || factor <= 0.0 || (factor - 1.0).abs() <= 4.0 * f64::EPSILON {
            return;
        }
        for (k, c) in self.coeffs.iter_mut().enumerate() {
            let kind = slot_at(k, self.num_vars).kind();
            *c = bounds.clamp(kind, *c * factor);
        }
    }

    /// Symmetric `n x n` matrix form: linear terms on the diagonal,
    /// each quadratic term split evenly between `(i, j)` and `(j, i)`.
    pub fn matrix(&self) -> Vec<Vec<f64>> {
        let n = self.num_vars;
        let mut m = vec![vec![0.0; n]; n];
        for (slot, &c) in slots(n).zip(&self.coeffs) {
            match slot {
                Slot::Linear(v) => m[v.index()][v.index()] = c,
                Slot::Quadratic(a, b) => {
                    m[a.index()][b.index()] = c / 2.0;
                    m[b.index()][a.index()] = c / 2.0;
                }
            }
        }
        m
    }

    /// Renders the matrix form in Octave/MATLAB notation, e.g. `[-1 0.5; 0.5 -1]`.
    pub fn to_octave(&self) -> String {
        let rows: Vec<String> = self
            .matrix()
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" "))
            .collect();
        format!("[{}]", rows.join("; "))
    }

    /// Parses a square matrix in Octave notation back into a QUBO.
    ///
    /// Linear terms are read from the diagonal, and each quadratic term is the
    /// sum of the two mirrored off-diagonal entries.
    ///
    /// ```
    /// use qubo_tt::qubo::Qubo;
    ///
    /// let q = Qubo::new(2, vec![-1.0, -1.0, 0.5]).unwrap();
    /// assert_eq!(q.to_octave(), "[-1 0.25; 0.25 -1]");
    /// assert_eq!(Qubo::from_octave(&q.to_octave()).unwrap(), q);
    /// ```
    pub fn from_octave(text: &str) -> Result<Self> {
        let inner = text
            .trim()
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or_else(|| Error::MatrixParse("expected '[' ... ']'".to_string()))?;

        let mut rows: Vec<Vec<f64>> = Vec::new();
        if !inner.trim().is_empty() {
            for (i, line) in inner.split(';').enumerate() {
                let row = line
                    .split(|c: char| c.is_whitespace() || c == ',')
                    .filter(|s| !s.is_empty())
                    .map(|s| {
                        s.parse::<f64>()
                            .map_err(|e| Error::MatrixParse(format!("row {}: bad entry {:?}: {}", i + 1, s, e)))
                    })
                    .collect::<Result<Vec<f64>>>()?;
                rows.push(row);
            }
        }

        let n = rows.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(Error::MatrixParse(format!(
                "row {} has {} entries, expected {}",
                i + 1,
                row.len(),
                n
            )));
        }

        let coeffs = slots(n)
            .map(|slot| match slot {
                Slot::Linear(v) => rows[v.index()][v.index()],
                Slot::Quadratic(a, b) => rows[a.index()][b.index()] + rows[b.index()][a.index()],
            })
            .collect();
        Self::new(n, coeffs)
    }
}

impl fmt::Display for Qubo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_octave())
    }
}

/// Validity of every full assignment, inherited from its visible prefix.
pub fn select_valid_rows(table: &TruthTable, num_anc: usize) -> Vec<bool> {
    (0..table.num_rows() << num_anc)
        .map(|k| table.is_valid(k >> num_anc))
        .collect()
}

/// Energy of every visible row under the given completion rule for valid
/// rows. Invalid rows always take their lowest completion.
pub fn row_energies(energies: &[f64], table: &TruthTable, num_anc: usize, completion: Completion) -> Vec<f64> {
    let width = 1usize << num_anc;
    energies
        .chunks_exact(width)
        .enumerate()
        .map(|(r, completions)| {
            let pick_max = table.is_valid(r) && completion == Completion::Maximum;
            if pick_max {
                completions.iter().copied().fold(f64::NEG_INFINITY, f64::max)
            } else {
                completions.iter().copied().fold(f64::INFINITY, f64::min)
            }
        })
        .collect()
}

/// Valid/invalid separation statistics.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Separation {
    /// `invalid_min - valid_max`; positive iff the table is separated.
    pub gap: f64,
    /// Highest energy among the valid rows (after completion).
    pub valid_max: f64,
    /// Lowest energy among the valid rows (after completion).
    pub valid_min: f64,
    /// Lowest energy among all invalid assignments.
    pub invalid_min: f64,
}

impl Separation {
    /// Computes separation statistics from the energies of all `2^(n + n_anc)` assignments.
    pub fn from_energies(energies: &[f64], table: &TruthTable, num_anc: usize, completion: Completion) -> Result<Self> {
        let expected = table.num_rows() << num_anc;
        if energies.len() != expected {
            return Err(Error::EnergyCount {
                expected,
                actual: energies.len(),
            });
        }

        let rows = row_energies(energies, table, num_anc, completion);
        let mut valid_max = f64::NEG_INFINITY;
        let mut valid_min = f64::INFINITY;
        let mut invalid_min = f64::INFINITY;
        for (r, &e) in rows.iter().enumerate() {
            if table.is_valid(r) {
                valid_max = valid_max.max(e);
                valid_min = valid_min.min(e);
            } else {
                invalid_min = invalid_min.min(e);
            }
        }

        Ok(Self {
            gap: invalid_min - valid_max,
            valid_max,
            valid_min,
            invalid_min,
        })
    }

    pub fn is_separated(&self) -> bool {
        self.gap > 0.0
    }

    /// Energy difference between the highest and lowest valid rows.
    pub fn spread(&self) -> f64 {
        self.valid_max - self.valid_min
    }
}
