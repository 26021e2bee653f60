//! Basis (design) matrix over the full Boolean hypercube.
//!
//! For `n = n_visible + n_anc` variables, the basis matrix maps every
//! coefficient slot to its monomial value in every one of the `2^n`
//! assignments. The energy of every assignment under a coefficient vector `c`
//! is then a single matrix-vector product:
//!
//! ```text
//! E(k) = sum_s  B[k][s] * c[s]
//! ```
//!
//! The matrix is stored assignment-major (one row of `num_coeffs` monomials per
//! assignment), so each energy is a dot product over a contiguous slice.
//! Entries are 0/1 and kept as `u8`.

use log::debug;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::utils::{num_coeffs, slots};

/// Largest supported number of visible plus ancillary variables.
pub const MAX_VARIABLES: usize = 20;

/// Precomputed monomial values for every assignment and coefficient slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasisMatrix {
    num_visible: usize,
    num_anc: usize,
    num_coeffs: usize,
    data: Vec<u8>,
}

impl BasisMatrix {
    /// Builds the basis matrix for `num_visible` visible and `num_anc` ancillary variables.
    ///
    /// Fails with [`Error::TooManyVariables`] above [`MAX_VARIABLES`].
    pub fn build(num_visible: usize, num_anc: usize) -> Result<Self> {
        let num_vars = num_visible + num_anc;
        if num_vars > MAX_VARIABLES {
            return Err(Error::TooManyVariables {
                requested: num_vars,
                max: MAX_VARIABLES,
            });
        }

        let width = num_coeffs(num_vars);
        let height = 1usize << num_vars;
        debug!("basis: building {} x {} for {} + {} variables", height, width, num_visible, num_anc);

        let slots: Vec<_> = slots(num_vars).collect();
        let mut data = vec![0u8; width * height];
        if width > 0 {
            data.par_chunks_mut(width).enumerate().for_each(|(assignment, row)| {
                for (entry, slot) in row.iter_mut().zip(&slots) {
                    *entry = slot.monomial(assignment, num_vars);
                }
            });
        }

        Ok(Self {
            num_visible,
            num_anc,
            num_coeffs: width,
            data,
        })
    }

    pub fn num_visible(&self) -> usize {
        self.num_visible
    }

    pub fn num_anc(&self) -> usize {
        self.num_anc
    }

    pub fn num_vars(&self) -> usize {
        self.num_visible + self.num_anc
    }

    /// Number of coefficient slots (rows of the design matrix in column-major terms).
    pub fn num_coeffs(&self) -> usize {
        self.num_coeffs
    }

    /// Number of full assignments, `2^(n_visible + n_anc)`.
    pub fn num_assignments(&self) -> usize {
        1 << self.num_vars()
    }

    /// Monomials of all slots in the given assignment.
    pub fn monomials(&self, assignment: usize) -> &[u8] {
        let start = assignment * self.num_coeffs;
        &self.data[start..start + self.num_coeffs]
    }

    /// Monomial value of slot `slot` in assignment `assignment`.
    pub fn entry(&self, slot: usize, assignment: usize) -> u8 {
        self.monomials(assignment)[slot]
    }

    /// Truth-table row of the visible prefix of an assignment.
    pub fn row_of(&self, assignment: usize) -> usize {
        assignment >> self.num_anc
    }

    /// Matrix-vector product: the value of every assignment under `coeffs`.
    pub fn apply(&self, coeffs: &[f64]) -> Result<Vec<f64>> {
        if coeffs.len() != self.num_coeffs {
            return Err(Error::CoefficientCount {
                expected: self.num_coeffs,
                actual: coeffs.len(),
            });
        }
        if self.num_coeffs == 0 {
            return Ok(vec![0.0; self.num_assignments()]);
        }
        Ok(self
            .data
            .chunks_exact(self.num_coeffs)
            .map(|row| row.iter().zip(coeffs).filter(|(&m, _)| m != 0).map(|(_, &c)| c).sum::<f64>())
            .collect())
    }
}
