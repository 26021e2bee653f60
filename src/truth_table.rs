//! Truth tables over the visible variables.
//!
//! A truth table over `n` columns has exactly `2^n` rows. Row `r` stands for
//! the assignment whose binary rendering (first column = most significant bit)
//! is `r`, and carries a single validity bit.

use std::fmt;

use crate::basis::MAX_VARIABLES;
use crate::error::{Error, Result};
use crate::utils::to_bits;

/// Row count of a table over `num_cols` columns, checked before anything is allocated.
fn table_size(num_cols: usize) -> Result<usize> {
    if num_cols > MAX_VARIABLES {
        return Err(Error::TooManyVariables {
            requested: num_cols,
            max: MAX_VARIABLES,
        });
    }
    Ok(1 << num_cols)
}

/// Immutable mapping from every visible assignment to a validity flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTable {
    num_cols: usize,
    valid: Vec<bool>,
}

impl TruthTable {
    /// Creates a truth table from one validity flag per row.
    ///
    /// The number of rows must be `2^n` for some `n >= 1`, and the table must
    /// contain at least one valid and one invalid row.
    pub fn new(valid: Vec<bool>) -> Result<Self> {
        let rows = valid.len();
        if rows < 2 || !rows.is_power_of_two() {
            return Err(Error::TableSize { rows });
        }
        let num_valid = valid.iter().filter(|&&v| v).count();
        if num_valid == 0 || num_valid == rows {
            return Err(Error::DegenerateTable { valid: num_valid, rows });
        }
        let num_cols = rows.trailing_zeros() as usize;
        Ok(Self { num_cols, valid })
    }

    /// Creates a truth table over `num_cols` columns in which exactly the given rows are valid.
    pub fn from_valid_rows(num_cols: usize, rows: impl IntoIterator<Item = usize>) -> Result<Self> {
        let size = table_size(num_cols)?;
        let mut valid = vec![false; size];
        for r in rows {
            if r >= size {
                return Err(Error::TableSize { rows: r + 1 });
            }
            valid[r] = true;
        }
        Self::new(valid)
    }

    /// Creates a truth table over `num_cols` columns from a predicate on the column values.
    ///
    /// ```
    /// use qubo_tt::truth_table::TruthTable;
    ///
    /// let and = TruthTable::from_fn(2, |x| x[0] && x[1]).unwrap();
    /// assert_eq!(and.valid_rows().collect::<Vec<_>>(), vec![3]);
    /// ```
    pub fn from_fn(num_cols: usize, f: impl Fn(&[bool]) -> bool) -> Result<Self> {
        let size = table_size(num_cols)?;
        let valid = (0..size)
            .map(|r| {
                let bits: Vec<bool> = (0..num_cols).map(|c| (r >> (num_cols - 1 - c)) & 1 == 1).collect();
                f(&bits)
            })
            .collect();
        Self::new(valid)
    }

    /// Number of visible columns `n`.
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Number of rows, `2^n`.
    pub fn num_rows(&self) -> usize {
        self.valid.len()
    }

    pub fn num_valid(&self) -> usize {
        self.valid.iter().filter(|&&v| v).count()
    }

    pub fn is_valid(&self, row: usize) -> bool {
        self.valid[row]
    }

    /// Validity flags, indexed by row.
    pub fn flags(&self) -> &[bool] {
        &self.valid
    }

    pub fn valid_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.valid.iter().enumerate().filter(|(_, &v)| v).map(|(r, _)| r)
    }

    pub fn invalid_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.valid.iter().enumerate().filter(|(_, &v)| !v).map(|(r, _)| r)
    }
}

impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, &v) in self.valid.iter().enumerate() {
            writeln!(f, "{} {}", to_bits(r, self.num_cols), v as u8)?;
        }
        Ok(())
    }
}
