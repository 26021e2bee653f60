//! Small value types shared across the search: variables, coefficient slots,
//! coefficient bounds and the completion rule for ancillary variables.

use std::fmt;

use crate::error::{Error, Result};

/// A binary variable of the QUBO (0-indexed).
///
/// Visible variables (truth-table columns) come first, ancillary variables
/// follow them. The variable with index 0 is the most significant bit of an
/// assignment index.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Var(usize);

impl Var {
    /// Creates a new variable with the given index.
    pub fn new(index: usize) -> Self {
        Var(index)
    }

    /// Returns the raw variable index.
    pub fn index(self) -> usize {
        self.0
    }

    /// Returns the value of this variable in the given assignment over `num_vars` variables.
    pub fn value_in(self, assignment: usize, num_vars: usize) -> bool {
        debug_assert!(self.0 < num_vars);
        (assignment >> (num_vars - 1 - self.0)) & 1 == 1
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl From<Var> for usize {
    fn from(var: Var) -> Self {
        var.0
    }
}

/// Kind of a QUBO coefficient.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CoeffKind {
    Linear,
    Quadratic,
}

impl fmt::Display for CoeffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoeffKind::Linear => write!(f, "linear"),
            CoeffKind::Quadratic => write!(f, "quadratic"),
        }
    }
}

/// A coefficient slot: either the linear term of one variable,
/// or the quadratic term of an unordered pair `i < j`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Slot {
    Linear(Var),
    Quadratic(Var, Var),
}

impl Slot {
    pub fn kind(self) -> CoeffKind {
        match self {
            Slot::Linear(_) => CoeffKind::Linear,
            Slot::Quadratic(_, _) => CoeffKind::Quadratic,
        }
    }

    /// Monomial value of this slot in the given assignment: a bit, or a product of two bits.
    pub fn monomial(self, assignment: usize, num_vars: usize) -> u8 {
        match self {
            Slot::Linear(v) => v.value_in(assignment, num_vars) as u8,
            Slot::Quadratic(a, b) => (a.value_in(assignment, num_vars) && b.value_in(assignment, num_vars)) as u8,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Linear(v) => write!(f, "{}", v),
            Slot::Quadratic(a, b) => write!(f, "{}*{}", a, b),
        }
    }
}

/// Allowed coefficient ranges, one closed interval per coefficient kind.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CoeffBounds {
    pub min_linear: f64,
    pub max_linear: f64,
    pub min_quadratic: f64,
    pub max_quadratic: f64,
}

impl Default for CoeffBounds {
    fn default() -> Self {
        Self {
            min_linear: -1.0,
            max_linear: 1.0,
            min_quadratic: -1.0,
            max_quadratic: 1.0,
        }
    }
}

impl CoeffBounds {
    pub fn new(min_linear: f64, max_linear: f64, min_quadratic: f64, max_quadratic: f64) -> Result<Self> {
        let bounds = Self {
            min_linear,
            max_linear,
            min_quadratic,
            max_quadratic,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Checks that both intervals are finite and non-degenerate, with a finite width.
    pub fn validate(&self) -> Result<()> {
        for kind in [CoeffKind::Linear, CoeffKind::Quadratic] {
            let (min, max) = self.range(kind);
            if !min.is_finite() || !max.is_finite() || min >= max || !(max - min).is_finite() {
                return Err(Error::InvalidBounds { kind, min, max });
            }
        }
        Ok(())
    }

    /// Returns `(min, max)` for the given kind.
    pub fn range(&self, kind: CoeffKind) -> (f64, f64) {
        match kind {
            CoeffKind::Linear => (self.min_linear, self.max_linear),
            CoeffKind::Quadratic => (self.min_quadratic, self.max_quadratic),
        }
    }

    pub fn width(&self, kind: CoeffKind) -> f64 {
        let (min, max) = self.range(kind);
        max - min
    }

    /// Largest absolute value a coefficient of the given kind may take.
    pub fn magnitude(&self, kind: CoeffKind) -> f64 {
        let (min, max) = self.range(kind);
        min.abs().max(max.abs())
    }

    pub fn clamp(&self, kind: CoeffKind, value: f64) -> f64 {
        let (min, max) = self.range(kind);
        value.clamp(min, max)
    }
}

/// How the energy of a valid visible row is derived from its ancillary completions.
///
/// With no ancillary variables both rules coincide.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Completion {
    /// A valid row counts with its best (lowest-energy) completion.
    #[default]
    Minimum,
    /// Every completion of a valid row must stay below all invalid assignments.
    Maximum,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_value_in() {
        // 0b101 over 3 variables: x0 = 1, x1 = 0, x2 = 1
        assert!(Var::new(0).value_in(0b101, 3));
        assert!(!Var::new(1).value_in(0b101, 3));
        assert!(Var::new(2).value_in(0b101, 3));
    }

    #[test]
    fn test_slot_monomial() {
        let x0 = Var::new(0);
        let x1 = Var::new(1);
        assert_eq!(Slot::Linear(x1).monomial(0b01, 2), 1);
        assert_eq!(Slot::Linear(x0).monomial(0b01, 2), 0);
        assert_eq!(Slot::Quadratic(x0, x1).monomial(0b01, 2), 0);
        assert_eq!(Slot::Quadratic(x0, x1).monomial(0b11, 2), 1);
        assert_eq!(Slot::Quadratic(x0, x1).to_string(), "x0*x1");
    }

    #[test]
    fn test_bounds_validation() {
        assert!(CoeffBounds::default().validate().is_ok());
        assert_eq!(
            CoeffBounds::new(1.0, -1.0, -1.0, 1.0),
            Err(Error::InvalidBounds {
                kind: CoeffKind::Linear,
                min: 1.0,
                max: -1.0,
            })
        );
        assert!(CoeffBounds::new(-1.0, 1.0, 0.5, 0.5).is_err());
        assert!(CoeffBounds::new(-1.0, f64::INFINITY, -1.0, 1.0).is_err());

        // Both ends finite, but the width is not.
        assert_eq!(
            CoeffBounds::new(-1e308, 1e308, -1.0, 1.0),
            Err(Error::InvalidBounds {
                kind: CoeffKind::Linear,
                min: -1e308,
                max: 1e308,
            })
        );
        assert!(CoeffBounds::new(-1.0, 1.0, -f64::MAX, f64::MAX).is_err());
        assert!(CoeffBounds::new(-1.0, 1.0, 0.0, f64::MAX).is_ok());
    }

    #[test]
    fn test_bounds_clamp() {
        let bounds = CoeffBounds::new(-2.0, 1.0, -1.0, 3.0).unwrap();
        assert_eq!(bounds.clamp(CoeffKind::Linear, -5.0), -2.0);
        assert_eq!(bounds.clamp(CoeffKind::Quadratic, 5.0), 3.0);
        assert_eq!(bounds.width(CoeffKind::Quadratic), 4.0);
        assert_eq!(bounds.magnitude(CoeffKind::Linear), 2.0);
        assert_eq!(bounds.magnitude(CoeffKind::Quadratic), 3.0);
    }
}
