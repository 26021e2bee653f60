//! Index arithmetic for the coefficient vector.
//!
//! Layout over `n` variables: the `n` linear slots come first, followed by one
//! quadratic slot per pair `(i, j)` with `i < j`, in lexicographic order:
//!
//! ```text
//! [x0, x1, ..., x(n-1), x0*x1, x0*x2, ..., x0*x(n-1), x1*x2, ..., x(n-2)*x(n-1)]
//! ```

use crate::types::{Slot, Var};

/// Number of unordered pairs of `n` variables, i.e. `n choose 2`.
pub fn num_pairs(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Total number of coefficient slots for `n` variables.
pub fn num_coeffs(n: usize) -> usize {
    n + num_pairs(n)
}

/// Offset of pair `(i, j)`, `i < j < n`, among the quadratic slots.
///
/// ```text
/// (i, j) -> i * (2n - i - 1) / 2 + (j - i - 1)
/// ```
pub fn pair_offset(i: usize, j: usize, n: usize) -> usize {
    assert!(i < j && j < n, "pair ({i}, {j}) is not ordered within {n} variables");
    i * (2 * n - i - 1) / 2 + (j - i - 1)
}

/// Position of the given slot in the coefficient vector.
pub fn slot_index(slot: Slot, n: usize) -> usize {
    match slot {
        Slot::Linear(v) => v.index(),
        Slot::Quadratic(a, b) => n + pair_offset(a.index(), b.index(), n),
    }
}

/// Inverse of [`slot_index`].
pub fn slot_at(index: usize, n: usize) -> Slot {
    assert!(index < num_coeffs(n), "slot {index} out of range for {n} variables");
    if index < n {
        return Slot::Linear(Var::new(index));
    }
    let mut rest = index - n;
    let mut i = 0;
    loop {
        let row = n - i - 1;
        if rest < row {
            return Slot::Quadratic(Var::new(i), Var::new(i + 1 + rest));
        }
        rest -= row;
        i += 1;
    }
}

/// All slots over `n` variables, in coefficient-vector order.
pub fn slots(n: usize) -> impl Iterator<Item = Slot> {
    let linear = (0..n).map(|i| Slot::Linear(Var::new(i)));
    let quadratic = (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| Slot::Quadratic(Var::new(i), Var::new(j))));
    linear.chain(quadratic)
}

/// Binary rendering of `value` using exactly `width` digits.
pub fn to_bits(value: usize, width: usize) -> String {
    format!("{:0width$b}", value, width = width)
}
