//! Fitness ("badness") of a candidate QUBO, minimised by the genetic algorithm.
//!
//! ```text
//!              | -gap / (1 + spread)   if gap > 0
//! badness  =   |
//!              | 1 - gap               otherwise
//! ```
//!
//! Separating QUBOs always score below zero and non-separating ones at or
//! above one, so any separator outranks any non-separator. Among separators a
//! wider gap is better, and at equal gap a smaller spread between the valid
//! rows (closer to a degenerate ground state) is preferred.

use crate::qubo::Separation;

/// Scores strictly below this value are reached exactly by separating QUBOs.
pub const SEPARATION_THRESHOLD: f64 = 0.0;

pub fn badness(separation: &Separation) -> f64 {
    let gap = separation.gap;
    if gap > 0.0 {
        // Stays negative even when the ratio underflows or the spread overflows.
        (-gap / (1.0 + separation.spread())).min(-f64::MIN_POSITIVE)
    } else {
        1.0 - gap
    }
}

/// Whether the given badness belongs to a separating QUBO.
pub fn is_separating(badness: f64) -> bool {
    badness < SEPARATION_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sep(valid_min: f64, valid_max: f64, invalid_min: f64) -> Separation {
        Separation {
            gap: invalid_min - valid_max,
            valid_max,
            valid_min,
            invalid_min,
        }
    }

    #[test]
    fn test_sign_matches_gap() {
        assert!(badness(&sep(-1.0, -1.0, 0.0)) < 0.0);
        assert!(is_separating(badness(&sep(-1.0, -1.0, 0.0))));
        assert_eq!(badness(&sep(-1.0, -1.0, -1.0)), 1.0);
        assert!(!is_separating(badness(&sep(-1.0, -1.0, -1.0))));
        assert_eq!(badness(&sep(-1.0, 0.5, 0.0)), 1.5);
    }

    #[test]
    fn test_wider_gap_is_better() {
        assert!(badness(&sep(-2.0, -2.0, 0.0)) < badness(&sep(-1.0, -1.0, 0.0)));
        assert!(badness(&sep(0.0, 0.0, -0.5)) < badness(&sep(0.0, 0.0, -1.0)));
    }

    #[test]
    fn test_spread_breaks_ties() {
        let tight = badness(&sep(-1.0, -1.0, 0.0));
        let loose = badness(&sep(-3.0, -1.0, 0.0));
        assert!(tight < loose);
        assert!(loose < 0.0);
    }

    #[test]
    fn test_any_separator_beats_any_non_separator() {
        let tiny_separator = badness(&sep(-100.0, 1e-9, 2e-9));
        let near_miss = badness(&sep(0.0, 0.0, 0.0));
        assert!(tiny_separator < near_miss);
    }

    #[test]
    fn test_extreme_spread_still_separates() {
        // valid_max - valid_min overflows to +inf.
        let wide = sep(-f64::MAX, f64::MAX, f64::MAX);
        assert_eq!(wide.spread(), f64::INFINITY);
        let b = badness(&Separation { gap: 1.0, ..wide });
        assert!(b < 0.0);
        assert!(is_separating(b));

        // gap / spread = 1e-600 underflows to zero.
        let underflow = badness(&sep(-1e300, 0.0, 1e-300));
        assert!(is_separating(underflow));
    }
}
