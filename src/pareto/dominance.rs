//! Pareto dominance under an explicit optimization sense.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"

use crate::problem::Sense;

/// Dominance comparison result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other.
    Neither,
}

/// Compares two objective vectors for Pareto dominance.
///
/// Vectors of different length, empty vectors, and vectors containing NaN
/// are incomparable and yield [`Dominance::Neither`]; NaN must never be
/// allowed to rank a solution.
///
/// # Examples
///
/// ```
/// use u_hyperheur::pareto::{dominance, Dominance};
/// use u_hyperheur::problem::Sense;
///
/// assert_eq!(dominance(&[8.0, 8.0], &[6.0, 6.0], Sense::Maximize), Dominance::Left);
/// assert_eq!(dominance(&[8.0, 8.0], &[6.0, 6.0], Sense::Minimize), Dominance::Right);
/// assert_eq!(dominance(&[10.0, 2.0], &[3.0, 9.0], Sense::Maximize), Dominance::Neither);
/// ```
pub fn dominance(a: &[f64], b: &[f64], sense: Sense) -> Dominance {
    if a.len() != b.len() || a.is_empty() {
        return Dominance::Neither;
    }

    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (&va, &vb) in a.iter().zip(b.iter()) {
        if va.is_nan() || vb.is_nan() {
            return Dominance::Neither;
        }
        if sense.improves(va, vb) {
            a_better_in_some = true;
        } else if sense.improves(vb, va) {
            b_better_in_some = true;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

/// Returns `true` if `x` dominates `y`.
///
/// Under [`Sense::Maximize`], `x` dominates `y` iff `x_i >= y_i` for every
/// objective and `x_i > y_i` for at least one; [`Sense::Minimize`] flips
/// the inequalities. The relation is irreflexive, asymmetric, and
/// transitive.
#[inline]
pub fn dominates(x: &[f64], y: &[f64], sense: Sense) -> bool {
    dominance(x, y, sense) == Dominance::Left
}
