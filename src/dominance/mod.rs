//! Pairwise dominance comparison.
//!
//! Two comparators share one contract, [`DominanceComparator`]:
//!
//! - [`ParetoDominance`]: strict Pareto dominance on raw objective values
//! - [`EpsilonBoxDominance`]: Pareto dominance on ε-box indices
//!
//! Both give constraint violations precedence over objectives. The aggregate
//! violation (sum of absolute magnitudes) decides first; objectives are only
//! consulted when both solutions are feasible or when their aggregate
//! violations are exactly equal.
//!
//! All objectives are **minimized**.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - Laumanns et al. (2002), "Combining Convergence and Diversity in
//!   Evolutionary Multiobjective Optimization"

mod epsilon;

pub use epsilon::{BoxKey, EpsilonBoxDominance, Epsilons};

use crate::error::{ensure_finite, ensure_len, MoeaResult};
use crate::solution::Solution;

/// Dominance comparison result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// Left (first argument) dominates right.
    Left,
    /// Right (second argument) dominates left.
    Right,
    /// Neither dominates the other.
    Neither,
}

impl Dominance {
    /// The same relation seen from the other side.
    pub fn flip(self) -> Self {
        match self {
            Dominance::Left => Dominance::Right,
            Dominance::Right => Dominance::Left,
            Dominance::Neither => Dominance::Neither,
        }
    }
}

/// Orders two solutions by dominance.
pub trait DominanceComparator {
    /// Compares `a` against `b`.
    ///
    /// # Errors
    ///
    /// - [`DimensionMismatch`](crate::MoeaError::DimensionMismatch) if the
    ///   objective or constraint vectors differ in length
    /// - [`Numeric`](crate::MoeaError::Numeric) if any value is NaN or infinite
    fn compare<D>(&self, a: &Solution<D>, b: &Solution<D>) -> MoeaResult<Dominance>;

    /// Whether `a` dominates `b`.
    fn dominates<D>(&self, a: &Solution<D>, b: &Solution<D>) -> MoeaResult<bool> {
        Ok(self.compare(a, b)? == Dominance::Left)
    }
}

/// Strict Pareto dominance with constraint precedence.
///
/// # Example
///
/// ```
/// use u_moea::dominance::{Dominance, DominanceComparator, ParetoDominance};
/// use u_moea::Solution;
///
/// let a = Solution::with_objectives((), vec![1.0, 2.0]);
/// let b = Solution::with_objectives((), vec![1.0, 3.0]);
/// assert_eq!(ParetoDominance.compare(&a, &b).unwrap(), Dominance::Left);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParetoDominance;

impl DominanceComparator for ParetoDominance {
    fn compare<D>(&self, a: &Solution<D>, b: &Solution<D>) -> MoeaResult<Dominance> {
        validate_pair(a, b)?;
        if let Some(result) = constraint_dominance(a, b) {
            return Ok(result);
        }
        Ok(pareto_dominance(a.objectives(), b.objectives()))
    }
}

/// Compare two objective vectors for Pareto dominance (minimization).
///
/// Vectors are zipped; callers check lengths.
pub fn pareto_dominance(a: &[f64], b: &[f64]) -> Dominance {
    componentwise_dominance(a, b)
}

/// Pareto dominance over any ordered coordinates (minimization).
///
/// Shared by objective vectors and ε-box keys.
pub(crate) fn componentwise_dominance<T: PartialOrd>(a: &[T], b: &[T]) -> Dominance {
    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (va, vb) in a.iter().zip(b.iter()) {
        if va < vb {
            a_better_in_some = true;
        } else if vb < va {
            b_better_in_some = true;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

/// Constraint precedence.
///
/// Returns `None` when objectives must decide: both feasible, or both
/// infeasible with exactly equal aggregate violation.
pub(crate) fn constraint_dominance<D>(a: &Solution<D>, b: &Solution<D>) -> Option<Dominance> {
    let va = a.aggregate_violation();
    let vb = b.aggregate_violation();

    if va < vb {
        Some(Dominance::Left)
    } else if vb < va {
        Some(Dominance::Right)
    } else {
        None
    }
}

/// Length and finiteness checks shared by every comparator.
pub(crate) fn validate_pair<D>(a: &Solution<D>, b: &Solution<D>) -> MoeaResult<()> {
    ensure_len("objectives", a.objectives().len(), b.objectives().len())?;
    ensure_len("constraints", a.constraints().len(), b.constraints().len())?;
    ensure_finite("objective", a.objectives())?;
    ensure_finite("objective", b.objectives())?;
    ensure_finite("constraint", a.constraints())?;
    ensure_finite("constraint", b.constraints())
}
