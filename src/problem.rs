//! Problem definition contract.

use crate::error::MoeaResult;
use crate::solution::{Evaluation, Solution};
use rand::Rng;

/// Defines a multi-objective optimization problem.
///
/// The user implements initialization and evaluation. Search algorithms
/// handle ranking, archiving, and population control.
///
/// # Minimization
///
/// Every objective is minimized. For maximization, negate the objective.
///
/// # Examples
///
/// ```
/// use rand::Rng;
/// use u_moea::{Evaluation, Problem, Solution};
///
/// struct Schaffer;
///
/// impl Problem for Schaffer {
///     type Decision = f64;
///
///     fn number_of_objectives(&self) -> usize { 2 }
///
///     fn create_solution<R: Rng>(&self, rng: &mut R) -> Solution<f64> {
///         Solution::new(rng.random_range(-10.0..10.0))
///     }
///
///     fn evaluate(&self, x: &f64) -> Evaluation {
///         Evaluation::new(vec![x * x, (x - 2.0) * (x - 2.0)])
///     }
/// }
/// ```
pub trait Problem: Send + Sync {
    /// The decision representation.
    type Decision: Clone + Send + Sync;

    /// Number of objectives produced by [`evaluate`](Self::evaluate).
    fn number_of_objectives(&self) -> usize;

    /// Number of constraint values produced by [`evaluate`](Self::evaluate).
    fn number_of_constraints(&self) -> usize {
        0
    }

    /// Creates a random, unevaluated solution.
    fn create_solution<R: Rng>(&self, rng: &mut R) -> Solution<Self::Decision>;

    /// Computes objectives and constraint violations.
    ///
    /// Must not depend on archive or population state.
    fn evaluate(&self, variables: &Self::Decision) -> Evaluation;
}

/// Evaluates `solution` in place and checks the result.
///
/// # Errors
///
/// - [`DimensionMismatch`](crate::MoeaError::DimensionMismatch) if the
///   evaluation's lengths differ from the problem's declared counts
/// - [`Numeric`](crate::MoeaError::Numeric) on NaN or infinite values
pub fn evaluate_solution<P: Problem>(problem: &P, solution: &mut Solution<P::Decision>) -> MoeaResult<()> {
    let evaluation = problem.evaluate(solution.variables());
    solution.set_evaluation(evaluation);
    solution.validate(problem.number_of_objectives(), problem.number_of_constraints())
}

/// Evaluates every solution in `solutions`.
///
/// With the `parallel` feature and `parallel == true`, evaluation runs on
/// the rayon pool. Results are written in place, so solution order is
/// unchanged either way.
pub fn evaluate_all<P: Problem>(
    problem: &P,
    solutions: &mut [Solution<P::Decision>],
    parallel: bool,
) -> MoeaResult<()> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if parallel {
            return solutions
                .par_iter_mut()
                .try_for_each(|s| evaluate_solution(problem, s));
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    solutions
        .iter_mut()
        .try_for_each(|s| evaluate_solution(problem, s))
}
