//! The capability interface shared by search algorithms and their wrappers.
//!
//! [`SearchAlgorithm`] is deliberately narrow: one iteration step, read
//! access to the population and archive, and a way to replace the
//! population. Wrappers such as
//! [`AdaptiveContinuation`](crate::continuation::AdaptiveContinuation)
//! implement it too, forwarding to the algorithm they own.

use crate::archive::EpsilonBoxArchive;
use crate::error::MoeaResult;
use crate::problem::Problem;
use crate::solution::{Population, Solution};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Summary of a budgeted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunResult {
    /// Cumulative objective evaluations at the end of the run.
    pub evaluations: usize,

    /// Cumulative steps at the end of the run.
    pub steps: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,
}

/// A step-wise search algorithm.
pub trait SearchAlgorithm {
    /// The problem being solved.
    type Problem: Problem;

    fn problem(&self) -> &Self::Problem;

    /// Performs one iteration. The first call initializes the population.
    fn step(&mut self) -> MoeaResult<()>;

    /// Cumulative number of objective evaluations.
    fn evaluations(&self) -> usize;

    /// Cumulative number of completed steps.
    fn steps(&self) -> usize;

    fn population(&self) -> &Population<<Self::Problem as Problem>::Decision>;

    /// The external archive, if this algorithm keeps one.
    ///
    /// An algorithm that returns `Some` here once must keep returning `Some`
    /// for its whole lifetime. [`AdaptiveContinuation`] checks for the archive
    /// only at construction.
    ///
    /// [`AdaptiveContinuation`]: crate::continuation::AdaptiveContinuation
    fn archive(&self) -> Option<&EpsilonBoxArchive<<Self::Problem as Problem>::Decision>>;

    /// Replaces the population.
    ///
    /// Unevaluated solutions are evaluated (and counted), every solution is
    /// offered to the archive, and ranking attributes are recomputed.
    /// `solutions` must not be empty; implementations may panic otherwise.
    fn replace_population(
        &mut self,
        solutions: Vec<Solution<<Self::Problem as Problem>::Decision>>,
    ) -> MoeaResult<()>;

    /// Steps until at least `max_evaluations` evaluations have been used.
    fn run(&mut self, max_evaluations: usize) -> MoeaResult<RunResult> {
        self.run_with_cancel(max_evaluations, None)
    }

    /// Runs with an optional cancellation token.
    ///
    /// The budget and the flag are checked between steps only; a step in
    /// progress always completes.
    fn run_with_cancel(
        &mut self,
        max_evaluations: usize,
        cancel: Option<Arc<AtomicBool>>,
    ) -> MoeaResult<RunResult> {
        let mut cancelled = false;

        while self.evaluations() < max_evaluations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            let before = self.evaluations();
            self.step()?;
            if self.evaluations() == before {
                tracing::warn!(
                    steps = self.steps(),
                    "step used no evaluations; stopping run"
                );
                break;
            }
        }

        Ok(RunResult {
            evaluations: self.evaluations(),
            steps: self.steps(),
            cancelled,
        })
    }
}
