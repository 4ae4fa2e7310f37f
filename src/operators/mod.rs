//! Variation and selection operators.
//!
//! Variation operators produce offspring from parents. They are used by the
//! inner algorithm to breed and by adaptive continuation to perturb archive
//! samples when the population is rebuilt.
//!
//! # Real-valued operators (`Vec<f64>` decisions)
//!
//! - [`SimulatedBinaryCrossover`] (SBX): Deb & Agrawal (1995)
//! - [`PolynomialMutation`] (PM): Deb & Goyal (1996)
//! - [`UniformMutation`] (UM): resample variables uniformly within bounds
//!
//! # Combinators
//!
//! - [`CompoundVariation`]: a crossover followed by a mutation on every child
//!
//! # Selection
//!
//! - [`Selection`]: tournament on (rank, crowding distance) or uniform
//!
//! # References
//!
//! - Deb & Agrawal (1995), "Simulated Binary Crossover for Continuous Search Space"
//! - Deb & Goyal (1996), "A Combined Genetic Adaptive Search (GeneAS) for
//!   Engineering Design"

mod real;
mod selection;

pub use real::{PolynomialMutation, SimulatedBinaryCrossover, UniformMutation};
pub use selection::Selection;

use crate::solution::Solution;
use rand::Rng;

/// Produces offspring from a fixed number of parents.
///
/// Children are returned unevaluated.
pub trait Variation<D>: Send + Sync {
    /// Number of parents consumed per call.
    fn arity(&self) -> usize;

    /// Produces offspring from exactly [`arity`](Self::arity) parents.
    fn evolve<R: Rng>(&self, parents: &[&Solution<D>], rng: &mut R) -> Vec<Solution<D>>;
}

/// Applies `first`, then runs every child through `second`.
///
/// `second` should be a mutation (arity 1); each child is passed to it
/// alone and all of its outputs are kept.
///
/// # Example
///
/// ```
/// use u_moea::operators::{CompoundVariation, PolynomialMutation, SimulatedBinaryCrossover, Variation};
///
/// let bounds = vec![(0.0, 1.0); 4];
/// let sbx_pm = CompoundVariation::new(
///     SimulatedBinaryCrossover::new(bounds.clone()),
///     PolynomialMutation::new(bounds),
/// );
/// assert_eq!(sbx_pm.arity(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct CompoundVariation<A, B> {
    first: A,
    second: B,
}

impl<A, B> CompoundVariation<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<D, A, B> Variation<D> for CompoundVariation<A, B>
where
    A: Variation<D>,
    B: Variation<D>,
{
    fn arity(&self) -> usize {
        self.first.arity()
    }

    fn evolve<R: Rng>(&self, parents: &[&Solution<D>], rng: &mut R) -> Vec<Solution<D>> {
        self.first
            .evolve(parents, rng)
            .iter()
            .flat_map(|child| self.second.evolve(&[child], rng))
            .collect()
    }
}

/// Builds an unevaluated child from a parent's decision.
pub(crate) fn offspring<D: Clone>(parent: &Solution<D>) -> Solution<D> {
    Solution::new(parent.variables().clone())
}
