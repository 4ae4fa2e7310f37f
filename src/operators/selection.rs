//! Parent selection.
//!
//! # References
//!
//! - Deb et al. (2002), crowded-comparison operator
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use crate::solution::Solution;
use rand::Rng;

/// Selection strategy for choosing parents.
///
/// # Examples
///
/// ```
/// use u_moea::operators::Selection;
///
/// // Binary tournament on (rank, crowding distance)
/// let sel = Selection::Tournament(2);
///
/// // Uniform draw with replacement
/// let sel = Selection::Uniform;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Tournament selection: pick `k` solutions at random, keep the best by
    /// the crowded-comparison order.
    ///
    /// Lower rank wins; within a rank, larger crowding distance wins; full
    /// ties keep the earlier draw. Missing attributes count as worst.
    ///
    /// # Complexity
    /// O(k) per selection
    Tournament(usize),

    /// Every solution equally likely, drawn with replacement.
    Uniform,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(2)
    }
}

impl Selection {
    /// Select a parent index from the population.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn select<D, R: Rng>(&self, population: &[Solution<D>], rng: &mut R) -> usize {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );

        match self {
            Selection::Tournament(k) => tournament(population, *k, rng),
            Selection::Uniform => rng.random_range(0..population.len()),
        }
    }
}

/// Tournament selection: pick k random solutions, return best.
fn tournament<D, R: Rng>(population: &[Solution<D>], k: usize, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = population.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if crowded_better(&population[idx], &population[best_idx]) {
            best_idx = idx;
        }
    }
    best_idx
}

/// Crowded-comparison order: strictly better rank, or same rank and
/// strictly larger crowding distance.
fn crowded_better<D>(a: &Solution<D>, b: &Solution<D>) -> bool {
    let ra = a.rank().unwrap_or(usize::MAX);
    let rb = b.rank().unwrap_or(usize::MAX);
    if ra != rb {
        return ra < rb;
    }
    let ca = a.crowding_distance().unwrap_or(f64::NEG_INFINITY);
    let cb = b.crowding_distance().unwrap_or(f64::NEG_INFINITY);
    ca > cb
}
