//! Non-dominated ranking and diversity utilities.
//!
//! Domain-agnostic algorithms for Pareto-based selection, as used by NSGA-II
//! and by any component that needs a population split into fronts.
//!
//! # Algorithms
//!
//! - [`non_dominated_sort`]: Fast non-dominated sorting (Deb et al., 2002)
//!   over solutions with any [`DominanceComparator`]
//! - [`sort_objectives`]: the same on raw objective vectors
//! - [`crowding_distance`]: Crowding distance assignment for diversity preservation
//! - [`truncate`]: NSGA-II environmental selection (fronts, then crowding)
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

use crate::dominance::{pareto_dominance, Dominance, DominanceComparator, ParetoDominance};
use crate::error::{ensure_finite, ensure_len, MoeaResult};
use crate::solution::{Population, Solution};

/// Result of non-dominated sorting.
///
/// Each element of `ranks` corresponds to the Pareto rank of the solution
/// at the same index. Rank 0 is the Pareto front (non-dominated solutions).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NondominatedSortResult {
    /// Pareto rank for each solution (0 = front).
    pub ranks: Vec<usize>,

    /// Indices grouped by front: `fronts[0]` contains rank-0 indices, etc.
    ///
    /// Indices within a front are in ascending (input) order.
    pub fronts: Vec<Vec<usize>>,
}

impl NondominatedSortResult {
    /// Whether no solutions were sorted.
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Number of non-empty fronts.
    pub fn number_of_fronts(&self) -> usize {
        self.fronts.len()
    }
}

/// Fast non-dominated sorting of solutions.
///
/// Assigns a rank to every solution: rank 0 is the set not dominated by any
/// other member, rank `k + 1` is the non-dominated set once ranks `0..=k`
/// are removed.
///
/// # Algorithm (Deb et al., 2002)
///
/// 1. Compare every pair once, recording for each solution how many others
///    dominate it and which solutions it dominates
/// 2. Solutions with a count of zero form front 0
/// 3. Peel: each member of the current front decrements the counts of the
///    solutions it dominates; counts reaching zero form the next front
///
/// Mutually non-dominated (including identical) solutions share a front.
/// Each front lists its members in input order, so runs under a fixed seed
/// are reproducible.
///
/// # Complexity
///
/// O(m * n²) where m = number of objectives, n = number of solutions
///
/// # Errors
///
/// Propagates the comparator's dimension and numeric errors. An empty input
/// yields an empty result.
pub fn non_dominated_sort<D, C: DominanceComparator>(
    comparator: &C,
    solutions: &[Solution<D>],
) -> MoeaResult<NondominatedSortResult> {
    peel(solutions.len(), |i, j| comparator.compare(&solutions[i], &solutions[j]))
}

/// Fast non-dominated sorting on raw objective vectors (strict Pareto).
///
/// # Example
///
/// ```
/// use u_moea::ranking::sort_objectives;
///
/// let objectives = vec![
///     vec![1.0, 5.0],  // Solution A
///     vec![3.0, 3.0],  // Solution B
///     vec![5.0, 1.0],  // Solution C
///     vec![4.0, 4.0],  // Solution D, dominated by B
/// ];
///
/// let result = sort_objectives(&objectives).unwrap();
///
/// assert_eq!(result.ranks, vec![0, 0, 0, 1]);
/// assert_eq!(result.fronts, vec![vec![0, 1, 2], vec![3]]);
/// ```
pub fn sort_objectives(objectives: &[Vec<f64>]) -> MoeaResult<NondominatedSortResult> {
    if let Some(first) = objectives.first() {
        for o in objectives {
            ensure_len("objectives", first.len(), o.len())?;
            ensure_finite("objective", o)?;
        }
    }
    peel(objectives.len(), |i, j| {
        Ok(pareto_dominance(&objectives[i], &objectives[j]))
    })
}

/// Ranks a population by strict Pareto dominance and stores each rank in
/// the solution's attributes.
pub fn assign_ranks<D>(population: &mut Population<D>) -> MoeaResult<NondominatedSortResult> {
    let result = non_dominated_sort(&ParetoDominance, population.as_slice())?;
    for (solution, &rank) in population.iter_mut().zip(result.ranks.iter()) {
        solution.set_rank(rank);
    }
    Ok(result)
}

/// Dominance-count peeling over `n` items.
fn peel<F>(n: usize, mut compare: F) -> MoeaResult<NondominatedSortResult>
where
    F: FnMut(usize, usize) -> MoeaResult<Dominance>,
{
    if n == 0 {
        return Ok(NondominatedSortResult::default());
    }

    let mut domination_count = vec![0usize; n];
    let mut dominates: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ranks = vec![0usize; n];
    let mut front_0 = Vec::new();

    // Compute dominance relationships
    for i in 0..n {
        for j in (i + 1)..n {
            match compare(i, j)? {
                Dominance::Left => {
                    dominates[i].push(j);
                    domination_count[j] += 1;
                }
                Dominance::Right => {
                    dominates[j].push(i);
                    domination_count[i] += 1;
                }
                Dominance::Neither => {}
            }
        }

        // Pairs (k, i) with k < i were visited in earlier rows, so the
        // count for i is final here.
        if domination_count[i] == 0 {
            front_0.push(i);
        }
    }

    // Build subsequent fronts
    let mut fronts = vec![front_0];
    while let Some(current) = fronts.last() {
        let mut next_front = Vec::new();

        for &i in current {
            for &j in &dominates[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    ranks[j] = fronts.len();
                    next_front.push(j);
                }
            }
        }

        if next_front.is_empty() {
            break;
        }
        next_front.sort_unstable();
        fronts.push(next_front);
    }

    Ok(NondominatedSortResult { ranks, fronts })
}

/// Crowding distance assignment for diversity preservation.
///
/// Computes the crowding distance for each solution, measuring how
/// spread out the solutions are in objective space. Higher distance
/// means the solution is more isolated (more diverse).
///
/// Boundary solutions (min/max for any objective) receive `f64::INFINITY`.
///
/// # Algorithm (Deb et al., 2002)
///
/// For each objective:
/// 1. Sort solutions by objective value
/// 2. Assign infinity to boundary solutions
/// 3. For interior solutions, add normalized distance to neighbors
///
/// # Complexity
///
/// O(m * n * log n) where m = number of objectives, n = number of solutions
///
/// # Example
///
/// ```
/// use u_moea::ranking::crowding_distance;
///
/// let objectives = vec![
///     vec![1.0, 5.0],
///     vec![3.0, 3.0],
///     vec![5.0, 1.0],
/// ];
///
/// let distances = crowding_distance(&objectives);
///
/// // Boundary solutions get infinity
/// assert!(distances[0].is_infinite());
/// assert!(distances[2].is_infinite());
/// // Interior solution gets finite distance
/// assert!(distances[1].is_finite());
/// ```
pub fn crowding_distance(objectives: &[Vec<f64>]) -> Vec<f64> {
    let n = objectives.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let m = objectives[0].len();
    let mut distances = vec![0.0f64; n];

    #[allow(clippy::needless_range_loop)] // obj_idx is a column index into 2D data
    for obj_idx in 0..m {
        let mut indices: Vec<usize> = (0..n).collect();
        indices.sort_by(|&a, &b| {
            objectives[a][obj_idx]
                .partial_cmp(&objectives[b][obj_idx])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        distances[indices[0]] = f64::INFINITY;
        distances[indices[n - 1]] = f64::INFINITY;

        let min_val = objectives[indices[0]][obj_idx];
        let max_val = objectives[indices[n - 1]][obj_idx];
        let range = max_val - min_val;

        if range > 0.0 {
            for i in 1..(n - 1) {
                let prev = objectives[indices[i - 1]][obj_idx];
                let next = objectives[indices[i + 1]][obj_idx];
                distances[indices[i]] += (next - prev) / range;
            }
        }
    }

    distances
}

/// Computes crowding distances within one front and stores them on the
/// solutions. `front` holds population indices.
pub fn assign_crowding_distance<D>(population: &mut Population<D>, front: &[usize]) -> Vec<f64> {
    let objectives: Vec<Vec<f64>> = front
        .iter()
        .map(|&i| population[i].objectives().to_vec())
        .collect();
    let distances = crowding_distance(&objectives);
    for (&i, &d) in front.iter().zip(distances.iter()) {
        population[i].set_crowding_distance(d);
    }
    distances
}

/// NSGA-II environmental selection.
///
/// Ranks the population, assigns crowding distances front by front, and
/// keeps whole fronts in rank order until the next front no longer fits.
/// That front is filled by descending crowding distance; equal distances
/// keep population order. Survivors stay in population order.
///
/// Does nothing beyond ranking when `size >= population.len()`.
pub fn truncate<D>(population: &mut Population<D>, size: usize) -> MoeaResult<()> {
    let sorted = assign_ranks(population)?;
    let n = population.len();
    let mut keep = vec![false; n];
    let mut kept = 0usize;

    for front in &sorted.fronts {
        let distances = assign_crowding_distance(population, front);
        if kept >= size {
            break;
        }

        if kept + front.len() <= size {
            for &i in front {
                keep[i] = true;
            }
            kept += front.len();
        } else {
            let mut order: Vec<usize> = (0..front.len()).collect();
            // Stable sort: ties keep front (population) order.
            order.sort_by(|&a, &b| {
                distances[b]
                    .partial_cmp(&distances[a])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            for &k in order.iter().take(size - kept) {
                keep[front[k]] = true;
            }
            kept = size;
        }
    }

    if kept < n {
        let old = std::mem::take(population);
        *population = old
            .into_iter()
            .zip(keep)
            .filter_map(|(s, k)| k.then_some(s))
            .collect();
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dominance::{EpsilonBoxDominance, Epsilons};
    use crate::error::MoeaError;
    use crate::solution::Evaluation;

    fn population(objs: &[&[f64]]) -> Population<usize> {
        objs.iter()
            .enumerate()
            .map(|(i, o)| Solution::with_objectives(i, o.to_vec()))
            .collect()
    }

    // ---- Non-dominated sort ----

    #[test]
    fn test_empty_population() {
        let pop: Population<usize> = Population::new();
        let result = non_dominated_sort(&ParetoDominance, pop.as_slice()).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.number_of_fronts(), 0);
    }

    #[test]
    fn test_single_solution() {
        let pop = population(&[&[1.0, 2.0]]);
        let result = non_dominated_sort(&ParetoDominance, pop.as_slice()).unwrap();
        assert_eq!(result.ranks, vec![0]);
        assert_eq!(result.fronts, vec![vec![0]]);
    }

    #[test]
    fn test_two_non_dominated() {
        let pop = population(&[&[1.0, 3.0], &[3.0, 1.0]]);
        let result = non_dominated_sort(&ParetoDominance, pop.as_slice()).unwrap();
        assert_eq!(result.ranks, vec![0, 0]);
        assert_eq!(result.fronts.len(), 1);
    }

    #[test]
    fn test_clear_dominance() {
        let pop = population(&[&[3.0, 3.0], &[1.0, 1.0], &[2.0, 2.0]]);
        let result = non_dominated_sort(&ParetoDominance, pop.as_slice()).unwrap();
        assert_eq!(result.ranks, vec![2, 0, 1]);
        assert_eq!(result.fronts, vec![vec![1], vec![2], vec![0]]);
    }

    #[test]
    fn test_mixed_fronts() {
        let pop = population(&[
            &[1.0, 5.0], // front 0
            &[3.0, 3.0], // front 0
            &[5.0, 1.0], // front 0
            &[4.0, 4.0], // dominated by [1] → front 1
            &[6.0, 6.0], // dominated by [3] → front 2
        ]);
        let result = non_dominated_sort(&ParetoDominance, pop.as_slice()).unwrap();
        assert_eq!(result.ranks, vec![0, 0, 0, 1, 2]);
    }

    #[test]
    fn test_front_order_is_input_order() {
        // Index 3 is discovered before index 1 when peeling from [0, 2],
        // but the front must list them ascending.
        let pop = population(&[
            &[1.0, 4.0],
            &[5.0, 2.0], // dominated by 2
            &[4.0, 1.0],
            &[2.0, 5.0], // dominated by 0
        ]);
        let result = non_dominated_sort(&ParetoDominance, pop.as_slice()).unwrap();
        assert_eq!(result.fronts, vec![vec![0, 2], vec![1, 3]]);
    }

    #[test]
    fn test_all_equal() {
        let pop = population(&[&[2.0, 2.0], &[2.0, 2.0], &[2.0, 2.0]]);
        let result = non_dominated_sort(&ParetoDominance, pop.as_slice()).unwrap();
        assert!(result.ranks.iter().all(|&r| r == 0));
        assert_eq!(result.fronts, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_three_objectives() {
        let pop = population(&[
            &[1.0, 5.0, 3.0],
            &[3.0, 1.0, 5.0],
            &[5.0, 3.0, 1.0],
            &[4.0, 4.0, 4.0], // incomparable with each of the above
        ]);
        let result = non_dominated_sort(&ParetoDominance, pop.as_slice()).unwrap();
        assert_eq!(result.ranks, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_constraints_rank_infeasible_last() {
        let pop: Population<()> = vec![
            Solution::evaluated((), Evaluation::with_constraints(vec![0.0, 0.0], vec![2.0])),
            Solution::evaluated((), Evaluation::with_constraints(vec![9.0, 9.0], vec![0.0])),
            Solution::evaluated((), Evaluation::with_constraints(vec![0.0, 0.0], vec![1.0])),
        ]
        .into();
        let result = non_dominated_sort(&ParetoDominance, pop.as_slice()).unwrap();
        assert_eq!(result.ranks, vec![2, 0, 1]);
    }

    #[test]
    fn test_epsilon_comparator_merges_boxes() {
        let pop = population(&[&[0.1, 0.1], &[0.9, 0.9], &[1.5, 1.5]]);
        let cmp = EpsilonBoxDominance::new(Epsilons::uniform(1.0).unwrap());
        let result = non_dominated_sort(&cmp, pop.as_slice()).unwrap();
        assert_eq!(result.ranks, vec![0, 0, 1]);
    }

    #[test]
    fn test_sort_propagates_errors() {
        let pop = population(&[&[1.0, 2.0], &[1.0]]);
        assert!(matches!(
            non_dominated_sort(&ParetoDominance, pop.as_slice()),
            Err(MoeaError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            sort_objectives(&[vec![1.0, f64::NAN]]),
            Err(MoeaError::Numeric { .. })
        ));
    }

    #[test]
    fn test_assign_ranks_writes_attributes() {
        let mut pop = population(&[&[2.0, 2.0], &[1.0, 1.0]]);
        assign_ranks(&mut pop).unwrap();
        assert_eq!(pop[0].rank(), Some(1));
        assert_eq!(pop[1].rank(), Some(0));
    }

    // ---- Crowding distance ----

    #[test]
    fn test_crowding_single() {
        let dist = crowding_distance(&[vec![1.0, 2.0]]);
        assert_eq!(dist.len(), 1);
        assert!(dist[0].is_infinite());
    }

    #[test]
    fn test_crowding_evenly_spaced() {
        let objs = vec![
            vec![0.0, 4.0],
            vec![1.0, 3.0],
            vec![2.0, 2.0],
            vec![3.0, 1.0],
            vec![4.0, 0.0],
        ];
        let dist = crowding_distance(&objs);

        assert!(dist[0].is_infinite());
        assert!(dist[4].is_infinite());

        let d1 = dist[1];
        let d2 = dist[2];
        let d3 = dist[3];
        assert!((d1 - d2).abs() < 1e-10, "expected equal: {d1} vs {d2}");
        assert!((d2 - d3).abs() < 1e-10, "expected equal: {d2} vs {d3}");
    }

    #[test]
    fn test_crowding_zero_range_objective() {
        let objs = vec![vec![1.0, 5.0], vec![2.0, 5.0], vec![3.0, 5.0]];
        let dist = crowding_distance(&objs);
        assert!(dist[0].is_infinite());
        assert!(dist[2].is_infinite());
        assert!(dist[1].is_finite());
    }

    // ---- Truncation ----

    #[test]
    fn test_truncate_keeps_best_fronts() {
        let mut pop = population(&[
            &[6.0, 6.0], // front 2
            &[1.0, 5.0], // front 0
            &[5.5, 5.5], // front 1
            &[5.0, 1.0], // front 0
        ]);
        truncate(&mut pop, 3).unwrap();
        let kept: Vec<usize> = pop.iter().map(|s| *s.variables()).collect();
        assert_eq!(kept, vec![1, 2, 3]);
        assert!(pop.iter().all(|s| s.crowding_distance().is_some()));
    }

    #[test]
    fn test_truncate_partial_front_by_crowding() {
        let mut pop = population(&[
            &[0.0, 4.0],
            &[1.0, 3.0], // distance 0.6, most crowded
            &[1.2, 2.8], // distance 1.0
            &[3.0, 1.0], // distance 1.4
            &[4.0, 0.0],
        ]);
        truncate(&mut pop, 4).unwrap();
        let kept: Vec<usize> = pop.iter().map(|s| *s.variables()).collect();
        assert_eq!(kept, vec![0, 2, 3, 4]);
    }

    #[test]
    fn test_truncate_larger_than_population() {
        let mut pop = population(&[&[1.0, 2.0], &[2.0, 1.0]]);
        truncate(&mut pop, 10).unwrap();
        assert_eq!(pop.len(), 2);
        assert!(pop.iter().all(|s| s.rank() == Some(0)));
    }
}
